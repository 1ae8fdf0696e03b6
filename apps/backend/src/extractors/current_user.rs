use std::time::SystemTime;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use super::auth_token::AuthToken;
use crate::db::require_db;
use crate::error::AppError;
use crate::services::auth;
use crate::services::users::Identity;
use crate::state::app_state::AppState;

/// Identity resolved from the bearer token. Any failure is the generic 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        let token = AuthToken::from_request(&req, payload).into_inner();

        Box::pin(async move {
            let AuthToken { token } = token?;

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;
            let db = require_db(app_state)?;

            auth::authenticate(db, &app_state.security, &token, SystemTime::now())
                .await?
                .into_result()
                .map(CurrentUser)
        })
    }
}
