use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::services::users::{self, Identity};
use crate::state::app_state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub id: i64,
}

impl From<Identity> for UserResponse {
    fn from(identity: Identity) -> Self {
        Self {
            username: identity.username,
            id: identity.id,
        }
    }
}

async fn register(
    body: ValidatedJson<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let RegisterRequest { username, password } = body.into_inner();
    let db = require_db(&app_state)?;

    let identity = users::register(db, &username, &password).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(identity)))
}

async fn me(
    CurrentUser(identity): CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;

    let profile = users::get_profile(db, identity.id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(profile)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/me", web::get().to(me));
}
