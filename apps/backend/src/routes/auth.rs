use std::time::SystemTime;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::db::require_db;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::services::auth;
use crate::state::app_state::AppState;

/// OAuth2 password-grant style form; extra fields are ignored.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

async fn login(
    form: web::Form<LoginForm>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let LoginForm { username, password } = form.into_inner();
    let db = require_db(&app_state)?;

    let issued = auth::login(db, &app_state.security, &username, &password, SystemTime::now())
        .await?
        .into_result()?;

    Ok(HttpResponse::Ok().json(issued))
}

fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::BadRequest, format!("Invalid login form: {err}")).into()
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/token")
            .app_data(form_config())
            .route(web::post().to(login)),
    );
}
