use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::services::generation::{self, GenerationParams};
use crate::state::app_state::AppState;

pub const MAX_PROMPT_CHARS: usize = 8000;

fn default_max_length() -> u32 {
    512
}
fn default_temperature() -> f32 {
    0.7
}
fn default_top_p() -> f32 {
    0.95
}
fn default_top_k() -> u32 {
    50
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default = "default_max_length")]
    pub max_length: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
}

impl GenerateRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.prompt.trim().is_empty() {
            return Err(AppError::invalid(
                ErrorCode::InvalidPrompt,
                "Prompt must not be empty",
            ));
        }
        if self.prompt.chars().count() > MAX_PROMPT_CHARS {
            return Err(AppError::invalid(
                ErrorCode::InvalidPrompt,
                format!("Prompt must be at most {MAX_PROMPT_CHARS} characters"),
            ));
        }
        if self.max_length < 1 {
            return Err(AppError::invalid(
                ErrorCode::InvalidGenerationParams,
                "max_length must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(AppError::invalid(
                ErrorCode::InvalidGenerationParams,
                "temperature must be between 0 and 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(AppError::invalid(
                ErrorCode::InvalidGenerationParams,
                "top_p must be between 0 and 1",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub response: String,
}

async fn generate(
    CurrentUser(identity): CurrentUser,
    body: ValidatedJson<GenerateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    req.validate()?;

    let generator = app_state
        .generator()
        .ok_or_else(|| AppError::generation_unavailable("Text generation is not configured"))?;

    let params = GenerationParams::clamped(req.max_length, req.temperature, req.top_p, req.top_k);
    let response = generation::generate_text(generator.as_ref(), &req.prompt, params).await?;

    info!(user_id = identity.id, chars = response.chars().count(), "Text generated");
    Ok(HttpResponse::Ok().json(GenerateResponse { response }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/generate", web::post().to(generate));
}
