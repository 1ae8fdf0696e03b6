use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use parley_backend::config::{load_env_file, AppConfig};
use parley_backend::infra::state::build_state;
use parley_backend::middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
use parley_backend::routes;
use parley_backend::services::generation::HttpTextGenerator;
use parley_backend::telemetry;
use tracing::{error, info, warn};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    if let Err(e) = load_env_file(None) {
        error!(error = %e, "Invalid .env file");
        std::process::exit(1);
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let mut builder = build_state()
        .with_db(config.db_kind)
        .with_security(config.security.clone());

    match &config.llm {
        Some(llm) => match HttpTextGenerator::new(llm.endpoint.clone(), llm.timeout) {
            Ok(generator) => {
                info!(endpoint = %llm.endpoint, "Text generation enabled");
                builder = builder.with_generator(Arc::new(generator));
            }
            Err(e) => {
                error!(error = %e, "Failed to build generation client");
                std::process::exit(1);
            }
        },
        None => warn!("LLM_ENDPOINT not set; text generation disabled"),
    }

    let app_state = match builder.build().await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };
    info!(db_kind = %config.db_kind, "Database connected and migrated");

    let data = web::Data::new(app_state);
    let origins = config.cors_origins.clone();

    info!(host = %config.host, port = config.port, "Starting Parley backend");

    HttpServer::new(move || {
        App::new()
            .wrap(TraceSpan)
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .wrap(cors_middleware(&origins))
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
