use actix_web::web;

pub mod auth;
pub mod health;
pub mod llm;
pub mod users;

/// API prefix for every versioned route.
pub const API_PREFIX: &str = "/api/v1";

/// Register every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root));
    cfg.service(
        web::scope(API_PREFIX)
            .configure(health::configure_routes)
            .service(web::scope("/auth").configure(auth::configure_routes))
            .service(web::scope("/users").configure(users::configure_routes))
            .service(web::scope("/llm").configure(llm::configure_routes)),
    );
}
