use actix_cors::Cors;
use actix_web::http::header;

/// CORS restricted to the configured origins and the methods the API uses.
/// Entries that are not http(s) URLs are ignored.
pub fn cors_middleware(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in origins
        .iter()
        .map(|s| s.as_str())
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
    {
        cors = cors.allowed_origin(origin);
    }

    cors
}
