use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{test, Error};
use serde_json::{json, Value};

pub fn register_request(username: &str, password: &str) -> Request {
    test::TestRequest::post()
        .uri("/api/v1/users/register")
        .set_json(json!({ "username": username, "password": password }))
        .to_request()
}

pub fn login_request(username: &str, password: &str) -> Request {
    test::TestRequest::post()
        .uri("/api/v1/auth/token")
        .set_form([("username", username), ("password", password)])
        .to_request()
}

pub fn me_request(token: Option<&str>) -> Request {
    let mut req = test::TestRequest::get().uri("/api/v1/users/me");
    if let Some(token) = token {
        req = req.insert_header((AUTHORIZATION, format!("Bearer {token}")));
    }
    req.to_request()
}

/// Register then log in, returning the access token.
pub async fn register_and_login<S>(app: &S, username: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let resp = test::call_service(app, register_request(username, password)).await;
    assert_eq!(resp.status().as_u16(), 200, "registration should succeed");

    let resp = test::call_service(app, login_request(username, password)).await;
    assert_eq!(resp.status().as_u16(), 200, "login should succeed");
    let body: Value = test::read_body_json(resp).await;
    body["access_token"]
        .as_str()
        .expect("access_token in login response")
        .to_string()
}
