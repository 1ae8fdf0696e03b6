use std::time::SystemTime;

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use backend_test_support::{assert_problem_details, unique_username};
use parley_backend::services::{auth, users};
use parley_backend::{verify, AuthOutcome, Rejection};
use serde_json::Value;

use crate::support::auth::{login_request, register_request};
use crate::support::{create_test_app, memory_state};

#[actix_web::test]
async fn login_returns_bearer_token_for_registered_user() {
    let state = memory_state().await;
    let security = state.security.clone();
    let app = create_test_app(state).with_prod_routes().build().await;

    let resp = test::call_service(&app, register_request("alice", "p@ss1234")).await;
    assert_eq!(resp.status().as_u16(), 200);

    let resp = test::call_service(&app, login_request("alice", "p@ss1234")).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap();
    let claims = verify(token, SystemTime::now(), &security).unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.exp - claims.iat, security.token_ttl.as_secs() as i64);
}

/// Sorted headers minus the per-request ids.
fn stable_headers(resp: &ServiceResponse<BoxBody>) -> Vec<(String, String)> {
    let mut headers: Vec<_> = resp
        .headers()
        .iter()
        .filter(|(k, _)| k.as_str() != "x-trace-id" && k.as_str() != "x-request-id")
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap().to_string()))
        .collect();
    headers.sort();
    headers
}

#[actix_web::test]
async fn wrong_password_and_unknown_user_are_indistinguishable() {
    let app = create_test_app(memory_state().await)
        .with_prod_routes()
        .build()
        .await;
    let username = unique_username("bob");

    let resp = test::call_service(&app, register_request(&username, "correct-horse")).await;
    assert_eq!(resp.status().as_u16(), 200);

    let wrong_pw = test::call_service(&app, login_request(&username, "battery-staple")).await;
    let wrong_pw_headers = stable_headers(&wrong_pw);
    let mut wrong_pw_body =
        assert_problem_details(wrong_pw, 401, "UNAUTHORIZED", Some("Could not validate credentials")).await;

    let unknown = test::call_service(&app, login_request("nobody-here", "battery-staple")).await;
    let unknown_headers = stable_headers(&unknown);
    let mut unknown_body =
        assert_problem_details(unknown, 401, "UNAUTHORIZED", Some("Could not validate credentials")).await;

    wrong_pw_body["trace_id"] = Value::Null;
    unknown_body["trace_id"] = Value::Null;
    assert_eq!(wrong_pw_body, unknown_body);
    assert_eq!(wrong_pw_headers, unknown_headers);
}

#[actix_web::test]
async fn login_form_missing_password_is_bad_request() {
    let app = create_test_app(memory_state().await)
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token")
        .set_form([("username", "alice")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, 400, "BAD_REQUEST", Some("Invalid login form")).await;
}

#[tokio::test]
async fn service_level_outcomes() {
    let state = memory_state().await;
    let db = state.db().unwrap();
    let now = SystemTime::now();

    users::register(db, "carol", "s3cret!!").await.unwrap();

    let accepted = auth::login(db, &state.security, "carol", "s3cret!!", now)
        .await
        .unwrap();
    let AuthOutcome::Accepted(issued) = accepted else {
        panic!("expected accepted login, got {accepted:?}");
    };

    let who = auth::authenticate(db, &state.security, &issued.access_token, now)
        .await
        .unwrap();
    assert!(matches!(who, AuthOutcome::Accepted(ref id) if id.username == "carol"));

    let wrong = auth::login(db, &state.security, "carol", "nope", now)
        .await
        .unwrap();
    assert_eq!(wrong, AuthOutcome::Rejected(Rejection::InvalidCredentials));

    let missing = auth::login(db, &state.security, "dave", "nope", now)
        .await
        .unwrap();
    assert_eq!(missing, AuthOutcome::Rejected(Rejection::InvalidCredentials));

    let garbage = auth::authenticate(db, &state.security, "not.a.token", now)
        .await
        .unwrap();
    assert_eq!(garbage, AuthOutcome::Rejected(Rejection::InvalidToken));
}

#[tokio::test]
async fn token_for_unknown_subject_is_rejected() {
    let state = memory_state().await;
    let db = state.db().unwrap();
    let now = SystemTime::now();

    let token = parley_backend::issue("ghost", now, &state.security).unwrap();
    let outcome = auth::authenticate(db, &state.security, &token, now)
        .await
        .unwrap();
    assert_eq!(outcome, AuthOutcome::Rejected(Rejection::InvalidToken));
}
