use std::time::{Duration, SystemTime};

use actix_web::http::header::AUTHORIZATION;
use actix_web::test;
use backend_test_support::assert_problem_details;
use parley_backend::{issue, SecurityConfig};
use serde_json::Value;

use crate::support::auth::{me_request, register_and_login};
use crate::support::{create_test_app, memory_state, memory_state_with};

#[actix_web::test]
async fn alice_scenario() {
    let app = create_test_app(memory_state().await)
        .with_prod_routes()
        .build()
        .await;

    let token = register_and_login(&app, "alice", "p@ss1234").await;

    let resp = test::call_service(&app, me_request(Some(&token))).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "alice");
    assert!(body["id"].as_i64().unwrap() > 0);

    let resp = test::call_service(&app, me_request(None)).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED", Some("Could not validate credentials")).await;
}

#[actix_web::test]
async fn expired_token_is_unauthorized() {
    let security = SecurityConfig::for_tests();
    let state = memory_state_with(security.clone(), None).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    register_and_login(&app, "alice", "p@ss1234").await;

    // Issued an hour ago with the default 30 minute TTL.
    let past = SystemTime::now() - Duration::from_secs(60 * 60);
    let stale = issue("alice", past, &security).unwrap();

    let resp = test::call_service(&app, me_request(Some(&stale))).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED", None).await;
}

#[actix_web::test]
async fn zero_ttl_token_is_unauthorized() {
    let security = SecurityConfig::for_tests().with_ttl(Duration::ZERO);
    let state = memory_state_with(security, None).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let token = register_and_login(&app, "alice", "p@ss1234").await;

    let resp = test::call_service(&app, me_request(Some(&token))).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED", None).await;
}

#[actix_web::test]
async fn token_signed_with_other_secret_is_unauthorized() {
    let app = create_test_app(memory_state().await)
        .with_prod_routes()
        .build()
        .await;
    register_and_login(&app, "alice", "p@ss1234").await;

    let forged = issue("alice", SystemTime::now(), &SecurityConfig::for_tests()).unwrap();
    let resp = test::call_service(&app, me_request(Some(&forged))).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED", None).await;
}

#[actix_web::test]
async fn malformed_authorization_headers_are_unauthorized() {
    let app = create_test_app(memory_state().await)
        .with_prod_routes()
        .build()
        .await;

    for value in ["Basic abc", "Bearer", "token-without-scheme"] {
        let req = test::TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header((AUTHORIZATION, value))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details(resp, 401, "UNAUTHORIZED", None).await;
    }
}
