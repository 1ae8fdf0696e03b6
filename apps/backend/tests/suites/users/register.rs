use actix_web::test;
use backend_test_support::{assert_problem_details, unique_username};
use parley_backend::entities::Users;
use parley_backend::services::users;
use parley_backend::AppError;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{json, Value};

use crate::support::auth::register_request;
use crate::support::{create_test_app, memory_state};

#[actix_web::test]
async fn register_returns_identity_and_stores_hash() {
    let state = memory_state().await;
    let db = state.db().unwrap().clone();
    let app = create_test_app(state).with_prod_routes().build().await;
    let username = unique_username("erin");

    let resp = test::call_service(&app, register_request(&username, "p@ss1234")).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], username.as_str());
    let id = body["id"].as_i64().unwrap();

    let row = Users::find_by_id(id).one(&db).await.unwrap().unwrap();
    assert_eq!(row.username, username);
    assert!(row.password_hash.starts_with("$argon2id$"));
    assert!(!row.password_hash.contains("p@ss1234"));
}

#[actix_web::test]
async fn username_is_trimmed_before_storage() {
    let app = create_test_app(memory_state().await)
        .with_prod_routes()
        .build()
        .await;

    let resp = test::call_service(&app, register_request("  frank  ", "p@ss1234")).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "frank");
}

#[actix_web::test]
async fn duplicate_username_is_conflict_and_writes_nothing() {
    let state = memory_state().await;
    let db = state.db().unwrap().clone();
    let app = create_test_app(state).with_prod_routes().build().await;

    let resp = test::call_service(&app, register_request("alice", "p@ss1234")).await;
    assert_eq!(resp.status().as_u16(), 200);

    let resp = test::call_service(&app, register_request("alice", "different")).await;
    assert_problem_details(resp, 409, "USERNAME_TAKEN", None).await;

    assert_eq!(Users::find().count(&db).await.unwrap(), 1);
}

#[actix_web::test]
async fn invalid_input_is_rejected_before_storage() {
    let state = memory_state().await;
    let db = state.db().unwrap().clone();
    let app = create_test_app(state).with_prod_routes().build().await;

    let resp = test::call_service(&app, register_request("   ", "p@ss1234")).await;
    assert_problem_details(resp, 400, "INVALID_USERNAME", None).await;

    let resp = test::call_service(&app, register_request("has space", "p@ss1234")).await;
    assert_problem_details(resp, 400, "INVALID_USERNAME", None).await;

    let resp = test::call_service(&app, register_request(&"a".repeat(65), "p@ss1234")).await;
    assert_problem_details(resp, 400, "INVALID_USERNAME", None).await;

    let resp = test::call_service(&app, register_request("grace", "")).await;
    assert_problem_details(resp, 400, "INVALID_PASSWORD", None).await;

    assert_eq!(Users::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn malformed_json_is_bad_request() {
    let app = create_test_app(memory_state().await)
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/users/register")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"username\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, 400, "BAD_REQUEST", Some("Invalid JSON")).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/users/register")
        .set_json(json!({ "username": "heidi" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, 400, "BAD_REQUEST", None).await;
}

#[tokio::test]
async fn profile_lookup() {
    let state = memory_state().await;
    let db = state.db().unwrap();

    let identity = users::register(db, "ivan", "p@ss1234").await.unwrap();
    assert_eq!(users::get_profile(db, identity.id).await.unwrap(), identity);

    let err = users::get_profile(db, identity.id + 1000).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}
