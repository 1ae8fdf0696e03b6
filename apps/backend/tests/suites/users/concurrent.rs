use actix_web::test;
use parley_backend::entities::Users;
use parley_backend::errors::ErrorCode;
use parley_backend::services::users;
use sea_orm::{EntityTrait, PaginatorTrait};

use crate::support::auth::register_request;
use crate::support::{create_test_app, memory_state};

#[tokio::test]
async fn concurrent_registrations_exactly_one_wins() {
    let state = memory_state().await;
    let db = state.db().unwrap();

    let (a, b) = tokio::join!(
        users::register(db, "judy", "first-password"),
        users::register(db, "judy", "second-password"),
    );

    let outcomes = [a, b];
    let wins = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one registration must succeed");

    let loser = outcomes.into_iter().find_map(Result::err).unwrap();
    assert_eq!(loser.code(), ErrorCode::UsernameTaken);
    assert_eq!(Users::find().count(db).await.unwrap(), 1);
}

#[actix_web::test]
async fn concurrent_http_registrations_one_conflict() {
    let state = memory_state().await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let (a, b) = futures_util::join!(
        test::call_service(&app, register_request("mallory", "pw-one")),
        test::call_service(&app, register_request("mallory", "pw-two")),
    );

    let mut statuses = [a.status().as_u16(), b.status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [200, 409]);
}
