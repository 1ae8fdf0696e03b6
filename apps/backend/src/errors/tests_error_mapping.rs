use actix_web::http::StatusCode;

use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;

#[test]
fn unique_username_conflict_maps_to_409() {
    let err: AppError =
        DomainError::conflict(ConflictKind::UniqueUsername, "Username already registered").into();
    assert_eq!(err.code(), ErrorCode::UsernameTaken);
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[test]
fn validation_kinds_map_to_specific_codes() {
    let err: AppError = DomainError::validation(ValidationKind::InvalidUsername, "blank").into();
    assert_eq!(err.code(), ErrorCode::InvalidUsername);
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err: AppError = DomainError::validation(ValidationKind::InvalidPassword, "empty").into();
    assert_eq!(err.code(), ErrorCode::InvalidPassword);

    let err: AppError = DomainError::validation_other("nope").into();
    assert_eq!(err.code(), ErrorCode::ValidationError);
}

#[test]
fn user_not_found_maps_to_404() {
    let err: AppError = DomainError::not_found(NotFoundKind::User, "User not found").into();
    assert_eq!(err.code(), ErrorCode::UserNotFound);
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[test]
fn infra_kinds_map_to_db_codes() {
    let err: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
    assert_eq!(err.code(), ErrorCode::DbUnavailable);
    assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);

    let err: AppError = DomainError::infra(InfraErrorKind::Timeout, "slow").into();
    assert_eq!(err.code(), ErrorCode::DbTimeout);
    assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);

    let err: AppError = DomainError::infra(InfraErrorKind::Other("x".into()), "boom").into();
    assert_eq!(err.code(), ErrorCode::DbError);
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
