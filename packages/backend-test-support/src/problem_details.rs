//! Problem Details test helpers for backend testing
//!
//! Asserts the stable RFC 7807 error contract without depending on backend
//! types.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{HeaderName, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;

/// Local mirror of the backend's ProblemDetails shape
#[derive(Debug, Deserialize)]
struct ProblemDetailsLike {
    #[serde(rename = "type")]
    _type: String,
    title: String,
    status: u16,
    detail: String,
    code: String,
    trace_id: String,
}

/// Assert that a response conforms to the error contract and return the
/// parsed body for further comparisons.
///
/// Validates:
/// - HTTP status and `code`
/// - `application/problem+json` content type
/// - `x-trace-id` header present and equal to the body's `trace_id`
/// - 401 carries `WWW-Authenticate: Bearer`; 503 carries `Retry-After`;
///   neither header appears elsewhere
/// - `detail` contains `expected_detail_contains` when given
pub async fn assert_problem_details(
    resp: ServiceResponse<BoxBody>,
    expected_status: u16,
    expected_code: &str,
    expected_detail_contains: Option<&str>,
) -> Value {
    assert_eq!(resp.status().as_u16(), expected_status);

    let headers = resp.headers().clone();

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    let trace_id_header = headers
        .get(HeaderName::from_static("x-trace-id"))
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present and valid UTF-8")
        .to_string();
    assert!(!trace_id_header.is_empty(), "x-trace-id must not be empty");

    let www_auth = headers.get("WWW-Authenticate");
    let retry_after = headers.get("Retry-After");
    match expected_status {
        401 => {
            let www_auth = www_auth.expect("401 responses must carry WWW-Authenticate");
            assert_eq!(www_auth.to_str().unwrap(), "Bearer");
            assert!(retry_after.is_none(), "401 must not carry Retry-After");
        }
        503 => {
            assert!(retry_after.is_some(), "503 responses must carry Retry-After");
            assert!(www_auth.is_none(), "503 must not carry WWW-Authenticate");
        }
        _ => {
            assert!(
                www_auth.is_none(),
                "{expected_status} must not carry WWW-Authenticate"
            );
            assert!(
                retry_after.is_none(),
                "{expected_status} must not carry Retry-After"
            );
        }
    }

    let body = actix_web::test::read_body(resp).await;
    let body_str = std::str::from_utf8(&body).expect("body should be valid UTF-8");
    let problem: ProblemDetailsLike = serde_json::from_str(body_str)
        .unwrap_or_else(|_| panic!("body is not ProblemDetails: {body_str}"));

    assert_eq!(problem.status, expected_status);
    assert_eq!(problem.code, expected_code);
    assert!(!problem.title.is_empty());
    assert_eq!(
        problem.trace_id, trace_id_header,
        "trace_id in body should match x-trace-id header"
    );
    if let Some(expected) = expected_detail_contains {
        assert!(
            problem.detail.contains(expected),
            "expected detail to contain '{expected}', got '{}'",
            problem.detail
        );
    }

    serde_json::from_str(body_str).expect("body is valid JSON")
}
