use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test;
use async_trait::async_trait;
use backend_test_support::assert_problem_details;
use parley_backend::services::generation::format_prompt;
use parley_backend::{GenerationError, GenerationRequest, SecurityConfig, TextGenerator};
use serde_json::{json, Value};

use crate::support::auth::register_and_login;
use crate::support::{create_test_app, memory_state, memory_state_with};

/// Echoes the prompt like a raw causal model, then appends a canned answer.
struct EchoGenerator {
    answer: &'static str,
    seen: Mutex<Vec<GenerationRequest>>,
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(format!("{} {}<end_of_turn>\nignored", request.inputs, self.answer))
    }
}

struct FailingGenerator(fn() -> GenerationError);

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Err((self.0)())
    }
}

fn generate_request(token: Option<&str>, body: Value) -> Request {
    let mut req = test::TestRequest::post()
        .uri("/api/v1/llm/generate")
        .set_json(body);
    if let Some(token) = token {
        req = req.insert_header((AUTHORIZATION, format!("Bearer {token}")));
    }
    req.to_request()
}

#[actix_web::test]
async fn generate_formats_clamps_and_cleans() {
    let generator = Arc::new(EchoGenerator {
        answer: "Hello, Alice!",
        seen: Mutex::new(Vec::new()),
    });
    let state = memory_state_with(
        SecurityConfig::for_tests(),
        Some(generator.clone() as Arc<dyn TextGenerator>),
    )
    .await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let token = register_and_login(&app, "alice", "p@ss1234").await;

    let resp = test::call_service(
        &app,
        generate_request(
            Some(&token),
            json!({ "prompt": "Say hi", "max_length": 1000, "temperature": 0.0, "top_k": 500 }),
        ),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["response"], "Hello, Alice!");

    let seen = generator.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].inputs, format_prompt("Say hi"));
    assert_eq!(seen[0].parameters.max_new_tokens, 256);
    assert_eq!(seen[0].parameters.temperature, 0.1);
    assert_eq!(seen[0].parameters.top_p, 0.95);
    assert_eq!(seen[0].parameters.top_k, 100);
}

#[actix_web::test]
async fn generate_requires_authentication() {
    let generator = Arc::new(EchoGenerator {
        answer: "unused",
        seen: Mutex::new(Vec::new()),
    });
    let state = memory_state_with(
        SecurityConfig::for_tests(),
        Some(generator.clone() as Arc<dyn TextGenerator>),
    )
    .await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let resp = test::call_service(&app, generate_request(None, json!({ "prompt": "hi" }))).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED", None).await;
    assert!(generator.seen.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn unconfigured_generator_is_service_unavailable() {
    let app = create_test_app(memory_state().await)
        .with_prod_routes()
        .build()
        .await;
    let token = register_and_login(&app, "alice", "p@ss1234").await;

    let resp =
        test::call_service(&app, generate_request(Some(&token), json!({ "prompt": "hi" }))).await;
    assert_problem_details(resp, 503, "GENERATION_UNAVAILABLE", None).await;
}

#[actix_web::test]
async fn upstream_errors_map_to_503_and_502() {
    let unavailable: Arc<dyn TextGenerator> = Arc::new(FailingGenerator(|| {
        GenerationError::Unavailable("connection refused".into())
    }));
    let state = memory_state_with(SecurityConfig::for_tests(), Some(unavailable)).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let token = register_and_login(&app, "alice", "p@ss1234").await;
    let resp =
        test::call_service(&app, generate_request(Some(&token), json!({ "prompt": "hi" }))).await;
    let body = assert_problem_details(resp, 503, "GENERATION_UNAVAILABLE", None).await;
    assert!(!body["detail"].as_str().unwrap().contains("refused"));

    let failing: Arc<dyn TextGenerator> = Arc::new(FailingGenerator(|| {
        GenerationError::Upstream("status 500: CUDA out of memory".into())
    }));
    let state = memory_state_with(SecurityConfig::for_tests(), Some(failing)).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let token = register_and_login(&app, "alice", "p@ss1234").await;
    let resp =
        test::call_service(&app, generate_request(Some(&token), json!({ "prompt": "hi" }))).await;
    let body = assert_problem_details(resp, 502, "GENERATION_FAILED", None).await;
    assert!(!body["detail"].as_str().unwrap().contains("CUDA"));
}

#[actix_web::test]
async fn invalid_generation_requests_are_rejected() {
    let app = create_test_app(memory_state().await)
        .with_prod_routes()
        .build()
        .await;
    let token = register_and_login(&app, "alice", "p@ss1234").await;

    let resp =
        test::call_service(&app, generate_request(Some(&token), json!({ "prompt": "" }))).await;
    assert_problem_details(resp, 400, "INVALID_PROMPT", None).await;

    let resp = test::call_service(
        &app,
        generate_request(Some(&token), json!({ "prompt": "hi", "temperature": 2.0 })),
    )
    .await;
    assert_problem_details(resp, 400, "INVALID_GENERATION_PARAMS", None).await;

    let resp = test::call_service(
        &app,
        generate_request(Some(&token), json!({ "prompt": "hi", "max_length": -1 })),
    )
    .await;
    assert_problem_details(resp, 400, "BAD_REQUEST", None).await;
}
