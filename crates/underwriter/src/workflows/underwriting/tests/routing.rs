use super::common::*;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::underwriting::router::{
    advisory_health_handler, evaluate_handler, parse_submission, underwriting_router,
    IntakeRejection,
};
use crate::workflows::underwriting::service::FaultInjection;

fn evaluate_request(body: Value) -> Request<Body> {
    Request::post("/evaluate_loan")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("body encodes")))
        .expect("request builds")
}

fn payload(input: &crate::workflows::underwriting::domain::LoanApplicationInput) -> Value {
    serde_json::to_value(input).expect("input serializes")
}

#[test]
fn parse_submission_reports_missing_fields_in_order() {
    let rejection = parse_submission(br#"{"name":"Alice","revenue":1}"#)
        .expect_err("fields are missing");
    assert_eq!(
        rejection,
        IntakeRejection::MissingFields(vec!["age", "credit_score", "loan_amount"])
    );
}

#[test]
fn parse_submission_rejects_unexpected_fields() {
    let mut body = payload(&approve_input());
    body["email"] = json!("alice@example.com");
    let bytes = serde_json::to_vec(&body).expect("encodes");

    let rejection = parse_submission(&bytes).expect_err("extra field");
    assert_eq!(
        rejection,
        IntakeRejection::UnexpectedFields(vec!["email".to_string()])
    );
}

#[test]
fn parse_submission_distinguishes_malformed_and_non_object_bodies() {
    assert_eq!(
        parse_submission(b"{not json").expect_err("malformed"),
        IntakeRejection::MalformedJson
    );
    assert_eq!(
        parse_submission(b"[1, 2, 3]").expect_err("array"),
        IntakeRejection::NotAnObject
    );
}

#[tokio::test]
async fn approve_route_returns_static_explanation() {
    let router = underwriting_router(Arc::new(build_service(Arc::new(ScriptedModel::failing()))));

    let response = router
        .oneshot(evaluate_request(payload(&approve_input())))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(
        body,
        json!({
            "applicant": "Alice Johnson",
            "loan_decision": "Approved",
            "explanation": "Loan approved based on strong financial profile.",
        })
    );
}

#[tokio::test]
async fn conditional_route_returns_ai_explanation() {
    let router = underwriting_router(Arc::new(build_service(Arc::new(
        ScriptedModel::answering(ADVISORY_TEXT),
    ))));

    let response = router
        .oneshot(evaluate_request(payload(&conditional_input())))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["loan_decision"], "Conditional Approval");
    assert_eq!(body["ai_explanation"], ADVISORY_TEXT);
    assert!(body.get("explanation").is_none());
}

#[tokio::test]
async fn validation_errors_return_bad_request() {
    let service = Arc::new(build_service(Arc::new(ScriptedModel::failing())));
    let body = payload(&input("John Doe", 40, 40_000.0, 700, 5_100_000.0));
    let bytes = Bytes::from(serde_json::to_vec(&body).expect("encodes"));

    let response = evaluate_handler(State(service), bytes).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    let errors = body["errors"].as_array().expect("errors array");
    assert!(errors
        .iter()
        .any(|error| error.as_str().unwrap_or_default().contains("exceeds individual max limit")));
}

#[tokio::test]
async fn missing_fields_return_bad_request() {
    let router = underwriting_router(Arc::new(build_service(Arc::new(ScriptedModel::failing()))));

    let response = router
        .oneshot(evaluate_request(json!({ "name": "Alice" })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(
        body,
        json!({ "errors": ["Missing age", "Missing revenue", "Missing credit_score", "Missing loan_amount"] })
    );
}

#[tokio::test]
async fn malformed_json_is_rejected_without_content_type() {
    let router = underwriting_router(Arc::new(build_service(Arc::new(ScriptedModel::failing()))));

    let response = router
        .oneshot(
            Request::post("/evaluate_loan")
                .body(Body::from("{\"name\": "))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await, json!({ "error": "Malformed JSON" }));
}

#[tokio::test]
async fn advisory_failure_returns_manual_review_error() {
    let router = underwriting_router(Arc::new(build_service(Arc::new(ScriptedModel::failing()))));

    let response = router
        .oneshot(evaluate_request(payload(&conditional_input())))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "AI processing failed. Manual review required." })
    );
}

#[tokio::test]
async fn injected_fault_returns_opaque_internal_error() {
    let service = build_service(Arc::new(ScriptedModel::failing()))
        .with_fault_injection(FaultInjection::on_applicant("Error Test"));
    let router = underwriting_router(Arc::new(service));

    let response = router
        .oneshot(evaluate_request(payload(&input(
            "Error Test",
            40,
            120_000.0,
            780,
            25_000.0,
        ))))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "Internal server error" })
    );
}

#[tokio::test]
async fn advisory_health_reports_success_and_failure() {
    let healthy = Arc::new(build_service(Arc::new(ScriptedModel::answering("ready"))));
    let response = advisory_health_handler(State(healthy)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json_body(response).await,
        json!({ "status": "success", "response": "ready" })
    );

    let failing = Arc::new(build_service(Arc::new(ScriptedModel::failing())));
    let response = advisory_health_handler(State(failing)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "error");
}
