use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Map, Value};
use tracing::{error, warn};

use super::advisory::AdvisoryModel;
use super::domain::{LoanApplicationInput, StatusSignal, REQUIRED_FIELDS};
use super::service::UnderwritingService;

/// Router builder exposing the loan evaluation endpoints.
pub fn underwriting_router<M>(service: Arc<UnderwritingService<M>>) -> Router
where
    M: AdvisoryModel + 'static,
{
    Router::new()
        .route("/evaluate_loan", post(evaluate_handler::<M>))
        .route("/advisory/health", get(advisory_health_handler::<M>))
        .with_state(service)
}

/// Reasons a request body never reaches the underwriting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeRejection {
    MalformedJson,
    NotAnObject,
    MissingFields(Vec<&'static str>),
    UnexpectedFields(Vec<String>),
}

impl IntoResponse for IntakeRejection {
    fn into_response(self) -> Response {
        let payload = match self {
            IntakeRejection::MalformedJson => json!({ "error": "Malformed JSON" }),
            IntakeRejection::NotAnObject => json!({ "error": "Invalid JSON format" }),
            IntakeRejection::MissingFields(fields) => json!({
                "errors": fields
                    .iter()
                    .map(|field| format!("Missing {field}"))
                    .collect::<Vec<_>>(),
            }),
            IntakeRejection::UnexpectedFields(fields) => json!({
                "error": format!("Unexpected fields: {}", fields.join(", ")),
            }),
        };
        (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
    }
}

/// Parse a request body into the five-key application mapping.
pub fn parse_submission(body: &[u8]) -> Result<LoanApplicationInput, IntakeRejection> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| IntakeRejection::MalformedJson)?;
    let Value::Object(mut fields) = value else {
        return Err(IntakeRejection::NotAnObject);
    };

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .into_iter()
        .filter(|field| !fields.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(IntakeRejection::MissingFields(missing));
    }

    let unexpected: Vec<String> = fields
        .keys()
        .filter(|key| !REQUIRED_FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();
    if !unexpected.is_empty() {
        return Err(IntakeRejection::UnexpectedFields(unexpected));
    }

    Ok(LoanApplicationInput {
        name: take(&mut fields, "name"),
        age: take(&mut fields, "age"),
        revenue: take(&mut fields, "revenue"),
        credit_score: take(&mut fields, "credit_score"),
        loan_amount: take(&mut fields, "loan_amount"),
    })
}

fn take(fields: &mut Map<String, Value>, key: &str) -> Value {
    fields.remove(key).unwrap_or(Value::Null)
}

pub(crate) fn status_code(signal: StatusSignal) -> StatusCode {
    match signal {
        StatusSignal::Success => StatusCode::OK,
        StatusSignal::BadRequest => StatusCode::BAD_REQUEST,
        StatusSignal::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) async fn evaluate_handler<M>(
    State(service): State<Arc<UnderwritingService<M>>>,
    body: Bytes,
) -> Response
where
    M: AdvisoryModel + 'static,
{
    let input = match parse_submission(&body) {
        Ok(input) => input,
        Err(rejection) => {
            warn!(?rejection, "loan evaluation request rejected at intake");
            return rejection.into_response();
        }
    };

    match service.evaluate(&input).await {
        Ok(evaluation) => {
            let status = status_code(evaluation.status());
            (status, axum::Json(evaluation.body())).into_response()
        }
        Err(err) => {
            error!(error = %err, "error processing loan evaluation");
            let payload = json!({ "error": "Internal server error" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn advisory_health_handler<M>(
    State(service): State<Arc<UnderwritingService<M>>>,
) -> Response
where
    M: AdvisoryModel + 'static,
{
    match service.probe_advisory().await {
        Ok(response) => {
            let payload = json!({ "status": "success", "response": response });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "advisory connectivity check failed");
            let payload = json!({
                "status": "error",
                "message": "Failed to connect to advisory model",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
