use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::underwriting::advisory::{
    AdvisoryAttemptError, AdvisoryModel, AdvisoryPrompt, RetryPolicy,
};
use crate::workflows::underwriting::domain::{LoanApplication, LoanApplicationInput};
use crate::workflows::underwriting::evaluation::EvaluationConfig;
use crate::workflows::underwriting::service::UnderwritingService;

pub(super) const ADVISORY_TEXT: &str =
    "Moderate risk: revenue supports the request, recommend approval with a co-signer.";

pub(super) fn input(name: &str, age: i64, revenue: f64, credit_score: i64, loan: f64) -> LoanApplicationInput {
    LoanApplicationInput {
        name: json!(name),
        age: json!(age),
        revenue: json!(revenue),
        credit_score: json!(credit_score),
        loan_amount: json!(loan),
    }
}

pub(super) fn approve_input() -> LoanApplicationInput {
    input("Alice Johnson", 40, 120_000.0, 780, 25_000.0)
}

pub(super) fn reject_input() -> LoanApplicationInput {
    input("Bob Smith", 32, 45_000.0, 600, 30_000.0)
}

pub(super) fn conditional_input() -> LoanApplicationInput {
    input("Carla Okafor", 45, 90_000.0, 700, 35_000.0)
}

pub(super) fn application() -> LoanApplication {
    LoanApplication {
        name: "Carla Okafor".to_string(),
        age: 45,
        annual_revenue: 90_000.0,
        credit_score: 700,
        requested_loan_amount: 35_000.0,
    }
}

/// Advisory double replaying a fixed script of attempt results.
#[derive(Default)]
pub(super) struct ScriptedModel {
    script: Mutex<VecDeque<Result<String, AdvisoryAttemptError>>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<AdvisoryPrompt>>,
}

impl ScriptedModel {
    pub(super) fn new(script: Vec<Result<String, AdvisoryAttemptError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    pub(super) fn answering(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub(super) fn failing() -> Self {
        Self::new(Vec::new())
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn prompts(&self) -> Vec<AdvisoryPrompt> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

#[async_trait]
impl AdvisoryModel for ScriptedModel {
    async fn complete(&self, prompt: &AdvisoryPrompt) -> Result<String, AdvisoryAttemptError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.clone());
        self.script
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(AdvisoryAttemptError::Transport("connection refused".to_string())))
    }
}

/// Advisory double that never answers within a test's patience.
pub(super) struct StalledModel;

#[async_trait]
impl AdvisoryModel for StalledModel {
    async fn complete(&self, _prompt: &AdvisoryPrompt) -> Result<String, AdvisoryAttemptError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("too late".to_string())
    }
}

pub(super) fn build_service<M: AdvisoryModel + 'static>(model: Arc<M>) -> UnderwritingService<M> {
    UnderwritingService::new(model, EvaluationConfig::default(), RetryPolicy::immediate(3))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
