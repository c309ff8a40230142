use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info};

use super::advisory::{AdvisoryAttemptError, AdvisoryCaller, AdvisoryError, AdvisoryModel, RetryPolicy};
use super::domain::{Decision, LoanApplication, LoanApplicationInput, RiskTier, StatusSignal};
use super::evaluation::{conditional_decision, route_tier, EvaluationConfig, RiskClassifier, TierRoute};
use super::validation::{LoanValidator, ValidationErrors};

pub const MANUAL_REVIEW_MESSAGE: &str = "AI processing failed. Manual review required.";

/// Opt-in hook that makes `evaluate` fail for one exact applicant name.
///
/// Disabled unless explicitly armed; used to exercise the internal-failure path of callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultInjection {
    sentinel: Option<String>,
}

impl FaultInjection {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn on_applicant(name: impl Into<String>) -> Self {
        Self {
            sentinel: Some(name.into()),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.sentinel.is_some()
    }

    fn triggers(&self, input: &LoanApplicationInput) -> bool {
        match (&self.sentinel, input.name_text()) {
            (Some(sentinel), Some(name)) => sentinel == name,
            _ => false,
        }
    }
}

/// Advisory consultation failed; the application must go to a human underwriter.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualReview {
    pub applicant: String,
    pub reason: AdvisoryError,
}

/// Terminal result of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// Field or loan-size violations; nothing was classified.
    Invalid(ValidationErrors),
    /// Deterministic verdict, or conditional approval carrying advisory text.
    Decided(Decision),
    /// Conditional tier whose advisory consultation failed.
    ManualReview(ManualReview),
}

impl Evaluation {
    pub fn status(&self) -> StatusSignal {
        match self {
            Evaluation::Invalid(_) => StatusSignal::BadRequest,
            Evaluation::Decided(_) => StatusSignal::Success,
            Evaluation::ManualReview(_) => StatusSignal::InternalServerError,
        }
    }

    pub fn decision(&self) -> Option<&Decision> {
        match self {
            Evaluation::Decided(decision) => Some(decision),
            _ => None,
        }
    }

    /// Wire payload: `{errors}`, the decision itself, or `{error}`.
    pub fn body(&self) -> EvaluationBody<'_> {
        match self {
            Evaluation::Invalid(errors) => EvaluationBody::Invalid {
                errors: errors.messages(),
            },
            Evaluation::Decided(decision) => EvaluationBody::Decided(decision),
            Evaluation::ManualReview(_) => EvaluationBody::Failed {
                error: MANUAL_REVIEW_MESSAGE,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EvaluationBody<'a> {
    Invalid { errors: &'a [String] },
    Decided(&'a Decision),
    Failed { error: &'static str },
}

/// Error raised by the underwriting service. Details are for logs, not for callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnderwritingError {
    #[error("internal fault: {0}")]
    InternalFault(String),
}

/// Service composing the validator, risk classifier, and advisory caller.
pub struct UnderwritingService<M> {
    validator: LoanValidator,
    classifier: RiskClassifier,
    advisory: AdvisoryCaller<M>,
    faults: FaultInjection,
    advisory_deadline: Option<Duration>,
}

impl<M> UnderwritingService<M>
where
    M: AdvisoryModel + 'static,
{
    pub fn new(model: Arc<M>, config: EvaluationConfig, retry: RetryPolicy) -> Self {
        Self {
            validator: LoanValidator::from_config(&config),
            classifier: RiskClassifier::new(config),
            advisory: AdvisoryCaller::new(model, retry),
            faults: FaultInjection::disabled(),
            advisory_deadline: None,
        }
    }

    pub fn with_fault_injection(mut self, faults: FaultInjection) -> Self {
        self.faults = faults;
        self
    }

    /// Abandon advisory consultation after `deadline`, resolving to manual review.
    pub fn with_advisory_deadline(mut self, deadline: Duration) -> Self {
        self.advisory_deadline = Some(deadline);
        self
    }

    pub fn classifier(&self) -> &RiskClassifier {
        &self.classifier
    }

    /// Validate, classify, and route a single application.
    pub async fn evaluate(
        &self,
        input: &LoanApplicationInput,
    ) -> Result<Evaluation, UnderwritingError> {
        if self.faults.triggers(input) {
            error!("fault injection triggered for evaluation");
            return Err(UnderwritingError::InternalFault(
                "simulated internal fault".to_string(),
            ));
        }

        let application = match self.validator.validate(input) {
            Ok(application) => application,
            Err(errors) => {
                info!(violations = errors.len(), "loan application rejected by validation");
                return Ok(Evaluation::Invalid(errors));
            }
        };

        let tier = self.classifier.classify_application(&application);
        info!(applicant = %application.name, tier = tier.label(), "loan application classified");

        match route_tier(tier, &application.name) {
            TierRoute::Verdict(decision) => {
                info!(
                    applicant = %decision.applicant,
                    outcome = decision.outcome.label(),
                    "loan decision issued"
                );
                Ok(Evaluation::Decided(decision))
            }
            TierRoute::Advisory => Ok(self.consult(&application).await),
        }
    }

    /// Pure tier lookup without validation or advisory calls.
    pub fn classify(
        &self,
        credit_score: u16,
        annual_revenue: f64,
        requested_loan_amount: f64,
    ) -> RiskTier {
        self.classifier
            .classify(credit_score, annual_revenue, requested_loan_amount)
    }

    /// Connectivity check against the advisory model.
    pub async fn probe_advisory(&self) -> Result<String, AdvisoryAttemptError> {
        self.advisory.probe().await
    }

    async fn consult(&self, application: &LoanApplication) -> Evaluation {
        let explained = match self.advisory_deadline {
            Some(deadline) => {
                match tokio::time::timeout(deadline, self.advisory.explain(application)).await {
                    Ok(result) => result,
                    Err(_) => Err(AdvisoryError::DeadlineExceeded(deadline)),
                }
            }
            None => self.advisory.explain(application).await,
        };

        match explained {
            Ok(text) => {
                info!(
                    applicant = %application.name,
                    outcome = "Conditional Approval",
                    "loan decision issued with advisory rationale"
                );
                Evaluation::Decided(conditional_decision(&application.name, text))
            }
            Err(reason) => {
                error!(
                    applicant = %application.name,
                    error = %reason,
                    "advisory unavailable; routing to manual review"
                );
                Evaluation::ManualReview(ManualReview {
                    applicant: application.name.clone(),
                    reason,
                })
            }
        }
    }
}
