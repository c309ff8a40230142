//! Loan underwriting: validation, risk classification, and decision routing.
//!
//! Deterministic tiers settle locally; the conditional tier consults the advisory model and
//! falls back to manual review when that consultation fails.

pub mod advisory;
pub mod domain;
pub(crate) mod evaluation;
pub mod router;
pub mod service;
pub mod synthetic;
pub mod validation;

#[cfg(test)]
mod tests;

pub use advisory::{
    AdvisoryAttemptError, AdvisoryCaller, AdvisoryError, AdvisoryModel, AdvisoryPrompt,
    OpenAiChatModel, OpenAiSettings, RetryPolicy,
};
pub use domain::{
    Decision, LoanApplication, LoanApplicationInput, LoanOutcome, RiskTier, StatusSignal,
    REQUIRED_FIELDS,
};
pub use evaluation::{EvaluationConfig, RiskClassifier, TierRoute};
pub use router::{parse_submission, underwriting_router, IntakeRejection};
pub use service::{
    Evaluation, EvaluationBody, FaultInjection, ManualReview, UnderwritingError,
    UnderwritingService, MANUAL_REVIEW_MESSAGE,
};
pub use synthetic::{
    SyntheticBatch, SyntheticCase, SyntheticCaseGenerator, SyntheticExportError, SyntheticFormat,
};
pub use validation::{LoanSizePolicy, LoanValidator, ValidationErrors};
