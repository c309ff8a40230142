use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys accepted on the evaluation boundary, in reporting order.
pub const REQUIRED_FIELDS: [&str; 5] = ["name", "age", "revenue", "credit_score", "loan_amount"];

/// Raw applicant-provided fields prior to validation.
///
/// Values stay untyped so that a wrong JSON type is reported as a validation message
/// rather than rejected by the deserializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplicationInput {
    pub name: Value,
    pub age: Value,
    pub revenue: Value,
    pub credit_score: Value,
    pub loan_amount: Value,
}

impl LoanApplicationInput {
    /// The raw name when it was submitted as a string.
    pub fn name_text(&self) -> Option<&str> {
        self.name.as_str()
    }
}

/// Validated, typed application. Lives for a single evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub name: String,
    pub age: u8,
    pub annual_revenue: f64,
    pub credit_score: u16,
    pub requested_loan_amount: f64,
}

impl From<&LoanApplication> for LoanApplicationInput {
    fn from(application: &LoanApplication) -> Self {
        Self {
            name: Value::from(application.name.clone()),
            age: Value::from(application.age),
            revenue: Value::from(application.annual_revenue),
            credit_score: Value::from(application.credit_score),
            loan_amount: Value::from(application.requested_loan_amount),
        }
    }
}

/// Three-way risk classification derived from credit score, revenue, and loan amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Approve,
    #[serde(rename = "conditional_approval")]
    ConditionalReview,
    Reject,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Approve => "approve",
            RiskTier::ConditionalReview => "conditional_approval",
            RiskTier::Reject => "reject",
        }
    }
}

/// Outcome reported to the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanOutcome {
    Approved,
    Rejected,
    #[serde(rename = "Conditional Approval")]
    ConditionalApproval,
}

impl LoanOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            LoanOutcome::Approved => "Approved",
            LoanOutcome::Rejected => "Rejected",
            LoanOutcome::ConditionalApproval => "Conditional Approval",
        }
    }
}

/// Verdict payload for the deterministic and advisory tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub applicant: String,
    #[serde(rename = "loan_decision")]
    pub outcome: LoanOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(
        rename = "ai_explanation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub advisory_text: Option<String>,
}

/// Status signal paired with every evaluation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusSignal {
    Success,
    BadRequest,
    InternalServerError,
}

impl StatusSignal {
    pub const fn code(self) -> u16 {
        match self {
            StatusSignal::Success => 200,
            StatusSignal::BadRequest => 400,
            StatusSignal::InternalServerError => 500,
        }
    }
}
