mod config;
mod policy;
mod rules;

pub use config::EvaluationConfig;
pub use policy::TierRoute;

pub(crate) use policy::{conditional_decision, route_tier};

use super::domain::{LoanApplication, RiskTier};
use rules::{tier_matches, RiskSignals, PRIORITY};

/// Stateless classifier assigning a risk tier from the configured bands.
///
/// Inputs that fall outside both the approve and conditional bands are rejected, including
/// profiles that are strong on one axis but weak on another.
#[derive(Debug, Clone, Default)]
pub struct RiskClassifier {
    config: EvaluationConfig,
}

impl RiskClassifier {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn classify(
        &self,
        credit_score: u16,
        annual_revenue: f64,
        requested_loan_amount: f64,
    ) -> RiskTier {
        let signals = RiskSignals {
            credit_score,
            annual_revenue,
            requested_loan_amount,
        };

        PRIORITY
            .into_iter()
            .find(|tier| tier_matches(*tier, &signals, &self.config))
            .unwrap_or(RiskTier::Reject)
    }

    pub fn classify_application(&self, application: &LoanApplication) -> RiskTier {
        self.classify(
            application.credit_score,
            application.annual_revenue,
            application.requested_loan_amount,
        )
    }
}
