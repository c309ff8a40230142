use super::super::domain::{Decision, LoanOutcome, RiskTier};

pub(crate) const APPROVED_EXPLANATION: &str = "Loan approved based on strong financial profile.";
pub(crate) const REJECTED_EXPLANATION: &str = "Loan rejected due to high risk factors.";

/// Where a classified application goes next.
#[derive(Debug, Clone, PartialEq)]
pub enum TierRoute {
    /// Deterministic tiers settle without any external call.
    Verdict(Decision),
    /// Ambiguous tier; the advisory model must be consulted.
    Advisory,
}

pub(crate) fn route_tier(tier: RiskTier, applicant: &str) -> TierRoute {
    match tier {
        RiskTier::Approve => TierRoute::Verdict(Decision {
            applicant: applicant.to_string(),
            outcome: LoanOutcome::Approved,
            explanation: Some(APPROVED_EXPLANATION.to_string()),
            advisory_text: None,
        }),
        RiskTier::Reject => TierRoute::Verdict(Decision {
            applicant: applicant.to_string(),
            outcome: LoanOutcome::Rejected,
            explanation: Some(REJECTED_EXPLANATION.to_string()),
            advisory_text: None,
        }),
        RiskTier::ConditionalReview => TierRoute::Advisory,
    }
}

/// Decision emitted once the advisory model has produced its rationale.
pub(crate) fn conditional_decision(applicant: &str, advisory_text: String) -> Decision {
    Decision {
        applicant: applicant.to_string(),
        outcome: LoanOutcome::ConditionalApproval,
        explanation: None,
        advisory_text: Some(advisory_text),
    }
}
