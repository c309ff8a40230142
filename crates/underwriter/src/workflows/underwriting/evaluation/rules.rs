use super::super::domain::RiskTier;
use super::config::EvaluationConfig;

/// Tiers in the order their predicates are tried. `Reject` always matches.
pub(crate) const PRIORITY: [RiskTier; 3] = [
    RiskTier::Approve,
    RiskTier::ConditionalReview,
    RiskTier::Reject,
];

/// Figures the risk predicates are evaluated over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RiskSignals {
    pub credit_score: u16,
    pub annual_revenue: f64,
    pub requested_loan_amount: f64,
}

pub(crate) fn tier_matches(tier: RiskTier, signals: &RiskSignals, config: &EvaluationConfig) -> bool {
    match tier {
        RiskTier::Approve => approve_band(signals, config),
        RiskTier::ConditionalReview => conditional_band(signals, config),
        RiskTier::Reject => true,
    }
}

fn approve_band(signals: &RiskSignals, config: &EvaluationConfig) -> bool {
    signals.credit_score > config.approve_credit_score_floor
        && signals.annual_revenue > config.approve_revenue_floor
        && signals.requested_loan_amount
            < config.approve_loan_ratio_ceiling * signals.annual_revenue
}

fn conditional_band(signals: &RiskSignals, config: &EvaluationConfig) -> bool {
    let (credit_low, credit_high) = config.conditional_credit_score_range;
    let (revenue_low, revenue_high) = config.conditional_revenue_range;
    let (ratio_low, ratio_high) = config.conditional_loan_ratio_range;

    let credit_within = (credit_low..=credit_high).contains(&signals.credit_score);
    let revenue_within = signals.annual_revenue >= revenue_low && signals.annual_revenue <= revenue_high;
    let loan_within = signals.requested_loan_amount >= ratio_low * signals.annual_revenue
        && signals.requested_loan_amount <= ratio_high * signals.annual_revenue;

    credit_within && revenue_within && loan_within
}
