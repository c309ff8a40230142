use serde::{Deserialize, Serialize};

/// Read-only rule parameters shared by the validator and the risk classifier.
///
/// Bounds documented as "exclusive" use strict comparisons; everything else is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub minimum_age: u8,
    pub maximum_age: u8,
    pub minimum_credit_score: u16,
    pub maximum_credit_score: u16,
    pub individual_loan_cap: f64,
    pub business_loan_cap: f64,
    /// Revenue at or above which the business cap applies.
    pub business_revenue_threshold: f64,
    pub manual_review_revenue_multiple: f64,
    /// Exclusive lower bound on credit score for the approve tier.
    pub approve_credit_score_floor: u16,
    /// Exclusive lower bound on revenue for the approve tier.
    pub approve_revenue_floor: f64,
    /// Exclusive upper bound on loan-to-revenue for the approve tier.
    pub approve_loan_ratio_ceiling: f64,
    pub conditional_credit_score_range: (u16, u16),
    pub conditional_revenue_range: (f64, f64),
    pub conditional_loan_ratio_range: (f64, f64),
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            minimum_age: 18,
            maximum_age: 100,
            minimum_credit_score: 300,
            maximum_credit_score: 850,
            individual_loan_cap: 5_000_000.0,
            business_loan_cap: 50_000_000.0,
            business_revenue_threshold: 1_000_000.0,
            manual_review_revenue_multiple: 10.0,
            approve_credit_score_floor: 750,
            approve_revenue_floor: 100_000.0,
            approve_loan_ratio_ceiling: 0.3,
            conditional_credit_score_range: (650, 750),
            conditional_revenue_range: (50_000.0, 100_000.0),
            conditional_loan_ratio_range: (0.3, 0.5),
        }
    }
}
