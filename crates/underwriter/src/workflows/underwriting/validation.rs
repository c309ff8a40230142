use serde_json::Value;

use super::domain::{LoanApplication, LoanApplicationInput};
use super::evaluation::EvaluationConfig;

/// One or more field or loan-size violations, in the order they were checked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("loan application failed validation: {}", .messages.join("; "))]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Loan-size limits applied once every field is numerically valid.
#[derive(Debug, Clone)]
pub struct LoanSizePolicy {
    individual_cap: f64,
    business_cap: f64,
    business_revenue_threshold: f64,
    manual_review_multiple: f64,
}

impl LoanSizePolicy {
    /// Cap that applies to an applicant with the given annual revenue.
    pub fn cap_for(&self, annual_revenue: f64) -> f64 {
        if annual_revenue < self.business_revenue_threshold {
            self.individual_cap
        } else {
            self.business_cap
        }
    }

    fn violations(&self, annual_revenue: f64, requested_loan_amount: f64) -> Vec<String> {
        let mut violations = Vec::new();

        if annual_revenue < self.business_revenue_threshold {
            if requested_loan_amount > self.individual_cap {
                violations.push(format!(
                    "Loan exceeds individual max limit of ${}.",
                    format_amount(self.individual_cap)
                ));
            }
        } else if requested_loan_amount > self.business_cap {
            violations.push(format!(
                "Loan exceeds business max limit of ${}.",
                format_amount(self.business_cap)
            ));
        }

        // Independent of the size caps; both messages may be reported together.
        if requested_loan_amount > self.manual_review_multiple * annual_revenue {
            violations.push(
                "Loan amount is disproportionately high. Requires manual review.".to_string(),
            );
        }

        violations
    }
}

impl From<&EvaluationConfig> for LoanSizePolicy {
    fn from(config: &EvaluationConfig) -> Self {
        Self {
            individual_cap: config.individual_loan_cap,
            business_cap: config.business_loan_cap,
            business_revenue_threshold: config.business_revenue_threshold,
            manual_review_multiple: config.manual_review_revenue_multiple,
        }
    }
}

/// Guard converting raw submissions into typed `LoanApplication` values.
#[derive(Debug, Clone)]
pub struct LoanValidator {
    age_range: (u8, u8),
    credit_score_range: (u16, u16),
    policy: LoanSizePolicy,
}

impl Default for LoanValidator {
    fn default() -> Self {
        Self::from_config(&EvaluationConfig::default())
    }
}

impl LoanValidator {
    pub fn from_config(config: &EvaluationConfig) -> Self {
        Self {
            age_range: (config.minimum_age, config.maximum_age),
            credit_score_range: (config.minimum_credit_score, config.maximum_credit_score),
            policy: LoanSizePolicy::from(config),
        }
    }

    pub fn policy(&self) -> &LoanSizePolicy {
        &self.policy
    }

    /// Check every field, collecting all violations. Loan-size limits are only applied when
    /// all five fields converted and fell within range.
    pub fn validate(&self, input: &LoanApplicationInput) -> Result<LoanApplication, ValidationErrors> {
        let mut messages = Vec::new();

        let name = match input.name.as_str() {
            Some(name) if !name.trim().is_empty() => Some(name.to_string()),
            _ => {
                messages.push("Invalid name: must be a non-empty string.".to_string());
                None
            }
        };

        let (min_age, max_age) = self.age_range;
        let age = integer_value(&input.age)
            .filter(|age| (i64::from(min_age)..=i64::from(max_age)).contains(age))
            .and_then(|age| u8::try_from(age).ok());
        if age.is_none() {
            messages.push(format!(
                "Invalid age: must be an integer between {min_age} and {max_age}."
            ));
        }

        let annual_revenue = number_value(&input.revenue).filter(|revenue| *revenue >= 0.0);
        if annual_revenue.is_none() {
            messages.push("Invalid revenue: must be a non-negative number.".to_string());
        }

        let (min_score, max_score) = self.credit_score_range;
        let credit_score = integer_value(&input.credit_score)
            .filter(|score| (i64::from(min_score)..=i64::from(max_score)).contains(score))
            .and_then(|score| u16::try_from(score).ok());
        if credit_score.is_none() {
            messages.push(format!(
                "Invalid credit score: must be an integer between {min_score} and {max_score}."
            ));
        }

        let requested_loan_amount = number_value(&input.loan_amount).filter(|amount| *amount > 0.0);
        if requested_loan_amount.is_none() {
            messages.push("Invalid loan amount: must be a positive number.".to_string());
        }

        let (
            Some(name),
            Some(age),
            Some(annual_revenue),
            Some(credit_score),
            Some(requested_loan_amount),
        ) = (name, age, annual_revenue, credit_score, requested_loan_amount)
        else {
            return Err(ValidationErrors { messages });
        };

        messages.extend(
            self.policy
                .violations(annual_revenue, requested_loan_amount),
        );
        if !messages.is_empty() {
            return Err(ValidationErrors { messages });
        }

        Ok(LoanApplication {
            name,
            age,
            annual_revenue,
            credit_score,
            requested_loan_amount,
        })
    }
}

/// JSON floats truncate toward zero; numeric strings must be whole integers.
fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|raw| raw.is_finite())
                .map(f64::trunc)
                .filter(|whole| *whole >= i64::MIN as f64 && *whole <= i64::MAX as f64)
                .map(|whole| whole as i64)
        }),
        Value::String(raw) => raw.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn number_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite())
}

/// Whole-dollar amount with thousands separators, e.g. `5,000,000`.
pub(crate) fn format_amount(amount: f64) -> String {
    let whole = amount.round().abs() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if amount < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
