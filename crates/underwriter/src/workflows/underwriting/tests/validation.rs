use super::common::*;
use serde_json::json;

use crate::workflows::underwriting::domain::LoanApplicationInput;
use crate::workflows::underwriting::evaluation::EvaluationConfig;
use crate::workflows::underwriting::validation::{format_amount, LoanValidator};

fn validator() -> LoanValidator {
    LoanValidator::from_config(&EvaluationConfig::default())
}

fn messages_for(input: &LoanApplicationInput) -> Vec<String> {
    validator()
        .validate(input)
        .expect_err("validation should fail")
        .into_messages()
}

#[test]
fn accepts_well_formed_application() {
    let application = validator()
        .validate(&approve_input())
        .expect("application is valid");

    assert_eq!(application.name, "Alice Johnson");
    assert_eq!(application.age, 40);
    assert_eq!(application.credit_score, 780);
    assert_eq!(application.annual_revenue, 120_000.0);
    assert_eq!(application.requested_loan_amount, 25_000.0);
}

#[test]
fn reports_each_single_field_violation() {
    let cases = [
        (input("", 25, 60_000.0, 700, 20_000.0), "Invalid name"),
        (input("   ", 25, 60_000.0, 700, 20_000.0), "Invalid name"),
        (input("John Doe", 17, 60_000.0, 700, 20_000.0), "Invalid age"),
        (input("John Doe", 101, 60_000.0, 700, 20_000.0), "Invalid age"),
        (input("John Doe", 40, -1_000.0, 700, 20_000.0), "Invalid revenue"),
        (input("John Doe", 40, 60_000.0, 290, 20_000.0), "Invalid credit score"),
        (input("John Doe", 40, 60_000.0, 851, 20_000.0), "Invalid credit score"),
        (input("John Doe", 40, 60_000.0, 700, -5_000.0), "Invalid loan amount"),
        (input("John Doe", 40, 60_000.0, 700, 0.0), "Invalid loan amount"),
    ];

    for (case, expected) in cases {
        let messages = messages_for(&case);
        assert_eq!(messages.len(), 1, "unexpected messages {messages:?}");
        assert!(messages[0].starts_with(expected), "got {messages:?}");
    }
}

#[test]
fn accumulates_independent_field_errors_and_skips_policy() {
    let case = LoanApplicationInput {
        name: json!(42),
        age: json!("twelve"),
        revenue: json!(10.0),
        credit_score: json!(null),
        loan_amount: json!(9_000_000_000.0),
    };

    let messages = messages_for(&case);

    assert_eq!(
        messages,
        vec![
            "Invalid name: must be a non-empty string.".to_string(),
            "Invalid age: must be an integer between 18 and 100.".to_string(),
            "Invalid credit score: must be an integer between 300 and 850.".to_string(),
        ]
    );
}

#[test]
fn conversion_failure_and_range_failure_share_a_message() {
    let out_of_range = messages_for(&input("John Doe", 12, 60_000.0, 700, 20_000.0));
    let mut unparseable = input("John Doe", 40, 60_000.0, 700, 20_000.0);
    unparseable.age = json!("forty");

    assert_eq!(out_of_range, messages_for(&unparseable));
}

#[test]
fn converts_numeric_strings_and_integral_floats() {
    let case = LoanApplicationInput {
        name: json!("Dana Rossi"),
        age: json!(" 35 "),
        revenue: json!("120000.50"),
        credit_score: json!(780.0),
        loan_amount: json!("25000"),
    };

    let application = validator().validate(&case).expect("strings convert");
    assert_eq!(application.age, 35);
    assert_eq!(application.credit_score, 780);
    assert_eq!(application.annual_revenue, 120_000.5);
    assert_eq!(application.requested_loan_amount, 25_000.0);
}

#[test]
fn truncates_fractional_json_numbers_for_integer_fields() {
    let case = LoanApplicationInput {
        name: json!("Dana Rossi"),
        age: json!(35.5),
        revenue: json!(120_000),
        credit_score: json!(780.9),
        loan_amount: json!(25_000),
    };

    let application = validator().validate(&case).expect("fractions truncate");
    assert_eq!(application.age, 35);
    assert_eq!(application.credit_score, 780);

    let mut below_minimum = case.clone();
    below_minimum.age = json!(17.9);
    assert!(messages_for(&below_minimum)[0].starts_with("Invalid age"));

    let mut fractional_text = case;
    fractional_text.age = json!("40.5");
    assert!(messages_for(&fractional_text)[0].starts_with("Invalid age"));
}

#[test]
fn rejects_booleans_non_integer_text_and_non_finite_numbers() {
    let case = LoanApplicationInput {
        name: json!("Dana Rossi"),
        age: json!("35.5"),
        revenue: json!("NaN"),
        credit_score: json!(true),
        loan_amount: json!("inf"),
    };

    let messages = messages_for(&case);
    assert_eq!(messages.len(), 4);
    assert!(messages[0].starts_with("Invalid age"));
    assert!(messages[1].starts_with("Invalid revenue"));
    assert!(messages[2].starts_with("Invalid credit score"));
    assert!(messages[3].starts_with("Invalid loan amount"));
}

#[test]
fn zero_revenue_is_allowed_by_field_checks() {
    let messages = messages_for(&input("John Doe", 40, 0.0, 700, 1_000.0));
    assert_eq!(
        messages,
        vec!["Loan amount is disproportionately high. Requires manual review.".to_string()]
    );
}

#[test]
fn individual_cap_and_manual_review_fire_together() {
    let messages = messages_for(&input("John Doe", 40, 40_000.0, 700, 5_100_000.0));

    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("exceeds individual max limit"));
    assert_eq!(messages[0], "Loan exceeds individual max limit of $5,000,000.");
    assert!(messages[1].contains("Requires manual review"));
}

#[test]
fn business_cap_applies_from_one_million_revenue() {
    let messages = messages_for(&input("Acme Holdings", 40, 1_000_000.0, 700, 50_000_001.0));

    assert_eq!(messages[0], "Loan exceeds business max limit of $50,000,000.");
    assert!(messages
        .iter()
        .any(|message| message.contains("Requires manual review")));

    let within = validator()
        .validate(&input("Acme Holdings", 40, 1_000_000.0, 700, 6_000_000.0))
        .expect("business applicants may exceed the individual cap");
    assert_eq!(within.requested_loan_amount, 6_000_000.0);
}

#[test]
fn manual_review_trigger_fires_without_size_violation() {
    let messages = messages_for(&input("John Doe", 40, 20_000.0, 700, 200_001.0));
    assert_eq!(
        messages,
        vec!["Loan amount is disproportionately high. Requires manual review.".to_string()]
    );

    validator()
        .validate(&input("John Doe", 40, 20_000.0, 700, 200_000.0))
        .expect("exactly ten times revenue is permitted");
}

#[test]
fn policy_reports_applicable_cap() {
    let validator = validator();
    assert_eq!(validator.policy().cap_for(999_999.0), 5_000_000.0);
    assert_eq!(validator.policy().cap_for(1_000_000.0), 50_000_000.0);
}

#[test]
fn formats_whole_dollar_amounts() {
    assert_eq!(format_amount(5_000_000.0), "5,000,000");
    assert_eq!(format_amount(999.0), "999");
    assert_eq!(format_amount(1_000.0), "1,000");
    assert_eq!(format_amount(50_000_000.0), "50,000,000");
}
