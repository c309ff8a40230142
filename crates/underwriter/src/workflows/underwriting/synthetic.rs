//! Labelled synthetic loan applications for load and regression testing.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::domain::{LoanApplication, LoanApplicationInput, RiskTier};
use super::evaluation::RiskClassifier;

const FIRST_NAMES: [&str; 12] = [
    "Alice", "Bob", "Carla", "Deshawn", "Elena", "Farid", "Grace", "Hiroshi", "Ines", "Jamal",
    "Kateryna", "Luis",
];
const LAST_NAMES: [&str; 10] = [
    "Johnson", "Smith", "Okafor", "Nguyen", "Garcia", "Kowalski", "Haddad", "Tanaka", "Rossi",
    "Mbeki",
];

/// One generated application with the tier the rules assign to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticCase {
    pub input: LoanApplicationInput,
    pub expected: RiskTier,
}

/// Flattened row used for CSV export.
#[derive(Debug, Serialize)]
struct SyntheticRow<'a> {
    name: &'a str,
    age: u8,
    revenue: f64,
    credit_score: u16,
    loan_amount: f64,
    expected: &'static str,
}

/// Batch of cases plus label counts. Only the cases are exported.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticBatch {
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    pub cases: Vec<SyntheticCase>,
    pub label_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticFormat {
    Json,
    Csv,
}

#[derive(Debug, thiserror::Error)]
pub enum SyntheticExportError {
    #[error("failed to encode synthetic cases as json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode synthetic cases as csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write synthetic cases: {0}")]
    Io(#[from] std::io::Error),
}

/// Seeded generator; identical seeds yield identical batches apart from the timestamp.
pub struct SyntheticCaseGenerator {
    rng: StdRng,
    seed: u64,
    classifier: RiskClassifier,
}

impl SyntheticCaseGenerator {
    pub fn new(seed: u64, classifier: RiskClassifier) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            classifier,
        }
    }

    pub fn application(&mut self) -> LoanApplication {
        let first = FIRST_NAMES.choose(&mut self.rng).copied().unwrap_or("Alex");
        let last = LAST_NAMES.choose(&mut self.rng).copied().unwrap_or("Doe");

        LoanApplication {
            name: format!("{first} {last}"),
            age: self.rng.gen_range(21..=65),
            annual_revenue: f64::from(self.rng.gen_range(30_000u32..=200_000)),
            credit_score: self.rng.gen_range(300..=850),
            requested_loan_amount: f64::from(self.rng.gen_range(5_000u32..=50_000)),
        }
    }

    pub fn generate(&mut self, count: usize) -> SyntheticBatch {
        let mut cases = Vec::with_capacity(count);
        let mut label_counts = BTreeMap::new();

        for _ in 0..count {
            let application = self.application();
            let expected = self.classifier.classify_application(&application);
            *label_counts.entry(expected.label().to_string()).or_insert(0) += 1;
            cases.push(SyntheticCase {
                input: LoanApplicationInput::from(&application),
                expected,
            });
        }

        SyntheticBatch {
            generated_at: Utc::now(),
            seed: self.seed,
            cases,
            label_counts,
        }
    }
}

impl SyntheticBatch {
    pub fn write<W: Write>(&self, format: SyntheticFormat, writer: W) -> Result<(), SyntheticExportError> {
        match format {
            SyntheticFormat::Json => {
                serde_json::to_writer_pretty(writer, &self.cases)?;
                Ok(())
            }
            SyntheticFormat::Csv => self.write_csv(writer),
        }
    }

    fn write_csv<W: Write>(&self, writer: W) -> Result<(), SyntheticExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for case in &self.cases {
            let input = &case.input;
            csv_writer.serialize(SyntheticRow {
                name: input.name.as_str().unwrap_or_default(),
                age: input.age.as_u64().and_then(|age| u8::try_from(age).ok()).unwrap_or_default(),
                revenue: input.revenue.as_f64().unwrap_or_default(),
                credit_score: input
                    .credit_score
                    .as_u64()
                    .and_then(|score| u16::try_from(score).ok())
                    .unwrap_or_default(),
                loan_amount: input.loan_amount.as_f64().unwrap_or_default(),
                expected: case.expected.label(),
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
