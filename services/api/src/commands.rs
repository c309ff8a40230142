use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use underwriter::error::AppError;
use underwriter::workflows::underwriting::{
    RiskClassifier, RiskTier, SyntheticBatch, SyntheticCaseGenerator, SyntheticFormat,
};

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Credit score on the 300-850 scale
    #[arg(long)]
    pub(crate) credit_score: u16,
    /// Annual revenue in dollars
    #[arg(long)]
    pub(crate) revenue: f64,
    /// Requested loan amount in dollars
    #[arg(long)]
    pub(crate) loan_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for SyntheticFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => SyntheticFormat::Json,
            FormatArg::Csv => SyntheticFormat::Csv,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct SyntheticArgs {
    /// Number of applications to generate
    #[arg(long, default_value_t = 100)]
    pub(crate) count: usize,
    /// Seed for reproducible batches
    #[arg(long, default_value_t = 42)]
    pub(crate) seed: u64,
    /// Output encoding
    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    pub(crate) format: FormatArg,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let tier = classify(&args);
    println!("{}", tier.label());
    Ok(())
}

fn classify(args: &ClassifyArgs) -> RiskTier {
    RiskClassifier::default().classify(args.credit_score, args.revenue, args.loan_amount)
}

pub(crate) fn run_synthetic(args: SyntheticArgs) -> Result<(), AppError> {
    let batch = synthetic_batch(&args);
    let format = SyntheticFormat::from(args.format);

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            batch.write(format, &mut writer)?;
            writer.flush()?;
            println!(
                "Wrote {} synthetic applications to {} (seed {}, generated {})",
                batch.cases.len(),
                path.display(),
                batch.seed,
                batch.generated_at.to_rfc3339()
            );
            for (label, count) in &batch.label_counts {
                println!("- {label}: {count}");
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            batch.write(format, &mut handle)?;
            writeln!(handle)?;
        }
    }

    Ok(())
}

fn synthetic_batch(args: &SyntheticArgs) -> SyntheticBatch {
    SyntheticCaseGenerator::new(args.seed, RiskClassifier::default()).generate(args.count)
}
