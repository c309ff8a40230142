use crate::commands::{run_classify, run_synthetic, ClassifyArgs, SyntheticArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use underwriter::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Underwriter",
    about = "Evaluate loan applications over HTTP or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the risk tier for a credit score, revenue, and loan amount
    Classify(ClassifyArgs),
    /// Generate labelled synthetic applications
    Synthetic(SyntheticArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Classify(args) => run_classify(args),
        Command::Synthetic(args) => run_synthetic(args),
    }
}
