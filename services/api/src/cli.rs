use crate::commands::{run_compare, run_extract, CompareArgs, ExtractArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use reqtrack::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "reqtrack",
    about = "Compare requisition snapshots and export the active requests they contain",
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
    /// Keep the Active rows of a single export
    Extract(ExtractArgs),
    /// Reconcile an OLD and a NEW export and report status changes
    Compare(CompareArgs),
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
        Command::Extract(args) => run_extract(args),
        Command::Compare(args) => run_compare(args),
    }
}
