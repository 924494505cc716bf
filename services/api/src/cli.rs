use crate::demo::{run_compare, run_demo, CompareArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use procura::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Procurement Recommendation Engine",
    about = "Compare vendor quotes and selection strategies from the command line or over HTTP",
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
    /// Compare the four selection strategies for the seeded demo project
    Compare(CompareArgs),
    /// Run an end-to-end CLI demo covering comparison, risks, and savings
    Demo(DemoArgs),
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
        Command::Compare(args) => run_compare(args),
        Command::Demo(args) => run_demo(args),
    }
}
