use crate::report::{run_review_summary, ReviewSummaryArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use review_insights::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Guest Review Insights",
    about = "Serve and summarize guest review analytics for rental properties",
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
    /// Inspect the review export from the command line
    Reviews {
        #[command(subcommand)]
        command: ReviewsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ReviewsCommand {
    /// Print overall and per-property review statistics
    Summary(ReviewSummaryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the review export path
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Reviews {
            command: ReviewsCommand::Summary(args),
        } => run_review_summary(args),
    }
}
