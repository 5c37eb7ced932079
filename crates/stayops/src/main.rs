mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use crate::commands::{Commands, Session};
use crate::error::CliError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "stayops")]
#[command(about = "Confirm, cancel and inspect short-term-rental reservations", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON document holding properties, reservations and their records
    #[arg(long, global = true, default_value = "stayops.json")]
    store: PathBuf,

    /// Orchestrator settings (default: stayops.toml beside the store, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Log step-by-step progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let session = Session::new(cli.store, cli.config, cli.format);
    match cli.command.execute(&session) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
