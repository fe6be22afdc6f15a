pub mod commands;

use clap::{Parser, Subcommand};
use docdesk_core::config::{AppConfig, LoadOptions, LogFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "docdesk",
    about = "Docdesk document-request CLI",
    long_about = "Inspect configuration, load the demo requests, and replay document-request scripts.",
    after_help = "Examples:\n  docdesk config\n  docdesk seed\n  docdesk run --script steps.json --seed"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Open a session preloaded with the demo requests and print a summary")]
    Seed,
    #[command(about = "Replay a JSON script of submit/cancel/decide/list steps")]
    Run {
        #[arg(long, help = "Path to the JSON script")]
        script: PathBuf,
        #[arg(long, help = "Load the demo requests before replaying")]
        seed: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // A broken config is reported by the command itself.
    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Config => commands::config::run(),
        Command::Seed => commands::seed::run(),
        Command::Run { script, seed } => commands::run::run(&script, seed),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only the command payload.
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.trim()));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
