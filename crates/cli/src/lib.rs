pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sourcemate_core::config::EngineConfig;

#[derive(Debug, Parser)]
#[command(
    name = "sourcemate",
    about = "Sourcemate supplier matching CLI",
    long_about = "Match buyer procurement requests against a supplier catalog, \
compute per-item fulfillment quotes, and inspect the engine configuration.",
    after_help = "Examples:\n  sourcemate match --catalog catalog.json --request request.json\n  sourcemate fulfill --catalog catalog.json --supplier food-1 --items items.json\n  sourcemate validate --catalog catalog.json\n  sourcemate config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a sourcemate.toml overriding built-in defaults")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Rank catalog suppliers against a procurement request")]
    Match {
        #[arg(long, help = "Supplier catalog JSON file")]
        catalog: PathBuf,
        #[arg(long, help = "Procurement request JSON file")]
        request: PathBuf,
        #[arg(
            long,
            default_value = "ai-recommendation",
            help = "Sort strategy: ai-recommendation, price-asc, price-desc, lead-time, rating, distance"
        )]
        strategy: String,
    },
    #[command(about = "Compute a per-item fulfillment quote for one supplier")]
    Fulfill {
        #[arg(long, help = "Supplier catalog JSON file")]
        catalog: PathBuf,
        #[arg(long, help = "Supplier id to quote against")]
        supplier: String,
        #[arg(long, help = "Requested items JSON file (array of item rows)")]
        items: PathBuf,
    },
    #[command(about = "Validate configuration, catalog, and request files without matching")]
    Validate {
        #[arg(long, help = "Supplier catalog JSON file to validate")]
        catalog: Option<PathBuf>,
        #[arg(long, help = "Procurement request JSON file to validate")]
        request: Option<PathBuf>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

fn init_logging(config: &EngineConfig) {
    use sourcemate_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Load config and initialize logging before any other operations.
    let config = match EngineConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            let result = commands::CommandResult::failure(
                "config",
                "config_validation",
                error.to_string(),
                2,
            );
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Command::Match { catalog, request, strategy } => {
            commands::matching::run(&config, &catalog, &request, &strategy)
        }
        Command::Fulfill { catalog, supplier, items } => {
            commands::fulfill::run(&config, &catalog, &supplier, &items)
        }
        Command::Validate { catalog, request } => {
            commands::validate::run(&config, catalog.as_deref(), request.as_deref())
        }
        Command::Config => commands::CommandResult {
            exit_code: 0,
            output: commands::config::run(cli.config.as_deref()),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
