use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use failsafe::classifier::ErrorClassifier;
use failsafe::config::RetryConfig;
use failsafe::error::{taxonomy, ClassifiedError, ErrorCode, RawError};
use failsafe::logging::{init_logging, LoggingConfig};

#[derive(Parser, Debug)]
#[command(name = "failsafe")]
#[command(version)]
#[command(about = "Classify provider errors into retry and fallback decisions")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify an error message or structured error
    Classify {
        /// Error message text
        message: String,

        /// Error type name (classifies as a structured error)
        #[arg(long)]
        name: Option<String>,

        /// Explicit error code reported alongside the error
        #[arg(long)]
        code: Option<String>,

        /// HTTP status of the failed response
        #[arg(long)]
        status: Option<u16>,

        /// Retry configuration file (TOML)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify an explicit error code
    Code {
        /// Error code (e.g. RATE_LIMIT)
        code: String,

        /// Retry configuration file (TOML)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the static taxonomy table
    Table,
}

/// Exit codes for the CLI
mod exit_codes {
    use std::process::ExitCode;

    /// The supplied error code is not part of the taxonomy
    pub fn unknown_code() -> ExitCode {
        ExitCode::from(2)
    }
}

fn load_classifier(config: Option<&PathBuf>) -> Result<ErrorClassifier, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => RetryConfig::load(path)?,
        None => RetryConfig::default(),
    };
    Ok(ErrorClassifier::new(config))
}

fn print_result(result: &ClassifiedError, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!(
            "{} {} retryable={} fallback={}",
            result.code, result.classification, result.retryable, result.should_fallback
        );
    }
    Ok(())
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(LoggingConfig::from_verbosity(cli.verbose).with_timestamps(false))
        .map_err(|e| e as Box<dyn std::error::Error>)?;

    match cli.command {
        Commands::Classify {
            message,
            name,
            code,
            status,
            config,
            json,
        } => {
            let classifier = load_classifier(config.as_ref())?;
            let result = if name.is_some() || code.is_some() || status.is_some() {
                let mut raw = RawError::new(name.unwrap_or_else(|| "Error".to_string()), message);
                raw.code = code;
                raw.status = status;
                classifier.classify(raw, None)
            } else {
                classifier.classify(message, None)
            };
            print_result(&result, json)?;
        }
        Commands::Code { code, config, json } => {
            let code: ErrorCode = match code.parse() {
                Ok(code) => code,
                Err(e) => {
                    eprintln!("error: {}", e);
                    return Ok(exit_codes::unknown_code());
                }
            };
            let classifier = load_classifier(config.as_ref())?;
            print_result(&classifier.classify(code, None), json)?;
        }
        Commands::Table => {
            println!(
                "{:<28} {:<15} {:<10} FALLBACK",
                "CODE", "CLASSIFICATION", "RETRYABLE"
            );
            for (code, entry) in taxonomy::entries() {
                println!(
                    "{:<28} {:<15} {:<10} {}",
                    code.as_str(),
                    entry.classification.as_str(),
                    entry.retryable,
                    entry.should_fallback
                );
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
