//! Gateway configuration auditor.
//!
//! ```text
//! gateway-audit audit  <config> [--exclude ID]... [--severity LEVEL]... [--settings FILE] [--json]
//! gateway-audit encode <config> --output FILE
//! gateway-audit decode <FILE>
//! ```

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use gateway_audit::config::{load_config, load_settings};
use gateway_audit::observability::logging::{init_logging, DEFAULT_DIRECTIVE};
use gateway_audit::{audit, decode, encode, parse, AuditSettings, Severity};

#[derive(Parser)]
#[command(name = "gateway-audit")]
#[command(about = "Audit API gateway configurations against best practices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report best-practice recommendations for a configuration
    Audit {
        /// Configuration file (.json or .toml)
        config: PathBuf,

        /// Rule ID to skip; repeatable
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Severity to report; repeatable, all when omitted
        #[arg(short, long)]
        severity: Vec<Severity>,

        /// TOML file with `exclude` and `severities`
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the compact snapshot of a configuration
    Encode {
        config: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print a compact snapshot as JSON
    Decode { input: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(DEFAULT_DIRECTIVE);
    let cli = Cli::parse();

    match cli.command {
        Commands::Audit {
            config,
            exclude,
            severity,
            settings,
            json,
        } => {
            let mut settings = match settings {
                Some(path) => load_settings(&path)?,
                None => AuditSettings::default(),
            };
            settings = settings.excluding(exclude);
            if !severity.is_empty() {
                settings.severities = severity.into_iter().collect();
            }

            let config = load_config(&config)?;
            let result = audit(&config, &settings);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                for (i, r) in result.recommendations.iter().enumerate() {
                    println!("{:02}: {} {:<8}\t{}", i, r.rule, r.severity, r.message);
                }
            }
        }
        Commands::Encode { config, output } => {
            let config = load_config(&config)?;
            let bytes = encode(&parse(&config))?;
            fs::write(&output, &bytes)?;
            tracing::info!(output = %output.display(), bytes = bytes.len(), "Snapshot written");
        }
        Commands::Decode { input } => {
            let bytes = fs::read(&input)?;
            let service = decode(&bytes)?;
            println!("{}", serde_json::to_string_pretty(&service)?);
        }
    }

    Ok(())
}
