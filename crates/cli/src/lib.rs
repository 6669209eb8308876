pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "pricelens",
    about = "Pricelens merchant pricing advisor",
    long_about = "Analyze a product's market position from competitor prices and customer \
                  feedback, and produce ranked pricing recommendations.",
    after_help = "Examples:\n  pricelens analyze --product \"wireless earbuds\" --price 11000 --offline\n  pricelens doctor --json\n  pricelens config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run a market analysis for one product and price")]
    Analyze {
        #[arg(long, help = "Product name used for market discovery")]
        product: String,
        #[arg(long, help = "Your current price for the product (must be positive)")]
        price: f64,
        #[arg(long, help = "Skip the language-enhancement call; print raw wording")]
        offline: bool,
        #[arg(long, help = "Emit the full analysis result as JSON")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with secret redaction")]
    Config,
    #[command(about = "Validate configuration and collaborator readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Analyze { product, price, offline, json } => {
            commands::analyze::run(&commands::analyze::AnalyzeArgs { product, price, offline, json })
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
