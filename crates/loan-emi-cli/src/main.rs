mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::emi::EmiArgs;
use commands::loan::{CalculateArgs, SessionArgs};
use commands::products::ProductArgs;

/// Loan EMI calculations for housing, vehicle and personal loans
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Loan EMI calculations for housing, vehicle and personal loans",
    long_about = "A CLI for computing equated monthly installments with decimal \
                  precision. Lists loan products and their input ranges, runs \
                  clamped calculations against a product, replays engine sessions, \
                  and computes standalone EMI figures."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// List the loan products and their input ranges
    Products,
    /// Show a single loan product
    Product(ProductArgs),
    /// Calculate EMI for a product, clamping inputs to its ranges
    Calculate(CalculateArgs),
    /// Compute EMI for arbitrary inputs, not tied to a product
    Emi(EmiArgs),
    /// Replay a JSON list of engine operations and print the final state
    Session(SessionArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Products => commands::products::run_products(),
        Commands::Product(args) => commands::products::run_product(args),
        Commands::Calculate(args) => commands::loan::run_calculate(args),
        Commands::Emi(args) => commands::emi::run_emi(args),
        Commands::Session(args) => commands::loan::run_session(args),
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
