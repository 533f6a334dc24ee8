use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use loan_emi_core::engine::{LoanCommand, LoanEngine};

use crate::input;

/// Arguments for a clamped calculation against one product
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CalculateArgs {
    /// Product key (defaults to housing)
    #[arg(long, short)]
    pub product: Option<String>,

    /// Loan amount; clamped to the product's range
    #[arg(long, alias = "principal")]
    pub amount: Option<Decimal>,

    /// Annual interest rate in percent (6.5 = 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in years
    #[arg(long)]
    pub tenure: Option<Decimal>,
}

/// Arguments for replaying engine operations
#[derive(Args)]
pub struct SessionArgs {
    /// Path to a JSON array of operations (otherwise read from stdin)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut engine = LoanEngine::standard()?;

    if let Some(ref key) = args.product {
        engine.select_product(key)?;
    }
    if let Some(amount) = args.amount {
        engine.set_principal(amount)?;
    }
    if let Some(rate) = args.rate {
        engine.set_annual_rate(rate)?;
    }
    if let Some(tenure) = args.tenure {
        engine.set_tenure(tenure)?;
    }

    Ok(serde_json::to_value(engine.state())?)
}

pub fn run_session(args: SessionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let commands: Vec<LoanCommand> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json> or stdin required for a session replay".into());
    };

    let mut engine = LoanEngine::standard()?;
    for (i, command) in commands.iter().enumerate() {
        engine
            .apply(command)
            .map_err(|e| format!("operation {} ({:?}) failed: {}", i + 1, command, e))?;
    }

    Ok(json!({
        "result": engine.state(),
        "operations_applied": commands.len(),
    }))
}
