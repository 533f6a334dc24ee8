pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Decimals travel as strings; human-facing formats show them to 2 dp.
/// Non-numeric strings pass through unchanged.
pub(crate) fn display_amount(s: &str) -> String {
    match s.parse::<Decimal>() {
        Ok(d) if d.scale() > 2 => d
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .to_string(),
        _ => s.to_string(),
    }
}
