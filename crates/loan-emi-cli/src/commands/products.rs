use clap::Args;
use serde_json::{json, Value};

use loan_emi_core::catalog::{LoanProductSpec, ProductCatalog};

/// Arguments for showing one product
#[derive(Args)]
pub struct ProductArgs {
    /// Product key (housing, vehicle, personal)
    pub key: String,
}

pub fn run_products() -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = ProductCatalog::standard();
    let rows: Vec<Value> = catalog.list_products().iter().map(product_row).collect();
    Ok(Value::Array(rows))
}

pub fn run_product(args: ProductArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = ProductCatalog::standard();
    let spec = catalog.get_product(&args.key)?;
    Ok(product_row(spec))
}

/// One flat row per product so table and CSV output get a column per bound.
fn product_row(spec: &LoanProductSpec) -> Value {
    json!({
        "key": spec.key,
        "display_name": spec.display_name,
        "amount_min": spec.amount_range.min,
        "amount_max": spec.amount_range.max,
        "amount_default": spec.amount_range.default,
        "amount_step": spec.amount_range.step,
        "rate_min": spec.rate_range.min,
        "rate_max": spec.rate_range.max,
        "rate_default": spec.rate_range.default,
        "rate_step": spec.rate_range.step,
        "tenure_min": spec.tenure_range.min,
        "tenure_max": spec.tenure_range.max,
        "tenure_default": spec.tenure_range.default,
        "tenure_step": spec.tenure_range.step,
        "accent_color": spec.accent_color,
    })
}
