use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanError {
    #[error("Unknown loan product: {0}")]
    UnknownProduct(String),

    #[error("Invalid tenure: {tenure_years} years gives {installments} monthly installments")]
    InvalidTenure {
        tenure_years: Decimal,
        installments: i64,
    },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },
}
