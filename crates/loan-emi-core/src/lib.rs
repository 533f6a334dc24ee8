pub mod catalog;
pub mod emi;
pub mod engine;
pub mod error;
pub mod types;

pub use catalog::{Bounds, LoanProductSpec, ProductCatalog, ProductKey};
pub use engine::{LoanCommand, LoanEngine, LoanState};
pub use error::LoanError;
pub use types::*;

/// Standard result type for all loan operations
pub type LoanResult<T> = Result<T, LoanError>;
