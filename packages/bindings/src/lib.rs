use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use loan_emi_core::catalog::ProductCatalog;
use loan_emi_core::emi::{self, EmiInput};
use loan_emi_core::engine::{LoanCommand, LoanEngine};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Slider and number inputs arrive as JS numbers.
fn to_decimal(value: f64) -> NapiResult<Decimal> {
    Decimal::try_from(value).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[napi]
pub fn list_products() -> NapiResult<String> {
    let catalog = ProductCatalog::standard();
    serde_json::to_string(catalog.list_products()).map_err(to_napi_error)
}

#[napi]
pub fn get_product(key: String) -> NapiResult<String> {
    let catalog = ProductCatalog::standard();
    let spec = catalog.get_product(&key).map_err(to_napi_error)?;
    serde_json::to_string(spec).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Standalone EMI
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_emi(input_json: String) -> NapiResult<String> {
    let input: EmiInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = emi::calculate_emi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Engine session
// ---------------------------------------------------------------------------

/// One loan calculator session. Every setter returns the new state as JSON.
#[napi]
pub struct LoanCalculator {
    engine: LoanEngine,
}

#[napi]
impl LoanCalculator {
    #[napi(constructor)]
    pub fn new() -> napi::Result<Self> {
        let engine = LoanEngine::standard().map_err(to_napi_error)?;
        Ok(Self { engine })
    }

    #[napi]
    pub fn state(&self) -> NapiResult<String> {
        serde_json::to_string(self.engine.state()).map_err(to_napi_error)
    }

    #[napi]
    pub fn select_product(&mut self, key: String) -> NapiResult<String> {
        let state = self.engine.select_product(&key).map_err(to_napi_error)?;
        serde_json::to_string(state).map_err(to_napi_error)
    }

    #[napi]
    pub fn set_principal(&mut self, value: f64) -> NapiResult<String> {
        let state = self
            .engine
            .set_principal(to_decimal(value)?)
            .map_err(to_napi_error)?;
        serde_json::to_string(state).map_err(to_napi_error)
    }

    #[napi]
    pub fn set_annual_rate(&mut self, value: f64) -> NapiResult<String> {
        let state = self
            .engine
            .set_annual_rate(to_decimal(value)?)
            .map_err(to_napi_error)?;
        serde_json::to_string(state).map_err(to_napi_error)
    }

    #[napi]
    pub fn set_tenure(&mut self, value: f64) -> NapiResult<String> {
        let state = self
            .engine
            .set_tenure(to_decimal(value)?)
            .map_err(to_napi_error)?;
        serde_json::to_string(state).map_err(to_napi_error)
    }

    /// Apply a JSON command such as `{"op":"set_tenure","value":"10"}`.
    #[napi]
    pub fn apply(&mut self, command_json: String) -> NapiResult<String> {
        let command: LoanCommand = serde_json::from_str(&command_json).map_err(to_napi_error)?;
        let state = self.engine.apply(&command).map_err(to_napi_error)?;
        serde_json::to_string(state).map_err(to_napi_error)
    }
}
