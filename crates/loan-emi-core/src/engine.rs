//! Loan state engine.
//!
//! Owns the single `LoanState` of a session. Each mutating operation clamps
//! its input into the active product's range, recomputes the derived fields
//! into a candidate state, and commits the candidate only once every step
//! has succeeded. A failed operation leaves the previous state in place.

use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Bounds, LoanProductSpec, ProductCatalog, ProductKey};
use crate::emi;
use crate::types::{Money, Percent, Years};
use crate::LoanResult;

// ---------------------------------------------------------------------------
// State and commands
// ---------------------------------------------------------------------------

/// Snapshot of the inputs and derived outputs for the active product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanState {
    pub active_product: ProductKey,
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub tenure_years: Years,
    pub installments: i64,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl LoanState {
    fn compute(
        product: ProductKey,
        principal: Money,
        annual_rate_percent: Percent,
        tenure_years: Years,
    ) -> LoanResult<Self> {
        let b = emi::compute_emi(principal, annual_rate_percent, tenure_years)?;
        Ok(Self {
            active_product: product,
            principal,
            annual_rate_percent,
            tenure_years,
            installments: b.installments,
            monthly_payment: b.monthly_payment,
            total_interest: b.total_interest,
            total_payment: b.total_payment,
        })
    }
}

/// One engine operation in serialisable form, e.g.
/// `{"op": "set_principal", "value": "750000"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LoanCommand {
    SelectProduct { key: String },
    SetPrincipal { value: Decimal },
    SetAnnualRate { value: Decimal },
    SetTenure { value: Decimal },
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoanEngine {
    catalog: ProductCatalog,
    state: LoanState,
}

impl LoanEngine {
    /// Start on the catalog's default product with its default inputs.
    pub fn new(catalog: ProductCatalog) -> LoanResult<Self> {
        let product = catalog.default_product();
        let state = LoanState::compute(
            product.key,
            product.default_principal(),
            product.default_rate(),
            product.default_tenure(),
        )?;
        debug!("loan engine started on '{}'", product.key);
        Ok(Self { catalog, state })
    }

    /// Engine over the standard housing/vehicle/personal catalog.
    pub fn standard() -> LoanResult<Self> {
        Self::new(ProductCatalog::standard())
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &LoanState {
        &self.state
    }

    pub fn snapshot(&self) -> LoanState {
        self.state.clone()
    }

    pub fn active_product(&self) -> LoanResult<&LoanProductSpec> {
        self.catalog.get(self.state.active_product)
    }

    /// Switch product and reset all three inputs to its defaults.
    pub fn select_product(&mut self, key: &str) -> LoanResult<&LoanState> {
        let product = self.catalog.get_product(key)?;
        let next = LoanState::compute(
            product.key,
            product.default_principal(),
            product.default_rate(),
            product.default_tenure(),
        )?;
        Ok(self.commit("select_product", next))
    }

    pub fn set_principal(&mut self, value: Money) -> LoanResult<&LoanState> {
        let product = self.active_product()?;
        let principal = clamp_logged("principal", &product.amount_range, value);
        let next = LoanState::compute(
            product.key,
            principal,
            self.state.annual_rate_percent,
            self.state.tenure_years,
        )?;
        Ok(self.commit("set_principal", next))
    }

    pub fn set_annual_rate(&mut self, value: Percent) -> LoanResult<&LoanState> {
        let product = self.active_product()?;
        let rate = clamp_logged("annual_rate_percent", &product.rate_range, value);
        let next = LoanState::compute(
            product.key,
            self.state.principal,
            rate,
            self.state.tenure_years,
        )?;
        Ok(self.commit("set_annual_rate", next))
    }

    pub fn set_tenure(&mut self, value: Years) -> LoanResult<&LoanState> {
        let product = self.active_product()?;
        let tenure = clamp_logged("tenure_years", &product.tenure_range, value);
        let next = LoanState::compute(
            product.key,
            self.state.principal,
            self.state.annual_rate_percent,
            tenure,
        )?;
        Ok(self.commit("set_tenure", next))
    }

    pub fn apply(&mut self, command: &LoanCommand) -> LoanResult<&LoanState> {
        match command {
            LoanCommand::SelectProduct { key } => self.select_product(key),
            LoanCommand::SetPrincipal { value } => self.set_principal(*value),
            LoanCommand::SetAnnualRate { value } => self.set_annual_rate(*value),
            LoanCommand::SetTenure { value } => self.set_tenure(*value),
        }
    }

    fn commit(&mut self, op: &str, next: LoanState) -> &LoanState {
        debug!(
            "{op}: {} P={} A={}% T={}y -> EMI={} total={}",
            next.active_product,
            next.principal,
            next.annual_rate_percent,
            next.tenure_years,
            next.monthly_payment,
            next.total_payment,
        );
        self.state = next;
        &self.state
    }
}

fn clamp_logged(field: &str, bounds: &Bounds, value: Decimal) -> Decimal {
    let clamped = bounds.clamp(value);
    if clamped != value {
        warn!(
            "{field} {value} outside [{}, {}], clamped to {clamped}",
            bounds.min, bounds.max
        );
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoanError;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn engine() -> LoanEngine {
        LoanEngine::standard().unwrap()
    }

    #[test]
    fn test_initial_state_uses_default_product() {
        let e = engine();
        let s = e.state();
        assert_eq!(s.active_product, ProductKey::Housing);
        assert_eq!(s.principal, dec!(1_000_000));
        assert_eq!(s.annual_rate_percent, dec!(6.5));
        assert_eq!(s.tenure_years, dec!(5));
        assert_eq!(s.installments, 60);
        assert!((s.monthly_payment - dec!(19566.15)).abs() < dec!(0.01));
    }

    #[test]
    fn test_set_principal_recomputes() {
        let mut e = engine();
        let before = e.state().monthly_payment;
        let s = e.set_principal(dec!(2_000_000)).unwrap();
        assert_eq!(s.principal, dec!(2_000_000));
        assert!((s.monthly_payment - before * dec!(2)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_setters_clamp_to_bounds() {
        let mut e = engine();
        assert_eq!(e.set_principal(dec!(10)).unwrap().principal, dec!(50_000));
        assert_eq!(e.set_principal(dec!(9_999_999)).unwrap().principal, dec!(5_000_000));
        assert_eq!(e.set_annual_rate(dec!(0)).unwrap().annual_rate_percent, dec!(1));
        assert_eq!(e.set_annual_rate(dec!(40)).unwrap().annual_rate_percent, dec!(15));
        assert_eq!(e.set_tenure(dec!(-3)).unwrap().tenure_years, dec!(1));
        assert_eq!(e.set_tenure(dec!(50)).unwrap().tenure_years, dec!(30));
        assert_eq!(e.state().installments, 360);
    }

    #[test]
    fn test_select_product_resets_inputs() {
        let mut e = engine();
        e.set_principal(dec!(3_000_000)).unwrap();
        e.set_annual_rate(dec!(12.3)).unwrap();
        e.set_tenure(dec!(20)).unwrap();

        let s = e.select_product("vehicle").unwrap().clone();
        let expected = emi::compute_emi(dec!(800_000), dec!(8.5), dec!(5)).unwrap();
        assert_eq!(
            s,
            LoanState {
                active_product: ProductKey::Vehicle,
                principal: dec!(800_000),
                annual_rate_percent: dec!(8.5),
                tenure_years: dec!(5),
                installments: 60,
                monthly_payment: expected.monthly_payment,
                total_interest: expected.total_interest,
                total_payment: expected.total_payment,
            }
        );
    }

    #[test]
    fn test_clamp_uses_active_product_range() {
        let mut e = engine();
        e.select_product("personal").unwrap();
        let s = e.set_annual_rate(dec!(0)).unwrap();
        assert_eq!(s.annual_rate_percent, dec!(0));
        assert_eq!(s.total_interest, Decimal::ZERO);
        assert_eq!(e.set_tenure(dec!(30)).unwrap().tenure_years, dec!(7));
    }

    #[test]
    fn test_unknown_product_leaves_state_untouched() {
        let mut e = engine();
        e.set_principal(dec!(1_234_000)).unwrap();
        let before = e.snapshot();
        let err = e.select_product("nonexistent").unwrap_err();
        assert!(matches!(err, LoanError::UnknownProduct(_)));
        assert_eq!(e.state(), &before);
    }

    #[test]
    fn test_apply_commands() {
        let mut e = engine();
        let commands: Vec<LoanCommand> = serde_json::from_str(
            r#"[
                {"op": "select_product", "key": "personal"},
                {"op": "set_principal", "value": "120000"},
                {"op": "set_annual_rate", "value": "0"},
                {"op": "set_tenure", "value": "1"}
            ]"#,
        )
        .unwrap();
        for c in &commands {
            e.apply(c).unwrap();
        }
        let s = e.state();
        assert_eq!(s.active_product, ProductKey::Personal);
        assert_eq!(s.monthly_payment, dec!(10_000));
        assert_eq!(s.total_interest, Decimal::ZERO);
    }
}
