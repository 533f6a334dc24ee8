//! Loan product catalog.
//!
//! A fixed, ordered table of loan products with the input ranges and
//! defaults the state engine clamps into. The order of the table is the
//! order products are rendered in selection menus; the first entry is the
//! product a fresh engine starts on.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LoanError;
use crate::types::{Money, Percent, Years};
use crate::LoanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKey {
    Housing,
    Vehicle,
    Personal,
}

impl ProductKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKey::Housing => "housing",
            ProductKey::Vehicle => "vehicle",
            ProductKey::Personal => "personal",
        }
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductKey {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "housing" => Ok(ProductKey::Housing),
            "vehicle" => Ok(ProductKey::Vehicle),
            "personal" => Ok(ProductKey::Personal),
            _ => Err(LoanError::UnknownProduct(s.to_string())),
        }
    }
}

/// Closed input range with a default and a widget step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Decimal,
    pub max: Decimal,
    pub default: Decimal,
    /// Increment for bounded input widgets. Not enforced by clamping.
    pub step: Decimal,
}

impl Bounds {
    pub fn new(min: Decimal, max: Decimal, default: Decimal, step: Decimal) -> Self {
        Self {
            min,
            max,
            default,
            step,
        }
    }

    /// Pull `value` to the nearest bound when it falls outside the range.
    pub fn clamp(&self, value: Decimal) -> Decimal {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, field: &str, allow_zero_min: bool) -> LoanResult<()> {
        if self.min > self.max {
            return Err(invalid(field, "min must not exceed max"));
        }
        if !self.contains(self.default) {
            return Err(invalid(field, "default must lie within [min, max]"));
        }
        if self.step <= Decimal::ZERO {
            return Err(invalid(field, "step must be positive"));
        }
        if allow_zero_min {
            if self.min < Decimal::ZERO {
                return Err(invalid(field, "min must not be negative"));
            }
        } else if self.min <= Decimal::ZERO {
            return Err(invalid(field, "min must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanProductSpec {
    pub key: ProductKey,
    pub display_name: String,
    /// Currency units.
    pub amount_range: Bounds,
    /// Percent per annum.
    pub rate_range: Bounds,
    /// Years.
    pub tenure_range: Bounds,
    /// Opaque display token, passed through untouched.
    pub accent_color: String,
}

impl LoanProductSpec {
    /// Check `min <= default <= max` on every range and that all minimums
    /// are positive, except the rate minimum which may be zero.
    pub fn validate(&self) -> LoanResult<()> {
        self.amount_range
            .validate(&format!("{}.amount_range", self.key), false)?;
        self.rate_range
            .validate(&format!("{}.rate_range", self.key), true)?;
        self.tenure_range
            .validate(&format!("{}.tenure_range", self.key), false)?;
        Ok(())
    }

    pub fn default_principal(&self) -> Money {
        self.amount_range.default
    }

    pub fn default_rate(&self) -> Percent {
        self.rate_range.default
    }

    pub fn default_tenure(&self) -> Years {
        self.tenure_range.default
    }
}

fn invalid(field: &str, reason: &str) -> LoanError {
    LoanError::InvalidInput {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCatalog {
    products: Vec<LoanProductSpec>,
}

impl ProductCatalog {
    /// Build a catalog from custom product specs. Fails when the list is
    /// empty, a key repeats, or any spec breaks its range invariants.
    pub fn new(products: Vec<LoanProductSpec>) -> LoanResult<Self> {
        if products.is_empty() {
            return Err(invalid("products", "catalog needs at least one product"));
        }
        for (i, spec) in products.iter().enumerate() {
            spec.validate()?;
            if products[..i].iter().any(|p| p.key == spec.key) {
                return Err(invalid(
                    "products",
                    &format!("duplicate product key '{}'", spec.key),
                ));
            }
        }
        Ok(Self { products })
    }

    /// Housing, vehicle and personal loans.
    pub fn standard() -> Self {
        Self {
            products: vec![
                LoanProductSpec {
                    key: ProductKey::Housing,
                    display_name: "Home Loan".into(),
                    amount_range: Bounds::new(
                        dec!(50_000),
                        dec!(5_000_000),
                        dec!(1_000_000),
                        dec!(1_000),
                    ),
                    rate_range: Bounds::new(dec!(1), dec!(15), dec!(6.5), dec!(0.1)),
                    tenure_range: Bounds::new(dec!(1), dec!(30), dec!(5), dec!(1)),
                    accent_color: "#4CAF50".into(),
                },
                LoanProductSpec {
                    key: ProductKey::Vehicle,
                    display_name: "Vehicle Loan".into(),
                    amount_range: Bounds::new(
                        dec!(100_000),
                        dec!(10_000_000),
                        dec!(800_000),
                        dec!(1_000),
                    ),
                    rate_range: Bounds::new(dec!(5), dec!(18), dec!(8.5), dec!(0.1)),
                    tenure_range: Bounds::new(dec!(1), dec!(8), dec!(5), dec!(1)),
                    accent_color: "#2196F3".into(),
                },
                LoanProductSpec {
                    key: ProductKey::Personal,
                    display_name: "Personal Loan".into(),
                    amount_range: Bounds::new(
                        dec!(10_000),
                        dec!(4_000_000),
                        dec!(500_000),
                        dec!(1_000),
                    ),
                    rate_range: Bounds::new(dec!(0), dec!(24), dec!(11.5), dec!(0.1)),
                    tenure_range: Bounds::new(dec!(1), dec!(7), dec!(3), dec!(1)),
                    accent_color: "#FF9800".into(),
                },
            ],
        }
    }

    pub fn list_products(&self) -> &[LoanProductSpec] {
        &self.products
    }

    /// Look up a product by its string key.
    pub fn get_product(&self, key: &str) -> LoanResult<&LoanProductSpec> {
        let parsed: ProductKey = key.parse()?;
        self.get(parsed)
    }

    pub fn get(&self, key: ProductKey) -> LoanResult<&LoanProductSpec> {
        self.products
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| LoanError::UnknownProduct(key.to_string()))
    }

    pub fn default_product(&self) -> &LoanProductSpec {
        // Non-empty by construction.
        &self.products[0]
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
