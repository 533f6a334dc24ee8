//! Equated monthly installment (EMI) computation.
//!
//! `EMI = P × r × (1 + r)^n / ((1 + r)^n − 1)` with `r` the monthly rate
//! (`annual % / 12 / 100`) and `n` the number of monthly installments. A
//! zero rate degenerates to straight-line repayment `P / n`. All math in
//! `rust_decimal::Decimal`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Years};
use crate::LoanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Rates above this are flagged in the standalone calculation output.
const UNUSUAL_RATE_PERCENT: Decimal = dec!(30);

// ---------------------------------------------------------------------------
// Core formula
// ---------------------------------------------------------------------------

/// Derived repayment figures for one (principal, rate, tenure) triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmiBreakdown {
    /// Monthly rate as a decimal fraction (0.005416… for 6.5% p.a.).
    pub monthly_rate: Decimal,
    pub installments: i64,
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
}

/// Number of monthly installments for a tenure in years.
///
/// Fractional tenures round to the nearest whole month, midpoint away from
/// zero (1.04 years is 12 months, 1.0417 years is 13).
pub fn installment_count(tenure_years: Years) -> LoanResult<i64> {
    let installments = tenure_years
        .checked_mul(MONTHS_PER_YEAR)
        .map(|m| m.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|m| m.to_i64())
        .ok_or_else(|| LoanError::InvalidInput {
            field: "tenure_years".into(),
            reason: format!("tenure of {tenure_years} years is out of range"),
        })?;
    if installments < 1 {
        return Err(LoanError::InvalidTenure {
            tenure_years,
            installments,
        });
    }
    Ok(installments)
}

/// Apply the EMI formula. Inputs are taken as given; range checks belong to
/// the caller.
pub fn compute_emi(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_years: Years,
) -> LoanResult<EmiBreakdown> {
    let n = installment_count(tenure_years)?;
    let n_dec = Decimal::from(n);
    let r = annual_rate_percent / MONTHS_PER_YEAR / dec!(100);

    let monthly_payment = if r.is_zero() {
        principal / n_dec
    } else {
        let factor = (Decimal::ONE + r)
            .checked_powu(n as u64)
            .ok_or_else(|| LoanError::InvalidInput {
                field: "annual_rate_percent".into(),
                reason: format!("compounding {annual_rate_percent}% over {n} months overflows"),
            })?;
        // Non-zero r gives factor > 1 down to the smallest Decimal step.
        let payment_per_unit = r
            .checked_mul(factor)
            .ok_or_else(|| amount_overflow(principal))?
            .checked_div(factor - Decimal::ONE)
            .ok_or_else(|| LoanError::DivisionByZero {
                context: "EMI annuity factor".into(),
            })?;
        principal
            .checked_mul(payment_per_unit)
            .ok_or_else(|| amount_overflow(principal))?
    };

    let total_payment = monthly_payment
        .checked_mul(n_dec)
        .ok_or_else(|| amount_overflow(principal))?;
    let total_interest = total_payment - principal;

    Ok(EmiBreakdown {
        monthly_rate: r,
        installments: n,
        monthly_payment,
        total_payment,
        total_interest,
    })
}

fn amount_overflow(principal: Money) -> LoanError {
    LoanError::InvalidInput {
        field: "principal".into(),
        reason: format!("repayment totals for a principal of {principal} overflow"),
    }
}

// ---------------------------------------------------------------------------
// Standalone calculation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiInput {
    pub principal: Money,
    /// Percent per annum (6.5 = 6.5%).
    pub annual_rate_percent: Percent,
    pub tenure_years: Years,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiOutput {
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub installments: i64,
    pub monthly_rate: Decimal,
    /// Total interest per unit of principal.
    pub interest_to_principal: Decimal,
    /// Principal as a fraction of everything repaid.
    pub principal_share: Decimal,
}

/// Compute EMI and totals for a loan not tied to any catalog product.
pub fn calculate_emi(input: &EmiInput) -> LoanResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    if input.annual_rate_percent > UNUSUAL_RATE_PERCENT {
        warnings.push(format!(
            "Annual rate of {}% is unusually high for an amortising loan",
            input.annual_rate_percent
        ));
    }

    let b = compute_emi(
        input.principal,
        input.annual_rate_percent,
        input.tenure_years,
    )?;

    if !(input.tenure_years * MONTHS_PER_YEAR).fract().is_zero() {
        warnings.push(format!(
            "Tenure of {} years rounded to {} monthly installments",
            input.tenure_years, b.installments
        ));
    }

    let output = EmiOutput {
        monthly_payment: b.monthly_payment,
        total_payment: b.total_payment,
        total_interest: b.total_interest,
        installments: b.installments,
        monthly_rate: b.monthly_rate,
        interest_to_principal: b
            .total_interest
            .checked_div(input.principal)
            .ok_or_else(|| amount_overflow(input.principal))?,
        principal_share: input
            .principal
            .checked_div(b.total_payment)
            .ok_or_else(|| LoanError::DivisionByZero {
                context: "principal share of total payment".into(),
            })?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Equated monthly installment (reducing balance annuity)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &EmiInput) -> LoanResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Annual rate cannot be negative".into(),
        });
    }
    if input.tenure_years <= Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "tenure_years".into(),
            reason: "Tenure must be positive".into(),
        });
    }
    Ok(())
}
