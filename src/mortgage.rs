//! Monthly cost of ownership from price, taxes and mortgage settings.

use crate::models::{MortgageSettings, Property};
use serde::Serialize;

/// Annual homeowner's insurance as a share of the price
pub const INSURANCE_RATE: f64 = 0.005;

/// Highest annual interest rate, in percent, that settings may hold
pub const MAX_INTEREST_RATE: f64 = 100.0;

/// Longest loan term, in years, that settings may hold
pub const MAX_LOAN_TERM_YEARS: u32 = 100;

/// Monthly cost breakdown for one property
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBreakdown {
    pub principal: f64,
    pub down_payment: f64,
    pub monthly_mortgage: f64,
    pub monthly_taxes: f64,
    pub monthly_insurance: f64,
    pub total_monthly: f64,
}

/// Compute the monthly payment breakdown.
///
/// Out-of-range inputs are clamped: negative or non-finite amounts become 0,
/// the down payment is limited to `0..=100` percent, the rate to
/// [`MAX_INTEREST_RATE`] and the term to `1..=`[`MAX_LOAN_TERM_YEARS`], so
/// the result is always finite and non-negative.
pub fn compute_monthly_payment(
    price: f64,
    down_payment_pct: f64,
    annual_rate_pct: f64,
    annual_taxes: f64,
    term_years: u32,
) -> PaymentBreakdown {
    let price = non_negative(price);
    let down_payment_pct = non_negative(down_payment_pct).min(100.0);
    let annual_rate_pct = non_negative(annual_rate_pct).min(MAX_INTEREST_RATE);
    let annual_taxes = non_negative(annual_taxes);
    let term_years = term_years.clamp(1, MAX_LOAN_TERM_YEARS);

    let down_payment = price * down_payment_pct / 100.0;
    let principal = price - down_payment;

    let monthly_mortgage = monthly_mortgage_payment(principal, annual_rate_pct, term_years);
    let monthly_insurance = price * INSURANCE_RATE / 12.0;
    let monthly_taxes = annual_taxes / 12.0;

    PaymentBreakdown {
        principal,
        down_payment,
        monthly_mortgage,
        monthly_taxes,
        monthly_insurance,
        total_monthly: monthly_mortgage + monthly_insurance + monthly_taxes,
    }
}

/// Amortized monthly payment; straight-line when the rate is zero or too
/// small to register.
fn monthly_mortgage_payment(principal: f64, annual_rate_pct: f64, term_years: u32) -> f64 {
    let payments = f64::from(term_years) * 12.0;
    let straight_line = principal / payments;

    if annual_rate_pct == 0.0 {
        return straight_line;
    }

    // r / (1 - (1 + r)^-n), with the power taken through ln_1p/exp_m1 so tiny
    // rates keep their precision
    let monthly_rate = annual_rate_pct / 100.0 / 12.0;
    let paid_off = -(-payments * monthly_rate.ln_1p()).exp_m1();
    if paid_off <= 0.0 || !paid_off.is_finite() {
        return straight_line;
    }

    let payment = principal * monthly_rate / paid_off;
    if payment.is_finite() {
        payment
    } else {
        straight_line
    }
}

fn non_negative(value: f64) -> f64 {
    if !value.is_finite() || value < 0.0 {
        0.0
    } else {
        value
    }
}

impl MortgageSettings {
    /// Breakdown for a property under these settings, `None` when disabled
    pub fn breakdown_for(&self, property: &Property) -> Option<PaymentBreakdown> {
        if !self.enabled {
            return None;
        }

        Some(compute_monthly_payment(
            property.price,
            self.down_payment_percentage,
            self.interest_rate,
            property.taxes,
            self.loan_term_years,
        ))
    }
}
