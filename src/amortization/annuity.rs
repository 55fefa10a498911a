//! Level-payment annuity calculations
//!
//! Used to check that a stated payment actually retires the loan within its
//! term before any simulation is attempted.

use super::traditional::split_scheduled_payment;
use crate::money::{Money, Rate};
use rust_decimal::Decimal;

/// The final-month payment may exceed the stated payment by this percentage.
pub const FINAL_PAYMENT_TOLERANCE_PERCENT: i64 = 1;

/// Upper bound on cent steps taken above the rounded level payment
const MAX_PAYMENT_STEPS: u32 = 10_000;

/// Compute `(1 + i)^n` with checked multiplication.
fn growth_factor(monthly: Decimal, months: u32) -> Option<Decimal> {
    let base = Decimal::ONE.checked_add(monthly)?;
    let mut factor = Decimal::ONE;
    for _ in 0..months {
        factor = factor.checked_mul(base)?;
    }
    Some(factor)
}

/// Level monthly payment that amortizes `balance` over `months`, unrounded.
///
/// `P = B * i * (1+i)^n / ((1+i)^n - 1)`, or `B / n` at a zero rate.
/// When `(1+i)^n` overflows it is treated as infinite, leaving `B * i`.
/// Returns `None` for a zero term or on decimal overflow of the result.
pub fn level_payment(balance: Money, annual_rate: Rate, months: u32) -> Option<Decimal> {
    if months == 0 {
        return None;
    }
    let principal = balance.to_units();
    let monthly = annual_rate.monthly().value();
    if monthly.is_zero() {
        return principal.checked_div(Decimal::from(months));
    }

    let ratio = match growth_factor(monthly, months) {
        Some(factor) => {
            let denominator = factor.checked_sub(Decimal::ONE)?;
            if denominator.is_zero() {
                return None;
            }
            factor.checked_div(denominator)?
        }
        None => Decimal::ONE,
    };
    principal.checked_mul(monthly)?.checked_mul(ratio)
}

/// Amount paid in the month the loan is retired when paying `payment`.
///
/// Follows the same month split as the traditional simulator, so in month
/// `months` this includes whatever balance the stated payment left behind.
pub fn final_payment(mut balance: Money, annual_rate: Rate, months: u32, payment: Money) -> Money {
    let monthly_rate = annual_rate.monthly();
    let mut last = Money::ZERO;
    for month in 1..=months {
        let split = split_scheduled_payment(balance, monthly_rate, payment, month, months);
        last = split.outlay();
        balance -= split.principal;
        if balance.is_zero() {
            break;
        }
    }
    last
}

/// Largest final-month payment accepted alongside a stated `payment`
pub fn final_payment_limit(payment: Money) -> Money {
    let slack = payment.cents().saturating_mul(FINAL_PAYMENT_TOLERANCE_PERCENT).saturating_add(99) / 100;
    payment.saturating_add(Money::from_cents(slack.max(1)))
}

/// Smallest whole-cent payment accepted for the loan.
///
/// Starts from the level payment rounded half-up to the cent, never less than
/// one cent over the first month's interest so that principal always falls,
/// and steps up a cent at a time until the final-month payment is within
/// [`final_payment_limit`] of the payment.
pub fn minimum_payment(balance: Money, annual_rate: Rate, months: u32) -> Option<Money> {
    let level = Money::from_units_half_up(level_payment(balance, annual_rate, months)?)?;
    let first_interest = annual_rate.monthly().checked_interest_on(balance)?;
    let floor = first_interest.checked_add(Money::from_cents(1))?;

    let mut candidate = level.max(floor);
    for _ in 0..MAX_PAYMENT_STEPS {
        if final_payment(balance, annual_rate, months, candidate) <= final_payment_limit(candidate) {
            return Some(candidate);
        }
        candidate = candidate.checked_add(Money::from_cents(1))?;
    }
    None
}
