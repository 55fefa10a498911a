//! Convert raw scenario fields into validated computation units
//!
//! All structural checks run first and every violation is collected. The
//! payment sufficiency check runs only once the mortgage fields are sound.

use super::data::{CarryingCosts, RawScenario, ScenarioInput};
use crate::amortization::minimum_payment;
use crate::error::{EngineError, FieldViolation, ValidationError, ViolationKind};
use crate::money::{Money, Rate};
use log::{debug, warn};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Largest accepted monetary amount, in currency units
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Largest accepted annual rate, in whole percent
pub const MAX_RATE_PERCENT: Decimal = dec!(100);

struct Checker {
    violations: Vec<FieldViolation>,
}

impl Checker {
    fn new() -> Self {
        Self { violations: Vec::new() }
    }

    fn reject(&mut self, field: &'static str, kind: ViolationKind) {
        self.violations.push(FieldViolation::new(field, kind));
    }

    fn required(&mut self, field: &'static str, value: Option<Decimal>) -> Option<Decimal> {
        if value.is_none() {
            self.reject(field, ViolationKind::Missing);
        }
        value
    }

    /// Monetary amount >= 0 (or > 0 when `positive`)
    fn amount(&mut self, field: &'static str, value: Option<Decimal>, positive: bool) -> Option<Money> {
        let value = self.required(field, value)?;
        self.convert_amount(field, value, positive)
    }

    fn optional_amount(&mut self, field: &'static str, value: Option<Decimal>) -> Option<Money> {
        match value {
            None => Some(Money::ZERO),
            Some(value) => self.convert_amount(field, value, false),
        }
    }

    fn convert_amount(&mut self, field: &'static str, value: Decimal, positive: bool) -> Option<Money> {
        if value.is_sign_negative() && !value.is_zero() {
            self.reject(field, ViolationKind::Negative);
            return None;
        }
        if value > MAX_AMOUNT {
            self.reject(field, ViolationKind::TooLarge { max: MAX_AMOUNT.to_string() });
            return None;
        }
        let money = Money::from_units(value)?;
        if positive && !money.is_positive() {
            self.reject(field, ViolationKind::NotPositive);
            return None;
        }
        Some(money)
    }

    fn rate(&mut self, field: &'static str, value: Option<Decimal>) -> Option<Rate> {
        let value = self.required(field, value)?;
        if value.is_sign_negative() && !value.is_zero() {
            self.reject(field, ViolationKind::Negative);
            return None;
        }
        if value > MAX_RATE_PERCENT {
            self.reject(
                field,
                ViolationKind::OutOfRange { min: "0".to_string(), max: MAX_RATE_PERCENT.to_string() },
            );
            return None;
        }
        Some(Rate::from_percent(value))
    }

    fn term(&mut self, field: &'static str, value: Option<Decimal>, max_months: u32) -> Option<u32> {
        let value = self.required(field, value)?;
        if !value.fract().is_zero() {
            self.reject(field, ViolationKind::NotWholeNumber);
            return None;
        }
        match value.to_u32() {
            Some(months) if (1..=max_months).contains(&months) => Some(months),
            _ => {
                self.reject(
                    field,
                    ViolationKind::OutOfRange { min: "1".to_string(), max: max_months.to_string() },
                );
                None
            }
        }
    }
}

/// Validate `raw` and convert it to a [`ScenarioInput`].
///
/// Fails with [`EngineError::Validation`] listing every violated field, or
/// with [`EngineError::InsufficientPayment`] when the payment cannot retire
/// the balance within the term.
pub fn normalize(raw: &RawScenario, max_term_months: u32) -> Result<ScenarioInput, EngineError> {
    let mut check = Checker::new();

    let mortgage_balance = check.amount("mortgageBalance", raw.mortgage_balance, true);
    let mortgage_rate = check.rate("mortgageAnnualRate", raw.mortgage_annual_rate);
    let remaining_term_months = check.term("remainingTermMonths", raw.remaining_term_months, max_term_months);
    let monthly_payment = check.amount("monthlyPayment", raw.monthly_payment, true);

    let credit_line_limit = check.amount("creditLineLimit", raw.credit_line_limit, false);
    let credit_line_rate = check.rate("creditLineAnnualRate", raw.credit_line_annual_rate);

    let monthly_gross_income = check.amount("monthlyGrossIncome", raw.monthly_gross_income, false);
    let monthly_net_income = check.amount("monthlyNetIncome", raw.monthly_net_income, false);
    let monthly_expenses = check.amount("monthlyExpenses", raw.monthly_expenses, false);

    let property_tax = check.optional_amount("propertyTax", raw.property_tax);
    let insurance = check.optional_amount("insurance", raw.insurance);
    let hoa = check.optional_amount("hoa", raw.hoa);
    let mortgage_insurance = check.optional_amount("mortgageInsurance", raw.mortgage_insurance);

    if let (Some(gross), Some(net)) = (monthly_gross_income, monthly_net_income) {
        if net > gross {
            check.reject(
                "monthlyNetIncome",
                ViolationKind::Inconsistent { reason: "must not exceed monthly gross income" },
            );
        }
    }

    // Every conversion above either produced a value or recorded a violation
    let (
        Some(mortgage_balance),
        Some(mortgage_rate),
        Some(remaining_term_months),
        Some(monthly_payment),
        Some(credit_line_limit),
        Some(credit_line_rate),
        Some(monthly_gross_income),
        Some(monthly_net_income),
        Some(monthly_expenses),
        Some(property_tax),
        Some(insurance),
        Some(hoa),
        Some(mortgage_insurance),
    ) = (
        mortgage_balance,
        mortgage_rate,
        remaining_term_months,
        monthly_payment,
        credit_line_limit,
        credit_line_rate,
        monthly_gross_income,
        monthly_net_income,
        monthly_expenses,
        property_tax,
        insurance,
        hoa,
        mortgage_insurance,
    )
    else {
        debug!("scenario rejected with {} violation(s)", check.violations.len());
        return Err(ValidationError { violations: check.violations }.into());
    };
    if !check.violations.is_empty() {
        debug!("scenario rejected with {} violation(s)", check.violations.len());
        return Err(ValidationError { violations: check.violations }.into());
    }

    let minimum = minimum_payment(mortgage_balance, mortgage_rate, remaining_term_months).ok_or_else(|| {
        ValidationError {
            violations: vec![FieldViolation::new(
                "mortgageBalance",
                ViolationKind::Inconsistent { reason: "required payment is not computable for this loan" },
            )],
        }
    })?;
    if monthly_payment < minimum {
        return Err(EngineError::InsufficientPayment { provided: monthly_payment, minimum });
    }

    let input = ScenarioInput {
        scenario_id: raw.scenario_id.clone(),
        mortgage_balance,
        mortgage_rate,
        remaining_term_months,
        monthly_payment,
        credit_line_limit,
        credit_line_rate,
        monthly_gross_income,
        monthly_net_income,
        monthly_expenses,
        carrying_costs: CarryingCosts { property_tax, insurance, hoa, mortgage_insurance },
        first_payment_date: raw.first_payment_date,
    };

    if input.monthly_discretionary_income().is_negative() {
        warn!(
            "{}: expenses exceed net income by {}",
            input.label(),
            -input.monthly_discretionary_income()
        );
    }

    Ok(input)
}
