//! Scenario records: raw caller input and the normalized engine input

use crate::money::{Money, Rate};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Scenario fields as supplied by a form, CSV row or JSON body.
///
/// Percentages are whole numbers (6.5 means 6.5%), currency is in decimal
/// units and the term is in months. Every numeric field is optional so that
/// a missing value is reported rather than defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawScenario {
    pub scenario_id: Option<String>,

    // Mortgage
    pub mortgage_balance: Option<Decimal>,
    pub mortgage_annual_rate: Option<Decimal>,
    pub remaining_term_months: Option<Decimal>,
    pub monthly_payment: Option<Decimal>,

    // Revolving credit line
    pub credit_line_limit: Option<Decimal>,
    pub credit_line_annual_rate: Option<Decimal>,

    // Household cash flow
    pub monthly_gross_income: Option<Decimal>,
    pub monthly_net_income: Option<Decimal>,
    pub monthly_expenses: Option<Decimal>,

    // Carrying costs (informational)
    pub property_tax: Option<Decimal>,
    pub insurance: Option<Decimal>,
    pub hoa: Option<Decimal>,
    pub mortgage_insurance: Option<Decimal>,

    pub first_payment_date: Option<NaiveDate>,
}

/// Monthly property carrying costs. Not part of the amortization mechanics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarryingCosts {
    pub property_tax: Money,
    pub insurance: Money,
    pub hoa: Money,
    pub mortgage_insurance: Money,
}

impl CarryingCosts {
    pub fn total(&self) -> Money {
        self.property_tax + self.insurance + self.hoa + self.mortgage_insurance
    }
}

/// Validated scenario in computation units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInput {
    pub scenario_id: Option<String>,

    pub mortgage_balance: Money,
    pub mortgage_rate: Rate,
    pub remaining_term_months: u32,
    pub monthly_payment: Money,

    pub credit_line_limit: Money,
    pub credit_line_rate: Rate,

    pub monthly_gross_income: Money,
    pub monthly_net_income: Money,
    pub monthly_expenses: Money,

    pub carrying_costs: CarryingCosts,

    pub first_payment_date: Option<NaiveDate>,
}

impl ScenarioInput {
    /// Net income minus fixed expenses; may be zero or negative
    pub fn monthly_discretionary_income(&self) -> Money {
        self.monthly_net_income - self.monthly_expenses
    }

    /// Cash the sweep strategy puts to work each month
    pub fn monthly_surplus(&self) -> Money {
        self.monthly_discretionary_income().non_negative()
    }

    /// Scheduled payment plus carrying costs
    pub fn monthly_housing_cost(&self) -> Money {
        self.monthly_payment + self.carrying_costs.total()
    }

    /// Calendar date of the payment made in `month_index` (1-based)
    pub fn payment_date(&self, month_index: u32) -> Option<NaiveDate> {
        let first = self.first_payment_date?;
        first.checked_add_months(chrono::Months::new(month_index.saturating_sub(1)))
    }

    pub fn label(&self) -> &str {
        self.scenario_id.as_deref().unwrap_or("scenario")
    }
}
