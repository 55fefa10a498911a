//! Schedule rows and run summaries produced by the simulators

use crate::money::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One month of the traditional schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationMonth {
    /// 1-based month index
    pub month_index: u32,
    pub payment_date: Option<NaiveDate>,
    pub starting_principal_balance: Money,
    pub interest_accrued: Money,
    pub principal_paid: Money,
    /// Interest plus principal
    pub total_payment: Money,
    pub ending_principal_balance: Money,
}

/// One month of the sweep schedule: mortgage and credit line side by side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepMonth {
    pub month_index: u32,
    pub payment_date: Option<NaiveDate>,

    // Mortgage
    pub starting_principal_balance: Money,
    pub interest_accrued: Money,
    /// Principal covered by the scheduled payment
    pub scheduled_principal: Money,
    /// Principal paid from swept cash
    pub extra_principal: Money,
    /// Scheduled + extra principal + credit-line draw
    pub principal_paid: Money,
    /// Interest plus total principal
    pub total_payment: Money,
    pub ending_principal_balance: Money,

    // Credit line
    pub starting_credit_line_balance: Money,
    pub credit_line_interest_accrued: Money,
    pub credit_line_draw: Money,
    pub credit_line_repayment: Money,
    pub ending_credit_line_balance: Money,

    /// Out-of-pocket cash for the month (mortgage outlay, extra principal, line repayment)
    pub cash_applied: Money,
}

impl SweepMonth {
    pub fn is_settled(&self) -> bool {
        self.ending_principal_balance.is_zero() && self.ending_credit_line_balance.is_zero()
    }
}

/// Summary of one converged simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Month in which the last open balance reached zero
    pub payoff_months: u32,
    pub payoff_date: Option<NaiveDate>,
    /// Mortgage plus credit-line interest
    pub total_interest_paid: Money,
    /// All cash paid out; equals initial balance plus total interest
    pub total_paid: Money,
    pub total_mortgage_interest: Money,
    pub total_credit_line_interest: Money,
    pub max_credit_line_balance_used: Money,
    pub average_credit_line_balance: Money,
}

/// Traditional schedule and its summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraditionalRun {
    pub schedule: Vec<AmortizationMonth>,
    pub result: SimulationResult,
}

/// Sweep schedule and its summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepRun {
    pub schedule: Vec<SweepMonth>,
    pub result: SimulationResult,
}

impl SweepRun {
    /// First month the mortgage itself was cleared
    pub fn mortgage_payoff_month(&self) -> Option<u32> {
        self.schedule
            .iter()
            .find(|m| m.ending_principal_balance.is_zero())
            .map(|m| m.month_index)
    }

    pub fn total_drawn(&self) -> Money {
        self.schedule.iter().map(|m| m.credit_line_draw).sum()
    }
}
