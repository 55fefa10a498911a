//! Running balances and aggregates carried from month to month

use super::schedule::SimulationResult;
use crate::money::Money;
use crate::scenario::ScenarioInput;

/// State of a simulation between months
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Last completed month (0 before the first month)
    pub month: u32,

    /// Outstanding mortgage principal
    pub mortgage_balance: Money,

    /// Outstanding credit-line balance
    pub credit_line_balance: Money,

    pub total_mortgage_interest: Money,
    pub total_credit_line_interest: Money,

    /// All out-of-pocket cash applied so far
    pub total_cash_paid: Money,

    pub max_credit_line_balance: Money,

    /// Sum of month-end credit-line balances, for the running mean
    credit_line_balance_sum: i128,
}

impl SimulationState {
    pub fn from_input(input: &ScenarioInput) -> Self {
        Self {
            month: 0,
            mortgage_balance: input.mortgage_balance,
            credit_line_balance: Money::ZERO,
            total_mortgage_interest: Money::ZERO,
            total_credit_line_interest: Money::ZERO,
            total_cash_paid: Money::ZERO,
            max_credit_line_balance: Money::ZERO,
            credit_line_balance_sum: 0,
        }
    }

    pub fn advance_month(&mut self) -> u32 {
        self.month += 1;
        self.month
    }

    pub fn is_settled(&self) -> bool {
        self.mortgage_balance.is_zero() && self.credit_line_balance.is_zero()
    }

    /// Fold the month-end credit-line balance into the max and mean
    pub fn record_credit_line_balance(&mut self) {
        self.max_credit_line_balance = self.max_credit_line_balance.max(self.credit_line_balance);
        self.credit_line_balance_sum += i128::from(self.credit_line_balance.cents());
    }

    pub fn average_credit_line_balance(&self) -> Money {
        Money::mean(self.credit_line_balance_sum, self.month as usize)
    }

    pub fn total_interest(&self) -> Money {
        self.total_mortgage_interest.saturating_add(self.total_credit_line_interest)
    }

    /// Summary for a run that finished in the current month
    pub fn to_result(&self, input: &ScenarioInput) -> SimulationResult {
        SimulationResult {
            payoff_months: self.month,
            payoff_date: input.payment_date(self.month),
            total_interest_paid: self.total_interest(),
            total_paid: self.total_cash_paid,
            total_mortgage_interest: self.total_mortgage_interest,
            total_credit_line_interest: self.total_credit_line_interest,
            max_credit_line_balance_used: self.max_credit_line_balance,
            average_credit_line_balance: self.average_credit_line_balance(),
        }
    }
}
