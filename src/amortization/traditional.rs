//! Baseline fixed-payment amortization

use super::schedule::{AmortizationMonth, TraditionalRun};
use super::state::SimulationState;
use crate::money::{Money, MonthlyRate};
use crate::scenario::ScenarioInput;
use log::debug;

/// Interest and principal covered by one scheduled payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScheduledSplit {
    pub interest: Money,
    pub principal: Money,
}

impl ScheduledSplit {
    pub fn outlay(&self) -> Money {
        self.interest + self.principal
    }
}

/// Apply the scheduled payment to `balance` for `month`.
///
/// Principal is clamped to the remaining balance. In the final month of the
/// term the whole remaining balance is retired, absorbing the cent rounding of
/// the stated payment.
pub(crate) fn split_scheduled_payment(
    balance: Money,
    monthly_rate: MonthlyRate,
    payment: Money,
    month: u32,
    term_months: u32,
) -> ScheduledSplit {
    let interest = monthly_rate.interest_on(balance);
    let mut principal = (payment - interest).non_negative();
    if principal >= balance || month >= term_months {
        principal = balance;
    }
    ScheduledSplit { interest, principal }
}

/// Run the unmodified loan to payoff
pub fn simulate_traditional(input: &ScenarioInput) -> TraditionalRun {
    let monthly_rate = input.mortgage_rate.monthly();
    let term = input.remaining_term_months;
    let mut state = SimulationState::from_input(input);
    let mut schedule = Vec::with_capacity(term as usize);

    debug!(
        "traditional run for {}: balance {} at {} over {} months",
        input.label(),
        input.mortgage_balance,
        input.mortgage_rate,
        term
    );

    while !state.mortgage_balance.is_zero() && state.month < term {
        let month = state.advance_month();
        let starting = state.mortgage_balance;
        let split = split_scheduled_payment(starting, monthly_rate, input.monthly_payment, month, term);

        state.mortgage_balance = starting - split.principal;
        state.total_mortgage_interest += split.interest;
        state.total_cash_paid += split.outlay();
        state.record_credit_line_balance();

        schedule.push(AmortizationMonth {
            month_index: month,
            payment_date: input.payment_date(month),
            starting_principal_balance: starting,
            interest_accrued: split.interest,
            principal_paid: split.principal,
            total_payment: split.outlay(),
            ending_principal_balance: state.mortgage_balance,
        });
    }

    let result = state.to_result(input);
    debug!(
        "traditional run for {} paid off in {} months, interest {}",
        input.label(),
        result.payoff_months,
        result.total_interest_paid
    );

    TraditionalRun { schedule, result }
}
