//! Savings metrics derived from a traditional and a sweep run

use crate::amortization::SimulationResult;
use crate::money::Money;
use crate::scenario::ScenarioInput;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Months saved by the sweep strategy, floored at zero
    pub months_saved: u32,
    /// Traditional minus sweep interest; negative when the sweep costs more
    pub interest_saved: Money,
    /// `interest_saved` as a percentage of traditional interest, two decimals
    pub percent_interest_saved: Decimal,
    /// Extra monthly outlay the sweep strategy commits (the swept surplus)
    pub monthly_payment_difference: Money,
}

/// Compare two converged runs of the same scenario
pub fn compare(
    traditional: &SimulationResult,
    sweep: &SimulationResult,
    input: &ScenarioInput,
) -> ComparisonResult {
    let months_saved = traditional.payoff_months.saturating_sub(sweep.payoff_months);
    let interest_saved = traditional.total_interest_paid - sweep.total_interest_paid;

    let percent_interest_saved = if traditional.total_interest_paid.is_zero() {
        Decimal::ZERO
    } else {
        (Decimal::from(interest_saved.cents()) * Decimal::ONE_HUNDRED
            / Decimal::from(traditional.total_interest_paid.cents()))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
    };

    let traditional_outlay = input.monthly_payment;
    let sweep_outlay = input.monthly_payment + input.monthly_surplus();

    ComparisonResult {
        months_saved,
        interest_saved,
        percent_interest_saved,
        monthly_payment_difference: sweep_outlay - traditional_outlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Rate;
    use crate::scenario::CarryingCosts;
    use rust_decimal_macros::dec;

    fn result(months: u32, interest_cents: i64) -> SimulationResult {
        SimulationResult {
            payoff_months: months,
            payoff_date: None,
            total_interest_paid: Money::from_cents(interest_cents),
            total_paid: Money::from_cents(interest_cents + 10_000_000),
            total_mortgage_interest: Money::from_cents(interest_cents),
            total_credit_line_interest: Money::ZERO,
            max_credit_line_balance_used: Money::ZERO,
            average_credit_line_balance: Money::ZERO,
        }
    }

    fn input(surplus_cents: i64) -> ScenarioInput {
        ScenarioInput {
            scenario_id: None,
            mortgage_balance: Money::from_cents(10_000_000),
            mortgage_rate: Rate::from_percent(dec!(5)),
            remaining_term_months: 360,
            monthly_payment: Money::from_cents(53_682),
            credit_line_limit: Money::ZERO,
            credit_line_rate: Rate::ZERO,
            monthly_gross_income: Money::from_cents(600_000),
            monthly_net_income: Money::from_cents(500_000),
            monthly_expenses: Money::from_cents(500_000 - surplus_cents),
            carrying_costs: CarryingCosts::default(),
            first_payment_date: None,
        }
    }

    #[test]
    fn test_savings_metrics() {
        let cmp = compare(&result(360, 9_325_000), &result(200, 4_662_500), &input(50_000));
        assert_eq!(cmp.months_saved, 160);
        assert_eq!(cmp.interest_saved, Money::from_cents(4_662_500));
        assert_eq!(cmp.percent_interest_saved, dec!(50.00));
        assert_eq!(cmp.monthly_payment_difference, Money::from_cents(50_000));
    }

    #[test]
    fn test_worse_sweep_clamps_months_but_not_interest() {
        let cmp = compare(&result(300, 1_000_000), &result(310, 1_100_000), &input(10_000));
        assert_eq!(cmp.months_saved, 0);
        assert_eq!(cmp.interest_saved, Money::from_cents(-100_000));
        assert_eq!(cmp.percent_interest_saved, dec!(-10.00));
    }

    #[test]
    fn test_zero_traditional_interest() {
        let cmp = compare(&result(120, 0), &result(100, 0), &input(0));
        assert_eq!(cmp.percent_interest_saved, Decimal::ZERO);
        assert_eq!(cmp.monthly_payment_difference, Money::ZERO);
    }

    #[test]
    fn test_negative_discretionary_adds_no_outlay() {
        let cmp = compare(&result(360, 100), &result(360, 100), &input(-20_000));
        assert_eq!(cmp.monthly_payment_difference, Money::ZERO);
        assert_eq!(cmp.months_saved, 0);
        assert_eq!(cmp.percent_interest_saved, dec!(0));
    }
}
