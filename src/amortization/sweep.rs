//! Dual-balance sweep simulation: mortgage plus revolving credit line
//!
//! Each month runs in a fixed order:
//!
//! 1. Accrue mortgage and credit-line interest on the opening balances, each
//!    at its own monthly rate. Credit-line interest capitalizes onto the line.
//! 2. Apply the scheduled mortgage payment exactly as the traditional schedule
//!    would.
//! 3. Form the cash pool: the month's surplus (discretionary income floored at
//!    zero), plus any part of the scheduled payment the mortgage no longer
//!    needs when [`SweepPolicy::redirect_freed_payment`] is set.
//! 4. Allocate the pool between credit-line repayment and extra principal in
//!    the order given by [`SurplusAllocation`].
//! 5. Apply the [`DrawRule`]: a draw moves credit-line money onto mortgage
//!    principal.
//!
//! The run ends the month both balances are zero. A run that hits the
//! iteration ceiling, or whose credit-line balance overflows, is reported as
//! non-converged together with the months produced so far.

use super::schedule::{SweepMonth, SweepRun};
use super::state::SimulationState;
use super::traditional::split_scheduled_payment;
use crate::error::{EngineError, NonConvergence, StopReason};
use crate::money::Money;
use crate::scenario::ScenarioInput;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

/// Which balance swept cash pays down first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurplusAllocation {
    /// Repay the credit line, then prepay mortgage principal
    #[default]
    CreditLineFirst,
    /// Prepay mortgage principal, then repay the credit line
    MortgageFirst,
}

/// When the credit line is drawn against the mortgage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DrawRule {
    /// The line is never drawn; surplus only prepays
    Never,
    /// Once the line is back to zero, draw a chunk onto mortgage principal.
    /// `chunk = None` draws the full available limit.
    WhenLineCleared {
        #[serde(default)]
        chunk: Option<Money>,
    },
}

impl Default for DrawRule {
    fn default() -> Self {
        DrawRule::WhenLineCleared { chunk: None }
    }
}

/// Cash allocation policy for the sweep strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepPolicy {
    pub allocation: SurplusAllocation,
    pub draw: DrawRule,
    /// Route the unneeded part of the scheduled payment into the pool
    pub redirect_freed_payment: bool,
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self {
            allocation: SurplusAllocation::CreditLineFirst,
            draw: DrawRule::default(),
            redirect_freed_payment: true,
        }
    }
}

impl SweepPolicy {
    /// Surplus prepays the mortgage; the line stays unused
    pub fn prepay_only() -> Self {
        Self {
            draw: DrawRule::Never,
            ..Self::default()
        }
    }

    /// Draw at most `chunk` at a time
    pub fn chunked(chunk: Money) -> Self {
        Self {
            draw: DrawRule::WhenLineCleared { chunk: Some(chunk) },
            ..Self::default()
        }
    }

    fn draw_amount(&self, state: &SimulationState, limit: Money, surplus: Money) -> Money {
        let chunk = match self.draw {
            DrawRule::Never => return Money::ZERO,
            DrawRule::WhenLineCleared { chunk } => chunk.unwrap_or(limit),
        };
        if !surplus.is_positive()
            || state.mortgage_balance.is_zero()
            || !state.credit_line_balance.is_zero()
        {
            return Money::ZERO;
        }
        let available = (limit - state.credit_line_balance).non_negative();
        chunk.non_negative().min(available).min(state.mortgage_balance)
    }
}

/// Bounds and policy for one sweep run
#[derive(Debug, Clone, Copy)]
pub struct SweepLimits {
    pub policy: SweepPolicy,
    /// Maximum number of simulated months
    pub ceiling: u32,
}

/// Run the sweep strategy to payoff.
///
/// Fails with [`EngineError::DidNotConverge`] when the balances are still
/// open at `limits.ceiling` or the credit line outgrows the money range.
pub fn simulate_sweep(input: &ScenarioInput, limits: SweepLimits) -> Result<SweepRun, EngineError> {
    let policy = limits.policy;
    let mortgage_rate = input.mortgage_rate.monthly();
    let credit_rate = input.credit_line_rate.monthly();
    let term = input.remaining_term_months;
    let surplus = input.monthly_surplus();
    let limit = input.credit_line_limit;

    if input.monthly_discretionary_income().is_negative() {
        warn!(
            "{}: discretionary income {} is negative; nothing is swept",
            input.label(),
            input.monthly_discretionary_income()
        );
    }
    debug!(
        "sweep run for {}: surplus {} per month, line {} at {}, policy {:?}",
        input.label(),
        surplus,
        limit,
        input.credit_line_rate,
        policy
    );

    let mut state = SimulationState::from_input(input);
    let mut schedule: Vec<SweepMonth> = Vec::with_capacity(term as usize);

    while !state.is_settled() {
        if state.month >= limits.ceiling {
            return Err(not_converged(&state, limits.ceiling, StopReason::CeilingReached, schedule));
        }
        let month = state.month + 1;
        let starting_principal = state.mortgage_balance;
        let starting_line = state.credit_line_balance;

        // 1. interest on opening balances
        let line_interest = match credit_rate
            .checked_interest_on(starting_line)
            .and_then(|interest| starting_line.checked_add(interest).map(|balance| (interest, balance)))
        {
            Some((interest, balance)) => {
                state.credit_line_balance = balance;
                interest
            }
            None => {
                return Err(not_converged(&state, limits.ceiling, StopReason::BalanceOverflow, schedule));
            }
        };

        // 2. scheduled mortgage payment
        let split = if starting_principal.is_zero() {
            None
        } else {
            Some(split_scheduled_payment(
                starting_principal,
                mortgage_rate,
                input.monthly_payment,
                month,
                term,
            ))
        };
        let (mortgage_interest, scheduled_principal, mortgage_outlay) = match split {
            Some(split) => (split.interest, split.principal, split.outlay()),
            None => (Money::ZERO, Money::ZERO, Money::ZERO),
        };
        state.mortgage_balance = starting_principal - scheduled_principal;

        // 3. cash pool
        let freed = if policy.redirect_freed_payment {
            (input.monthly_payment - mortgage_outlay).non_negative()
        } else {
            Money::ZERO
        };
        let mut pool = surplus + freed;

        // 4. allocation
        let (repayment, extra_principal) = match policy.allocation {
            SurplusAllocation::CreditLineFirst => {
                let repayment = pool.min(state.credit_line_balance);
                pool -= repayment;
                let extra = pool.min(state.mortgage_balance);
                (repayment, extra)
            }
            SurplusAllocation::MortgageFirst => {
                let extra = pool.min(state.mortgage_balance);
                pool -= extra;
                let repayment = pool.min(state.credit_line_balance);
                (repayment, extra)
            }
        };
        state.credit_line_balance -= repayment;
        state.mortgage_balance -= extra_principal;

        // 5. draw
        let draw = policy.draw_amount(&state, limit, surplus);
        if draw.is_positive() {
            trace!("{}: month {} draws {} onto principal", input.label(), month, draw);
            state.credit_line_balance += draw;
            state.mortgage_balance -= draw;
        }

        state.advance_month();
        state.total_mortgage_interest += mortgage_interest;
        state.total_credit_line_interest = state.total_credit_line_interest.saturating_add(line_interest);
        let cash_applied = mortgage_outlay + extra_principal + repayment;
        state.total_cash_paid = state.total_cash_paid.saturating_add(cash_applied);
        state.record_credit_line_balance();

        let principal_paid = scheduled_principal + extra_principal + draw;
        schedule.push(SweepMonth {
            month_index: month,
            payment_date: input.payment_date(month),
            starting_principal_balance: starting_principal,
            interest_accrued: mortgage_interest,
            scheduled_principal,
            extra_principal,
            principal_paid,
            total_payment: mortgage_interest + principal_paid,
            ending_principal_balance: state.mortgage_balance,
            starting_credit_line_balance: starting_line,
            credit_line_interest_accrued: line_interest,
            credit_line_draw: draw,
            credit_line_repayment: repayment,
            ending_credit_line_balance: state.credit_line_balance,
            cash_applied,
        });
    }

    let result = state.to_result(input);
    debug!(
        "sweep run for {} settled in {} months, interest {} (line peak {})",
        input.label(),
        result.payoff_months,
        result.total_interest_paid,
        result.max_credit_line_balance_used
    );

    Ok(SweepRun { schedule, result })
}

fn not_converged(
    state: &SimulationState,
    ceiling: u32,
    reason: StopReason,
    partial_schedule: Vec<SweepMonth>,
) -> EngineError {
    warn!(
        "sweep run stopped after {} months ({:?}): mortgage {}, credit line {}",
        state.month, reason, state.mortgage_balance, state.credit_line_balance
    );
    EngineError::DidNotConverge(Box::new(NonConvergence {
        months_simulated: state.month,
        ceiling,
        reason,
        final_mortgage_balance: state.mortgage_balance,
        final_credit_line_balance: state.credit_line_balance,
        partial_schedule,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::{minimum_payment, simulate_traditional};
    use crate::money::Rate;
    use crate::scenario::CarryingCosts;
    use rust_decimal_macros::dec;

    /// 300,000 @ 6.5% / 360 with a 20,000 line at 8%
    fn reference(surplus_cents: i64) -> ScenarioInput {
        ScenarioInput {
            scenario_id: Some("reference".to_string()),
            mortgage_balance: Money::from_cents(30_000_000),
            mortgage_rate: Rate::from_percent(dec!(6.5)),
            remaining_term_months: 360,
            monthly_payment: Money::from_cents(189_620),
            credit_line_limit: Money::from_cents(2_000_000),
            credit_line_rate: Rate::from_percent(dec!(8)),
            monthly_gross_income: Money::from_cents(1_200_000),
            monthly_net_income: Money::from_cents(900_000),
            monthly_expenses: Money::from_cents(900_000 - surplus_cents),
            carrying_costs: CarryingCosts::default(),
            first_payment_date: None,
        }
    }

    fn limits(policy: SweepPolicy) -> SweepLimits {
        SweepLimits { policy, ceiling: 720 }
    }

    #[test]
    fn test_zero_surplus_matches_traditional() {
        let input = reference(0);
        let traditional = simulate_traditional(&input);
        let sweep = simulate_sweep(&input, limits(SweepPolicy::default())).unwrap();

        assert_eq!(sweep.result.payoff_months, traditional.result.payoff_months);
        assert_eq!(sweep.result.total_interest_paid, traditional.result.total_interest_paid);
        assert_eq!(sweep.result.total_paid, traditional.result.total_paid);
        assert_eq!(sweep.result.max_credit_line_balance_used, Money::ZERO);
        assert_eq!(sweep.total_drawn(), Money::ZERO);
        for (s, t) in sweep.schedule.iter().zip(&traditional.schedule) {
            assert_eq!(s.ending_principal_balance, t.ending_principal_balance);
        }
    }

    #[test]
    fn test_negative_discretionary_is_treated_as_zero() {
        let input = reference(-50_000);
        let traditional = simulate_traditional(&input);
        let sweep = simulate_sweep(&input, limits(SweepPolicy::default())).unwrap();
        assert_eq!(sweep.result.payoff_months, traditional.result.payoff_months);
        assert_eq!(sweep.result.total_interest_paid, traditional.result.total_interest_paid);
    }

    #[test]
    fn test_surplus_with_line_accelerates_payoff() {
        let input = reference(100_000);
        let traditional = simulate_traditional(&input);
        let sweep = simulate_sweep(&input, limits(SweepPolicy::default())).unwrap();

        assert!(sweep.result.payoff_months < traditional.result.payoff_months);
        assert!(sweep.result.total_interest_paid < traditional.result.total_interest_paid);
        assert_eq!(sweep.result.max_credit_line_balance_used, Money::from_cents(2_000_000));
        assert!(sweep.result.total_credit_line_interest.is_positive());

        // First month: full limit drawn onto principal after the scheduled payment
        let first = &sweep.schedule[0];
        assert_eq!(first.credit_line_draw, Money::from_cents(2_000_000));
        assert_eq!(first.extra_principal, Money::from_cents(100_000));
        assert_eq!(
            first.ending_principal_balance,
            Money::from_cents(30_000_000 - 27_120 - 100_000 - 2_000_000)
        );
    }

    #[test]
    fn test_prepay_only_never_touches_line() {
        let input = reference(100_000);
        let sweep = simulate_sweep(&input, limits(SweepPolicy::prepay_only())).unwrap();
        assert_eq!(sweep.result.total_credit_line_interest, Money::ZERO);
        assert_eq!(sweep.result.average_credit_line_balance, Money::ZERO);
        assert!(sweep.result.payoff_months < 360);
    }

    #[test]
    fn test_chunk_caps_each_draw() {
        let input = reference(100_000);
        let sweep = simulate_sweep(&input, limits(SweepPolicy::chunked(Money::from_cents(500_000)))).unwrap();
        assert!(sweep.schedule.iter().all(|m| m.credit_line_draw <= Money::from_cents(500_000)));
        assert_eq!(sweep.result.max_credit_line_balance_used, Money::from_cents(500_000));
    }

    #[test]
    fn test_zero_limit_behaves_like_prepay_only() {
        let mut input = reference(100_000);
        input.credit_line_limit = Money::ZERO;
        let default_policy = simulate_sweep(&input, limits(SweepPolicy::default())).unwrap();
        let prepay = simulate_sweep(&input, limits(SweepPolicy::prepay_only())).unwrap();
        assert_eq!(default_policy, prepay);
    }

    #[test]
    fn test_mortgage_first_still_settles_both_balances() {
        let input = reference(100_000);
        let policy = SweepPolicy {
            allocation: SurplusAllocation::MortgageFirst,
            ..SweepPolicy::default()
        };
        let sweep = simulate_sweep(&input, limits(policy)).unwrap();
        assert!(sweep.schedule.last().unwrap().is_settled());
        assert!(sweep.result.payoff_months < 360);
    }

    #[test]
    fn test_row_invariants_and_conservation() {
        let input = reference(100_000);
        let sweep = simulate_sweep(&input, limits(SweepPolicy::default())).unwrap();
        for row in &sweep.schedule {
            assert_eq!(row.ending_principal_balance, row.starting_principal_balance - row.principal_paid);
            assert_eq!(
                row.ending_credit_line_balance,
                row.starting_credit_line_balance + row.credit_line_interest_accrued + row.credit_line_draw
                    - row.credit_line_repayment
            );
            assert!(row.ending_principal_balance <= row.starting_principal_balance);
        }
        assert_eq!(
            sweep.result.total_paid,
            input.mortgage_balance + sweep.result.total_interest_paid
        );
        assert_eq!(
            sweep.result.total_interest_paid,
            sweep.result.total_mortgage_interest + sweep.result.total_credit_line_interest
        );
    }

    #[test]
    fn test_payoff_month_is_the_later_balance() {
        let input = reference(100_000);
        let sweep = simulate_sweep(&input, limits(SweepPolicy::default())).unwrap();
        let mortgage_done = sweep.mortgage_payoff_month().unwrap();
        assert!(mortgage_done <= sweep.result.payoff_months);
        assert_eq!(sweep.schedule.len() as u32, sweep.result.payoff_months);
    }

    #[test]
    fn test_expensive_line_does_not_converge() {
        // 60% line: a month of line interest dwarfs the 100.00 surplus
        let input = ScenarioInput {
            mortgage_balance: Money::from_cents(10_000_000),
            mortgage_rate: Rate::from_percent(dec!(5)),
            remaining_term_months: 360,
            monthly_payment: Money::from_cents(53_682),
            credit_line_limit: Money::from_cents(5_000_000),
            credit_line_rate: Rate::from_percent(dec!(60)),
            monthly_net_income: Money::from_cents(500_000),
            monthly_expenses: Money::from_cents(490_000),
            ..reference(0)
        };
        let err = simulate_sweep(&input, limits(SweepPolicy::default())).unwrap_err();
        match err {
            EngineError::DidNotConverge(details) => {
                assert!(!details.partial_schedule.is_empty());
                assert!(details.months_simulated <= 720);
                assert_eq!(details.partial_schedule.len() as u32, details.months_simulated);
                assert!(details.final_credit_line_balance.is_positive());
            }
            other => panic!("expected non-convergence, got {:?}", other),
        }
    }

    #[test]
    fn test_runaway_line_stops_on_overflow() {
        // A 1e12 mortgage swept onto a 100% line that 1.00 a month cannot service
        let balance = Money::from_cents(100_000_000_000_000);
        let input = ScenarioInput {
            mortgage_balance: balance,
            monthly_payment: minimum_payment(balance, Rate::from_percent(dec!(6.5)), 360).unwrap(),
            credit_line_limit: balance,
            credit_line_rate: Rate::from_percent(dec!(100)),
            ..reference(100)
        };
        let err = simulate_sweep(&input, limits(SweepPolicy::default())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "sweep simulation did not converge: credit-line balance overflowed in month 145"
        );
        match err {
            EngineError::DidNotConverge(details) => {
                assert_eq!(details.reason, StopReason::BalanceOverflow);
                assert_eq!(details.months_simulated, 144);
                assert_eq!(details.partial_schedule.len(), 144);
                assert_eq!(details.final_mortgage_balance, Money::ZERO);
                assert!(details.final_credit_line_balance > Money::from_cents(8_000_000_000_000_000_000));
            }
            other => panic!("expected non-convergence, got {:?}", other),
        }
    }

    #[test]
    fn test_ceiling_is_enforced() {
        let input = reference(0);
        let err = simulate_sweep(&input, SweepLimits { policy: SweepPolicy::default(), ceiling: 12 }).unwrap_err();
        match err {
            EngineError::DidNotConverge(details) => {
                assert_eq!(details.reason, StopReason::CeilingReached);
                assert_eq!(details.months_simulated, 12);
                assert_eq!(details.ceiling, 12);
            }
            other => panic!("expected non-convergence, got {:?}", other),
        }
    }

    #[test]
    fn test_policy_from_json() {
        let policy: SweepPolicy = serde_json::from_str(
            r#"{"allocation": "mortgage_first", "draw": {"rule": "when_line_cleared", "chunk": 5000}}"#,
        )
        .unwrap();
        assert_eq!(policy.allocation, SurplusAllocation::MortgageFirst);
        assert_eq!(policy.draw, DrawRule::WhenLineCleared { chunk: Some(Money::from_cents(500_000)) });
        assert!(policy.redirect_freed_payment);
    }
}
