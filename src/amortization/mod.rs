//! Amortization simulators for the traditional and sweep strategies

mod annuity;
mod schedule;
mod state;
mod sweep;
mod traditional;

pub use annuity::{final_payment, final_payment_limit, level_payment, minimum_payment, FINAL_PAYMENT_TOLERANCE_PERCENT};
pub use schedule::{AmortizationMonth, SimulationResult, SweepMonth, SweepRun, TraditionalRun};
pub use state::SimulationState;
pub use sweep::{simulate_sweep, DrawRule, SurplusAllocation, SweepLimits, SweepPolicy};
pub use traditional::simulate_traditional;
