//! Scenario input: raw records, loading, and normalization

mod data;
mod loader;
mod normalize;

pub use data::{CarryingCosts, RawScenario, ScenarioInput};
pub use loader::{load_scenario_json, load_scenarios, load_scenarios_from_reader};
pub use normalize::{normalize, MAX_AMOUNT, MAX_RATE_PERCENT};
