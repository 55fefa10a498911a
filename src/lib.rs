//! Payoff Engine - Deterministic mortgage payoff comparison
//!
//! This library provides:
//! - Scenario normalization with per-field validation
//! - Traditional fixed-payment amortization
//! - HELOC sweep simulation over a mortgage and a revolving credit line
//! - Savings comparison between the two strategies
//! - Parallel batch runs and CSV reporting

pub mod money;
pub mod error;
pub mod scenario;
pub mod amortization;
pub mod compare;
pub mod engine;
pub mod report;

// Re-export commonly used types
pub use money::{Money, Rate};
pub use error::{EngineError, ValidationError};
pub use scenario::{RawScenario, ScenarioInput};
pub use amortization::{SimulationResult, SweepPolicy, SweepRun, TraditionalRun};
pub use compare::ComparisonResult;
pub use engine::{EngineConfig, PayoffComparison, PayoffEngine};
