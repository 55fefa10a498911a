//! Named failure conditions surfaced by the engine

use crate::amortization::SweepMonth;
use crate::money::Money;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Top-level engine error
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid scenario: {0}")]
    Validation(ValidationError),

    #[error("monthly payment {provided} cannot amortize the balance within the term; minimum required payment is {minimum}")]
    InsufficientPayment { provided: Money, minimum: Money },

    #[error("sweep simulation did not converge: {0}")]
    DidNotConverge(Box<NonConvergence>),
}

impl EngineError {
    /// True for failures detected before any simulation ran
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_) | EngineError::InsufficientPayment { .. }
        )
    }

    /// Short machine-friendly tag for reports
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "validation",
            EngineError::InsufficientPayment { .. } => "insufficient_payment",
            EngineError::DidNotConverge(_) => "did_not_converge",
        }
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Validation(err)
    }
}

/// Every field-level violation found in one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.violations.iter().map(|v| v.field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    /// Field name as it appears in the raw scenario (camelCase)
    pub field: &'static str,
    pub kind: ViolationKind,
}

impl FieldViolation {
    pub fn new(field: &'static str, kind: ViolationKind) -> Self {
        Self { field, kind }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    Negative,
    NotPositive,
    NotWholeNumber,
    OutOfRange { min: String, max: String },
    TooLarge { max: String },
    Inconsistent { reason: &'static str },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Missing => write!(f, "is required"),
            ViolationKind::Negative => write!(f, "must not be negative"),
            ViolationKind::NotPositive => write!(f, "must be greater than zero"),
            ViolationKind::NotWholeNumber => write!(f, "must be a whole number"),
            ViolationKind::OutOfRange { min, max } => write!(f, "must be between {} and {}", min, max),
            ViolationKind::TooLarge { max } => write!(f, "must not exceed {}", max),
            ViolationKind::Inconsistent { reason } => write!(f, "{}", reason),
        }
    }
}

/// Why a sweep run stopped without both balances reaching zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Iteration ceiling reached
    CeilingReached,
    /// Credit-line interest grew past the representable range
    BalanceOverflow,
}

/// Diagnostic payload of a non-converged sweep run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NonConvergence {
    pub months_simulated: u32,
    pub ceiling: u32,
    pub reason: StopReason,
    pub final_mortgage_balance: Money,
    pub final_credit_line_balance: Money,
    /// Months produced before the run stopped
    pub partial_schedule: Vec<SweepMonth>,
}

impl fmt::Display for NonConvergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            StopReason::CeilingReached => write!(
                f,
                "balances still open after {} months (ceiling {}): mortgage {}, credit line {}",
                self.months_simulated,
                self.ceiling,
                self.final_mortgage_balance,
                self.final_credit_line_balance
            ),
            StopReason::BalanceOverflow => write!(
                f,
                "credit-line balance overflowed in month {}",
                self.months_simulated + 1
            ),
        }
    }
}
