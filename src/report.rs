//! CSV output for schedules and batch summaries

use crate::amortization::{AmortizationMonth, SweepMonth};
use crate::engine::PayoffComparison;
use crate::error::EngineError;
use crate::money::Money;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Write the traditional schedule as CSV
pub fn write_traditional_schedule<W: Write>(writer: W, schedule: &[AmortizationMonth]) -> Result<()> {
    write_rows(writer, schedule)
}

/// Write the sweep schedule as CSV
pub fn write_sweep_schedule<W: Write>(writer: W, schedule: &[SweepMonth]) -> Result<()> {
    write_rows(writer, schedule)
}

fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row).context("writing schedule row")?;
    }
    csv_writer.flush().context("flushing schedule")?;
    Ok(())
}

/// Write CSV rows into a file at `path`
pub fn write_to_path<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(std::fs::File) -> Result<()>,
{
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write(file).with_context(|| format!("writing {}", path.display()))
}

/// One scenario's line in a batch summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub scenario_id: String,
    pub status: &'static str,
    pub traditional_payoff_months: Option<u32>,
    pub sweep_payoff_months: Option<u32>,
    pub traditional_interest: Option<Money>,
    pub sweep_interest: Option<Money>,
    pub sweep_credit_line_interest: Option<Money>,
    pub max_credit_line_balance: Option<Money>,
    pub months_saved: Option<u32>,
    pub interest_saved: Option<Money>,
    pub percent_interest_saved: Option<Decimal>,
    pub error: Option<String>,
}

impl SummaryRow {
    pub fn from_outcome(index: usize, outcome: &Result<PayoffComparison, EngineError>) -> Self {
        match outcome {
            Ok(out) => Self {
                scenario_id: out
                    .input
                    .scenario_id
                    .clone()
                    .unwrap_or_else(|| format!("#{}", index + 1)),
                status: "ok",
                traditional_payoff_months: Some(out.traditional.result.payoff_months),
                sweep_payoff_months: Some(out.sweep.result.payoff_months),
                traditional_interest: Some(out.traditional.result.total_interest_paid),
                sweep_interest: Some(out.sweep.result.total_interest_paid),
                sweep_credit_line_interest: Some(out.sweep.result.total_credit_line_interest),
                max_credit_line_balance: Some(out.sweep.result.max_credit_line_balance_used),
                months_saved: Some(out.comparison.months_saved),
                interest_saved: Some(out.comparison.interest_saved),
                percent_interest_saved: Some(out.comparison.percent_interest_saved),
                error: None,
            },
            Err(err) => Self {
                scenario_id: format!("#{}", index + 1),
                status: err.kind(),
                traditional_payoff_months: None,
                sweep_payoff_months: None,
                traditional_interest: None,
                sweep_interest: None,
                sweep_credit_line_interest: None,
                max_credit_line_balance: None,
                months_saved: None,
                interest_saved: None,
                percent_interest_saved: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Write one summary row per batch outcome
pub fn write_batch_summary<W: Write>(
    writer: W,
    ids: &[Option<String>],
    outcomes: &[Result<PayoffComparison, EngineError>],
) -> Result<()> {
    let rows: Vec<SummaryRow> = outcomes
        .iter()
        .enumerate()
        .map(|(index, outcome)| {
            let mut row = SummaryRow::from_outcome(index, outcome);
            if let Some(Some(id)) = ids.get(index) {
                row.scenario_id = id.clone();
            }
            row
        })
        .collect();
    write_rows(writer, &rows)
}
