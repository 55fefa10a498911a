//! Payoff comparison CLI
//!
//! Runs one scenario through both strategies and prints the comparison

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser};
use payoff_engine::report::{write_sweep_schedule, write_to_path, write_traditional_schedule};
use payoff_engine::scenario::load_scenario_json;
use payoff_engine::{EngineConfig, PayoffComparison, PayoffEngine, RawScenario};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "payoff_compare", version, about = "Compare traditional mortgage payoff with a HELOC sweep")]
struct Cli {
    /// Scenario JSON file; flags below override its fields
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Engine config JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    fields: ScenarioArgs,

    /// Write the traditional schedule to this CSV file
    #[arg(long)]
    traditional_csv: Option<PathBuf>,

    /// Write the sweep schedule to this CSV file
    #[arg(long)]
    sweep_csv: Option<PathBuf>,

    /// Print the full comparison as JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Months of each schedule shown in the summary
    #[arg(long, default_value_t = 12)]
    preview_months: usize,
}

#[derive(Debug, Args)]
struct ScenarioArgs {
    #[arg(long)]
    id: Option<String>,
    /// Mortgage balance
    #[arg(long)]
    balance: Option<Decimal>,
    /// Mortgage annual rate, percent
    #[arg(long)]
    rate: Option<Decimal>,
    /// Remaining term in months
    #[arg(long)]
    term: Option<Decimal>,
    /// Scheduled monthly payment
    #[arg(long)]
    payment: Option<Decimal>,
    #[arg(long)]
    credit_limit: Option<Decimal>,
    /// Credit-line annual rate, percent
    #[arg(long)]
    credit_rate: Option<Decimal>,
    #[arg(long)]
    gross_income: Option<Decimal>,
    #[arg(long)]
    net_income: Option<Decimal>,
    /// Fixed monthly expenses, including the mortgage payment
    #[arg(long)]
    expenses: Option<Decimal>,
    #[arg(long)]
    property_tax: Option<Decimal>,
    #[arg(long)]
    insurance: Option<Decimal>,
    #[arg(long)]
    hoa: Option<Decimal>,
    #[arg(long)]
    mortgage_insurance: Option<Decimal>,
    /// Date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    first_payment: Option<NaiveDate>,
}

impl ScenarioArgs {
    fn apply(self, raw: &mut RawScenario) {
        fn set<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }
        set(&mut raw.scenario_id, self.id);
        set(&mut raw.mortgage_balance, self.balance);
        set(&mut raw.mortgage_annual_rate, self.rate);
        set(&mut raw.remaining_term_months, self.term);
        set(&mut raw.monthly_payment, self.payment);
        set(&mut raw.credit_line_limit, self.credit_limit);
        set(&mut raw.credit_line_annual_rate, self.credit_rate);
        set(&mut raw.monthly_gross_income, self.gross_income);
        set(&mut raw.monthly_net_income, self.net_income);
        set(&mut raw.monthly_expenses, self.expenses);
        set(&mut raw.property_tax, self.property_tax);
        set(&mut raw.insurance, self.insurance);
        set(&mut raw.hoa, self.hoa);
        set(&mut raw.mortgage_insurance, self.mortgage_insurance);
        set(&mut raw.first_payment_date, self.first_payment);
    }
}

fn main() {
    env_logger::init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_path(path)?,
        None => EngineConfig::default(),
    };

    let mut raw = match &cli.scenario {
        Some(path) => load_scenario_json(path)?,
        None => RawScenario::default(),
    };
    cli.fields.apply(&mut raw);

    let engine = PayoffEngine::new(config);
    let out = engine.run(&raw)?;

    if let Some(path) = &cli.traditional_csv {
        write_to_path(path, |file| write_traditional_schedule(file, &out.traditional.schedule))?;
    }
    if let Some(path) = &cli.sweep_csv {
        write_to_path(path, |file| write_sweep_schedule(file, &out.sweep.schedule))?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_summary(&out, cli.preview_months);
    }

    Ok(())
}

fn print_summary(out: &PayoffComparison, preview_months: usize) {
    let input = &out.input;
    println!("Payoff comparison: {}", input.label());
    println!("==================\n");

    println!("Mortgage: {} at {} over {} months", input.mortgage_balance, input.mortgage_rate, input.remaining_term_months);
    println!("  Payment:       ${}", input.monthly_payment);
    println!("  Housing cost:  ${}", input.monthly_housing_cost());
    println!("Credit line: {} at {}", input.credit_line_limit, input.credit_line_rate);
    println!("  Discretionary: ${}", input.monthly_discretionary_income());
    println!();

    println!("Traditional schedule (first {} months):", preview_months);
    println!("{:>5} {:>14} {:>10} {:>10} {:>14}", "Month", "Start", "Interest", "Principal", "End");
    println!("{}", "-".repeat(57));
    for row in out.traditional.schedule.iter().take(preview_months) {
        println!(
            "{:>5} {:>14} {:>10} {:>10} {:>14}",
            row.month_index,
            row.starting_principal_balance,
            row.interest_accrued,
            row.principal_paid,
            row.ending_principal_balance
        );
    }
    println!();

    println!("Sweep schedule (first {} months):", preview_months);
    println!(
        "{:>5} {:>14} {:>10} {:>10} {:>10} {:>14} {:>10} {:>10} {:>14}",
        "Month", "Start", "Interest", "Principal", "Extra", "End", "LineInt", "Draw", "LineEnd"
    );
    println!("{}", "-".repeat(107));
    for row in out.sweep.schedule.iter().take(preview_months) {
        println!(
            "{:>5} {:>14} {:>10} {:>10} {:>10} {:>14} {:>10} {:>10} {:>14}",
            row.month_index,
            row.starting_principal_balance,
            row.interest_accrued,
            row.scheduled_principal,
            row.extra_principal,
            row.ending_principal_balance,
            row.credit_line_interest_accrued,
            row.credit_line_draw,
            row.ending_credit_line_balance
        );
    }
    if out.sweep.schedule.len() > preview_months {
        println!("... ({} more months)", out.sweep.schedule.len() - preview_months);
    }

    let trad = &out.traditional.result;
    let sweep = &out.sweep.result;
    let cmp = &out.comparison;
    println!("\nSummary:");
    println!("                      {:>16} {:>16}", "Traditional", "Sweep");
    println!("  Payoff months:      {:>16} {:>16}", trad.payoff_months, sweep.payoff_months);
    if let (Some(t), Some(s)) = (trad.payoff_date, sweep.payoff_date) {
        println!("  Payoff date:        {:>16} {:>16}", t.to_string(), s.to_string());
    }
    println!("  Total interest:     {:>16} {:>16}", trad.total_interest_paid, sweep.total_interest_paid);
    println!("  Total paid:         {:>16} {:>16}", trad.total_paid, sweep.total_paid);
    println!("  Line interest:      {:>16} {:>16}", "", sweep.total_credit_line_interest);
    println!("  Peak line balance:  {:>16} {:>16}", "", sweep.max_credit_line_balance_used);
    println!("  Avg line balance:   {:>16} {:>16}", "", sweep.average_credit_line_balance);
    println!();
    println!("  Months saved:       {}", cmp.months_saved);
    println!("  Interest saved:     ${} ({}%)", cmp.interest_saved, cmp.percent_interest_saved);
    println!("  Extra monthly cash: ${}", cmp.monthly_payment_difference);
}
