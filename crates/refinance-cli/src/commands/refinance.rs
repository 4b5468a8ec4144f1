use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use refinance_core::amortization::{self, PaymentInput};
use refinance_core::comparison::{self, LoanTerms, RefinanceScenario};
use refinance_core::report;
use refinance_core::units::{DiagnosisInput, DisplayUnit};

use crate::config::Config;
use crate::input;

/// Arguments for a single monthly payment
#[derive(Args)]
pub struct PaymentArgs {
    /// Outstanding principal, base currency units
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a percentage (e.g. 1.2 for 1.2%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Number of monthly payments
    #[arg(long)]
    pub months: Option<u32>,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a base-unit comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Outstanding principal, base currency units
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Current annual rate as a percentage
    #[arg(long)]
    pub current_rate: Option<Decimal>,

    /// Remaining monthly payments
    #[arg(long)]
    pub months: Option<u32>,

    /// Refinanced annual rate as a percentage
    #[arg(long)]
    pub new_rate: Option<Decimal>,

    /// One-time refinance cost, base currency units
    #[arg(long, default_value = "0")]
    pub costs: Decimal,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a form-style diagnosis
#[derive(Args)]
pub struct DiagnoseArgs {
    /// Outstanding balance, in display units
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Current annual rate as a percentage
    #[arg(long)]
    pub current_rate: Option<Decimal>,

    /// Remaining term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Refinanced annual rate as a percentage
    #[arg(long)]
    pub new_rate: Option<Decimal>,

    /// One-time refinance cost, in display units
    #[arg(long)]
    pub costs: Option<Decimal>,

    /// Unit for balance and costs
    #[arg(long, value_enum)]
    pub unit: Option<UnitArg>,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitArg {
    /// Whole currency units
    Base,
    /// Blocks of 10,000
    TenThousand,
}

impl From<UnitArg> for DisplayUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Base => DisplayUnit::Base,
            UnitArg::TenThousand => DisplayUnit::TenThousand,
        }
    }
}

impl DiagnoseArgs {
    fn has_form_flags(&self) -> bool {
        self.balance.is_some()
            || self.current_rate.is_some()
            || self.years.is_some()
            || self.new_rate.is_some()
            || self.costs.is_some()
            || self.unit.is_some()
    }

    /// Flags layered over `base`.
    fn apply(&self, base: DiagnosisInput) -> DiagnosisInput {
        DiagnosisInput {
            current_balance: self.balance.unwrap_or(base.current_balance),
            current_rate_percent: self.current_rate.unwrap_or(base.current_rate_percent),
            remaining_years: self.years.unwrap_or(base.remaining_years),
            new_rate_percent: self.new_rate.unwrap_or(base.new_rate_percent),
            refinance_costs: self.costs.unwrap_or(base.refinance_costs),
            display_unit: self.unit.map(DisplayUnit::from).unwrap_or(base.display_unit),
        }
    }
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input: PaymentInput = match read_structured(&args.input)? {
        Some(parsed) => parsed,
        None => PaymentInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args.months.ok_or("--months is required (or provide --input)")?,
        },
    };
    let result = amortization::calculate_payment(&payment_input)?;
    log_completion("payment", result.metadata.computation_time_us, &result.warnings);
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario: RefinanceScenario = match read_structured(&args.input)? {
        Some(parsed) => parsed,
        None => RefinanceScenario {
            current: LoanTerms {
                principal: args
                    .principal
                    .ok_or("--principal is required (or provide --input)")?,
                annual_rate_percent: args
                    .current_rate
                    .ok_or("--current-rate is required (or provide --input)")?,
                term_months: args.months.ok_or("--months is required (or provide --input)")?,
            },
            new_annual_rate_percent: args
                .new_rate
                .ok_or("--new-rate is required (or provide --input)")?,
            refinance_costs: args.costs,
        },
    };
    let result = comparison::compare_refinance(&scenario)?;
    log_completion("compare", result.metadata.computation_time_us, &result.warnings);
    Ok(serde_json::to_value(result)?)
}

pub fn run_diagnose(args: DiagnoseArgs, config: &Config) -> Result<Value, Box<dyn std::error::Error>> {
    let diagnosis_input = resolve_diagnosis_input(&args, config)?;
    tracing::debug!(?diagnosis_input, "resolved form input");

    let result = report::diagnose(&diagnosis_input)?;
    log_completion("diagnose", result.metadata.computation_time_us, &result.warnings);
    Ok(serde_json::to_value(result)?)
}

/// `--input` file, then flags over config defaults, then piped stdin, then
/// config and built-in defaults alone.
fn resolve_diagnosis_input(
    args: &DiagnoseArgs,
    config: &Config,
) -> Result<DiagnosisInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }
    if args.has_form_flags() {
        return Ok(args.apply(config.form_input()));
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    tracing::info!("no form values given; using config and built-in defaults");
    Ok(config.form_input())
}

fn read_structured<T: DeserializeOwned>(
    path: &Option<String>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(ref path) = path {
        return Ok(Some(input::file::read_input(path)?));
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(Some(serde_json::from_value(data)?));
    }
    Ok(None)
}

fn log_completion(command: &str, elapsed_us: u64, warnings: &[String]) {
    tracing::info!(command, elapsed_us, "computation complete");
    for warning in warnings {
        tracing::debug!(command, %warning, "advisory");
    }
}
