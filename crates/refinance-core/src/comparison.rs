//! Current-versus-refinanced loan comparison.
//!
//! Refinancing keeps principal and remaining term and changes only the rate,
//! adding a one-time cost to the refinanced total. Savings are reported
//! before and after that cost; the verdict uses the net figure.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{amortized_payment, PaymentMethod};
use crate::error::RefinanceError;
use crate::types::{with_metadata, ComputationOutput, Money, Months, Percent};
use crate::RefinanceResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Terms of a fixed-rate loan from today to maturity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Outstanding balance, base currency units.
    pub principal: Money,
    /// Nominal annual rate as a percentage (1.2 = 1.2%).
    pub annual_rate_percent: Percent,
    /// Monthly payments remaining.
    pub term_months: Months,
}

/// The current loan plus the terms a refinance would replace it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinanceScenario {
    pub current: LoanTerms,
    /// Annual rate offered by the refinance, as a percentage.
    pub new_annual_rate_percent: Percent,
    /// One-time cost of executing the refinance.
    pub refinance_costs: Money,
}

impl RefinanceScenario {
    /// The loan after refinancing: same principal and term, new rate.
    pub fn refinanced_terms(&self) -> LoanTerms {
        LoanTerms {
            principal: self.current.principal,
            annual_rate_percent: self.new_annual_rate_percent,
            term_months: self.current.term_months,
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Whether refinancing pays for itself over the remaining term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Beneficial,
    NotBeneficial,
}

impl Verdict {
    /// Strictly positive net savings only; exactly zero is not a benefit.
    pub fn from_total_savings(total_savings: Money) -> Self {
        if total_savings > Decimal::ZERO {
            Verdict::Beneficial
        } else {
            Verdict::NotBeneficial
        }
    }

    pub fn is_beneficial(self) -> bool {
        matches!(self, Verdict::Beneficial)
    }
}

/// Derived before/after metrics. All amounts in base currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub current_monthly_payment: Money,
    pub new_monthly_payment: Money,
    pub current_total_payment: Money,
    /// Sum of refinanced payments plus the one-time refinance cost.
    pub new_total_payment_with_costs: Money,
    pub current_total_interest: Money,
    /// Interest on the refinanced loan; excludes the refinance cost.
    pub new_total_interest: Money,
    pub refinance_costs: Money,
    pub monthly_savings: Money,
    /// Net of refinance costs.
    pub total_savings: Money,
    pub interest_savings: Money,
    /// Whole months of payment savings needed to recover the refinance cost.
    /// `None` when the monthly payment does not go down; saturates at
    /// `u32::MAX` when the savings are too small to count the months.
    pub break_even_months: Option<u32>,
    pub verdict: Verdict,
}

impl ComparisonResult {
    pub fn is_beneficial(&self) -> bool {
        self.verdict.is_beneficial()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate a refinance scenario. Pure and deterministic.
pub fn evaluate(scenario: &RefinanceScenario) -> RefinanceResult<ComparisonResult> {
    Ok(compute(scenario)?.result)
}

/// Evaluate a refinance scenario and wrap it in the standard output envelope.
pub fn compare_refinance(
    scenario: &RefinanceScenario,
) -> RefinanceResult<ComputationOutput<ComparisonResult>> {
    let start = Instant::now();

    let evaluation = compute(scenario)?;
    let warnings = scenario_warnings(scenario, &evaluation);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortisation, current vs refinanced rate over the shared remaining term",
        scenario,
        warnings,
        elapsed,
        evaluation.result,
    ))
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

pub(crate) struct Evaluation {
    pub(crate) result: ComparisonResult,
    pub(crate) current_method: PaymentMethod,
    pub(crate) new_method: PaymentMethod,
}

pub(crate) fn compute(scenario: &RefinanceScenario) -> RefinanceResult<Evaluation> {
    validate(scenario)?;

    let current = &scenario.current;
    let refinanced = scenario.refinanced_terms();

    let current_payment = amortized_payment(
        current.principal,
        current.annual_rate_percent,
        current.term_months,
    )?;
    let new_payment = amortized_payment(
        refinanced.principal,
        refinanced.annual_rate_percent,
        refinanced.term_months,
    )?;

    let current_total_payment = total_over_term(current_payment.amount, current.term_months)?;
    let new_total_payment = total_over_term(new_payment.amount, current.term_months)?;

    let current_total_interest = current_total_payment - current.principal;
    let new_total_interest = new_total_payment - current.principal;

    let new_total_payment_with_costs = new_total_payment
        .checked_add(scenario.refinance_costs)
        .ok_or_else(|| RefinanceError::InvalidInput {
            field: "refinance_costs".into(),
            reason: "Total payment with costs exceeds decimal range".into(),
        })?;

    let monthly_savings = current_payment.amount - new_payment.amount;
    let total_savings = current_total_payment - new_total_payment_with_costs;
    let interest_savings = current_total_interest - new_total_interest;

    Ok(Evaluation {
        result: ComparisonResult {
            current_monthly_payment: current_payment.amount,
            new_monthly_payment: new_payment.amount,
            current_total_payment,
            new_total_payment_with_costs,
            current_total_interest,
            new_total_interest,
            refinance_costs: scenario.refinance_costs,
            monthly_savings,
            total_savings,
            interest_savings,
            break_even_months: break_even_months(scenario.refinance_costs, monthly_savings),
            verdict: Verdict::from_total_savings(total_savings),
        },
        current_method: current_payment.method,
        new_method: new_payment.method,
    })
}

fn total_over_term(monthly: Money, term_months: Months) -> RefinanceResult<Money> {
    monthly
        .checked_mul(Decimal::from(term_months))
        .ok_or_else(|| RefinanceError::InvalidInput {
            field: "principal".into(),
            reason: "Total payment exceeds decimal range".into(),
        })
}

fn break_even_months(costs: Money, monthly_savings: Money) -> Option<u32> {
    if monthly_savings <= Decimal::ZERO {
        return None;
    }
    let months = costs
        .checked_div(monthly_savings)
        .and_then(|ratio| ratio.ceil().to_u32())
        .unwrap_or(u32::MAX);
    Some(months)
}

fn validate(scenario: &RefinanceScenario) -> RefinanceResult<()> {
    if scenario.new_annual_rate_percent < Decimal::ZERO {
        return Err(RefinanceError::InvalidInput {
            field: "new_annual_rate_percent".into(),
            reason: "Refinance rate must be non-negative".into(),
        });
    }
    if scenario.refinance_costs < Decimal::ZERO {
        return Err(RefinanceError::InvalidInput {
            field: "refinance_costs".into(),
            reason: "Refinance costs must be non-negative".into(),
        });
    }
    Ok(())
}

pub(crate) fn scenario_warnings(scenario: &RefinanceScenario, evaluation: &Evaluation) -> Vec<String> {
    let mut warnings = Vec::new();

    if scenario.new_annual_rate_percent >= scenario.current.annual_rate_percent {
        warnings.push(format!(
            "Refinance rate {}% is not below the current rate {}%",
            scenario.new_annual_rate_percent, scenario.current.annual_rate_percent
        ));
    }
    if scenario.refinance_costs > scenario.current.principal {
        warnings.push(format!(
            "Refinance costs {} exceed the outstanding principal {}",
            scenario.refinance_costs, scenario.current.principal
        ));
    }
    for (label, method) in [
        ("current", evaluation.current_method),
        ("refinanced", evaluation.new_method),
    ] {
        if method == PaymentMethod::NearZeroFallback {
            warnings.push(format!(
                "The {label} rate is too small to amortise precisely; payment uses straight-line division"
            ));
        }
    }

    warnings
}
