//! Presentation-ready refinance diagnosis.
//!
//! Turns the five form fields into the figures the calculator screen shows:
//! a headline savings amount, a before/after comparison table and a stacked
//! principal/interest/cost breakdown per case. Amounts are rounded to whole
//! units here and nowhere else; the unrounded [`ComparisonResult`] travels
//! alongside.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::comparison::{compute, scenario_warnings, ComparisonResult, Verdict};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::units::{DiagnosisInput, DisplayUnit};
use crate::RefinanceResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// The headline figure and message shown above the details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub verdict: Verdict,
    /// Net savings over the remaining term, whole display units.
    pub total_savings: Decimal,
    /// Monthly payment reduction, whole base units.
    pub monthly_savings: Decimal,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonItem {
    TotalPaymentWithCosts,
    TotalInterest,
    MonthlyPayment,
    RefinanceCosts,
}

/// One row of the before/after table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub item: ComparisonItem,
    pub unit: DisplayUnit,
    pub before: Decimal,
    pub after: Decimal,
    /// Reduction (`before − after`), except for the cost row, where it is
    /// the cost added by refinancing.
    pub delta: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Case {
    Current,
    Refinanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Principal,
    Interest,
    RefinanceCosts,
}

/// One stacked-bar segment, whole display units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownSegment {
    pub case: Case,
    pub component: Component,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinanceReport {
    pub display_unit: DisplayUnit,
    pub headline: Headline,
    pub comparison: Vec<ComparisonRow>,
    pub breakdown: Vec<BreakdownSegment>,
    /// Unrounded figures, base units.
    pub comparison_result: ComparisonResult,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run a full diagnosis from form input.
pub fn diagnose(input: &DiagnosisInput) -> RefinanceResult<ComputationOutput<RefinanceReport>> {
    let start = Instant::now();

    let scenario = input.to_scenario()?;
    let evaluation = compute(&scenario)?;

    let mut warnings = input.advisories();
    warnings.extend(scenario_warnings(&scenario, &evaluation));

    let report = build_report(&evaluation.result, scenario.current.principal, input.display_unit);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Refinance diagnosis: level-payment amortisation at current and refinanced rates, net of one-time costs",
        input,
        warnings,
        elapsed,
        report,
    ))
}

// ---------------------------------------------------------------------------
// Report assembly
// ---------------------------------------------------------------------------

fn build_report(result: &ComparisonResult, principal: Money, unit: DisplayUnit) -> RefinanceReport {
    let display = |amount: Money| whole(unit.from_base(amount));

    let headline = build_headline(result, unit);

    let comparison = vec![
        ComparisonRow {
            item: ComparisonItem::TotalPaymentWithCosts,
            unit,
            before: display(result.current_total_payment),
            after: display(result.new_total_payment_with_costs),
            delta: display(result.total_savings),
        },
        ComparisonRow {
            item: ComparisonItem::TotalInterest,
            unit,
            before: display(result.current_total_interest),
            after: display(result.new_total_interest),
            delta: display(result.interest_savings),
        },
        ComparisonRow {
            item: ComparisonItem::MonthlyPayment,
            unit: DisplayUnit::Base,
            before: whole(result.current_monthly_payment),
            after: whole(result.new_monthly_payment),
            delta: whole(result.monthly_savings),
        },
        ComparisonRow {
            item: ComparisonItem::RefinanceCosts,
            unit,
            before: Decimal::ZERO,
            after: display(result.refinance_costs),
            delta: display(result.refinance_costs),
        },
    ];

    let breakdown = vec![
        BreakdownSegment {
            case: Case::Current,
            component: Component::Principal,
            amount: display(principal),
        },
        BreakdownSegment {
            case: Case::Current,
            component: Component::Interest,
            amount: display(result.current_total_interest),
        },
        BreakdownSegment {
            case: Case::Refinanced,
            component: Component::Principal,
            amount: display(principal),
        },
        BreakdownSegment {
            case: Case::Refinanced,
            component: Component::Interest,
            amount: display(result.new_total_interest),
        },
        BreakdownSegment {
            case: Case::Refinanced,
            component: Component::RefinanceCosts,
            amount: display(result.refinance_costs),
        },
    ];

    RefinanceReport {
        display_unit: unit,
        headline,
        comparison,
        breakdown,
        comparison_result: result.clone(),
    }
}

fn build_headline(result: &ComparisonResult, unit: DisplayUnit) -> Headline {
    let total_savings = whole(unit.from_base(result.total_savings));
    let monthly_savings = whole(result.monthly_savings);

    let message = match result.verdict {
        Verdict::Beneficial => format!(
            "Refinancing pays off: about {total_savings} {unit} saved after costs, \
             with the monthly payment {monthly_savings} units lower"
        ),
        Verdict::NotBeneficial => "Refinance costs outweigh the reduction in payments; \
             refinancing shows little benefit at these terms"
            .to_string(),
    };

    Headline {
        verdict: result.verdict,
        total_savings,
        monthly_savings,
        message,
    }
}

fn whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}
