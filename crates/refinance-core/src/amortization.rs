//! Level-payment amortisation for fixed-rate loans.
//!
//! Rates enter as annual percentages and are converted to a monthly decimal
//! rate before use. All math in `rust_decimal::Decimal`, with checked
//! arithmetic wherever a large rate or balance could leave decimal range.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RefinanceError;
use crate::types::{with_metadata, ComputationOutput, Money, Months, Percent};
use crate::RefinanceResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT_SCALE: Decimal = dec!(100);

/// Compound growth `(1+r)^n − 1` below this is indistinguishable from zero
/// interest; the payment falls back to straight-line division.
pub const NEAR_ZERO_GROWTH: Decimal = dec!(0.000000000001);

/// How a monthly payment was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Standard annuity formula.
    Amortized,
    /// Zero rate: principal divided evenly over the term.
    StraightLine,
    /// Positive rate too small to resolve; treated as zero rate.
    NearZeroFallback,
}

/// A monthly payment together with the method used to compute it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPayment {
    pub amount: Money,
    pub method: PaymentMethod,
}

/// Monthly payment input, as accepted by the CLI and bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_months: Months,
}

/// Fixed monthly payment that fully repays `principal` over `term_months`.
pub fn monthly_payment(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: Months,
) -> RefinanceResult<Money> {
    Ok(amortized_payment(principal, annual_rate_percent, term_months)?.amount)
}

/// Same as [`monthly_payment`], but reports which formula produced the amount.
pub fn amortized_payment(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: Months,
) -> RefinanceResult<MonthlyPayment> {
    validate(principal, annual_rate_percent, term_months)?;

    let straight_line = principal / Decimal::from(term_months);

    if annual_rate_percent.is_zero() {
        return Ok(MonthlyPayment {
            amount: straight_line,
            method: PaymentMethod::StraightLine,
        });
    }

    let rate = monthly_rate(annual_rate_percent);
    let factor = growth_factor(rate, term_months)?;
    let growth = factor - Decimal::ONE;

    if rate.is_zero() || growth < NEAR_ZERO_GROWTH {
        return Ok(MonthlyPayment {
            amount: straight_line,
            method: PaymentMethod::NearZeroFallback,
        });
    }

    // r * f / (f - 1), grouped so the intermediate stays near r.
    let annuity_factor = rate * (factor / growth);
    let amount = principal
        .checked_mul(annuity_factor)
        .ok_or_else(|| RefinanceError::InvalidInput {
            field: "principal".into(),
            reason: "Payment exceeds decimal range".into(),
        })?;

    Ok(MonthlyPayment {
        amount,
        method: PaymentMethod::Amortized,
    })
}

/// Monthly payment wrapped in the standard output envelope.
pub fn calculate_payment(input: &PaymentInput) -> RefinanceResult<ComputationOutput<MonthlyPayment>> {
    let start = Instant::now();

    let payment = amortized_payment(input.principal, input.annual_rate_percent, input.term_months)?;

    let mut warnings = Vec::new();
    if payment.method == PaymentMethod::NearZeroFallback {
        warnings.push(format!(
            "Rate {}% is too small to amortise precisely; payment uses straight-line division",
            input.annual_rate_percent
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortisation: P * r * (1+r)^n / ((1+r)^n - 1)",
        input,
        warnings,
        elapsed,
        payment,
    ))
}

/// Monthly decimal rate from an annual percentage (1.2 -> 0.001).
pub fn monthly_rate(annual_rate_percent: Percent) -> Decimal {
    annual_rate_percent / MONTHS_PER_YEAR / PERCENT_SCALE
}

/// Compound growth `(1 + rate)^term_months`.
pub fn growth_factor(rate: Decimal, term_months: Months) -> RefinanceResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(term_months))
        .ok_or_else(|| RefinanceError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: format!("Compounding over {term_months} months exceeds decimal range"),
        })
}

fn validate(principal: Money, annual_rate_percent: Percent, term_months: Months) -> RefinanceResult<()> {
    if principal <= Decimal::ZERO {
        return Err(RefinanceError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(RefinanceError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate must be non-negative".into(),
        });
    }
    if term_months == 0 {
        return Err(RefinanceError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least one month".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, label: &str) {
        assert!(
            (actual - expected).abs() <= tol,
            "{label}: expected {expected}, got {actual} (tol {tol})"
        );
    }

    #[test]
    fn test_payment_30yr_6pct() {
        // 1.2M at 6% over 360 months: 7,194.61 per month
        let pmt = monthly_payment(dec!(1_200_000), dec!(6), 360).unwrap();
        assert_close(pmt, dec!(7194.61), dec!(0.01), "30yr 6%");
    }

    #[test]
    fn test_payment_20yr_low_rate() {
        let pmt = monthly_payment(dec!(30_000_000), dec!(1.2), 240).unwrap();
        assert_close(pmt, dec!(140661.62), dec!(0.01), "20yr 1.2%");
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let result = amortized_payment(dec!(1_000_000), Decimal::ZERO, 240).unwrap();
        assert_eq!(result.amount, dec!(1_000_000) / dec!(240));
        assert_eq!(result.method, PaymentMethod::StraightLine);
    }

    #[test]
    fn test_single_month_repays_principal_plus_one_month_interest() {
        // One payment: principal * (1 + r)
        let pmt = monthly_payment(dec!(30_000_000), dec!(1.2), 1).unwrap();
        assert_close(pmt, dec!(30_030_000), dec!(0.000001), "single month");
    }

    #[test]
    fn test_total_paid_covers_principal() {
        let principals = [dec!(1), dec!(1_000), dec!(30_000_000)];
        let rates = [dec!(0), dec!(0.1), dec!(1.2), dec!(5), dec!(18)];
        let terms = [1u32, 12, 240, 420];
        for p in principals {
            for r in rates {
                for n in terms {
                    let pmt = monthly_payment(p, r, n).unwrap();
                    let total = pmt * Decimal::from(n);
                    assert!(
                        total >= p - dec!(0.0000001),
                        "p={p} r={r} n={n}: total {total} < principal"
                    );
                }
            }
        }
    }

    #[test]
    fn test_strictly_increasing_in_rate() {
        let rates = [
            dec!(0),
            dec!(0.01),
            dec!(0.1),
            dec!(0.45),
            dec!(1.2),
            dec!(2.5),
            dec!(5),
            dec!(10),
        ];
        let payments: Vec<Decimal> = rates
            .iter()
            .map(|r| monthly_payment(dec!(30_000_000), *r, 240).unwrap())
            .collect();
        for pair in payments.windows(2) {
            assert!(pair[1] > pair[0], "{} should exceed {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn test_near_zero_rate_falls_back_to_straight_line() {
        let result = amortized_payment(dec!(30_000_000), dec!(0.000000000001), 360).unwrap();
        assert_eq!(result.method, PaymentMethod::NearZeroFallback);
        assert_eq!(result.amount, dec!(30_000_000) / dec!(360));
    }

    #[test]
    fn test_rate_below_decimal_resolution_falls_back() {
        let result =
            amortized_payment(dec!(1_000), dec!(0.0000000000000000000000000001), 12).unwrap();
        assert_eq!(result.method, PaymentMethod::NearZeroFallback);
        assert_eq!(result.amount, dec!(1_000) / dec!(12));
    }

    #[test]
    fn test_small_but_resolvable_rate_is_amortized() {
        let result = amortized_payment(dec!(30_000_000), dec!(0.001), 360).unwrap();
        assert_eq!(result.method, PaymentMethod::Amortized);
        assert!(result.amount > dec!(30_000_000) / dec!(360));
    }

    #[test]
    fn test_zero_principal_rejected() {
        let err = monthly_payment(Decimal::ZERO, dec!(1), 12).unwrap_err();
        assert_eq!(err.field(), Some("principal"));
    }

    #[test]
    fn test_negative_principal_rejected() {
        let err = monthly_payment(dec!(-100), dec!(1), 12).unwrap_err();
        assert_eq!(err.field(), Some("principal"));
    }

    #[test]
    fn test_zero_term_rejected() {
        let err = monthly_payment(dec!(100), dec!(1), 0).unwrap_err();
        assert_eq!(err.field(), Some("term_months"));
    }

    #[test]
    fn test_zero_term_rejected_at_zero_rate() {
        let err = monthly_payment(dec!(100), Decimal::ZERO, 0).unwrap_err();
        assert_eq!(err.field(), Some("term_months"));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = monthly_payment(dec!(100), dec!(-0.5), 12).unwrap_err();
        assert_eq!(err.field(), Some("annual_rate_percent"));
    }

    #[test]
    fn test_overflowing_growth_is_an_error_not_a_panic() {
        let err = monthly_payment(dec!(100), dec!(1_000_000), 600).unwrap_err();
        assert_eq!(err.field(), Some("annual_rate_percent"));
    }

    #[test]
    fn test_calculate_payment_envelope() {
        let input = PaymentInput {
            principal: dec!(1_200_000),
            annual_rate_percent: dec!(6),
            term_months: 360,
        };
        let out = calculate_payment(&input).unwrap();
        assert_eq!(out.result.method, PaymentMethod::Amortized);
        assert!(out.warnings.is_empty());
        assert_eq!(out.assumptions["term_months"], 360);
    }

    #[test]
    fn test_calculate_payment_warns_on_fallback() {
        let input = PaymentInput {
            principal: dec!(1_200_000),
            annual_rate_percent: dec!(0.000000000001),
            term_months: 360,
        };
        let out = calculate_payment(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_monthly_rate_conversion() {
        assert_eq!(monthly_rate(dec!(1.2)), dec!(0.001));
        assert_eq!(monthly_rate(dec!(6)), dec!(0.005));
    }
}
