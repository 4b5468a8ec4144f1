//! Form-facing input contract.
//!
//! The calculator form shows money in display units (whole currency units or
//! blocks of ten thousand) and the remaining term in years. [`DiagnosisInput`]
//! carries those five fields and normalizes them into a [`RefinanceScenario`]
//! in base units and months.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::comparison::{LoanTerms, RefinanceScenario};
use crate::error::RefinanceError;
use crate::types::{Money, Percent};
use crate::RefinanceResult;

const MONTHS_PER_YEAR: u32 = 12;
const TEN_THOUSAND: Decimal = dec!(10_000);

/// Unit the form displays money amounts in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayUnit {
    /// Whole base currency units.
    Base,
    /// Blocks of 10,000 base units.
    #[default]
    TenThousand,
}

impl DisplayUnit {
    /// Base units per display unit.
    pub fn factor(self) -> Decimal {
        match self {
            DisplayUnit::Base => Decimal::ONE,
            DisplayUnit::TenThousand => TEN_THOUSAND,
        }
    }

    pub fn to_base(self, amount: Decimal) -> RefinanceResult<Money> {
        amount
            .checked_mul(self.factor())
            .ok_or_else(|| RefinanceError::InvalidInput {
                field: "display_unit".into(),
                reason: format!("{amount} {self} exceeds decimal range"),
            })
    }

    pub fn from_base(self, amount: Money) -> Decimal {
        amount / self.factor()
    }
}

impl fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayUnit::Base => write!(f, "units"),
            DisplayUnit::TenThousand => write!(f, "x10k units"),
        }
    }
}

/// Inclusive range the calculator form accepts for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputRange {
    pub field: &'static str,
    pub min: Decimal,
    pub max: Decimal,
}

impl InputRange {
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }

    /// Advisory message when `value` lies outside the range.
    pub fn check(&self, value: Decimal) -> Option<String> {
        if self.contains(value) {
            None
        } else {
            Some(format!(
                "{} {} is outside the typical range {}–{}",
                self.field, value, self.min, self.max
            ))
        }
    }
}

/// Balance, in blocks of 10,000.
pub const BALANCE_RANGE: InputRange = InputRange {
    field: "current_balance",
    min: dec!(100),
    max: dec!(20_000),
};

pub const CURRENT_RATE_RANGE: InputRange = InputRange {
    field: "current_rate_percent",
    min: dec!(0.1),
    max: dec!(5.0),
};

pub const REMAINING_YEARS_RANGE: InputRange = InputRange {
    field: "remaining_years",
    min: dec!(1),
    max: dec!(35),
};

pub const NEW_RATE_RANGE: InputRange = InputRange {
    field: "new_rate_percent",
    min: dec!(0.1),
    max: dec!(5.0),
};

/// Refinance costs, in blocks of 10,000.
pub const COSTS_RANGE: InputRange = InputRange {
    field: "refinance_costs",
    min: dec!(0),
    max: dec!(500),
};

/// The five form fields, in display units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisInput {
    /// Outstanding balance, in `display_unit`.
    pub current_balance: Decimal,
    pub current_rate_percent: Percent,
    pub remaining_years: u32,
    pub new_rate_percent: Percent,
    /// One-time refinance cost, in `display_unit`.
    pub refinance_costs: Decimal,
    #[serde(default)]
    pub display_unit: DisplayUnit,
}

impl Default for DiagnosisInput {
    fn default() -> Self {
        Self {
            current_balance: dec!(3_000),
            current_rate_percent: dec!(1.2),
            remaining_years: 20,
            new_rate_percent: dec!(0.45),
            refinance_costs: dec!(60),
            display_unit: DisplayUnit::TenThousand,
        }
    }
}

impl DiagnosisInput {
    pub fn remaining_months(&self) -> RefinanceResult<u32> {
        self.remaining_years
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or_else(|| RefinanceError::InvalidInput {
                field: "remaining_years".into(),
                reason: format!("{} years does not fit in a month count", self.remaining_years),
            })
    }

    /// Normalize into base units and months.
    pub fn to_scenario(&self) -> RefinanceResult<RefinanceScenario> {
        Ok(RefinanceScenario {
            current: LoanTerms {
                principal: self.display_unit.to_base(self.current_balance)?,
                annual_rate_percent: self.current_rate_percent,
                term_months: self.remaining_months()?,
            },
            new_annual_rate_percent: self.new_rate_percent,
            refinance_costs: self.display_unit.to_base(self.refinance_costs)?,
        })
    }

    /// Fields outside the ranges the calculator form offers. Advisory only.
    pub fn advisories(&self) -> Vec<String> {
        let in_ten_thousands = |amount: Decimal| match self.display_unit {
            DisplayUnit::Base => amount / TEN_THOUSAND,
            DisplayUnit::TenThousand => amount,
        };

        [
            BALANCE_RANGE.check(in_ten_thousands(self.current_balance)),
            CURRENT_RATE_RANGE.check(self.current_rate_percent),
            REMAINING_YEARS_RANGE.check(Decimal::from(self.remaining_years)),
            NEW_RATE_RANGE.check(self.new_rate_percent),
            COSTS_RANGE.check(in_ten_thousands(self.refinance_costs)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_normalizes_to_form_scenario() {
        let scenario = DiagnosisInput::default().to_scenario().unwrap();
        assert_eq!(scenario.current.principal, dec!(30_000_000));
        assert_eq!(scenario.current.term_months, 240);
        assert_eq!(scenario.current.annual_rate_percent, dec!(1.2));
        assert_eq!(scenario.new_annual_rate_percent, dec!(0.45));
        assert_eq!(scenario.refinance_costs, dec!(600_000));
    }

    #[test]
    fn test_base_unit_is_identity() {
        let input = DiagnosisInput {
            current_balance: dec!(250_000),
            refinance_costs: dec!(3_500),
            display_unit: DisplayUnit::Base,
            ..DiagnosisInput::default()
        };
        let scenario = input.to_scenario().unwrap();
        assert_eq!(scenario.current.principal, dec!(250_000));
        assert_eq!(scenario.refinance_costs, dec!(3_500));
    }

    #[test]
    fn test_month_overflow_rejected() {
        let input = DiagnosisInput {
            remaining_years: u32::MAX,
            ..DiagnosisInput::default()
        };
        let err = input.to_scenario().unwrap_err();
        assert_eq!(err.field(), Some("remaining_years"));
    }

    #[test]
    fn test_default_has_no_advisories() {
        assert!(DiagnosisInput::default().advisories().is_empty());
    }

    #[test]
    fn test_advisories_flag_out_of_range_fields() {
        let input = DiagnosisInput {
            current_balance: dec!(50),
            remaining_years: 40,
            refinance_costs: dec!(5_000),
            ..DiagnosisInput::default()
        };
        let advisories = input.advisories();
        assert_eq!(advisories.len(), 3);
        assert!(advisories[0].starts_with("current_balance"));
        assert!(advisories[1].starts_with("remaining_years"));
        assert!(advisories[2].starts_with("refinance_costs"));
    }

    #[test]
    fn test_advisories_respect_display_unit() {
        // 30,000,000 base units is 3,000 blocks: inside the balance range
        let input = DiagnosisInput {
            current_balance: dec!(30_000_000),
            refinance_costs: dec!(600_000),
            display_unit: DisplayUnit::Base,
            ..DiagnosisInput::default()
        };
        assert!(input.advisories().is_empty());
    }

    #[test]
    fn test_display_unit_deserializes_snake_case() {
        let unit: DisplayUnit = serde_json::from_str("\"ten_thousand\"").unwrap();
        assert_eq!(unit, DisplayUnit::TenThousand);
        let unit: DisplayUnit = serde_json::from_str("\"base\"").unwrap();
        assert_eq!(unit, DisplayUnit::Base);
    }
}
