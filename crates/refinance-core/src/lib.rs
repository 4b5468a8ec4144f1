pub mod amortization;
pub mod comparison;
pub mod error;
pub mod types;
pub mod units;

#[cfg(feature = "report")]
pub mod report;

pub use error::RefinanceError;
pub use types::*;

/// Standard result type for all refinance operations
pub type RefinanceResult<T> = Result<T, RefinanceError>;
