use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Serialize;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortisation
// ---------------------------------------------------------------------------

#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let input: refinance_core::amortization::PaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        refinance_core::amortization::calculate_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Refinance comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_refinance(input_json: String) -> NapiResult<String> {
    let input: refinance_core::comparison::RefinanceScenario =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        refinance_core::comparison::compare_refinance(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn diagnose_refinance(input_json: String) -> NapiResult<String> {
    let input: refinance_core::units::DiagnosisInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = refinance_core::report::diagnose(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Form metadata
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct FieldRange {
    field: &'static str,
    min: Decimal,
    max: Decimal,
}

/// Form defaults and accepted ranges, so the UI can seed its widgets.
#[napi]
pub fn form_defaults() -> NapiResult<String> {
    use refinance_core::units::{
        DiagnosisInput, BALANCE_RANGE, COSTS_RANGE, CURRENT_RATE_RANGE, NEW_RATE_RANGE,
        REMAINING_YEARS_RANGE,
    };

    let ranges: Vec<FieldRange> = [
        BALANCE_RANGE,
        CURRENT_RATE_RANGE,
        REMAINING_YEARS_RANGE,
        NEW_RATE_RANGE,
        COSTS_RANGE,
    ]
    .into_iter()
    .map(|r| FieldRange {
        field: r.field,
        min: r.min,
        max: r.max,
    })
    .collect();

    let value = serde_json::json!({
        "defaults": DiagnosisInput::default(),
        "ranges": ranges,
    });
    serde_json::to_string(&value).map_err(to_napi_error)
}
