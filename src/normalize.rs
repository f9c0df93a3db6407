// 🔢 Numeric Normalizer
// Turns "<magnitude> <unit>" fragments into comparable integers.
//
// Sizes are expressed in MB. GB scales by 1000 (decimal), not 1024.

use crate::error::NormalizeError;

/// MB per GB. Decimal on purpose, matches how the control plane reports plans.
pub const MB_PER_GB: f64 = 1000.0;

/// Normalize a size to MB.
///
/// `gb` multiplies by 1000, `mb` passes through, anything else is taken as-is.
/// Fractions are truncated toward zero. Values that do not fit an i64 are
/// rejected rather than clamped.
pub fn normalize(magnitude: &str, unit: &str) -> Result<i64, NormalizeError> {
    let base: f64 = magnitude
        .trim()
        .parse()
        .map_err(|_| NormalizeError::NotNumeric(magnitude.to_string()))?;

    if !base.is_finite() {
        return Err(NormalizeError::NotNumeric(magnitude.to_string()));
    }

    let scaled = match unit.trim().to_lowercase().as_str() {
        "gb" => base * MB_PER_GB,
        "mb" => base,
        _ => base,
    };

    let truncated = scaled.trunc();
    // i64::MAX as f64 rounds up to 2^63, which itself does not fit
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(NormalizeError::OutOfRange(magnitude.to_string()));
    }

    Ok(truncated as i64)
}

/// Parse a unit-less count such as ops/sec.
pub fn parse_count(value: &str) -> Result<i64, NormalizeError> {
    value
        .trim()
        .parse()
        .map_err(|_| NormalizeError::NotNumeric(value.to_string()))
}
