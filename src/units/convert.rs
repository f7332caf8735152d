use super::ConversionError;
use super::registry::lookup;
use tracing::warn;

/// Converts between two display units of the same dimension through the
/// dimension's reference unit (m, m2, INR).
pub fn try_convert_unit(value: f64, from_unit: &str, to_unit: &str) -> Result<f64, ConversionError> {
    if from_unit == to_unit {
        return Ok(value);
    }
    let from = lookup(from_unit).ok_or_else(|| ConversionError::UnknownUnit(from_unit.to_string()))?;
    let to = lookup(to_unit).ok_or_else(|| ConversionError::UnknownUnit(to_unit.to_string()))?;
    if !from.same_dimension(to) {
        return Err(ConversionError::IncompatibleUnits {
            from: from_unit.to_string(),
            to: to_unit.to_string(),
            from_dimension: from.dimension_name(),
            to_dimension: to.dimension_name(),
        });
    }
    match (from.conversion_factor(), to.conversion_factor()) {
        (Some(from_factor), Some(to_factor)) => Ok(value * from_factor / to_factor),
        _ => Ok(value),
    }
}

/// Display conversion that never fails. Units are not checked against each
/// other; only a unit without a display factor leaves the value unchanged.
pub fn convert_unit(value: f64, from_unit: &str, to_unit: &str) -> f64 {
    if from_unit == to_unit {
        return value;
    }
    let factors = (
        lookup(from_unit).and_then(|def| def.conversion_factor()),
        lookup(to_unit).and_then(|def| def.conversion_factor()),
    );
    let (Some(from_factor), Some(to_factor)) = factors else {
        warn!(
            target = "unit_safe.units",
            from = from_unit,
            to = to_unit,
            "unknown conversion factor, value left unchanged"
        );
        return value;
    };
    if let (Some(from), Some(to)) = (lookup(from_unit), lookup(to_unit))
        && !from.same_dimension(to)
    {
        warn!(
            target = "unit_safe.units",
            from = from_unit,
            to = to_unit,
            "converting between units of different dimensions"
        );
    }
    value * from_factor / to_factor
}
