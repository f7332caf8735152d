use super::ConversionError;
use super::models::{BackendUnitValue, DisplayUnitValue, default_editors};
use super::registry::{UnitDef, UnitType, lookup};
use tracing::warn;

// Largest magnitude that converts to i128 without saturating.
const STORAGE_LIMIT: f64 = 1.7e38;

/// Encodes a display value into scaled-integer storage.
///
/// The unit must belong to `unit_type`. The result carries the unit's base
/// unit and scale, e.g. `555.7 m2` becomes `5557000 cm2` at scale 4.
pub fn try_to_backend_unit_value(
    input: &DisplayUnitValue,
    unit_type: UnitType,
) -> Result<BackendUnitValue, ConversionError> {
    let def = lookup(&input.unit).ok_or_else(|| ConversionError::UnknownUnit(input.unit.clone()))?;
    if def.unit_type != unit_type {
        return Err(ConversionError::UnitTypeMismatch {
            unit: input.unit.clone(),
            expected: unit_type,
        });
    }
    encode(def, input.value)
}

/// Lenient form of [`try_to_backend_unit_value`].
///
/// The result always carries the base unit and scale of `unit_type`, whatever
/// family the input unit comes from. Unknown units are stored unconverted at
/// scale 0 under the unit they were given.
pub fn to_backend_unit_value(input: &DisplayUnitValue, unit_type: UnitType) -> BackendUnitValue {
    let Some(def) = lookup(&input.unit) else {
        warn!(
            target = "unit_safe.units",
            unit = %input.unit,
            "unknown scale factor, defaulting to scale 0"
        );
        return unscaled(input);
    };

    if def.unit_type != unit_type {
        warn!(
            target = "unit_safe.units",
            unit = %input.unit,
            expected = %unit_type,
            actual = %def.unit_type,
            "unit does not belong to the requested unit type"
        );
    }

    let encoded = scale_into(
        input.value,
        def.scale_factor(),
        unit_type.base_unit(),
        unit_type.default_scale(),
    );
    match encoded {
        Ok(stored) => stored,
        Err(err) => {
            warn!(target = "unit_safe.units", error = %err, "storing value unscaled");
            unscaled(input)
        }
    }
}

/// Decodes storage back into `display_unit`.
///
/// The stored unit has to be the base unit `display_unit` encodes into;
/// otherwise dividing by the display factor would mix two families.
pub fn try_from_backend_unit_value(
    stored: &BackendUnitValue,
    display_unit: &str,
) -> Result<DisplayUnitValue, ConversionError> {
    let def =
        lookup(display_unit).ok_or_else(|| ConversionError::UnknownUnit(display_unit.to_string()))?;
    if stored.unit != def.base_unit() {
        return Err(ConversionError::BaseUnitMismatch {
            stored: stored.unit.clone(),
            display: display_unit.to_string(),
            expected: def.base_unit(),
        });
    }
    Ok(descale(def, stored, display_unit))
}

/// Lenient form of [`try_from_backend_unit_value`].
///
/// An unknown display unit yields the raw stored integer. A base-unit mismatch
/// is logged and decoded anyway.
pub fn from_backend_unit_value(stored: &BackendUnitValue, display_unit: &str) -> DisplayUnitValue {
    let Some(def) = lookup(display_unit) else {
        warn!(
            target = "unit_safe.units",
            unit = display_unit,
            "unknown scale factor for display unit, using raw value"
        );
        return DisplayUnitValue::new(stored.value as f64, display_unit);
    };

    if stored.unit != def.base_unit() {
        warn!(
            target = "unit_safe.units",
            stored = %stored.unit,
            display = display_unit,
            expected = def.base_unit(),
            "stored unit does not match display unit family"
        );
    }
    descale(def, stored, display_unit)
}

fn encode(def: &UnitDef, value: f64) -> Result<BackendUnitValue, ConversionError> {
    scale_into(value, def.scale_factor(), def.base_unit(), def.scale())
}

fn scale_into(
    value: f64,
    factor: f64,
    base_unit: &str,
    scale: u32,
) -> Result<BackendUnitValue, ConversionError> {
    if !value.is_finite() {
        return Err(ConversionError::NonFinite(value));
    }
    let scaled = round_half_up(value * factor);
    if scaled.abs() >= STORAGE_LIMIT {
        return Err(ConversionError::OutOfRange(scaled));
    }
    Ok(BackendUnitValue {
        value: scaled as i128,
        unit: base_unit.to_string(),
        scale,
        editable_by: default_editors(),
    })
}

fn descale(def: &UnitDef, stored: &BackendUnitValue, display_unit: &str) -> DisplayUnitValue {
    DisplayUnitValue::new(stored.value as f64 / def.scale_factor(), display_unit)
}

// Saturates instead of failing; NaN lands on zero.
fn unscaled(input: &DisplayUnitValue) -> BackendUnitValue {
    BackendUnitValue {
        value: round_half_up(input.value) as i128,
        unit: input.unit.clone(),
        scale: 0,
        editable_by: default_editors(),
    }
}

/// Rounds ties toward positive infinity (`-2.5` to `-2`, `2.5` to `3`).
pub fn round_half_up(value: f64) -> f64 {
    let rounded = value.round();
    if value - rounded == 0.5 {
        rounded + 1.0
    } else {
        rounded
    }
}
