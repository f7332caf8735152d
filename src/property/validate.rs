use crate::units::registry::lookup;
use crate::units::storage::round_half_up;
use crate::units::{UnitType, base_unit_for_display_unit, is_valid_unit};
use serde::Serialize;
use serde_json::{Map, Value};

/// Outcome of checking an untrusted property payload. Warnings never make a
/// payload invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

struct MeasuredField {
    key: &'static str,
    unit_type: UnitType,
}

const REQUIRED_TEXT_FIELDS: [&str; 3] = ["id", "name", "location"];

const MEASURED_FIELDS: [MeasuredField; 3] = [
    MeasuredField {
        key: "area",
        unit_type: UnitType::Area,
    },
    MeasuredField {
        key: "elevation",
        unit_type: UnitType::Length,
    },
    MeasuredField {
        key: "pricePerUnit",
        unit_type: UnitType::Price,
    },
];

const COORDINATE_FIELDS: [&str; 2] = ["latitude", "longitude"];

/// Checks every field and collects all problems rather than stopping at the
/// first one. Never panics, whatever the payload looks like.
pub fn validate_property_with_units(payload: &Value) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let empty = Map::new();
    let fields = match payload.as_object() {
        Some(fields) => fields,
        None => {
            errors.push("property must be a JSON object".to_string());
            &empty
        }
    };

    for key in REQUIRED_TEXT_FIELDS {
        if !is_truthy(fields.get(key)) {
            errors.push(format!("Missing required field: {key}"));
        }
    }

    check_price(fields.get("price"), &mut errors);

    for field in &MEASURED_FIELDS {
        let Some(raw) = fields.get(field.key).filter(|raw| is_truthy(Some(*raw))) else {
            continue;
        };
        check_measured(field, raw, &mut errors, &mut warnings);
    }

    for key in COORDINATE_FIELDS {
        if let Some(raw) = fields.get(key)
            && !raw.is_number()
            && !is_object_like(raw)
        {
            errors.push(format!("{key} must be a number or DisplayUnitValue"));
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn check_price(price: Option<&Value>, errors: &mut Vec<String>) {
    match price {
        None => errors.push("Missing required field: price".to_string()),
        Some(Value::Number(_)) => {}
        Some(raw) if is_object_like(raw) => {
            if !member(raw, "value").is_some_and(Value::is_number) {
                errors.push("price.value must be a number, not an object or BigInt".to_string());
            }
            if !is_truthy(member(raw, "unit")) {
                errors.push("price.unit is required when price is an object".to_string());
            }
        }
        Some(_) => errors.push(
            "price must be a number or DisplayUnitValue object with numeric value".to_string(),
        ),
    }
}

fn check_measured(
    field: &MeasuredField,
    raw: &Value,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let key = field.key;
    if !is_object_like(raw) {
        errors.push(format!(
            "{key} must be a DisplayUnitValue object with {{ value: number, unit: string }}"
        ));
        return;
    }
    let Some(value) = member(raw, "value").and_then(Value::as_f64) else {
        errors.push(format!(
            "{key}.value must be a number (not an object or BigInt)"
        ));
        return;
    };
    // A missing unit is only non-standard; the notice still goes out.
    let unit = unit_text(member(raw, "unit"));
    let unit = unit.as_str();

    if !is_valid_unit(unit, field.unit_type) {
        warnings.push(format!(
            "{key}.unit '{unit}' is not a standard {} unit",
            field.unit_type
        ));
    }
    let factor = lookup(unit).map(|def| def.scale_factor()).unwrap_or(1.0);
    warnings.push(format!(
        "{key}: {value} {unit} → {:.0} {} (Unit-Safe storage)",
        round_half_up(value * factor),
        base_unit_for_display_unit(unit)
    ));
}

// How a unit member reads when interpolated into a message.
fn unit_text(unit: Option<&Value>) -> String {
    match unit {
        None => "undefined".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Object(_)) => "[object Object]".to_string(),
        Some(other) => other.to_string(),
    }
}

// Loose JSON truthiness: null, false, 0, "" and absent are all "not set".
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

// null and arrays count as objects here; they just have no members.
fn is_object_like(value: &Value) -> bool {
    matches!(value, Value::Null | Value::Array(_) | Value::Object(_))
}

fn member<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object()?.get(key)
}
