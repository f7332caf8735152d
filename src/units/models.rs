use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

/// Roles allowed to edit a stored value unless the caller says otherwise.
pub const DEFAULT_EDITORS: &[&str] = &["Admin", "Owner"];

/// A value as a person types or reads it, possibly fractional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayUnitValue {
    pub value: f64,
    pub unit: String,
}

impl DisplayUnitValue {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

/// Scaled-integer storage form. `value` is a count of `unit`, and `unit` is the
/// canonical base unit of the type it was encoded under, not the unit typed in.
///
/// The integer travels as a decimal string in JSON so it survives parsers that
/// read numbers as doubles.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendUnitValue {
    #[serde_as(as = "DisplayFromStr")]
    pub value: i128,
    pub unit: String,
    pub scale: u32,
    #[serde(default = "default_editors")]
    pub editable_by: Vec<String>,
}

impl BackendUnitValue {
    pub fn with_editors<I, S>(mut self, editors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.editable_by = editors.into_iter().map(Into::into).collect();
        self
    }
}

pub fn default_editors() -> Vec<String> {
    DEFAULT_EDITORS.iter().map(|role| role.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn backend_value_serializes_integer_as_string() {
        let stored = BackendUnitValue {
            value: 5_557_000,
            unit: "cm2".into(),
            scale: 4,
            editable_by: default_editors(),
        };
        let encoded = serde_json::to_value(&stored).unwrap();
        assert_eq!(
            encoded,
            json!({
                "value": "5557000",
                "unit": "cm2",
                "scale": 4,
                "editableBy": ["Admin", "Owner"],
            })
        );
    }

    #[test]
    fn missing_editors_default_to_admin_and_owner() {
        let stored: BackendUnitValue =
            serde_json::from_value(json!({"value": "-12", "unit": "paise", "scale": 2})).unwrap();
        assert_eq!(stored.value, -12);
        assert_eq!(stored.editable_by, vec!["Admin", "Owner"]);
    }

    #[test]
    fn editors_can_be_replaced() {
        let stored = BackendUnitValue {
            value: 1,
            unit: "cm".into(),
            scale: 2,
            editable_by: default_editors(),
        }
        .with_editors(["Auditor"]);
        assert_eq!(stored.editable_by, vec!["Auditor"]);
    }
}
