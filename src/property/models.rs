use crate::units::{BackendUnitValue, DisplayUnitValue};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// A numeric field that admins may enter bare or with an explicit unit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum QuantityField {
    Plain(f64),
    WithUnit(DisplayUnitValue),
}

impl QuantityField {
    /// Bare numbers are read in `default_unit`.
    pub fn to_display(&self, default_unit: &str) -> DisplayUnitValue {
        match self {
            QuantityField::Plain(value) => DisplayUnitValue::new(*value, default_unit),
            QuantityField::WithUnit(value) => value.clone(),
        }
    }
}

/// Property as pasted or submitted by an admin.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    pub id: String,
    pub name: String,
    pub location: String,
    pub price: QuantityField,
    pub area: Option<DisplayUnitValue>,
    pub elevation: Option<DisplayUnitValue>,
    pub price_per_unit: Option<DisplayUnitValue>,
    pub latitude: Option<QuantityField>,
    pub longitude: Option<QuantityField>,
    pub description: Option<String>,
}

/// Property with every numeric field in scaled storage form.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub id: String,
    pub name: String,
    pub location: String,
    pub price: BackendUnitValue,
    pub area: Option<BackendUnitValue>,
    pub elevation: Option<BackendUnitValue>,
    pub price_per_unit: Option<BackendUnitValue>,
    pub latitude: Option<BackendUnitValue>,
    pub longitude: Option<BackendUnitValue>,
    pub description: Option<String>,
}

/// Units a stored property is read back in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayUnits {
    pub price: String,
    pub area: String,
    pub elevation: String,
    pub price_per_unit: String,
    pub coordinate: String,
}

impl Default for DisplayUnits {
    fn default() -> Self {
        Self {
            price: "INR".into(),
            area: "m2".into(),
            elevation: "m".into(),
            price_per_unit: "INR/m2".into(),
            coordinate: "degree".into(),
        }
    }
}

/// Stored property decoded for a form.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyView {
    pub id: String,
    pub name: String,
    pub location: String,
    pub price: DisplayUnitValue,
    pub area: Option<DisplayUnitValue>,
    pub elevation: Option<DisplayUnitValue>,
    pub price_per_unit: Option<DisplayUnitValue>,
    pub latitude: Option<DisplayUnitValue>,
    pub longitude: Option<DisplayUnitValue>,
    pub description: Option<String>,
}
