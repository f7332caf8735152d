use super::models::{DisplayUnits, PropertyInput, PropertyRecord, PropertyView, QuantityField};
use super::validate::{ValidationReport, is_truthy, validate_property_with_units};
use crate::units::{
    BackendUnitValue, ConversionError, DisplayUnitValue, UnitType, try_from_backend_unit_value,
    try_to_backend_unit_value,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

// Optional fields the validator skips when falsy; they are dropped before decoding.
const OPTIONAL_MEASURED_FIELDS: [&str; 5] =
    ["area", "elevation", "pricePerUnit", "latitude", "longitude"];

#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("property failed validation: {}", .0.errors.join("; "))]
    Invalid(ValidationReport),
    #[error("property has an unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("field `{field}`: {source}")]
    Conversion {
        field: &'static str,
        #[source]
        source: ConversionError,
    },
}

impl PropertyError {
    fn conversion(field: &'static str) -> impl FnOnce(ConversionError) -> Self {
        move |source| PropertyError::Conversion { field, source }
    }
}

impl PropertyInput {
    /// Validates a raw payload and decodes it. Warnings from the validator are
    /// logged and returned alongside the input.
    pub fn from_json(payload: &Value) -> Result<(Self, Vec<String>), PropertyError> {
        let report = validate_property_with_units(payload);
        if !report.valid {
            return Err(PropertyError::Invalid(report));
        }
        for notice in &report.warnings {
            debug!(target = "unit_safe.property", notice = %notice, "validation warning");
        }

        let mut cleaned = payload.clone();
        if let Some(fields) = cleaned.as_object_mut() {
            for key in OPTIONAL_MEASURED_FIELDS {
                if !is_truthy(fields.get(key)) {
                    fields.remove(key);
                }
            }
        }
        let input = serde_json::from_value(cleaned)?;
        Ok((input, report.warnings))
    }
}

impl PropertyRecord {
    /// Encodes every numeric field. Plain prices are rupees and plain
    /// coordinates are degrees.
    pub fn try_from_input(input: &PropertyInput, editors: &[String]) -> Result<Self, PropertyError> {
        let encode = |field: &'static str,
                      value: &DisplayUnitValue,
                      unit_type: UnitType|
         -> Result<BackendUnitValue, PropertyError> {
            try_to_backend_unit_value(value, unit_type)
                .map(|stored| stored.with_editors(editors.iter().cloned()))
                .map_err(PropertyError::conversion(field))
        };
        let coordinate = |field: &'static str, value: &Option<QuantityField>| {
            value
                .as_ref()
                .map(|value| encode(field, &value.to_display("degree"), UnitType::Length))
                .transpose()
        };

        Ok(Self {
            id: input.id.clone(),
            name: input.name.clone(),
            location: input.location.clone(),
            price: encode("price", &input.price.to_display("INR"), UnitType::Price)?,
            area: input
                .area
                .as_ref()
                .map(|value| encode("area", value, UnitType::Area))
                .transpose()?,
            elevation: input
                .elevation
                .as_ref()
                .map(|value| encode("elevation", value, UnitType::Length))
                .transpose()?,
            price_per_unit: input
                .price_per_unit
                .as_ref()
                .map(|value| encode("pricePerUnit", value, UnitType::Price))
                .transpose()?,
            latitude: coordinate("latitude", &input.latitude)?,
            longitude: coordinate("longitude", &input.longitude)?,
            description: input.description.clone(),
        })
    }

    /// Decodes the record for display in `units`.
    pub fn to_view(&self, units: &DisplayUnits) -> Result<PropertyView, PropertyError> {
        let decode = |field: &'static str, stored: &BackendUnitValue, unit: &str| {
            try_from_backend_unit_value(stored, unit).map_err(PropertyError::conversion(field))
        };
        let optional = |field: &'static str, stored: &Option<BackendUnitValue>, unit: &str| {
            stored
                .as_ref()
                .map(|stored| decode(field, stored, unit))
                .transpose()
        };

        Ok(PropertyView {
            id: self.id.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            price: decode("price", &self.price, &units.price)?,
            area: optional("area", &self.area, &units.area)?,
            elevation: optional("elevation", &self.elevation, &units.elevation)?,
            price_per_unit: optional("pricePerUnit", &self.price_per_unit, &units.price_per_unit)?,
            latitude: optional("latitude", &self.latitude, &units.coordinate)?,
            longitude: optional("longitude", &self.longitude, &units.coordinate)?,
            description: self.description.clone(),
        })
    }
}

/// Validate, decode and encode in one step, as the admin import does.
pub fn import_property(payload: &Value, editors: &[String]) -> Result<PropertyRecord, PropertyError> {
    let (input, warnings) = PropertyInput::from_json(payload)?;
    let record = PropertyRecord::try_from_input(&input, editors)?;
    if !warnings.is_empty() {
        warn!(
            target = "unit_safe.property",
            id = %record.id,
            count = warnings.len(),
            "property imported with warnings"
        );
    }
    Ok(record)
}
