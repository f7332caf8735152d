pub mod convert;
pub mod models;
pub mod numeric;
pub mod registry;
pub mod storage;

use thiserror::Error;

pub use convert::{convert_unit, try_convert_unit};
pub use models::{BackendUnitValue, DEFAULT_EDITORS, DisplayUnitValue};
pub use numeric::{
    NumericInput, create_conversion_warning, format_unit_value, is_decimal_value,
    parse_numeric_value,
};
pub use registry::{
    UnitType, base_unit_for_display_unit, get_unit_type, get_units_for_type, is_valid_unit,
};
pub use storage::{
    from_backend_unit_value, to_backend_unit_value, try_from_backend_unit_value,
    try_to_backend_unit_value,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("unknown unit `{0}`")]
    UnknownUnit(String),
    #[error("cannot convert `{from}` ({from_dimension}) to `{to}` ({to_dimension})")]
    IncompatibleUnits {
        from: String,
        to: String,
        from_dimension: &'static str,
        to_dimension: &'static str,
    },
    #[error("unit `{unit}` does not belong to unit type {expected}")]
    UnitTypeMismatch { unit: String, expected: UnitType },
    #[error("stored unit `{stored}` cannot be read as `{display}` (expects `{expected}`)")]
    BaseUnitMismatch {
        stored: String,
        display: String,
        expected: &'static str,
    },
    #[error("value {0} is not a finite number")]
    NonFinite(f64),
    #[error("scaled value {0} does not fit the storage integer")]
    OutOfRange(f64),
    #[error("invalid numeric value: {0}")]
    InvalidNumber(String),
}
