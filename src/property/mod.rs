pub mod encode;
pub mod models;
pub mod validate;

pub use encode::{PropertyError, import_property};
pub use models::{DisplayUnits, PropertyInput, PropertyRecord, PropertyView, QuantityField};
pub use validate::{ValidationReport, validate_property_with_units};
