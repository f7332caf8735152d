//! Unit-safe storage for property records and normalization of app
//! subdomains and URLs.
//!
//! Numeric fields are entered as display values (`555.7 m2`) and stored as
//! scaled integers in a canonical base unit (`5557000 cm2`, scale 4). Every
//! conversion has a strict `try_*` form and a lenient form that logs and
//! falls back instead of failing.

pub mod config;
pub mod normalize;
pub mod property;
pub mod units;

pub use config::Settings;
pub use property::{PropertyRecord, ValidationReport, import_property, validate_property_with_units};
pub use units::{BackendUnitValue, ConversionError, DisplayUnitValue, UnitType};
