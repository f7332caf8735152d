use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Category of measurement. Conversions are only meaningful inside one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Length,
    Area,
    Price,
}

impl UnitType {
    pub const ALL: [UnitType; 3] = [UnitType::Length, UnitType::Area, UnitType::Price];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Length => "length",
            UnitType::Area => "area",
            UnitType::Price => "price",
        }
    }

    /// Storage unit used for this type.
    pub fn base_unit(&self) -> &'static str {
        self.dimension().base_unit
    }

    /// Decimal exponent stored next to values of this type.
    pub fn default_scale(&self) -> u32 {
        self.dimension().scale
    }

    fn dimension(&self) -> &'static Dimension {
        match self {
            UnitType::Length => &LENGTH,
            UnitType::Area => &AREA,
            UnitType::Price => &PRICE,
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown unit type `{0}` (expected length, area or price)")]
pub struct UnknownUnitType(pub String);

impl FromStr for UnitType {
    type Err = UnknownUnitType;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "length" => Ok(UnitType::Length),
            "area" => Ok(UnitType::Area),
            "price" => Ok(UnitType::Price),
            other => Err(UnknownUnitType(other.to_string())),
        }
    }
}

/// Physical dimension a unit measures. Units that share a dimension share a
/// reference unit and a storage base, so both multipliers derive from one factor.
#[derive(Debug, PartialEq)]
pub(crate) struct Dimension {
    pub name: &'static str,
    pub reference_unit: &'static str,
    pub base_unit: &'static str,
    pub scale: u32,
    /// Whether units of this dimension take part in display conversion.
    pub convertible: bool,
}

impl Dimension {
    /// How many base units make up one reference unit.
    pub fn base_per_reference(&self) -> f64 {
        10f64.powi(self.scale as i32)
    }
}

pub(crate) static LENGTH: Dimension = Dimension {
    name: "length",
    reference_unit: "m",
    base_unit: "cm",
    scale: 2,
    convertible: true,
};

pub(crate) static AREA: Dimension = Dimension {
    name: "area",
    reference_unit: "m2",
    base_unit: "cm2",
    scale: 4,
    convertible: true,
};

pub(crate) static PRICE: Dimension = Dimension {
    name: "price",
    reference_unit: "INR",
    base_unit: "paise",
    scale: 2,
    convertible: true,
};

pub(crate) static ANGLE: Dimension = Dimension {
    name: "angle",
    reference_unit: "degree",
    base_unit: "degree",
    scale: 6,
    convertible: false,
};

/// One row of the unit table.
#[derive(Debug)]
pub struct UnitDef {
    pub symbol: &'static str,
    pub unit_type: UnitType,
    pub(crate) dimension: &'static Dimension,
    /// Multiplier into the dimension's reference unit (m, m2, INR, degree).
    pub to_reference: f64,
}

impl UnitDef {
    /// Multiplier from a display value to the base-unit integer.
    pub fn scale_factor(&self) -> f64 {
        self.to_reference * self.dimension.base_per_reference()
    }

    /// Multiplier used for display-to-display conversion. Degrees have none.
    pub fn conversion_factor(&self) -> Option<f64> {
        self.dimension.convertible.then_some(self.to_reference)
    }

    pub fn base_unit(&self) -> &'static str {
        self.dimension.base_unit
    }

    pub fn scale(&self) -> u32 {
        self.dimension.scale
    }

    /// Unit every display conversion passes through.
    pub fn reference_unit(&self) -> &'static str {
        self.dimension.reference_unit
    }

    pub fn dimension_name(&self) -> &'static str {
        self.dimension.name
    }

    pub(crate) fn same_dimension(&self, other: &UnitDef) -> bool {
        self.dimension == other.dimension
    }
}

// Declaration order within a type is the order shown in selection lists.
#[rustfmt::skip]
static UNIT_TABLE: &[UnitDef] = &[
    UnitDef { symbol: "m", unit_type: UnitType::Length, dimension: &LENGTH, to_reference: 1.0 },
    UnitDef { symbol: "ft", unit_type: UnitType::Length, dimension: &LENGTH, to_reference: 0.3048 },
    UnitDef { symbol: "cm", unit_type: UnitType::Length, dimension: &LENGTH, to_reference: 0.01 },
    UnitDef { symbol: "degree", unit_type: UnitType::Length, dimension: &ANGLE, to_reference: 1.0 },
    UnitDef { symbol: "m2", unit_type: UnitType::Area, dimension: &AREA, to_reference: 1.0 },
    UnitDef { symbol: "ft2", unit_type: UnitType::Area, dimension: &AREA, to_reference: 0.092903 },
    UnitDef { symbol: "acre", unit_type: UnitType::Area, dimension: &AREA, to_reference: 4046.86 },
    UnitDef { symbol: "cm2", unit_type: UnitType::Area, dimension: &AREA, to_reference: 0.0001 },
    UnitDef { symbol: "INR", unit_type: UnitType::Price, dimension: &PRICE, to_reference: 1.0 },
    UnitDef { symbol: "INR/m2", unit_type: UnitType::Price, dimension: &PRICE, to_reference: 1.0 },
    UnitDef { symbol: "INR/ft2", unit_type: UnitType::Price, dimension: &PRICE, to_reference: 1.0 },
    UnitDef { symbol: "paise", unit_type: UnitType::Price, dimension: &PRICE, to_reference: 0.01 },
];

// Indexed by `UnitType` discriminant, in `UnitType::ALL` order.
static UNITS_BY_TYPE: Lazy<[Vec<&'static str>; 3]> = Lazy::new(|| {
    UnitType::ALL.map(|unit_type| {
        UNIT_TABLE
            .iter()
            .filter(|def| def.unit_type == unit_type)
            .map(|def| def.symbol)
            .collect()
    })
});

/// Exact-match lookup; unit symbols are case sensitive (`INR` vs `inr`).
pub fn lookup(unit: &str) -> Option<&'static UnitDef> {
    UNIT_TABLE.iter().find(|def| def.symbol == unit)
}

pub fn is_valid_unit(unit: &str, unit_type: UnitType) -> bool {
    get_units_for_type(unit_type)
        .iter()
        .any(|candidate| *candidate == unit)
}

pub fn get_units_for_type(unit_type: UnitType) -> &'static [&'static str] {
    UNITS_BY_TYPE[unit_type as usize].as_slice()
}

pub fn get_unit_type(unit: &str) -> Option<UnitType> {
    UnitType::ALL
        .into_iter()
        .find(|unit_type| is_valid_unit(unit, *unit_type))
}

/// Storage unit a display unit lands in; unknown symbols map to themselves.
pub fn base_unit_for_display_unit(unit: &str) -> &str {
    match lookup(unit) {
        Some(def) => def.base_unit(),
        None => unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= expected.abs() * 1e-12,
            "{actual} != {expected}"
        );
    }

    #[test]
    fn unit_lists_keep_declaration_order() {
        assert_eq!(
            get_units_for_type(UnitType::Length),
            &["m", "ft", "cm", "degree"]
        );
        assert_eq!(
            get_units_for_type(UnitType::Area),
            &["m2", "ft2", "acre", "cm2"]
        );
        assert_eq!(
            get_units_for_type(UnitType::Price),
            &["INR", "INR/m2", "INR/ft2", "paise"]
        );
    }

    #[test]
    fn every_listed_unit_has_exactly_one_table_row() {
        for unit_type in UnitType::ALL {
            for unit in get_units_for_type(unit_type) {
                let rows = UNIT_TABLE.iter().filter(|def| def.symbol == *unit).count();
                assert_eq!(rows, 1, "{unit}");
                assert_eq!(lookup(unit).map(|def| def.unit_type), Some(unit_type));
            }
        }
        assert_eq!(UNIT_TABLE.len(), 12);
    }

    #[test]
    fn derived_scale_factors_match_storage_units() {
        let expected = [
            ("m", 100.0),
            ("ft", 30.48),
            ("cm", 1.0),
            ("degree", 1_000_000.0),
            ("m2", 10_000.0),
            ("ft2", 929.03),
            ("acre", 40_468_600.0),
            ("cm2", 1.0),
            ("INR", 100.0),
            ("INR/m2", 100.0),
            ("INR/ft2", 100.0),
            ("paise", 1.0),
        ];
        for (unit, factor) in expected {
            assert_close(lookup(unit).unwrap().scale_factor(), factor);
        }
    }

    #[test]
    fn unit_type_lookup() {
        assert_eq!(get_unit_type("ft"), Some(UnitType::Length));
        assert_eq!(get_unit_type("degree"), Some(UnitType::Length));
        assert_eq!(get_unit_type("acre"), Some(UnitType::Area));
        assert_eq!(get_unit_type("INR/ft2"), Some(UnitType::Price));
        assert_eq!(get_unit_type("inr"), None);
        assert_eq!(get_unit_type(""), None);
    }

    #[test]
    fn validity_is_scoped_to_type() {
        assert!(is_valid_unit("m", UnitType::Length));
        assert!(!is_valid_unit("m", UnitType::Area));
        assert!(!is_valid_unit("bogus", UnitType::Price));
    }

    #[test]
    fn base_units() {
        assert_eq!(UnitType::Length.base_unit(), "cm");
        assert_eq!(UnitType::Area.base_unit(), "cm2");
        assert_eq!(UnitType::Price.base_unit(), "paise");
        assert_eq!(UnitType::Area.default_scale(), 4);
        assert_eq!(base_unit_for_display_unit("ft"), "cm");
        assert_eq!(base_unit_for_display_unit("INR/m2"), "paise");
        assert_eq!(base_unit_for_display_unit("degree"), "degree");
        assert_eq!(base_unit_for_display_unit("furlong"), "furlong");
    }

    #[test]
    fn unit_type_parses_from_str() {
        assert_eq!("Area".parse::<UnitType>(), Ok(UnitType::Area));
        let err = "volume".parse::<UnitType>().unwrap_err();
        assert_eq!(err, UnknownUnitType("volume".into()));
        assert_eq!(
            err.to_string(),
            "unknown unit type `volume` (expected length, area or price)"
        );
    }

    #[test]
    fn unit_lists_follow_the_table() {
        for unit_type in UnitType::ALL {
            let from_table: Vec<&str> = UNIT_TABLE
                .iter()
                .filter(|def| def.unit_type == unit_type)
                .map(|def| def.symbol)
                .collect();
            assert_eq!(get_units_for_type(unit_type), from_table.as_slice());
        }
    }

    #[test]
    fn degrees_have_no_display_factor() {
        assert_eq!(lookup("degree").unwrap().conversion_factor(), None);
        assert_eq!(lookup("ft").unwrap().conversion_factor(), Some(0.3048));
        assert_eq!(lookup("acre").unwrap().conversion_factor(), Some(4046.86));
    }
}
