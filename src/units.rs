//! Unit conversion table
//!
//! Every supported unit has a fixed factor to the base unit (grams).
//! Volume units are treated as mass-equivalent (1 l = 1 kg), and the
//! unit/box/package factors are nominal kitchen weights rather than
//! physical constants.

use std::fmt;

use serde::{Serialize, Serializer};

/// A measurement unit for ingredient quantities.
///
/// `Unknown` stands in for any tag outside the closed set. It converts with
/// the identity factor, so a legacy or mistyped tag is read as grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Gram,
    Kilogram,
    /// 100 lb
    Quintal,
    Pound,
    Ounce,
    Liter,
    Milliliter,
    UnitCount,
    Box,
    Package,
    Unknown,
}

impl Unit {
    /// The closed set of recognized units, in display order.
    pub const ALL: [Unit; 10] = [
        Unit::Gram,
        Unit::Kilogram,
        Unit::Quintal,
        Unit::Pound,
        Unit::Ounce,
        Unit::Liter,
        Unit::Milliliter,
        Unit::UnitCount,
        Unit::Box,
        Unit::Package,
    ];

    /// Grams in one of this unit.
    pub const fn grams_per_unit(self) -> f64 {
        match self {
            Unit::Gram => 1.0,
            Unit::Kilogram => 1000.0,
            Unit::Quintal => 45359.2,
            Unit::Pound => 453.592,
            Unit::Ounce => 28.3495,
            Unit::Liter => 1000.0,
            Unit::Milliliter => 1.0,
            Unit::UnitCount => 100.0,
            Unit::Box => 500.0,
            Unit::Package => 300.0,
            Unit::Unknown => 1.0,
        }
    }

    /// Canonical short tag
    pub const fn tag(self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Quintal => "qq",
            Unit::Pound => "lb",
            Unit::Ounce => "oz",
            Unit::Liter => "l",
            Unit::Milliliter => "ml",
            Unit::UnitCount => "u",
            Unit::Box => "box",
            Unit::Package => "pkg",
            Unit::Unknown => "?",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Unit::Gram => "gram",
            Unit::Kilogram => "kilogram",
            Unit::Quintal => "quintal",
            Unit::Pound => "pound",
            Unit::Ounce => "ounce",
            Unit::Liter => "liter",
            Unit::Milliliter => "milliliter",
            Unit::UnitCount => "unit",
            Unit::Box => "box",
            Unit::Package => "package",
            Unit::Unknown => "unknown",
        }
    }

    /// Resolve a unit tag. Case and surrounding whitespace are ignored;
    /// anything unrecognized becomes [`Unit::Unknown`].
    pub fn from_tag(tag: &str) -> Unit {
        match tag.trim().to_ascii_lowercase().as_str() {
            "g" | "gr" | "gram" | "grams" | "gramme" | "grammes" => Unit::Gram,
            "kg" | "kgs" | "kilo" | "kilos" | "kilogram" | "kilograms" => Unit::Kilogram,
            "qq" | "quintal" | "quintals" => Unit::Quintal,
            "lb" | "lbs" | "pound" | "pounds" => Unit::Pound,
            "oz" | "ounce" | "ounces" => Unit::Ounce,
            "l" | "lt" | "liter" | "liters" | "litre" | "litres" => Unit::Liter,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Unit::Milliliter
            }
            "u" | "unit" | "units" | "unit-count" | "each" | "ea" => Unit::UnitCount,
            "box" | "boxes" => Unit::Box,
            "pkg" | "pack" | "package" | "packages" => Unit::Package,
            _ => Unit::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        self != Unit::Unknown
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// Express `quantity` of `unit` in grams.
pub fn to_base_grams(quantity: f64, unit: Unit) -> f64 {
    quantity * unit.grams_per_unit()
}

/// Express `grams` in `unit`.
pub fn from_base_grams(grams: f64, unit: Unit) -> f64 {
    grams / unit.grams_per_unit()
}

/// Convert between two units by way of grams.
pub fn convert(quantity: f64, from: Unit, to: Unit) -> f64 {
    from_base_grams(to_base_grams(quantity, from), to)
}
