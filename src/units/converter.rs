//! Unit normalization
//!
//! Converts raw nutrient quantities to a per-hectogram or per-deciliter basis.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::registry::{Dimension, UnitDef, UnitRegistry, DECILITER};

/// Normalizer failures that are not handled by the fallback policy
#[derive(Debug, Error)]
pub enum UnitError {
    #[error("Invalid quantity '{0}'")]
    InvalidQuantity(String),

    #[error("Cannot convert '{unit}' {dimension} to hectogram or deciliter")]
    Incompatible { unit: String, dimension: Dimension },
}

/// Result type for normalization
pub type UnitResult<T> = Result<T, UnitError>;

/// Target unit of a normalized quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalUnit {
    /// 100 g
    Hectogram,
    /// 100 ml
    Deciliter,
    /// Unit was not recognized; magnitude is NaN
    Undefined,
}

impl CanonicalUnit {
    /// Short symbol for display. Undefined values are reported against milliliters.
    pub fn symbol(&self) -> &'static str {
        match self {
            CanonicalUnit::Hectogram => "hg",
            CanonicalUnit::Deciliter => "dl",
            CanonicalUnit::Undefined => "ml",
        }
    }
}

/// A quantity expressed in a canonical unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedQuantity {
    pub magnitude: f64,
    pub unit: CanonicalUnit,
}

impl NormalizedQuantity {
    pub fn undefined() -> Self {
        Self {
            magnitude: f64::NAN,
            unit: CanonicalUnit::Undefined,
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.unit == CanonicalUnit::Undefined
    }
}

impl fmt::Display for NormalizedQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit.symbol())
    }
}

/// A magnitude tied to a registered unit
#[derive(Debug, Clone, Copy)]
pub struct Quantity<'r> {
    pub magnitude: f64,
    pub unit: &'r UnitDef,
}

/// Outcome of converting a quantity to another unit
#[derive(Debug, Clone, Copy)]
pub enum Conversion<'r> {
    Converted(Quantity<'r>),
    Incompatible,
}

impl<'r> Quantity<'r> {
    /// Convert to `target`, or report that the dimensions differ
    pub fn to(&self, target: &'r UnitDef) -> Conversion<'r> {
        if self.unit.dimension != target.dimension {
            return Conversion::Incompatible;
        }

        Conversion::Converted(Quantity {
            magnitude: self.magnitude * self.unit.factor / target.factor,
            unit: target,
        })
    }
}

impl UnitRegistry {
    /// Attach a unit to a magnitude. `None` when the unit is not registered.
    pub fn quantity(&self, magnitude: f64, unit: &str) -> Option<Quantity<'_>> {
        self.lookup(unit).map(|unit| Quantity { magnitude, unit })
    }

    /// Normalize `quantity` in `unit` to hectograms, falling back to deciliters
    ///
    /// Unknown units yield an undefined (NaN) quantity rather than an error.
    pub fn normalize(&self, quantity: f64, unit: &str) -> UnitResult<NormalizedQuantity> {
        let Some(source) = self.quantity(quantity, unit) else {
            tracing::debug!("Unrecognized unit '{}', value left undefined", unit);
            return Ok(NormalizedQuantity::undefined());
        };

        if let Conversion::Converted(q) = source.to(self.hectogram()) {
            return Ok(NormalizedQuantity {
                magnitude: q.magnitude,
                unit: CanonicalUnit::Hectogram,
            });
        }

        tracing::debug!("'{}' is not a mass unit, trying {}", unit, DECILITER);
        match source.to(self.deciliter()) {
            Conversion::Converted(q) => Ok(NormalizedQuantity {
                magnitude: q.magnitude,
                unit: CanonicalUnit::Deciliter,
            }),
            Conversion::Incompatible => Err(UnitError::Incompatible {
                unit: unit.to_string(),
                dimension: source.unit.dimension.clone(),
            }),
        }
    }

    /// Like [`UnitRegistry::normalize`], parsing the quantity from text first
    pub fn normalize_str(&self, quantity: &str, unit: &str) -> UnitResult<NormalizedQuantity> {
        let value = quantity
            .trim()
            .parse::<f64>()
            .map_err(|_| UnitError::InvalidQuantity(quantity.to_string()))?;
        self.normalize(value, unit)
    }
}
