//! Unit handling module
//!
//! Unit registry and normalization to per-100 g / per-100 ml quantities.

pub mod converter;
pub mod registry;

pub use converter::{CanonicalUnit, Conversion, NormalizedQuantity, Quantity, UnitError, UnitResult};
pub use registry::{
    DefinitionError, DefinitionResult, Dimension, UnitDef, UnitRegistry, DECILITER, HECTOGRAM,
};
