//! NDB Library
//!
//! Client for the USDA Nutrition DataBase: food search, nutrient reports and
//! normalization of nutrient quantities to per-100 g / per-100 ml units.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod units;

pub use api::{NdbClient, NdbError, NdbResult, ReportLookup, ReportMiss};
pub use models::{FoodRecord, NutrientReport, SearchResult};
pub use units::{CanonicalUnit, NormalizedQuantity, UnitRegistry};
