//! Data models
//!
//! Search results and nutrient reports built from NDB responses.

mod food;
mod nutrient_report;

pub use food::{FoodRecord, SearchResult};
pub use nutrient_report::{Nutrient, NutrientReport};
