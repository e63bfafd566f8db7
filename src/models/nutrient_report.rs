//! Nutrient report table
//!
//! One row per nutrient name holding the reported quantity and unit.
//! Values are per 100 g (or 100 ml) of the food, as NDB reports them.

use indexmap::IndexMap;
use serde::Serialize;

use crate::units::{NormalizedQuantity, UnitRegistry, UnitResult};

/// A single report row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nutrient {
    pub quantity: f64,
    pub unit: String,
}

/// Nutrient table keyed by nutrient name, in first-seen order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientReport {
    pub ndbno: String,
    pub food_name: Option<String>,
    pub nutrients: IndexMap<String, Nutrient>,
}

impl NutrientReport {
    pub fn new(ndbno: impl Into<String>) -> Self {
        Self {
            ndbno: ndbno.into(),
            food_name: None,
            nutrients: IndexMap::new(),
        }
    }

    /// Record a nutrient row
    ///
    /// A repeated name replaces both quantity and unit of the earlier row,
    /// which keeps its original position. Returns the replaced row.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
    ) -> Option<Nutrient> {
        self.nutrients.insert(
            name.into(),
            Nutrient {
                quantity,
                unit: unit.into(),
            },
        )
    }

    pub fn get(&self, name: &str) -> Option<&Nutrient> {
        self.nutrients.get(name)
    }

    pub fn quantity(&self, name: &str) -> Option<f64> {
        self.get(name).map(|n| n.quantity)
    }

    pub fn unit(&self, name: &str) -> Option<&str> {
        self.get(name).map(|n| n.unit.as_str())
    }

    pub fn len(&self) -> usize {
        self.nutrients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nutrients.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Nutrient> {
        self.nutrients.iter()
    }

    /// Normalize every row, keeping per-row failures
    pub fn normalize<'a>(
        &'a self,
        registry: &UnitRegistry,
    ) -> Vec<(&'a str, UnitResult<NormalizedQuantity>)> {
        self.nutrients
            .iter()
            .map(|(name, n)| (name.as_str(), registry.normalize(n.quantity, &n.unit)))
            .collect()
    }
}
