//! Nutrient report fetch
//!
//! Fetches a V2 "basic" report for a food and reshapes its nutrient list into
//! a [`NutrientReport`]. A food the API cannot describe is a recoverable miss.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::{NdbClient, NdbResult};
use crate::models::NutrientReport;

/// Why a report could not be built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MissReason {
    /// `foods` absent or empty
    NoFood,
    /// The API answered with its own error for this food
    Api { message: String },
    /// `food.nutrients` absent or not a list
    NoNutrients,
    /// A nutrient entry lacked `name`, `value` or `unit`
    MalformedNutrient { index: usize },
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissReason::NoFood => write!(f, "no food in response"),
            MissReason::Api { message } => write!(f, "{}", message),
            MissReason::NoNutrients => write!(f, "no nutrient list in response"),
            MissReason::MalformedNutrient { index } => {
                write!(f, "malformed nutrient entry at index {}", index)
            }
        }
    }
}

/// A food whose report could not be built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMiss {
    pub ndbno: String,
    pub reason: MissReason,
}

/// Outcome of a report request that reached the API
#[derive(Debug, Clone, PartialEq)]
pub enum ReportLookup {
    Found(NutrientReport),
    NotFound(ReportMiss),
}

impl ReportLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, ReportLookup::Found(_))
    }

    pub fn found(self) -> Option<NutrientReport> {
        match self {
            ReportLookup::Found(report) => Some(report),
            ReportLookup::NotFound(_) => None,
        }
    }

    pub fn miss(&self) -> Option<&ReportMiss> {
        match self {
            ReportLookup::Found(_) => None,
            ReportLookup::NotFound(miss) => Some(miss),
        }
    }
}

/// Reports for several foods, with the ones that could not be found
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub reports: Vec<NutrientReport>,
    pub misses: Vec<ReportMiss>,
}

/// Nutrient entry as it appears in the V2 report
#[derive(Debug, Deserialize)]
struct RawNutrient {
    name: String,
    value: Value,
    unit: String,
}

impl NdbClient {
    /// Fetch the nutrient report for `ndbno`
    ///
    /// Transport and JSON failures are errors. A response without
    /// `foods[0].food.nutrients` logs one warning and yields
    /// [`ReportLookup::NotFound`].
    pub fn report(&self, ndbno: &str) -> NdbResult<ReportLookup> {
        let params = [
            ("ndbno", ndbno),
            ("type", "b"),
            ("format", "json"),
            ("api_key", self.api_key()),
        ];
        let response = self.get_json(&self.report_url, &params)?;

        match reshape(ndbno, &response) {
            Ok(report) => {
                tracing::debug!("Report for NDB={} has {} nutrients", ndbno, report.len());
                Ok(ReportLookup::Found(report))
            }
            Err(reason) => {
                tracing::warn!("Couldn't find NDB={} ({})", ndbno, reason);
                Ok(ReportLookup::NotFound(ReportMiss {
                    ndbno: ndbno.to_string(),
                    reason,
                }))
            }
        }
    }

    /// Fetch reports for several foods in order
    ///
    /// Misses are collected and the batch continues; a transport failure stops it.
    pub fn reports<I, S>(&self, ndbnos: I) -> NdbResult<BatchReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut batch = BatchReport::default();

        for ndbno in ndbnos {
            match self.report(ndbno.as_ref())? {
                ReportLookup::Found(report) => batch.reports.push(report),
                ReportLookup::NotFound(miss) => batch.misses.push(miss),
            }
        }

        if !batch.misses.is_empty() {
            tracing::info!(
                "Fetched {} reports, {} not found",
                batch.reports.len(),
                batch.misses.len()
            );
        }

        Ok(batch)
    }
}

/// Build the report table from `foods[0].food.nutrients`
///
/// Later entries with a repeated nutrient name replace earlier ones.
fn reshape(ndbno: &str, response: &Value) -> Result<NutrientReport, MissReason> {
    let entry = response.pointer("/foods/0").ok_or(MissReason::NoFood)?;

    let Some(food) = entry.get("food") else {
        return Err(match entry.get("error").and_then(Value::as_str) {
            Some(message) => MissReason::Api {
                message: message.to_string(),
            },
            None => MissReason::NoFood,
        });
    };

    let nutrients = food
        .get("nutrients")
        .and_then(Value::as_array)
        .ok_or(MissReason::NoNutrients)?;

    let mut report = NutrientReport::new(ndbno);
    report.food_name = food
        .pointer("/desc/name")
        .and_then(Value::as_str)
        .map(str::to_string);

    for (index, entry) in nutrients.iter().enumerate() {
        let raw = RawNutrient::deserialize(entry)
            .map_err(|_| MissReason::MalformedNutrient { index })?;
        report.insert(raw.name, parse_quantity(&raw.value), raw.unit);
    }

    Ok(report)
}

/// NDB reports values as numbers or numeric strings; anything else is NaN
fn parse_quantity(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}
