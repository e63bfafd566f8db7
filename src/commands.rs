//! CLI command implementations
//!
//! Each command returns a serializable response; the binary prints it as JSON.

use serde::Serialize;

use crate::api::{NdbClient, NdbResult, ReportMiss};
use crate::models::{FoodRecord, NutrientReport};
use crate::units::{NormalizedQuantity, UnitRegistry, UnitResult};

/// Response for `search`
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub term: String,
    pub total: usize,
    pub items: Vec<FoodRecord>,
}

/// A report row with its normalized quantity, or why it could not be normalized
#[derive(Debug, Serialize)]
pub struct NormalizedRow {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub normalized: Option<NormalizedQuantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A report with every row run through the normalizer
#[derive(Debug, Serialize)]
pub struct NormalizedReport {
    pub ndbno: String,
    pub food_name: Option<String>,
    pub rows: Vec<NormalizedRow>,
}

impl NormalizedReport {
    pub fn from_report(report: &NutrientReport, registry: &UnitRegistry) -> Self {
        let rows = report
            .normalize(registry)
            .into_iter()
            .zip(report.iter())
            .map(|((name, result), (_, nutrient))| {
                let (normalized, error) = match result {
                    Ok(q) => (Some(q), None),
                    Err(e) => (None, Some(e.to_string())),
                };
                NormalizedRow {
                    name: name.to_string(),
                    quantity: nutrient.quantity,
                    unit: nutrient.unit.clone(),
                    normalized,
                    error,
                }
            })
            .collect();

        Self {
            ndbno: report.ndbno.clone(),
            food_name: report.food_name.clone(),
            rows,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReportEntry {
    Raw(NutrientReport),
    Normalized(NormalizedReport),
}

/// Response for `report`
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub reports: Vec<ReportEntry>,
    pub misses: Vec<ReportMiss>,
}

/// Response for `convert`
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub quantity: String,
    pub unit: String,
    pub normalized: NormalizedQuantity,
    pub display: String,
}

pub fn search(client: &NdbClient, term: &str) -> NdbResult<SearchResponse> {
    let result = client.search(term)?;
    Ok(SearchResponse {
        term: term.to_string(),
        total: result.len(),
        items: result.into_iter().collect(),
    })
}

/// Fetch reports, normalizing them when a registry is given
pub fn report(
    client: &NdbClient,
    ndbnos: &[String],
    registry: Option<&UnitRegistry>,
) -> NdbResult<ReportResponse> {
    let batch = client.reports(ndbnos)?;

    let reports = batch
        .reports
        .into_iter()
        .map(|report| match registry {
            Some(registry) => ReportEntry::Normalized(NormalizedReport::from_report(&report, registry)),
            None => ReportEntry::Raw(report),
        })
        .collect();

    Ok(ReportResponse {
        reports,
        misses: batch.misses,
    })
}

pub fn convert(registry: &UnitRegistry, quantity: &str, unit: &str) -> UnitResult<ConvertResponse> {
    let normalized = registry.normalize_str(quantity, unit)?;
    Ok(ConvertResponse {
        quantity: quantity.to_string(),
        unit: unit.to_string(),
        normalized,
        display: normalized.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::mock_client;
    use crate::units::CanonicalUnit;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn test_convert_response() {
        let registry = UnitRegistry::new();
        let response = convert(&registry, "200", "g").unwrap();
        assert_eq!(response.normalized.unit, CanonicalUnit::Hectogram);
        assert_eq!(response.display, "2 hg");

        let response = convert(&registry, "5", "IU").unwrap();
        assert!(response.normalized.is_undefined());
        assert_eq!(response.display, "NaN ml");
        assert!(convert(&registry, "abc", "g").is_err());
    }

    #[test]
    fn test_normalized_report_rows() {
        let mut report = NutrientReport::new("01009");
        report.insert("Water", 37.02, "g");
        report.insert("Energy", 404.0, "kcal");

        let normalized = NormalizedReport::from_report(&report, &UnitRegistry::new());
        assert_eq!(normalized.rows.len(), 2);
        assert_eq!(normalized.rows[0].name, "Water");
        assert!(normalized.rows[0].error.is_none());
        assert!((normalized.rows[0].normalized.unwrap().magnitude - 0.3702).abs() < 1e-9);
        assert!(normalized.rows[1].normalized.is_none());
        assert!(normalized.rows[1].error.as_deref().unwrap().contains("kcal"));
    }

    #[test]
    fn test_search_and_report_commands() {
        let mut server = Server::new();
        let _search = server
            .mock("GET", "/ndb/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"list": {"item": [{"ndbno": "01009", "name": "Cheese, cheddar"}]}}).to_string())
            .create();
        let _report = server
            .mock("GET", "/ndb/V2/reports")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"foods": [{"food": {"nutrients": [
                    {"name": "Water", "unit": "g", "value": "37.02"}
                ]}}]})
                .to_string(),
            )
            .create();

        let client = mock_client(&server);

        let response = search(&client, "cheddar").unwrap();
        assert_eq!(response.total, 1);
        assert_eq!(response.items[0].ndbno(), Some("01009"));

        let registry = UnitRegistry::new();
        let response = report(&client, &["01009".to_string()], Some(&registry)).unwrap();
        assert_eq!(response.reports.len(), 1);
        assert!(response.misses.is_empty());
        match &response.reports[0] {
            ReportEntry::Normalized(r) => assert_eq!(r.rows[0].unit, "g"),
            ReportEntry::Raw(_) => panic!("expected normalized report"),
        }
    }
}
