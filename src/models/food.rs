//! Search result records
//!
//! Rows are kept verbatim as returned by the NDB search endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single matched food, field name to raw JSON value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoodRecord(Map<String, Value>);

impl FoodRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw value of a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Field value when it is a string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// NDB identifier of the food
    pub fn ndbno(&self) -> Option<&str> {
        self.get_str("ndbno")
    }

    /// Food description
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    /// Food group (e.g. "Dairy and Egg Products")
    pub fn group(&self) -> Option<&str> {
        self.get_str("group")
    }

    /// Field names in response order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Ordered search matches; empty when the API returned no match list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SearchResult {
    items: Vec<FoodRecord>,
}

impl SearchResult {
    pub fn new(items: Vec<FoodRecord>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[FoodRecord] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FoodRecord> {
        self.items.iter()
    }

    /// Identifiers of all matches that carry one, in order
    pub fn ndbnos(&self) -> Vec<&str> {
        self.items.iter().filter_map(FoodRecord::ndbno).collect()
    }
}

impl IntoIterator for SearchResult {
    type Item = FoodRecord;
    type IntoIter = std::vec::IntoIter<FoodRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a SearchResult {
    type Item = &'a FoodRecord;
    type IntoIter = std::slice::Iter<'a, FoodRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> FoodRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_record_accessors() {
        let rec = record(json!({
            "offset": 0,
            "group": "Dairy and Egg Products",
            "name": "Butter, salted",
            "ndbno": "01001",
            "ds": "SR"
        }));

        assert_eq!(rec.ndbno(), Some("01001"));
        assert_eq!(rec.name(), Some("Butter, salted"));
        assert_eq!(rec.group(), Some("Dairy and Egg Products"));
        assert_eq!(rec.get("offset"), Some(&json!(0)));
        assert_eq!(rec.get_str("offset"), None);
        assert_eq!(rec.fields().count(), 5);
    }

    #[test]
    fn test_record_keeps_response_field_order() {
        let rec: FoodRecord =
            serde_json::from_str(r#"{"offset": 0, "group": "Fats and Oils", "name": "Butter oil", "ndbno": "01003", "ds": "SR"}"#)
                .unwrap();

        let fields: Vec<&str> = rec.fields().collect();
        assert_eq!(fields, vec!["offset", "group", "name", "ndbno", "ds"]);
        assert_eq!(
            serde_json::to_string(&rec).unwrap(),
            r#"{"offset":0,"group":"Fats and Oils","name":"Butter oil","ndbno":"01003","ds":"SR"}"#
        );
    }

    #[test]
    fn test_search_result_serializes_verbatim() {
        let result = SearchResult::new(vec![
            record(json!({"ndbno": "01001", "name": "Butter"})),
            record(json!({"name": "No id here"})),
        ]);

        assert_eq!(result.len(), 2);
        assert_eq!(result.ndbnos(), vec!["01001"]);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!([{"ndbno": "01001", "name": "Butter"}, {"name": "No id here"}])
        );
    }

    #[test]
    fn test_empty_result() {
        let result = SearchResult::empty();
        assert!(result.is_empty());
        assert_eq!(serde_json::to_string(&result).unwrap(), "[]");
    }
}
