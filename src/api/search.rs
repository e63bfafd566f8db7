//! Food search

use serde_json::Value;

use super::client::{NdbClient, NdbResult};
use crate::models::{FoodRecord, SearchResult};

impl NdbClient {
    /// Search NDB for foods matching `term`
    ///
    /// A response without a match list is an empty result, not an error.
    pub fn search(&self, term: &str) -> NdbResult<SearchResult> {
        let params = [("format", "json"), ("q", term), ("api_key", self.api_key())];
        let response = self.get_json(&self.search_url, &params)?;

        let result = search_result_from(response)?;
        tracing::debug!("Search '{}' matched {} foods", term, result.len());
        Ok(result)
    }
}

/// Pull `list.item` out of a search response
fn search_result_from(mut response: Value) -> NdbResult<SearchResult> {
    match response.pointer_mut("/list/item").map(Value::take) {
        Some(items @ Value::Array(_)) => {
            let items: Vec<FoodRecord> = serde_json::from_value(items)?;
            Ok(SearchResult::new(items))
        }
        _ => {
            if let Some(message) = response
                .pointer("/errors/error/0/message")
                .and_then(Value::as_str)
            {
                tracing::debug!("Search returned no list: {}", message);
            }
            Ok(SearchResult::empty())
        }
    }
}
