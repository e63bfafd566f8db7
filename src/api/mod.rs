//! NDB API module
//!
//! Blocking client for the food search and nutrient report endpoints.

pub mod client;
pub mod report;
pub mod search;

pub use client::{NdbClient, NdbError, NdbResult, DEFAULT_REPORT_URL, DEFAULT_SEARCH_URL};
pub use report::{BatchReport, MissReason, ReportLookup, ReportMiss};
