//! Request and response data transfer objects for the gateway API.
//!
//! All types derive `Serialize` and/or `Deserialize` for JSON marshalling
//! via Axum. Defaults mirror the documented request contracts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config;
use crate::weaviate::GroupCount;

fn default_search_limit() -> usize {
    config::DEFAULT_SEARCH_LIMIT
}
fn default_generative_limit() -> usize {
    config::DEFAULT_GENERATIVE_LIMIT
}
fn default_certainty() -> f64 {
    config::DEFAULT_CERTAINTY
}
fn default_alpha() -> f64 {
    config::DEFAULT_ALPHA
}
fn default_metric() -> String {
    "count".to_string()
}

/// Request body for `POST /class/:name` (semantic search / plain fetch).
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
    /// Takes precedence over `query` when both are set.
    pub keyword: Option<String>,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_certainty")]
    pub certainty: f64,
    pub properties: Option<Vec<String>>,
}

/// Request body for `POST /class/:name/bm25`.
#[derive(Debug, Deserialize)]
pub struct Bm25SearchRequest {
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    pub properties: Option<Vec<String>>,
}

/// Request body for `POST /class/:name/hybrid`.
#[derive(Debug, Deserialize)]
pub struct HybridSearchRequest {
    pub query: String,
    /// Balance between BM25 (0) and vector (1) scoring.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    pub properties: Option<Vec<String>>,
}

/// Request body for `POST /class/:name/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerativeRequest {
    pub prompt: String,
    pub query: Option<String>,
    #[serde(default = "default_generative_limit")]
    pub limit: usize,
    #[serde(default = "default_certainty")]
    pub certainty: f64,
    pub properties: Option<Vec<String>>,
}

/// Request body for `POST /class/:name/aggregate`.
#[derive(Debug, Deserialize)]
pub struct AggregateRequest {
    pub group_by: Option<String>,
    /// Only `"count"` is supported; kept for request-shape compatibility.
    #[serde(default = "default_metric")]
    pub metric: String,
}

/// Response body shared by the search endpoints.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub data: Vec<Value>,
    pub count: u64,
    pub search_type: &'static str,
}

/// Response body for hybrid search, echoing the alpha weight.
#[derive(Debug, Serialize)]
pub struct HybridSearchResponse {
    pub data: Vec<Value>,
    pub count: u64,
    pub search_type: &'static str,
    pub alpha: f64,
}

/// Response body for `POST /class/:name/aggregate`.
#[derive(Debug, Serialize)]
pub struct AggregateResponse {
    pub total_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouped_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupCount>>,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weaviate: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One property in a collection-info response.
#[derive(Debug, Serialize)]
pub struct PropertyInfo {
    pub name: String,
    pub data_type: Vec<String>,
}

/// Response body for `GET /collection/:name`.
#[derive(Debug, Serialize)]
pub struct CollectionInfoResponse {
    pub name: String,
    pub properties: Vec<PropertyInfo>,
    pub vectorizer: Option<String>,
}
