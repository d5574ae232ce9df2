//! Wire types for Weaviate's REST and GraphQL surfaces.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A class (collection) definition as Weaviate's `/v1/schema` endpoints
/// serialize it. Used both to create the seeded collection and to read an
/// existing collection's configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDefinition {
    #[serde(rename = "class")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vectorizer: Option<String>,
    #[serde(
        rename = "moduleConfig",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub module_config: Option<Value>,
}

impl ClassDefinition {
    /// Names of all declared properties, in schema order.
    pub fn property_names(&self) -> Vec<String> {
        self.properties.iter().map(|p| p.name.clone()).collect()
    }
}

/// One typed attribute of a class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(rename = "dataType")]
    pub data_type: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

/// One object in a `/v1/batch/objects` request.
#[derive(Debug, Serialize)]
pub struct BatchObject {
    pub class: String,
    pub properties: Value,
}

/// Per-object outcome in a batch insert response.
#[derive(Debug, Deserialize)]
pub struct BatchResult {
    #[serde(default)]
    pub result: Option<BatchResultStatus>,
}

#[derive(Debug, Deserialize)]
pub struct BatchResultStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub errors: Option<Value>,
}

/// Query-kind-specific metadata returned alongside a matched object.
///
/// The variant is selected by the call site from the query that was issued,
/// never probed from the response: semantic queries carry
/// certainty/distance, keyword and hybrid queries carry score/explain
/// score, plain fetches carry nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryMetadata {
    Semantic {
        certainty: Option<f64>,
        distance: Option<f64>,
    },
    Keyword {
        score: Option<f64>,
        explain_score: Option<String>,
    },
    None,
}

/// One object returned by a GraphQL `Get` query.
#[derive(Debug, Clone)]
pub struct RetrievedObject {
    /// Weaviate-assigned UUID.
    pub id: String,
    /// The selected properties, exactly as GraphQL returned them.
    pub properties: serde_json::Map<String, Value>,
    pub metadata: QueryMetadata,
    /// Per-object generated text (`generate(singleResult: ...)`).
    pub generated: Option<String>,
}

/// Full result of a `Get` query.
#[derive(Debug, Clone)]
pub struct GetResult {
    pub objects: Vec<RetrievedObject>,
    /// Grouped generated text (`generate(groupedResult: ...)`), attached by
    /// Weaviate to the first returned object.
    pub grouped_generated: Option<String>,
}

/// One bucket of a grouped aggregate.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupCount {
    pub value: String,
    pub count: u64,
}
