//! HTTP client for Weaviate's v1 REST and GraphQL APIs.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::{WeaviateConfig, SEED_BATCH_SIZE};
use crate::weaviate::query::{AggregateQuery, GetQuery, MetadataKind};
use crate::weaviate::types::{
    BatchObject, BatchResult, ClassDefinition, GetResult, GroupCount, QueryMetadata,
    RetrievedObject,
};

/// Errors surfaced by the Weaviate client.
#[derive(Debug, Error)]
pub enum WeaviateError {
    /// Network-level failure (connect, send, body read).
    #[error("weaviate request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-success HTTP status with the upstream message attached.
    #[error("weaviate returned {status}: {message}")]
    Status { status: u16, message: String },
    /// The named collection does not exist.
    #[error("collection '{0}' not found")]
    NotFound(String),
    /// The GraphQL response carried an `errors` array.
    #[error("weaviate graphql error: {0}")]
    GraphQl(String),
    /// The response body did not have the expected shape.
    #[error("unexpected weaviate response: {0}")]
    Decode(String),
}

/// A connection to one Weaviate instance.
///
/// Cheap to share: the inner `reqwest::Client` multiplexes all concurrent
/// requests over its own connection reuse. Created once at process start
/// and never re-created; callers that lose it stay disconnected until
/// restart.
#[derive(Debug, Clone)]
pub struct WeaviateClient {
    http: reqwest::Client,
    base_url: String,
}

impl WeaviateClient {
    /// Connect and verify the instance is reachable by listing the schema.
    pub async fn connect(config: &WeaviateConfig) -> Result<Self, WeaviateError> {
        let mut headers = HeaderMap::new();
        if let Some(auth) = &config.auth {
            let value = HeaderValue::from_str(&format!("Bearer {}", auth.token()))
                .map_err(|_| WeaviateError::Decode("credential is not a valid header".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        let http = reqwest::Client::builder().default_headers(headers).build()?;
        let client = WeaviateClient {
            http,
            base_url: config.rest_url(),
        };
        client.schema().await?;
        tracing::info!(
            url = %client.base_url,
            grpc_host = %config.grpc_host,
            grpc_port = config.grpc_port,
            "connected to weaviate"
        );
        Ok(client)
    }

    /// Raw schema listing (`GET /v1/schema`), also used as the liveness probe.
    pub async fn schema(&self) -> Result<Value, WeaviateError> {
        let resp = self
            .http
            .get(format!("{}/v1/schema", self.base_url))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Typed configuration of one class; `NotFound` if it does not exist.
    pub async fn class_config(&self, name: &str) -> Result<ClassDefinition, WeaviateError> {
        let resp = self
            .http
            .get(format!("{}/v1/schema/{}", self.base_url, name))
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(WeaviateError::NotFound(name.to_string()));
        }
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Current property names of a class, in schema order.
    pub async fn property_names(&self, name: &str) -> Result<Vec<String>, WeaviateError> {
        Ok(self.class_config(name).await?.property_names())
    }

    /// Create a class (`POST /v1/schema`).
    pub async fn create_class(&self, definition: &ClassDefinition) -> Result<(), WeaviateError> {
        let resp = self
            .http
            .post(format!("{}/v1/schema", self.base_url))
            .json(definition)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Delete a class. Absence is not an error: returns `false` when the
    /// class did not exist, `true` when it was removed.
    pub async fn delete_class(&self, name: &str) -> Result<bool, WeaviateError> {
        let resp = self
            .http
            .delete(format!("{}/v1/schema/{}", self.base_url, name))
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(true);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        let message = Self::read_error(resp).await;
        if message.contains("could not find") {
            return Ok(false);
        }
        Err(WeaviateError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Bulk-insert objects into a class in batches of at most
    /// [`SEED_BATCH_SIZE`], returning the number of objects Weaviate
    /// reported as imported.
    pub async fn batch_insert(
        &self,
        class: &str,
        objects: &[Value],
    ) -> Result<usize, WeaviateError> {
        let mut imported = 0;
        for chunk in objects.chunks(SEED_BATCH_SIZE) {
            let batch: Vec<BatchObject> = chunk
                .iter()
                .map(|properties| BatchObject {
                    class: class.to_string(),
                    properties: properties.clone(),
                })
                .collect();
            let resp = self
                .http
                .post(format!("{}/v1/batch/objects", self.base_url))
                .json(&json!({ "objects": batch }))
                .send()
                .await?;
            let results: Vec<BatchResult> = Self::check(resp).await?.json().await?;
            for result in &results {
                match result.result.as_ref().and_then(|r| r.status.as_deref()) {
                    Some("SUCCESS") | None => imported += 1,
                    other => {
                        tracing::warn!(
                            class,
                            status = other.unwrap_or("unknown"),
                            errors = ?result.result.as_ref().and_then(|r| r.errors.as_ref()),
                            "batch object rejected"
                        );
                    }
                }
            }
        }
        Ok(imported)
    }

    /// Run a `Get` query and parse the matched objects.
    pub async fn get(&self, query: &GetQuery<'_>) -> Result<GetResult, WeaviateError> {
        let body = self.graphql(query.render()).await?;
        parse_get_result(&body, query.class, query.search.metadata_kind())
    }

    /// Run a counting `Aggregate` query (`OverAll` or `NearText`).
    pub async fn aggregate_count(&self, query: &AggregateQuery<'_>) -> Result<u64, WeaviateError> {
        let body = self.graphql(query.render()).await?;
        body.pointer(&format!("/data/Aggregate/{}/0/meta/count", query.class()))
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                WeaviateError::Decode(format!("missing Aggregate.{} count", query.class()))
            })
    }

    /// Run a grouped `Aggregate` query, one bucket per distinct value.
    pub async fn aggregate_groups(
        &self,
        class: &str,
        property: &str,
    ) -> Result<Vec<GroupCount>, WeaviateError> {
        let query = AggregateQuery::GroupBy { class, property };
        let body = self.graphql(query.render()).await?;
        let groups = body
            .pointer(&format!("/data/Aggregate/{}", class))
            .and_then(Value::as_array)
            .ok_or_else(|| WeaviateError::Decode(format!("missing Aggregate.{} groups", class)))?;
        Ok(groups
            .iter()
            .map(|group| GroupCount {
                value: match group.pointer("/groupedBy/value") {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                },
                count: group
                    .pointer("/meta/count")
                    .and_then(Value::as_u64)
                    .unwrap_or(0),
            })
            .collect())
    }

    async fn graphql(&self, query: String) -> Result<Value, WeaviateError> {
        let resp = self
            .http
            .post(format!("{}/v1/graphql", self.base_url))
            .json(&json!({ "query": query }))
            .send()
            .await?;
        let body: Value = Self::check(resp).await?.json().await?;
        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let messages: Vec<&str> = errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(Value::as_str))
                    .collect();
                return Err(WeaviateError::GraphQl(messages.join("; ")));
            }
        }
        Ok(body)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, WeaviateError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        Err(WeaviateError::Status {
            status: status.as_u16(),
            message: Self::read_error(resp).await,
        })
    }

    /// Best-effort extraction of the message from a Weaviate error body.
    async fn read_error(resp: reqwest::Response) -> String {
        let status = resp.status();
        match resp.json::<Value>().await {
            Ok(body) => error_message(&body),
            Err(_) => status.to_string(),
        }
    }
}

fn error_message(body: &Value) -> String {
    if let Some(errors) = body.get("error").and_then(Value::as_array) {
        let messages: Vec<&str> = errors
            .iter()
            .filter_map(|e| e.get("message").and_then(Value::as_str))
            .collect();
        if !messages.is_empty() {
            return messages.join("; ");
        }
    }
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return message.to_string();
    }
    body.to_string()
}

/// Parse a GraphQL `Get` response body into [`GetResult`].
///
/// The metadata variant is dictated by `kind` (from the query that was
/// issued), never inferred from which fields happen to be present.
fn parse_get_result(
    body: &Value,
    class: &str,
    kind: MetadataKind,
) -> Result<GetResult, WeaviateError> {
    let objects = body
        .pointer(&format!("/data/Get/{}", class))
        .and_then(Value::as_array)
        .ok_or_else(|| WeaviateError::Decode(format!("missing Get.{} in response", class)))?;

    let mut parsed = Vec::with_capacity(objects.len());
    let mut grouped_generated = None;
    for object in objects {
        let map = object
            .as_object()
            .ok_or_else(|| WeaviateError::Decode("non-object in Get results".into()))?;
        let mut properties = map.clone();
        let additional = properties.remove("_additional").unwrap_or(Value::Null);

        let id = additional["id"].as_str().unwrap_or_default().to_string();
        let metadata = match kind {
            MetadataKind::Semantic => QueryMetadata::Semantic {
                certainty: additional["certainty"].as_f64(),
                distance: additional["distance"].as_f64(),
            },
            MetadataKind::Keyword => QueryMetadata::Keyword {
                score: lenient_f64(&additional["score"]),
                explain_score: additional["explainScore"].as_str().map(str::to_string),
            },
            MetadataKind::None => QueryMetadata::None,
        };

        let mut generated = None;
        if let Some(generate) = additional.get("generate").filter(|g| !g.is_null()) {
            if let Some(error) = generate.get("error").and_then(Value::as_str) {
                tracing::warn!(class, error, "generation failed for object");
            }
            generated = generate
                .get("singleResult")
                .and_then(Value::as_str)
                .map(str::to_string);
            if grouped_generated.is_none() {
                grouped_generated = generate
                    .get("groupedResult")
                    .and_then(Value::as_str)
                    .map(str::to_string);
            }
        }

        parsed.push(RetrievedObject {
            id,
            properties,
            metadata,
            generated,
        });
    }

    Ok(GetResult {
        objects: parsed,
        grouped_generated,
    })
}

/// Weaviate's GraphQL API returns scores as strings; accept both forms.
fn lenient_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}
