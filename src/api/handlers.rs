//! HTTP request handlers and shared application state.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::api::models::*;
use crate::weaviate::{
    AggregateQuery, GenerateClause, GetQuery, QueryMetadata, RetrievedObject, SearchClause,
    WeaviateClient,
};

/// Shared application state passed to every handler via Axum's `State`
/// extractor.
///
/// The Weaviate handle is set once at startup and never reassigned:
/// handlers only read it. When the startup connection failed it stays
/// `None` for the process lifetime and every handler that needs it
/// answers 503.
#[derive(Clone)]
pub struct AppState {
    pub weaviate: Option<Arc<WeaviateClient>>,
}

impl AppState {
    fn client(&self) -> Result<&WeaviateClient, ApiError> {
        self.weaviate
            .as_deref()
            .ok_or_else(|| ApiError::ServiceUnavailable("Weaviate connection not available".into()))
    }
}

/// Resolve the property list for a search: the caller-supplied list, or a
/// schema round-trip for the collection's current property names. The
/// schema is fetched on every request so schema drift at the database is
/// always reflected.
async fn resolve_properties(
    client: &WeaviateClient,
    class: &str,
    requested: Option<&Vec<String>>,
) -> Result<Vec<String>, ApiError> {
    match requested {
        Some(props) => Ok(props.clone()),
        None => Ok(client.property_names(class).await?),
    }
}

/// Shape one matched object for an API response: the requested properties
/// (list values flattened to a comma-joined string), the Weaviate UUID
/// under both `uuid` and `key` (the original backend set both; the
/// frontend reads `key`, API consumers read `uuid` — preserved as-is),
/// and the metadata fields of the query kind that produced it.
fn format_object(object: &RetrievedObject, property_names: &[String]) -> Value {
    let mut out = Map::new();
    for prop in property_names {
        let value = object.properties.get(prop).cloned().unwrap_or(Value::Null);
        out.insert(prop.clone(), flatten_lists(value));
    }
    out.insert("uuid".into(), Value::String(object.id.clone()));
    out.insert("key".into(), Value::String(object.id.clone()));

    match &object.metadata {
        QueryMetadata::Semantic {
            certainty,
            distance,
        } => {
            out.insert("certainty".into(), opt_f64(*certainty));
            out.insert("distance".into(), opt_f64(*distance));
        }
        QueryMetadata::Keyword {
            score,
            explain_score,
        } => {
            out.insert("score".into(), opt_f64(*score));
            out.insert(
                "explain_score".into(),
                explain_score
                    .as_ref()
                    .map(|s| Value::String(s.clone()))
                    .unwrap_or(Value::Null),
            );
        }
        QueryMetadata::None => {}
    }

    if let Some(generated) = &object.generated {
        out.insert("generated".into(), Value::String(generated.clone()));
    }

    Value::Object(out)
}

fn opt_f64(value: Option<f64>) -> Value {
    value.map(Value::from).unwrap_or(Value::Null)
}

/// List-valued attributes are serialized as a comma-joined string,
/// e.g. `["a", "b"]` → `"a, b"`.
fn flatten_lists(value: Value) -> Value {
    match value {
        Value::Array(items) => {
            let joined = items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            Value::String(joined)
        }
        other => other,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// `GET /health`
///
/// Collapses every failure mode to an unhealthy status instead of an
/// error response: handle absent → disconnected, round-trip failed →
/// the underlying message.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let Some(client) = state.weaviate.as_deref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                weaviate: Some("disconnected"),
                error: None,
            }),
        );
    };
    match client.schema().await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                weaviate: Some("connected"),
                error: None,
            }),
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                weaviate: None,
                error: Some(err.to_string()),
            }),
        ),
    }
}

/// `GET /schema` — raw schema listing passthrough.
pub async fn get_schema(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let client = state.client()?;
    Ok(Json(client.schema().await?))
}

/// `GET /collection/:name`
pub async fn collection_info(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CollectionInfoResponse>, ApiError> {
    let client = state.client()?;
    let config = client
        .class_config(&name)
        .await
        .map_err(|err| ApiError::NotFound(format!("Collection not found: {}", err)))?;
    Ok(Json(CollectionInfoResponse {
        name,
        properties: config
            .properties
            .iter()
            .map(|p| PropertyInfo {
                name: p.name.clone(),
                data_type: p.data_type.clone(),
            })
            .collect(),
        vectorizer: config.vectorizer,
    }))
}

/// `POST /class/:name`
///
/// Semantic (nearText) search when a search term is present, plain
/// paginated fetch otherwise. The count is a matching aggregate query:
/// nearText-restricted for semantic, over-all for fetch.
pub async fn search_semantic(
    State(state): State<AppState>,
    Path(class_name): Path<String>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let client = state.client()?;
    let properties = resolve_properties(client, &class_name, req.properties.as_ref()).await?;

    let search_term = non_empty(req.keyword.as_deref()).or(non_empty(req.query.as_deref()));

    let (result, count, search_type) = match search_term {
        Some(term) => {
            let query = GetQuery {
                class: &class_name,
                properties: &properties,
                limit: req.limit,
                offset: Some(req.offset),
                search: SearchClause::NearText {
                    query: term,
                    certainty: Some(req.certainty),
                },
                filter: None,
                generate: None,
            };
            let result = client.get(&query).await?;
            let count = client
                .aggregate_count(&AggregateQuery::NearText {
                    class: &class_name,
                    query: term,
                    certainty: Some(req.certainty),
                })
                .await?;
            (result, count, "semantic")
        }
        None => {
            let query = GetQuery {
                class: &class_name,
                properties: &properties,
                limit: req.limit,
                offset: Some(req.offset),
                search: SearchClause::Fetch,
                filter: None,
                generate: None,
            };
            let result = client.get(&query).await?;
            let count = client
                .aggregate_count(&AggregateQuery::OverAll { class: &class_name })
                .await?;
            (result, count, "fetch")
        }
    };

    let data = result
        .objects
        .iter()
        .map(|o| format_object(o, &properties))
        .collect();
    Ok(Json(SearchResponse {
        data,
        count,
        search_type,
    }))
}

/// `POST /class/:name/bm25`
///
/// The reported count is the number of returned rows, not a true
/// BM25-filtered total: Weaviate has no BM25-aware count primitive. This
/// is a documented inaccuracy, kept as-is.
pub async fn search_bm25(
    State(state): State<AppState>,
    Path(class_name): Path<String>,
    Json(req): Json<Bm25SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let client = state.client()?;
    let properties = resolve_properties(client, &class_name, req.properties.as_ref()).await?;

    tracing::info!(
        collection = %class_name,
        query = %req.query,
        limit = req.limit,
        offset = req.offset,
        "bm25 search"
    );

    let query = GetQuery {
        class: &class_name,
        properties: &properties,
        limit: req.limit,
        offset: Some(req.offset),
        search: SearchClause::Bm25 { query: &req.query },
        filter: None,
        generate: None,
    };
    let result = client.get(&query).await?;

    let data: Vec<Value> = result
        .objects
        .iter()
        .map(|o| format_object(o, &properties))
        .collect();
    Ok(Json(SearchResponse {
        count: data.len() as u64,
        data,
        search_type: "bm25",
    }))
}

/// `POST /class/:name/hybrid`
///
/// Same returned-row count caveat as BM25.
pub async fn search_hybrid(
    State(state): State<AppState>,
    Path(class_name): Path<String>,
    Json(req): Json<HybridSearchRequest>,
) -> Result<Json<HybridSearchResponse>, ApiError> {
    let client = state.client()?;
    let properties = resolve_properties(client, &class_name, req.properties.as_ref()).await?;

    let query = GetQuery {
        class: &class_name,
        properties: &properties,
        limit: req.limit,
        offset: Some(req.offset),
        search: SearchClause::Hybrid {
            query: &req.query,
            alpha: req.alpha,
            fusion: None,
        },
        filter: None,
        generate: None,
    };
    let result = client.get(&query).await?;

    let data: Vec<Value> = result
        .objects
        .iter()
        .map(|o| format_object(o, &properties))
        .collect();
    Ok(Json(HybridSearchResponse {
        count: data.len() as u64,
        data,
        search_type: "hybrid",
        alpha: req.alpha,
    }))
}

/// `POST /class/:name/generate`
///
/// Retrieval-augmented generation: one generated text per retrieved
/// object, produced by the collection's configured generative module.
/// Retrieval is semantic when a query is given, a plain fetch otherwise.
pub async fn generative_search(
    State(state): State<AppState>,
    Path(class_name): Path<String>,
    Json(req): Json<GenerativeRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let client = state.client()?;
    let properties = resolve_properties(client, &class_name, req.properties.as_ref()).await?;

    let search = match non_empty(req.query.as_deref()) {
        Some(term) => SearchClause::NearText {
            query: term,
            certainty: Some(req.certainty),
        },
        None => SearchClause::Fetch,
    };
    let query = GetQuery {
        class: &class_name,
        properties: &properties,
        limit: req.limit,
        offset: None,
        search,
        filter: None,
        generate: Some(GenerateClause::Single {
            prompt: &req.prompt,
        }),
    };
    let result = client.get(&query).await?;

    let data: Vec<Value> = result
        .objects
        .iter()
        .map(|o| format_object(o, &properties))
        .collect();
    Ok(Json(SearchResponse {
        count: data.len() as u64,
        data,
        search_type: "generative",
    }))
}

/// `POST /class/:name/aggregate`
///
/// With `group_by`: one bucket per distinct value; `total_count` is the
/// sum over the buckets. Without: the over-all total.
pub async fn aggregate_collection(
    State(state): State<AppState>,
    Path(class_name): Path<String>,
    Json(req): Json<AggregateRequest>,
) -> Result<Json<AggregateResponse>, ApiError> {
    let client = state.client()?;

    match non_empty(req.group_by.as_deref()) {
        Some(property) => {
            let groups = client.aggregate_groups(&class_name, property).await?;
            let total_count = groups.iter().map(|g| g.count).sum();
            Ok(Json(AggregateResponse {
                total_count,
                grouped_by: Some(property.to_string()),
                groups: Some(groups),
            }))
        }
        None => {
            let total_count = client
                .aggregate_count(&AggregateQuery::OverAll { class: &class_name })
                .await?;
            Ok(Json(AggregateResponse {
                total_count,
                grouped_by: None,
                groups: None,
            }))
        }
    }
}
