//! Shared test harness: a mock Weaviate instance (axum router emulating
//! the REST/GraphQL surface the crate talks to) plus spawn helpers for it
//! and for the gateway under test.
#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use weaviate_spy::api::create_router;
use weaviate_spy::api::handlers::AppState;
use weaviate_spy::config::WeaviateConfig;
use weaviate_spy::seed::dataset;
use weaviate_spy::weaviate::WeaviateClient;

/// Shared state of the mock Weaviate: recorded requests plus the objects
/// "stored" in the Filmy collection.
#[derive(Clone, Default)]
pub struct MockState {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    requests: Mutex<Vec<String>>,
    movies: Mutex<Vec<Value>>,
    created_classes: Mutex<Vec<Value>>,
    deleted_classes: Mutex<Vec<String>>,
}

impl MockState {
    fn record(&self, entry: String) {
        self.inner.requests.lock().unwrap().push(entry);
    }

    pub fn request_count(&self) -> usize {
        self.inner.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<String> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn push_movie(&self, properties: Value) {
        self.inner.movies.lock().unwrap().push(properties);
    }

    pub fn movies(&self) -> Vec<Value> {
        self.inner.movies.lock().unwrap().clone()
    }

    pub fn created_classes(&self) -> Vec<Value> {
        self.inner.created_classes.lock().unwrap().clone()
    }

    pub fn deleted_classes(&self) -> Vec<String> {
        self.inner.deleted_classes.lock().unwrap().clone()
    }
}

/// The demo dataset as the mock's preloaded contents, each record with an
/// extra list-valued `cast` property.
pub fn fixture_movies() -> Vec<Value> {
    dataset::movie_objects()
        .into_iter()
        .map(|mut movie| {
            movie
                .as_object_mut()
                .unwrap()
                .insert("cast".to_string(), json!(["a", "b"]));
            movie
        })
        .collect()
}

fn filmy_class() -> Value {
    json!({
        "class": "Filmy",
        "properties": [
            {"name": "title", "dataType": ["text"]},
            {"name": "description", "dataType": ["text"]},
            {"name": "genre", "dataType": ["text"]},
            {"name": "year", "dataType": ["int"]},
            {"name": "origin", "dataType": ["text"]},
            {"name": "cast", "dataType": ["text[]"]},
        ],
        "vectorizer": "text2vec-ollama",
    })
}

async fn schema(State(state): State<MockState>) -> Json<Value> {
    state.record("GET /v1/schema".to_string());
    Json(json!({"classes": [filmy_class()]}))
}

async fn create_class(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    state.record("POST /v1/schema".to_string());
    state.inner.created_classes.lock().unwrap().push(body.clone());
    Json(body)
}

async fn class_config(
    State(state): State<MockState>,
    Path(name): Path<String>,
) -> (StatusCode, Json<Value>) {
    state.record(format!("GET /v1/schema/{}", name));
    if name == "Filmy" {
        (StatusCode::OK, Json(filmy_class()))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": [{"message": "could not find class"}]})),
        )
    }
}

async fn delete_class(
    State(state): State<MockState>,
    Path(name): Path<String>,
) -> (StatusCode, Json<Value>) {
    state.record(format!("DELETE /v1/schema/{}", name));
    if name == "Filmy" {
        state.inner.deleted_classes.lock().unwrap().push(name);
        state.inner.movies.lock().unwrap().clear();
        (StatusCode::OK, Json(json!({})))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": [{"message": "could not find class"}]})),
        )
    }
}

async fn batch_objects(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    let objects = body["objects"].as_array().cloned().unwrap_or_default();
    state.record(format!("POST /v1/batch/objects x{}", objects.len()));
    let mut results = Vec::new();
    for object in &objects {
        state.push_movie(object["properties"].clone());
        results.push(json!({"result": {"status": "SUCCESS"}}));
    }
    Json(json!(results))
}

/// Pull a numeric argument like `limit: 3` out of a rendered query.
fn extract_usize(query: &str, key: &str) -> Option<usize> {
    let start = query.find(key)? + key.len();
    let digits: String = query[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

async fn graphql(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    let query = body["query"].as_str().unwrap_or("").to_string();
    state.record(format!("POST /v1/graphql {}", query));

    if query.contains("Aggregate") {
        if query.contains("groupBy") {
            let mut counts: Vec<(String, u64)> = Vec::new();
            for movie in state.movies() {
                let genre = movie["genre"].as_str().unwrap_or("").to_string();
                match counts.iter_mut().find(|(g, _)| *g == genre) {
                    Some((_, c)) => *c += 1,
                    None => counts.push((genre, 1)),
                }
            }
            let groups: Vec<Value> = counts
                .iter()
                .map(|(genre, count)| {
                    json!({"groupedBy": {"value": genre}, "meta": {"count": count}})
                })
                .collect();
            return Json(json!({"data": {"Aggregate": {"Filmy": groups}}}));
        }
        let count = state.movies().len();
        return Json(json!({"data": {"Aggregate": {"Filmy": [{"meta": {"count": count}}]}}}));
    }

    let mut rows = state.movies();
    if query.contains(r#"valueText: "Komedie""#) {
        rows.retain(|m| m["genre"] == "Komedie");
    }
    if let Some(limit) = extract_usize(&query, "limit: ") {
        rows.truncate(limit);
    }

    let single = query.contains("generate(singleResult");
    let grouped = query.contains("generate(groupedResult");
    let objects: Vec<Value> = rows
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let mut object = movie.as_object().cloned().unwrap_or_default();
            let mut additional = serde_json::Map::new();
            additional.insert(
                "id".to_string(),
                json!(format!("00000000-0000-0000-0000-{:012}", i)),
            );
            if query.contains("nearText") {
                additional.insert("certainty".to_string(), json!(0.9));
                additional.insert("distance".to_string(), json!(0.2));
            }
            if query.contains("bm25:") || query.contains("hybrid:") {
                additional.insert("score".to_string(), json!("0.7"));
                additional.insert("explainScore".to_string(), json!("mock explain"));
            }
            if single {
                let title = movie["title"].as_str().unwrap_or("");
                additional.insert(
                    "generate".to_string(),
                    json!({"singleResult": format!("generated for {}", title), "error": null}),
                );
            } else if grouped && i == 0 {
                additional.insert(
                    "generate".to_string(),
                    json!({"groupedResult": "grouped summary", "error": null}),
                );
            }
            object.insert("_additional".to_string(), Value::Object(additional));
            Value::Object(object)
        })
        .collect();

    Json(json!({"data": {"Get": {"Filmy": objects}}}))
}

/// Spawn the mock Weaviate on an ephemeral port. With `preloaded`, the
/// Filmy collection starts with the 12-movie fixture.
pub async fn spawn_mock(preloaded: bool) -> (MockState, SocketAddr) {
    let state = MockState::default();
    if preloaded {
        for movie in fixture_movies() {
            state.push_movie(movie);
        }
    }

    let app = Router::new()
        .route("/v1/schema", get(schema).post(create_class))
        .route("/v1/schema/:name", get(class_config).delete(delete_class))
        .route("/v1/batch/objects", post(batch_objects))
        .route("/v1/graphql", post(graphql))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (state, addr)
}

pub fn weaviate_config_for(addr: SocketAddr) -> WeaviateConfig {
    WeaviateConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        ..WeaviateConfig::default()
    }
}

/// Connect a client to the mock, failing the test if the mock is down.
pub async fn connect_client(addr: SocketAddr) -> WeaviateClient {
    WeaviateClient::connect(&weaviate_config_for(addr))
        .await
        .expect("Failed to connect to mock weaviate")
}

/// Spawn the gateway with its Weaviate handle either connected to the
/// mock or left unset (the startup-failure degradation path).
pub async fn spawn_gateway(mock: Option<SocketAddr>) -> String {
    let weaviate = match mock {
        Some(addr) => Some(Arc::new(connect_client(addr).await)),
        None => None,
    };
    let app = create_router(AppState { weaviate }, "static");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}
