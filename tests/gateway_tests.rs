//! End-to-end tests for the gateway API against a mock Weaviate.

mod common;

use common::{client, spawn_gateway, spawn_mock};
use serde_json::{json, Value};

#[tokio::test]
async fn health_reports_connected() {
    let (_state, mock) = spawn_mock(true).await;
    let base = spawn_gateway(Some(mock)).await;

    let response = client()
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["weaviate"], "connected");
}

#[tokio::test]
async fn health_without_connection_is_unhealthy() {
    let base = spawn_gateway(None).await;

    let response = client()
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 503);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["weaviate"], "disconnected");
}

#[tokio::test]
async fn search_without_connection_is_503() {
    let base = spawn_gateway(None).await;

    let response = client()
        .post(format!("{}/class/Filmy", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 503);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Weaviate connection not available");
}

#[tokio::test]
async fn schema_is_passed_through() {
    let (_state, mock) = spawn_mock(true).await;
    let base = spawn_gateway(Some(mock)).await;

    let response = client()
        .get(format!("{}/schema", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["classes"][0]["class"], "Filmy");
}

#[tokio::test]
async fn collection_info_reshapes_the_class_config() {
    let (_state, mock) = spawn_mock(true).await;
    let base = spawn_gateway(Some(mock)).await;

    let response = client()
        .get(format!("{}/collection/Filmy", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Filmy");
    assert_eq!(body["vectorizer"], "text2vec-ollama");
    let properties = body["properties"].as_array().unwrap();
    assert_eq!(properties.len(), 6);
    assert_eq!(properties[0]["name"], "title");
    assert_eq!(properties[0]["data_type"], json!(["text"]));
}

#[tokio::test]
async fn unknown_collection_is_404() {
    let (_state, mock) = spawn_mock(true).await;
    let base = spawn_gateway(Some(mock)).await;

    let response = client()
        .get(format!("{}/collection/Neznama", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Collection not found"), "{}", message);
}

fn datum_keys(datum: &Value) -> Vec<&str> {
    let mut keys: Vec<&str> = datum.as_object().unwrap().keys().map(|k| k.as_str()).collect();
    keys.sort_unstable();
    keys
}

#[tokio::test]
async fn semantic_search_defaults_to_schema_properties() {
    let (_state, mock) = spawn_mock(true).await;
    let base = spawn_gateway(Some(mock)).await;

    let response = client()
        .post(format!("{}/class/Filmy", base))
        .json(&json!({"query": "kultovní tragikomedie", "limit": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["search_type"], "semantic");
    // Page of two rows, but the count comes from a matching aggregate.
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["count"], 12);

    let datum = &body["data"][0];
    assert_eq!(
        datum_keys(datum),
        vec![
            "cast",
            "certainty",
            "description",
            "distance",
            "genre",
            "key",
            "origin",
            "title",
            "uuid",
            "year",
        ]
    );
    assert_eq!(datum["uuid"], datum["key"]);
    assert_eq!(datum["certainty"], 0.9);
    // List-valued property flattened to a comma-joined string.
    assert_eq!(datum["cast"], "a, b");
}

#[tokio::test]
async fn empty_search_falls_back_to_plain_fetch() {
    let (_state, mock) = spawn_mock(true).await;
    let base = spawn_gateway(Some(mock)).await;

    let response = client()
        .post(format!("{}/class/Filmy", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["search_type"], "fetch");
    assert_eq!(body["count"], 12);
    assert_eq!(body["data"].as_array().unwrap().len(), 12);

    // No search clause, so no relevance metadata on the rows.
    let datum = &body["data"][0];
    assert!(datum.get("certainty").is_none());
    assert!(datum.get("score").is_none());
}

#[tokio::test]
async fn explicit_properties_bound_the_response_shape() {
    let (_state, mock) = spawn_mock(true).await;
    let base = spawn_gateway(Some(mock)).await;

    let response = client()
        .post(format!("{}/class/Filmy", base))
        .json(&json!({"query": "vesmír", "properties": ["title"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let datum = &body["data"][0];
    assert_eq!(
        datum_keys(datum),
        vec!["certainty", "distance", "key", "title", "uuid"]
    );
}

#[tokio::test]
async fn bm25_count_is_the_number_of_returned_rows() {
    let (_state, mock) = spawn_mock(true).await;
    let base = spawn_gateway(Some(mock)).await;

    let response = client()
        .post(format!("{}/class/Filmy/bm25", base))
        .json(&json!({"query": "vesmír", "limit": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["search_type"], "bm25");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    // Not the collection total: the count mirrors the page size.
    assert_eq!(body["count"], 2);

    let datum = &body["data"][0];
    assert_eq!(datum["score"], 0.7);
    assert_eq!(datum["explain_score"], "mock explain");
    assert!(datum.get("certainty").is_none());
}

#[tokio::test]
async fn hybrid_echoes_the_alpha_weight() {
    let (_state, mock) = spawn_mock(true).await;
    let base = spawn_gateway(Some(mock)).await;

    let response = client()
        .post(format!("{}/class/Filmy/hybrid", base))
        .json(&json!({"query": "tragikomedie", "alpha": 0.25, "limit": 3}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["search_type"], "hybrid");
    assert_eq!(body["alpha"], 0.25);
    assert_eq!(body["count"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn generate_attaches_text_to_every_row() {
    let (_state, mock) = spawn_mock(true).await;
    let base = spawn_gateway(Some(mock)).await;

    let response = client()
        .post(format!("{}/class/Filmy/generate", base))
        .json(&json!({
            "prompt": "Shrň tento film jednou větou",
            "query": "tragikomedie",
            "limit": 2,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["search_type"], "generative");
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    for datum in data {
        let generated = datum["generated"].as_str().unwrap();
        assert!(generated.starts_with("generated for "), "{}", generated);
    }
}

#[tokio::test]
async fn generate_without_query_retrieves_by_plain_fetch() {
    let (_state, mock) = spawn_mock(true).await;
    let base = spawn_gateway(Some(mock)).await;

    let response = client()
        .post(format!("{}/class/Filmy/generate", base))
        .json(&json!({"prompt": "Shrň tento film jednou větou"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 10);
    assert!(data[0]["generated"].as_str().is_some());
    assert!(data[0].get("certainty").is_none());
}

#[tokio::test]
async fn aggregate_without_grouping_returns_the_total() {
    let (_state, mock) = spawn_mock(true).await;
    let base = spawn_gateway(Some(mock)).await;

    let response = client()
        .post(format!("{}/class/Filmy/aggregate", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["total_count"], 12);
    assert!(body.get("grouped_by").is_none());
    assert!(body.get("groups").is_none());
}

#[tokio::test]
async fn aggregate_grouped_by_genre_sums_to_the_total() {
    let (_state, mock) = spawn_mock(true).await;
    let base = spawn_gateway(Some(mock)).await;

    let response = client()
        .post(format!("{}/class/Filmy/aggregate", base))
        .json(&json!({"group_by": "genre"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["grouped_by"], "genre");
    let groups = body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 4);

    let total: u64 = groups.iter().map(|g| g["count"].as_u64().unwrap()).sum();
    assert_eq!(body["total_count"], total);
    assert_eq!(total, 12);

    let komedie = groups
        .iter()
        .find(|g| g["value"] == "Komedie")
        .expect("Komedie bucket");
    assert_eq!(komedie["count"], 3);
}
