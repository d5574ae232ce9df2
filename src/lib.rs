//! weaviate-spy — a thin HTTP gateway and seeding tool for Weaviate.
//!
//! Two binaries share this library: the gateway (`weaviate-spy`) exposes
//! JSON endpoints that forward to Weaviate's query, aggregate, and
//! generation APIs; the seeder (`weaviate-spy-seed`) destructively
//! bootstraps the demo `Filmy` collection and runs showcase queries.
//! All search relevance, vector indexing, and text generation is owned by
//! Weaviate and its configured Ollama modules — this crate only marshals
//! parameters and reshapes responses.

/// REST API layer: Axum router, HTTP handlers, models, errors.
pub mod api;
/// Compile-time defaults and environment-driven configuration.
pub mod config;
/// Demo dataset bootstrap and showcase queries.
pub mod seed;
/// Weaviate REST/GraphQL client.
pub mod weaviate;
