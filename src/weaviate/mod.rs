//! Weaviate REST/GraphQL client.
//!
//! A thin typed layer over Weaviate's v1 HTTP API: schema operations and
//! batch inserts go through REST, queries through GraphQL. Only the
//! operations this gateway and seeder need are implemented.

/// HTTP client and response parsing.
pub mod client;
/// GraphQL query rendering.
pub mod query;
/// Wire types shared by the REST and GraphQL surfaces.
pub mod types;

pub use client::{WeaviateClient, WeaviateError};
pub use query::{
    AggregateQuery, FusionType, GenerateClause, GetQuery, MetadataKind, SearchClause, WhereFilter,
};
pub use types::{
    ClassDefinition, GetResult, GroupCount, PropertyDefinition, QueryMetadata, RetrievedObject,
};
