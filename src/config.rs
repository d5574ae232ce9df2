//! Compile-time defaults and environment-driven configuration.
//!
//! Tuning constants and request defaults are defined here; the Weaviate
//! connection parameters are read from environment variables at startup.

use std::env;

/// Default HTTP port for the gateway binary.
pub const DEFAULT_GATEWAY_PORT: u16 = 8000;

/// Directory served as the static frontend when no API route matches.
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Default Weaviate HTTP host.
pub const DEFAULT_WEAVIATE_HOST: &str = "localhost";

/// Default Weaviate HTTP port.
pub const DEFAULT_WEAVIATE_PORT: u16 = 8080;

/// Default Weaviate gRPC host.
pub const DEFAULT_WEAVIATE_GRPC_HOST: &str = "localhost";

/// Default Weaviate gRPC port.
pub const DEFAULT_WEAVIATE_GRPC_PORT: u16 = 50051;

/// Default result limit for search endpoints.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Default result limit for the generative endpoint.
pub const DEFAULT_GENERATIVE_LIMIT: usize = 10;

/// Default certainty threshold for semantic (nearText) queries.
pub const DEFAULT_CERTAINTY: f64 = 0.65;

/// Default keyword/vector balance for hybrid queries (0 = BM25, 1 = vector).
pub const DEFAULT_ALPHA: f64 = 0.5;

/// Upper bound on objects per batch-insert request during seeding.
pub const SEED_BATCH_SIZE: usize = 200;

/// Default Ollama endpoint used by the seeded collection's modules.
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://ollama:11434";

/// Embedding model configured on the seeded collection.
pub const OLLAMA_EMBED_MODEL: &str = "granite-embedding:278m";

/// Generative model configured on the seeded collection.
pub const OLLAMA_GENERATIVE_MODEL: &str = "granite4:tiny-h";

/// Credential sent to Weaviate as an `Authorization: Bearer` header.
///
/// Weaviate accepts both static API keys and OIDC bearer tokens on the same
/// header; the two variants exist to mirror the two environment variables.
#[derive(Debug, Clone)]
pub enum AuthCredential {
    ApiKey(String),
    BearerToken(String),
}

impl AuthCredential {
    /// The raw token value placed after `Bearer `.
    pub fn token(&self) -> &str {
        match self {
            AuthCredential::ApiKey(t) | AuthCredential::BearerToken(t) => t,
        }
    }
}

/// Connection parameters for the Weaviate instance.
///
/// The gRPC fields mirror the documented environment surface; this client
/// speaks REST/GraphQL only and does not open a gRPC channel.
#[derive(Debug, Clone)]
pub struct WeaviateConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub grpc_host: String,
    pub grpc_port: u16,
    pub grpc_secure: bool,
    pub auth: Option<AuthCredential>,
}

impl WeaviateConfig {
    /// Read the configuration from `WEAVIATE_*` environment variables.
    ///
    /// `WEAVIATE_API_KEY` takes precedence over `WEAVIATE_BEARER_TOKEN`;
    /// if neither is set no credential is sent.
    pub fn from_env() -> Self {
        let auth = match env::var("WEAVIATE_API_KEY") {
            Ok(key) if !key.is_empty() => Some(AuthCredential::ApiKey(key)),
            _ => match env::var("WEAVIATE_BEARER_TOKEN") {
                Ok(token) if !token.is_empty() => Some(AuthCredential::BearerToken(token)),
                _ => None,
            },
        };

        WeaviateConfig {
            host: env_or("WEAVIATE_HOST", DEFAULT_WEAVIATE_HOST),
            port: env_port("WEAVIATE_PORT", DEFAULT_WEAVIATE_PORT),
            secure: env_flag("WEAVIATE_SECURE"),
            grpc_host: env_or("WEAVIATE_GRPC_HOST", DEFAULT_WEAVIATE_GRPC_HOST),
            grpc_port: env_port("WEAVIATE_GRPC_PORT", DEFAULT_WEAVIATE_GRPC_PORT),
            grpc_secure: env_flag("WEAVIATE_GRPC_SECURE"),
            auth,
        }
    }

    /// Base URL of the Weaviate REST API, e.g. `http://localhost:8080`.
    pub fn rest_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

impl Default for WeaviateConfig {
    fn default() -> Self {
        WeaviateConfig {
            host: DEFAULT_WEAVIATE_HOST.to_string(),
            port: DEFAULT_WEAVIATE_PORT,
            secure: false,
            grpc_host: DEFAULT_WEAVIATE_GRPC_HOST.to_string(),
            grpc_port: DEFAULT_WEAVIATE_GRPC_PORT,
            grpc_secure: false,
            auth: None,
        }
    }
}

/// Ollama module parameters baked into the seeded collection definition.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub endpoint: String,
    pub embed_model: String,
    pub generative_model: String,
}

impl OllamaConfig {
    pub fn from_env() -> Self {
        OllamaConfig {
            endpoint: env_or("OLLAMA_ENDPOINT", DEFAULT_OLLAMA_ENDPOINT),
            embed_model: OLLAMA_EMBED_MODEL.to_string(),
            generative_model: OLLAMA_GENERATIVE_MODEL.to_string(),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).ok().filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_string())
}

fn env_port(name: &str, default: u16) -> u16 {
    env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Boolean env flag: `true`, `1`, or `yes` (case-insensitive) enable it.
fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}
