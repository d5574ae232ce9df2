//! GraphQL query rendering for Weaviate's `Get` and `Aggregate` APIs.
//!
//! Queries are rendered to plain GraphQL strings and posted to
//! `/v1/graphql`. User-supplied text is embedded as a JSON string literal,
//! so quoting and escaping are handled by `serde_json`.

use serde_json::Value;

/// Escape `s` as a GraphQL (JSON-compatible) string literal, quotes included.
fn gql_str(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// Equality filter on a single text property.
///
/// Only the `Equal` operator on a text path is needed here (the seeder's
/// genre filter); richer filter trees stay out of scope.
#[derive(Debug, Clone)]
pub struct WhereFilter {
    path: String,
    value: String,
}

impl WhereFilter {
    /// `where: {path: ["<path>"], operator: Equal, valueText: "<value>"}`
    pub fn property_equal(path: impl Into<String>, value: impl Into<String>) -> Self {
        WhereFilter {
            path: path.into(),
            value: value.into(),
        }
    }

    fn render(&self) -> String {
        format!(
            "where: {{path: [{}], operator: Equal, valueText: {}}}",
            gql_str(&self.path),
            gql_str(&self.value)
        )
    }
}

/// Hybrid ranked-list fusion algorithm.
#[derive(Debug, Clone, Copy)]
pub enum FusionType {
    RelativeScore,
}

impl FusionType {
    fn as_graphql(self) -> &'static str {
        match self {
            FusionType::RelativeScore => "relativeScoreFusion",
        }
    }
}

/// Which `_additional` metadata fields a search clause produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    Semantic,
    Keyword,
    None,
}

/// The retrieval part of a `Get` query.
#[derive(Debug, Clone)]
pub enum SearchClause<'a> {
    /// Plain paginated fetch, no ranking.
    Fetch,
    /// Vector similarity, with an optional certainty threshold.
    NearText {
        query: &'a str,
        certainty: Option<f64>,
    },
    /// Lexical BM25 ranking.
    Bm25 { query: &'a str },
    /// Blended lexical + vector ranking.
    Hybrid {
        query: &'a str,
        alpha: f64,
        fusion: Option<FusionType>,
    },
}

impl SearchClause<'_> {
    pub fn metadata_kind(&self) -> MetadataKind {
        match self {
            SearchClause::Fetch => MetadataKind::None,
            SearchClause::NearText { .. } => MetadataKind::Semantic,
            SearchClause::Bm25 { .. } | SearchClause::Hybrid { .. } => MetadataKind::Keyword,
        }
    }

    fn render_arg(&self) -> Option<String> {
        match self {
            SearchClause::Fetch => None,
            SearchClause::NearText { query, certainty } => {
                let certainty = certainty
                    .map(|c| format!(", certainty: {}", c))
                    .unwrap_or_default();
                Some(format!(
                    "nearText: {{concepts: [{}]{}}}",
                    gql_str(query),
                    certainty
                ))
            }
            SearchClause::Bm25 { query } => Some(format!("bm25: {{query: {}}}", gql_str(query))),
            SearchClause::Hybrid {
                query,
                alpha,
                fusion,
            } => {
                let fusion = fusion
                    .map(|f| format!(", fusionType: {}", f.as_graphql()))
                    .unwrap_or_default();
                Some(format!(
                    "hybrid: {{query: {}, alpha: {}{}}}",
                    gql_str(query),
                    alpha,
                    fusion
                ))
            }
        }
    }
}

/// Optional generation step attached to a `Get` query.
#[derive(Debug, Clone)]
pub enum GenerateClause<'a> {
    /// One generated text per retrieved object.
    Single { prompt: &'a str },
    /// One generated text for the whole result set.
    Grouped { task: &'a str },
}

impl GenerateClause<'_> {
    fn render(&self) -> String {
        match self {
            GenerateClause::Single { prompt } => format!(
                "generate(singleResult: {{prompt: {}}}) {{singleResult error}}",
                gql_str(prompt)
            ),
            GenerateClause::Grouped { task } => format!(
                "generate(groupedResult: {{task: {}}}) {{groupedResult error}}",
                gql_str(task)
            ),
        }
    }
}

/// A complete `Get` query against one class.
#[derive(Debug, Clone)]
pub struct GetQuery<'a> {
    pub class: &'a str,
    /// Property fields to select; resolved by the caller (schema round-trip
    /// when the request did not name any).
    pub properties: &'a [String],
    pub limit: usize,
    pub offset: Option<usize>,
    pub search: SearchClause<'a>,
    pub filter: Option<WhereFilter>,
    pub generate: Option<GenerateClause<'a>>,
}

impl GetQuery<'_> {
    pub fn render(&self) -> String {
        let mut args = vec![format!("limit: {}", self.limit)];
        if let Some(offset) = self.offset {
            args.push(format!("offset: {}", offset));
        }
        if let Some(arg) = self.search.render_arg() {
            args.push(arg);
        }
        if let Some(filter) = &self.filter {
            args.push(filter.render());
        }

        let mut additional = match self.search.metadata_kind() {
            MetadataKind::Semantic => "id certainty distance".to_string(),
            MetadataKind::Keyword => "id score explainScore".to_string(),
            MetadataKind::None => "id".to_string(),
        };
        if let Some(generate) = &self.generate {
            additional.push(' ');
            additional.push_str(&generate.render());
        }

        format!(
            "{{ Get {{ {}({}) {{ {} _additional {{ {} }} }} }} }}",
            self.class,
            args.join(", "),
            self.properties.join(" "),
            additional
        )
    }
}

/// An `Aggregate` query against one class.
#[derive(Debug, Clone)]
pub enum AggregateQuery<'a> {
    /// Unrestricted total count.
    OverAll { class: &'a str },
    /// Count restricted to the same similarity query a `Get` used.
    NearText {
        class: &'a str,
        query: &'a str,
        certainty: Option<f64>,
    },
    /// Counts per distinct value of one property.
    GroupBy { class: &'a str, property: &'a str },
}

impl AggregateQuery<'_> {
    pub fn class(&self) -> &str {
        match self {
            AggregateQuery::OverAll { class }
            | AggregateQuery::NearText { class, .. }
            | AggregateQuery::GroupBy { class, .. } => class,
        }
    }

    pub fn render(&self) -> String {
        match self {
            AggregateQuery::OverAll { class } => {
                format!("{{ Aggregate {{ {} {{ meta {{ count }} }} }} }}", class)
            }
            AggregateQuery::NearText {
                class,
                query,
                certainty,
            } => {
                let certainty = certainty
                    .map(|c| format!(", certainty: {}", c))
                    .unwrap_or_default();
                format!(
                    "{{ Aggregate {{ {}(nearText: {{concepts: [{}]{}}}) {{ meta {{ count }} }} }} }}",
                    class,
                    gql_str(query),
                    certainty
                )
            }
            AggregateQuery::GroupBy { class, property } => format!(
                "{{ Aggregate {{ {}(groupBy: [{}]) {{ groupedBy {{ value }} meta {{ count }} }} }} }}",
                class,
                gql_str(property)
            ),
        }
    }
}
