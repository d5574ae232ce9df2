//! Demo dataset bootstrap and showcase queries.
//!
//! Idempotent by destruction: after interactive confirmation the seeder
//! deletes and recreates the `Filmy` collection, bulk-loads the fixed
//! dataset, and runs a sequence of illustrative queries. There is no
//! rollback — a failure mid-way can leave the collection partially
//! populated.

pub mod dataset;

use std::io::{self, BufRead, Write};

use crate::config::OllamaConfig;
use crate::weaviate::{
    FusionType, GenerateClause, GetQuery, GetResult, QueryMetadata, SearchClause, WeaviateClient,
    WeaviateError, WhereFilter,
};
use dataset::COLLECTION_NAME;

/// The exact confirmation the destructive path requires.
pub const CONFIRM_TOKEN: &str = "YES";

const TASK_CATEGORY_SUMMARY: &str = "Využij jen data z kontextu, zahrn vždy citace názvů filmů \
     v uvozovkách s rokem vydání ve závorkách. Piš pouze a jen česky! Napiš sumář o čem je tato \
     kategorie filmů.";
const TASK_BEST_CZECH: &str = "Využij jen data z kontextu, zahrn vždy citace názvů filmů \
     v uvozovkách s rokem vydání ve závorkách. Piš pouze a jen česky! Jaká je nejznámější česká \
     kultovní tragikomedie?";
const TASK_NEWEST_US: &str = "Využij jen data z kontextu, zahrn vždy citace názvů filmů \
     v uvozovkách s rokem vydání ve závorkách. Piš pouze a jen česky! Jaký je nejnovější \
     americký film?";

/// Ask for confirmation before any destructive action.
///
/// Reads one line and proceeds only on an exact match of
/// [`CONFIRM_TOKEN`] — lowercase, padded, or empty input all abort.
pub fn confirm_destruction(
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<bool> {
    write!(
        output,
        "Are you sure you want to delete and recreate '{}' collection? Type {} to confirm: ",
        COLLECTION_NAME, CONFIRM_TOKEN
    )?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']) == CONFIRM_TOKEN)
}

/// Delete, recreate, and load the `Filmy` collection, then run the
/// showcase queries. Deletion tolerates an absent collection; creation
/// and import failures propagate and abort the seeder.
pub async fn run(client: &WeaviateClient, ollama: &OllamaConfig) -> Result<(), WeaviateError> {
    if client.delete_class(COLLECTION_NAME).await? {
        println!("Deleted existing '{}' collection", COLLECTION_NAME);
    }

    client
        .create_class(&dataset::collection_definition(ollama))
        .await?;

    let objects = dataset::movie_objects();
    let imported = client.batch_insert(COLLECTION_NAME, &objects).await?;
    println!(
        "Imported & vectorized {} objects into the {} collection",
        imported, COLLECTION_NAME
    );

    run_showcase(client).await
}

/// The seven illustrative query scenarios. Output goes to the console;
/// there is no return contract.
async fn run_showcase(client: &WeaviateClient) -> Result<(), WeaviateError> {
    let properties: Vec<String> = ["title", "year", "origin", "genre"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let komedie_filter = || WhereFilter::property_equal("genre", "Komedie");

    println!("\n=== HYBRID SEARCH WITH GENRE FILTER ===");
    println!("Query: 'kultovní tragikomedie' filtered by genre='Komedie'\n");
    let result = client
        .get(&GetQuery {
            class: COLLECTION_NAME,
            properties: &properties,
            limit: 3,
            offset: None,
            search: SearchClause::Hybrid {
                query: "kultovní tragikomedie",
                alpha: 0.5,
                fusion: Some(FusionType::RelativeScore),
            },
            filter: Some(komedie_filter()),
            generate: None,
        })
        .await?;
    print_hits(&result);

    println!("\n=== HYBRID SEARCH (ALL GENRES) ===");
    println!("Query: 'kultovní tragikomedie' - showing all genres for comparison\n");
    let result = client
        .get(&GetQuery {
            class: COLLECTION_NAME,
            properties: &properties,
            limit: 5,
            offset: None,
            search: SearchClause::Hybrid {
                query: "kultovní tragikomedie",
                alpha: 0.3,
                fusion: Some(FusionType::RelativeScore),
            },
            filter: None,
            generate: None,
        })
        .await?;
    print_hits(&result);

    println!("\n=== RAG SEARCH WITH GENERATION (kultovní tragikomedie 3) ===");
    println!("Query: 'kultovní tragikomedie'\n");
    let result = client
        .get(&GetQuery {
            class: COLLECTION_NAME,
            properties: &properties,
            limit: 3,
            offset: None,
            search: SearchClause::NearText {
                query: "kultovní tragikomedie",
                certainty: None,
            },
            filter: None,
            generate: Some(GenerateClause::Grouped {
                task: TASK_CATEGORY_SUMMARY,
            }),
        })
        .await?;
    print_generated(&result);

    println!("\n=== HYBRID SEARCH WITH GENERATION + Filter Komedie (kultovní tragikomedie 3) ===");
    println!("Query: 'kultovní tragikomedie'\n");
    let result = client
        .get(&GetQuery {
            class: COLLECTION_NAME,
            properties: &properties,
            limit: 3,
            offset: None,
            search: SearchClause::Hybrid {
                query: "kultovní tragikomedie",
                alpha: 0.5,
                fusion: None,
            },
            filter: Some(komedie_filter()),
            generate: Some(GenerateClause::Grouped {
                task: TASK_CATEGORY_SUMMARY,
            }),
        })
        .await?;
    print_generated(&result);

    println!("\n=== RAG SEARCH WITH GENERATION (kultovní tragikomedie 1) ===");
    println!("Query: 'kultovní tragikomedie'\n");
    let result = client
        .get(&GetQuery {
            class: COLLECTION_NAME,
            properties: &properties,
            limit: 3,
            offset: None,
            search: SearchClause::NearText {
                query: "kultovní tragikomedie",
                certainty: None,
            },
            filter: None,
            generate: Some(GenerateClause::Grouped {
                task: TASK_BEST_CZECH,
            }),
        })
        .await?;
    print_generated(&result);

    println!("\n=== HYBRID SEARCH WITH GENERATION + Filter Komedie (kultovní tragikomedie 1) ===");
    println!("Query: 'kultovní tragikomedie'\n");
    let result = client
        .get(&GetQuery {
            class: COLLECTION_NAME,
            properties: &properties,
            limit: 3,
            offset: None,
            search: SearchClause::Hybrid {
                query: "kultovní tragikomedie",
                alpha: 0.5,
                fusion: None,
            },
            filter: Some(komedie_filter()),
            generate: Some(GenerateClause::Grouped {
                task: TASK_BEST_CZECH,
            }),
        })
        .await?;
    print_generated(&result);

    println!("\n=== HYBRID SEARCH WITH GENERATION (nový americký film 1) ===");
    println!("Query: 'nejnovější americký film'\n");
    let result = client
        .get(&GetQuery {
            class: COLLECTION_NAME,
            properties: &properties,
            limit: 12,
            offset: None,
            search: SearchClause::Hybrid {
                query: "nový americký film",
                alpha: 0.5,
                fusion: None,
            },
            filter: None,
            generate: Some(GenerateClause::Grouped {
                task: TASK_NEWEST_US,
            }),
        })
        .await?;
    print_generated(&result);

    Ok(())
}

fn print_hits(result: &GetResult) {
    for obj in &result.objects {
        println!("Title: {}", display_property(obj.properties.get("title")));
        println!("Year: {}", display_property(obj.properties.get("year")));
        println!("Origin: {}", display_property(obj.properties.get("origin")));
        println!("Genre: {}", display_property(obj.properties.get("genre")));
        if let QueryMetadata::Keyword { score, .. } = &obj.metadata {
            match score {
                Some(score) => println!("Score: {}", score),
                None => println!("Score: n/a"),
            }
        }
        println!("---");
    }
}

fn print_generated(result: &GetResult) {
    match &result.grouped_generated {
        Some(text) => println!("{}", text),
        None => println!("(no generated text)"),
    }
}

fn display_property(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
