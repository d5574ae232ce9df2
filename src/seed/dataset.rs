//! The fixed demo dataset: twelve movies with Czech titles and
//! descriptions, spanning four genres, plus the collection definition
//! they are loaded into.

use serde_json::{json, Value};

use crate::config::OllamaConfig;
use crate::weaviate::{ClassDefinition, PropertyDefinition};

/// Name of the seeded collection.
pub const COLLECTION_NAME: &str = "Filmy";

/// One record of the demo dataset.
#[derive(Debug, Clone)]
pub struct Movie {
    pub title: &'static str,
    pub description: &'static str,
    pub genre: &'static str,
    pub year: i64,
    pub origin: &'static str,
}

/// The twelve demo movies. Three are `Komedie` — the showcase's filtered
/// hybrid query relies on that.
pub fn movies() -> Vec<Movie> {
    vec![
        Movie {
            title: "Počátek",
            description: "Zkušený zloděj, který krade tajemství z hloubi podvědomí během spánku, musí tentokrát myšlenku do mysli vložit, nikoliv ji ukrást.",
            genre: "Sci-Fi",
            year: 2010,
            origin: "USA",
        },
        Movie {
            title: "Interstellar",
            description: "Skupina průzkumníků cestuje červí dírou ve vesmíru, aby zajistila přežití lidstva na planetě Zemi, která pomalu umírá.",
            genre: "Sci-Fi",
            year: 2014,
            origin: "USA",
        },
        Movie {
            title: "Blade Runner 2049",
            description: "Mladý policista odhaluje dlouho pohřbené tajemství, které by mohlo uvrhnout zbytek společnosti do chaosu, a hledá zmizelého legendárního detektiva.",
            genre: "Sci-Fi",
            year: 2017,
            origin: "USA",
        },
        Movie {
            title: "Vykoupení z věznice Shawshank",
            description: "Bankéř neprávem odsouzený za vraždu své ženy nachází ve vězení naději a nečekané přátelství, které mu pomůže přežít dvě desetiletí za mřížemi.",
            genre: "Drama",
            year: 1994,
            origin: "USA",
        },
        Movie {
            title: "Forrest Gump",
            description: "Příběh muže s nízkým IQ, který se díky své laskavosti a štěstí nevědomky stane součástí klíčových historických událostí 20. století.",
            genre: "Drama",
            year: 1994,
            origin: "USA",
        },
        Movie {
            title: "Zelená míle",
            description: "Dozorce ve věznici pro odsouzence na smrt zjistí, že jeden z vězňů disponuje zázračným darem léčit nemocné a trpící.",
            genre: "Drama",
            year: 1999,
            origin: "USA",
        },
        Movie {
            title: "Pelíšky",
            description: "Kultovní tragikomedie o dospívání a střetu generací ve dvou sousedských rodinách v Praze na sklonku 60. let.",
            genre: "Komedie",
            year: 1999,
            origin: "Česká republika",
        },
        Movie {
            title: "Grandhotel Budapešť",
            description: "Dobrodružství svérázného správce věhlasného hotelu a jeho mladého pomocníka při pátrání po ukradeném renesančním obrazu.",
            genre: "Komedie",
            year: 2014,
            origin: "USA/Velká Británie/Německo",
        },
        Movie {
            title: "Nedotknutelní",
            description: "Ochrnutý aristokrat si najme jako ošetřovatele živelného mladíka z předměstí, čímž vznikne přátelství, které oběma změní pohled na svět.",
            genre: "Komedie",
            year: 2011,
            origin: "Francie",
        },
        Movie {
            title: "Mlčení jehňátek",
            description: "Mladá agentka FBI musí požádat o pomoc uvězněného geniálního psychiatra a kanibala, aby dopadla jiného nebezpečného sériového vraha.",
            genre: "Thriller",
            year: 1991,
            origin: "USA",
        },
        Movie {
            title: "Parazit",
            description: "Chudá rodina se lstí infiltruje do domácnosti bohatých, což spustí řetězec nečekaných událostí, které vyústí v krvavý konflikt.",
            genre: "Thriller",
            year: 2019,
            origin: "Jižní Korea",
        },
        Movie {
            title: "Joker",
            description: "Zkrachovalý komik se v osamění a nepochopení propadá do šílenství, čímž se zrodí jeden z nejděsivějších kriminálníků ve městě Gotham.",
            genre: "Thriller",
            year: 2019,
            origin: "USA",
        },
    ]
}

/// The dataset as batch-insert property maps.
pub fn movie_objects() -> Vec<Value> {
    movies()
        .iter()
        .map(|m| {
            json!({
                "title": m.title,
                "description": m.description,
                "genre": m.genre,
                "year": m.year,
                "origin": m.origin,
            })
        })
        .collect()
}

/// The `Filmy` class definition, with the Ollama vectorizer and generative
/// modules pointing at the configured endpoint.
pub fn collection_definition(ollama: &OllamaConfig) -> ClassDefinition {
    fn property(name: &str, data_type: &str, description: &str) -> PropertyDefinition {
        PropertyDefinition {
            name: name.to_string(),
            data_type: vec![data_type.to_string()],
            description: Some(description.to_string()),
        }
    }

    ClassDefinition {
        name: COLLECTION_NAME.to_string(),
        description: Some(
            "Sbírka filmů s českými tituly a popisy pro testování vyhledávání a RAG".to_string(),
        ),
        properties: vec![
            property("title", "text", "Název filmu"),
            property("description", "text", "Popis filmu"),
            property("genre", "text", "Žánr filmu"),
            property("year", "int", "Rok vydání"),
            property("origin", "text", "Země původu"),
        ],
        vectorizer: Some("text2vec-ollama".to_string()),
        module_config: Some(json!({
            "text2vec-ollama": {
                "apiEndpoint": ollama.endpoint,
                "model": ollama.embed_model,
            },
            "generative-ollama": {
                "apiEndpoint": ollama.endpoint,
                "model": ollama.generative_model,
            },
        })),
    }
}
