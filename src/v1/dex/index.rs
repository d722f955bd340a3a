#![forbid(unsafe_code)]

use log::info;
use poem::http::StatusCode;
use poem::web::{Html, Query};
use poem::{handler, Error};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tera::{Context, Tera, Value};

// DEX Utilities
use crate::utils::dex_utils::{pokemon_id, title_case, FIRST_GEN_SPECIES};
use crate::utils::errors::Errors;
use crate::utils::pokeapi::{self, PokemonRecord};
use crate::RUNTIME_CTX;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Name used when the query parameter is absent or empty.
const DEFAULT_NAME  : &str = "cafard";

// The page template, embedded in the binary.
const TEMPLATE_NAME : &str = "index.tmpl.html";
const TEMPLATE_BODY : &str = include_str!("../../../templates/index.tmpl.html");

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    name: Option<String>,
}

// ---------------------------------------------------------------------------
// PageParams:
// ---------------------------------------------------------------------------
/** View model handed to the template: the requesting name, the display
 * version label, and the fetched record's fields flattened for rendering.
 * Lives for a single request, like the record it wraps.
 */
#[derive(Debug, Serialize)]
struct PageParams {
    name: String,
    version: String,
    pokemon_id: u64,
    pokemon_name: String,
    types: Vec<String>,
    stats: HashMap<String, i64>,
    evolutions: Vec<String>,
    pokemon_sprite: String,
}

impl PageParams {
    fn new(name: String, version: String, pokemon_id: u64, record: PokemonRecord) -> Self {
        Self {
            name,
            version,
            pokemon_id,
            pokemon_name: record.name,
            types: record.types,
            stats: record.stats,
            evolutions: record.evolutions,
            pokemon_sprite: record.sprite,
        }
    }
}

// ***************************************************************************
//                                 Endpoint
// ***************************************************************************
// ---------------------------------------------------------------------------
// index endpoint:
// ---------------------------------------------------------------------------
/** The single route: resolve the name, hash it to an identifier, fetch the
 * Pokémon's data and render the page.  Template, detail-fetch and render
 * failures all surface as a 500 with the raw error text; an evolution-path
 * failure does not, the page is served with empty evolutions instead.
 */
#[handler]
pub async fn index(Query(query): Query<IndexQuery>) -> Result<Html<String>, Error> {
    let start = Instant::now();

    let name = resolve_name(query.name);

    let tera = load_template().map_err(to_server_error)?;

    let pid = pokemon_id(&name, FIRST_GEN_SPECIES);
    let fetch = pokeapi::fetch_pokemon(pid).await.map_err(to_server_error)?;
    let record = fetch.into_record();

    let params = PageParams::new(
        name.clone(),
        RUNTIME_CTX.config.version.clone(),
        pid,
        record,
    );
    let page = render_page(&tera, &params).map_err(to_server_error)?;

    info!("Generated page in {:?} for {} -> {}", start.elapsed(), name, params.pokemon_name);
    Ok(Html(page))
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// resolve_name:
// ---------------------------------------------------------------------------
/** Resolve the name query parameter.  A missing or empty name behaves
 * exactly like name=cafard.
 */
fn resolve_name(name: Option<String>) -> String {
    match name {
        Some(n) if !n.is_empty() => n,
        _ => DEFAULT_NAME.to_string(),
    }
}

// ---------------------------------------------------------------------------
// to_server_error:
// ---------------------------------------------------------------------------
/** Map any application error to a 500 whose plain-text body is the raw
 * error text.
 */
fn to_server_error(error: Errors) -> Error {
    Error::from_string(error.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
}

// ---------------------------------------------------------------------------
// load_template:
// ---------------------------------------------------------------------------
/** Parse the embedded template and register the titlecase filter.  Parsed
 * per request so a broken template is a 500 response, not a startup panic.
 */
fn load_template() -> Result<Tera, Errors> {
    let mut tera = Tera::default();
    tera.register_filter("titlecase", titlecase_filter);
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE_BODY)
        .map_err(|e| Errors::TemplateParseError(e.to_string()))?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// render_page:
// ---------------------------------------------------------------------------
fn render_page(tera: &Tera, params: &PageParams) -> Result<String, Errors> {
    let context = Context::from_serialize(params)
        .map_err(|e| Errors::RenderError(e.to_string()))?;
    tera.render(TEMPLATE_NAME, &context)
        .map_err(|e| Errors::RenderError(e.to_string()))
}

// ---------------------------------------------------------------------------
// titlecase_filter:
// ---------------------------------------------------------------------------
/** Tera filter uppercasing the first character of its input, a no-op on
 * the empty string.
 */
fn titlecase_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    match value.as_str() {
        Some(s) => Ok(Value::String(title_case(s))),
        None => Err(tera::Error::msg("The titlecase filter expects a string.")),
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params() -> PageParams {
        PageParams::new(
            "cafard".to_string(),
            "cafard-edition".to_string(),
            97,
            PokemonRecord {
                name: "hypno".to_string(),
                types: vec!["psychic".to_string()],
                stats: HashMap::from([
                    ("hp".to_string(), 85),
                    ("speed".to_string(), 67),
                ]),
                sprite: "https://img.example/97.png".to_string(),
                evolutions: vec!["drowzee".to_string(), "hypno".to_string()],
            },
        )
    }

    #[test]
    fn resolve_name_absent_defaults_to_cafard() {
        assert_eq!(resolve_name(None), "cafard");
    }

    #[test]
    fn resolve_name_empty_defaults_to_cafard() {
        assert_eq!(resolve_name(Some(String::new())), "cafard");
    }

    #[test]
    fn resolve_name_passes_through_value() {
        assert_eq!(resolve_name(Some("pikachu".to_string())), "pikachu");
    }

    #[test]
    fn template_parses() {
        load_template().unwrap();
    }

    #[test]
    fn render_full_page() {
        let tera = load_template().unwrap();
        let page = render_page(&tera, &sample_params()).unwrap();
        assert!(page.contains("Hypno"));
        assert!(page.contains("cafard-edition"));
        assert!(page.contains("Psychic"));
        assert!(page.contains("hp"));
        assert!(page.contains("85"));
        assert!(page.contains("Drowzee"));
        assert!(page.contains("https://img.example/97.png"));
    }

    // A degraded fetch renders fine, just without the evolutions section.
    #[test]
    fn render_page_without_evolutions() {
        let tera = load_template().unwrap();
        let mut params = sample_params();
        params.evolutions.clear();
        let page = render_page(&tera, &params).unwrap();
        assert!(page.contains("Hypno"));
        assert!(!page.contains("Drowzee"));
    }

    #[test]
    fn titlecase_filter_on_strings() {
        let args = HashMap::new();
        let out = titlecase_filter(&Value::String("pikachu".to_string()), &args).unwrap();
        assert_eq!(out, Value::String("Pikachu".to_string()));
        let out = titlecase_filter(&Value::String(String::new()), &args).unwrap();
        assert_eq!(out, Value::String(String::new()));
    }

    #[test]
    fn titlecase_filter_rejects_non_strings() {
        let args = HashMap::new();
        assert!(titlecase_filter(&Value::Bool(true), &args).is_err());
    }
}
