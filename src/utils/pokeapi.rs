#![forbid(unsafe_code)]

use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

// DEX Utilities
use crate::utils::errors::Errors;

// ***************************************************************************
//                                Constants
// ***************************************************************************
const POKEAPI_BASE : &str = "https://pokeapi.co/api/v2";

// Evolution chains have exactly three modeled stages: base species, its
// direct evolutions, and their direct evolutions.
const MAX_CHAIN_DEPTH : usize = 3;

// ***************************************************************************
//                           Upstream JSON Mirrors
// ***************************************************************************
// Every field defaults so an absent or null upstream field decodes to a zero
// value instead of failing the whole payload.

#[derive(Debug, Default, Deserialize)]
pub struct NamedResource {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiResource {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PokemonResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    #[serde(default)]
    pub sprites: SpriteSet,
    #[serde(default)]
    pub species: ApiResource,
}

#[derive(Debug, Default, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type", default)]
    pub type_info: NamedResource,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatSlot {
    #[serde(default)]
    pub base_stat: i64,
    #[serde(default)]
    pub stat: NamedResource,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpriteSet {
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Debug, Default, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: ArtworkSprites,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtworkSprites {
    #[serde(default)]
    pub front_default: String,
}

#[derive(Debug, Default, Deserialize)]
struct SpeciesResponse {
    #[serde(default)]
    evolution_chain: ApiResource,
}

#[derive(Debug, Default, Deserialize)]
pub struct EvolutionChainResponse {
    #[serde(default)]
    pub chain: ChainLink,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChainLink {
    #[serde(default)]
    pub species: NamedResource,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

// ***************************************************************************
//                              Domain Records
// ***************************************************************************
// ---------------------------------------------------------------------------
// PokemonRecord:
// ---------------------------------------------------------------------------
/** Normalized per-request record assembled from the upstream payloads.
 * Owned exclusively by the request flow that created it and dropped once
 * the response is written.
 */
#[derive(Debug, Default)]
pub struct PokemonRecord {
    pub name: String,
    pub types: Vec<String>,
    pub stats: HashMap<String, i64>,
    pub sprite: String,
    pub evolutions: Vec<String>,
}

// ---------------------------------------------------------------------------
// PokemonFetch:
// ---------------------------------------------------------------------------
/** Outcome of a successful fetch.  The evolution path is best-effort: when
 * the species or chain lookup fails, the record is still served with empty
 * evolutions and the swallowed cause is kept here so it can be logged
 * instead of silently discarded.
 */
#[derive(Debug)]
pub enum PokemonFetch {
    Complete(PokemonRecord),
    Degraded { record: PokemonRecord, cause: String },
}

impl PokemonFetch {
    /** Extract the record, logging the swallowed evolution-path failure on
     * the degraded arm.  The failure never propagates to the caller.
     */
    pub fn into_record(self) -> PokemonRecord {
        match self {
            PokemonFetch::Complete(record) => record,
            PokemonFetch::Degraded { record, cause } => {
                warn!("Serving {} without evolutions: {}", record.name, cause);
                record
            },
        }
    }
}

// ***************************************************************************
//                              Pure Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// flatten_chain:
// ---------------------------------------------------------------------------
/** Flatten an evolution-chain tree into an ordered list of species names.
 *
 * Pre-order: the base species first, then each first-stage evolution
 * followed immediately by all of its second-stage evolutions before the
 * next first-stage sibling.  Input order is preserved; nothing is
 * deduplicated or sorted, so branching evolutions all appear.
 *
 * The walk is capped at three stages.  The upstream data never nests
 * deeper, but if it ever did the extra links are ignored rather than
 * treated as an error.
 */
pub fn flatten_chain(root: &ChainLink) -> Vec<String> {
    let mut names = vec![root.species.name.clone()];
    for first in &root.evolves_to {
        names.push(first.species.name.clone());
        for second in &first.evolves_to {
            names.push(second.species.name.clone());
            if !second.evolves_to.is_empty() {
                debug!("Evolution chain for {} nests deeper than {} stages; ignoring {} link(s) past {}.",
                       root.species.name, MAX_CHAIN_DEPTH, second.evolves_to.len(), second.species.name);
            }
        }
    }
    names
}

// ---------------------------------------------------------------------------
// assemble_record:
// ---------------------------------------------------------------------------
/** Build the normalized record from the detail payload.  Evolutions start
 * empty and are filled in by the caller when the evolution path succeeds.
 */
fn assemble_record(poke: PokemonResponse) -> PokemonRecord {
    let types = poke.types
        .into_iter()
        .map(|slot| slot.type_info.name)
        .collect();
    let stats = poke.stats
        .into_iter()
        .map(|slot| (slot.stat.name, slot.base_stat))
        .collect();

    PokemonRecord {
        name: poke.name,
        types,
        stats,
        sprite: poke.sprites.other.official_artwork.front_default,
        evolutions: Vec::new(),
    }
}

// ***************************************************************************
//                             Fetch Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// fetch_pokemon:
// ---------------------------------------------------------------------------
/** Fetch and assemble the record for a Pokémon identifier.
 *
 * Step 1 requests the detail resource; any failure there aborts the whole
 * operation.  Steps 2 and 3 follow the species reference to the evolution
 * chain; any failure along that path degrades to empty evolutions instead
 * of failing the request.  No caching, so identical calls repeat all
 * outbound requests.
 */
pub async fn fetch_pokemon(id: u64) -> Result<PokemonFetch, Errors> {
    let url = format!("{}/pokemon/{}", POKEAPI_BASE, id);
    let poke: PokemonResponse = fetch_json(&url)
        .await
        .map_err(|e| Errors::UpstreamFetchError(id, e))?;

    let species_url = poke.species.url.clone();
    let mut record = assemble_record(poke);

    match fetch_evolutions(&species_url).await {
        Ok(evolutions) => {
            record.evolutions = evolutions;
            Ok(PokemonFetch::Complete(record))
        },
        Err(cause) => Ok(PokemonFetch::Degraded { record, cause }),
    }
}

// ---------------------------------------------------------------------------
// fetch_evolutions:
// ---------------------------------------------------------------------------
/** Follow the species resource to its evolution chain and flatten it.
 * When the lookup succeeds the result contains at least the base species
 * name.
 */
async fn fetch_evolutions(species_url: &str) -> Result<Vec<String>, String> {
    let species: SpeciesResponse = fetch_json(species_url).await?;
    let chain: EvolutionChainResponse = fetch_json(&species.evolution_chain.url).await?;
    Ok(flatten_chain(&chain.chain))
}

// ---------------------------------------------------------------------------
// fetch_json:
// ---------------------------------------------------------------------------
/** GET a URL and decode its JSON body. */
async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let response = response.error_for_status().map_err(|e| e.to_string())?;
    response.json::<T>().await.map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// http_client:
// ---------------------------------------------------------------------------
/** Process-wide reqwest client, shared read-only across request flows. */
fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}
