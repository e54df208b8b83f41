//! Flattening of PokéAPI evolution chains into an ordered list of stages.
//!
//! Only the first branch is followed at each node, so branching families
//! (Eevee, Wurmple, ...) collapse to a single root-to-leaf path.

use serde::Deserialize;

use crate::error::{DexError, Result};
use crate::models::{EvolutionStage, NamedResource};

#[derive(Debug, Deserialize, Clone)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Debug, Deserialize)]
pub struct EvolutionChainResponse {
    pub chain: ChainLink,
}

/// Parse the id from a resource URL such as
/// `https://pokeapi.co/api/v2/pokemon-species/1/`.
pub fn species_id_from_url(url: &str) -> Result<u32> {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    trimmed
        .rsplit('/')
        .next()
        .and_then(|seg| seg.parse::<u32>().ok())
        .ok_or_else(|| DexError::MalformedResource {
            url: url.to_string(),
        })
}

/// Walk the chain from the root, following `evolves_to[0]` until it runs out.
/// The result always contains the root.
pub fn flatten_chain(root: &ChainLink) -> Result<Vec<EvolutionStage>> {
    let mut stages = Vec::new();
    let mut current = Some(root);
    while let Some(link) = current {
        stages.push(EvolutionStage {
            name: link.species.name.clone(),
            id: species_id_from_url(&link.species.url)?,
        });
        if link.evolves_to.len() > 1 {
            log::debug!(
                "{} has {} evolution branches; following {}",
                link.species.name,
                link.evolves_to.len(),
                link.evolves_to[0].species.name
            );
        }
        current = link.evolves_to.first();
    }
    Ok(stages)
}
