//! PokéAPI client. Every call goes to the network; nothing is cached and
//! nothing is retried.

use std::future::Future;

use reqwest::Client;

use crate::error::{DexError, Result};
use crate::evolution::{flatten_chain, EvolutionChainResponse};
use crate::models::{
    ApiPokemon, ApiSpecies, EvolutionStage, Pokemon, Species, SpeciesAndEvolution,
};

/// Base path for PokéAPI v2.
pub const API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// The data source the lookup pipeline depends on.
pub trait DexApi: Send + Sync {
    /// Fetch a Pokémon by name or numeric id.
    fn fetch_pokemon(&self, identifier: &str) -> impl Future<Output = Result<Pokemon>> + Send;

    /// Fetch species data and the flattened evolution chain. Never fails:
    /// problems degrade to partial or empty data.
    fn fetch_species_and_evolution(
        &self,
        id: u32,
    ) -> impl Future<Output = SpeciesAndEvolution> + Send;

    /// Download raw image bytes.
    fn fetch_image(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

#[derive(Debug, Clone)]
pub struct PokeApi {
    client: Client,
    base_url: String,
}

impl Default for PokeApi {
    fn default() -> Self {
        Self::new(API_BASE_URL)
    }
}

impl PokeApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn pokemon_url(&self, identifier: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, identifier.trim().to_lowercase())
    }

    pub fn species_url(&self, id: u32) -> String {
        format!("{}/pokemon-species/{}/", self.base_url, id)
    }

    async fn fetch_species(&self, id: u32) -> Result<Species> {
        let api: ApiSpecies = self
            .client
            .get(self.species_url(id))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(api.into())
    }

    async fn fetch_chain(&self, url: &str) -> Result<Vec<EvolutionStage>> {
        let res: EvolutionChainResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        flatten_chain(&res.chain)
    }
}

impl DexApi for PokeApi {
    async fn fetch_pokemon(&self, identifier: &str) -> Result<Pokemon> {
        if identifier.trim().is_empty() {
            return Err(DexError::EmptyIdentifier);
        }
        let url = self.pokemon_url(identifier);
        let res = self.client.get(&url).send().await.map_err(|e| {
            log::error!("request for {} failed: {}", identifier, e);
            DexError::Network(e)
        })?;

        if !res.status().is_success() {
            log::error!("{} answered {} for {}", url, res.status(), identifier);
            return Err(DexError::NotFound {
                identifier: identifier.trim().to_lowercase(),
            });
        }

        let api: ApiPokemon = res.json().await?;
        Ok(api.into())
    }

    async fn fetch_species_and_evolution(&self, id: u32) -> SpeciesAndEvolution {
        let species = match self.fetch_species(id).await {
            Ok(s) => s,
            Err(e) => {
                log::warn!("species {} unavailable: {}", id, e);
                return SpeciesAndEvolution::unavailable();
            }
        };

        let sole_stage = vec![EvolutionStage {
            name: species.name.clone(),
            id,
        }];

        let Some(chain_url) = species.evolution_chain_url.clone() else {
            log::warn!("species {} ({}) has no evolution chain", id, species.name);
            return SpeciesAndEvolution {
                species: Some(species),
                evolution: sole_stage,
            };
        };

        let evolution = match self.fetch_chain(&chain_url).await {
            Ok(stages) => stages,
            Err(e) => {
                log::warn!("evolution chain {} unavailable: {}", chain_url, e);
                sole_stage
            }
        };

        SpeciesAndEvolution {
            species: Some(species),
            evolution,
        }
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}
