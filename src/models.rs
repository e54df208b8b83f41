//! Pokémon, species and evolution records, plus the PokéAPI payload shapes
//! they are built from.

use serde::Deserialize;

/// A Pokémon as shown on the main card. Immutable once fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pokemon {
    pub name: String,
    pub id: u32,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub height: u32,
    pub weight: u32,
    pub base_experience: u32,
    pub stats: Vec<Stat>,
    pub artwork_url: Option<String>,
    pub sprite_url: Option<String>,
    pub cry_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stat {
    pub name: String,
    pub base: u32,
}

impl Pokemon {
    /// Base value of the named stat, or `"0"` when the record lacks it.
    pub fn stat_display(&self, name: &str) -> String {
        self.stats
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.base.to_string())
            .unwrap_or_else(|| "0".to_string())
    }

    /// Ability in `slot` (0-based), or `"---"`.
    pub fn ability_display(&self, slot: usize) -> String {
        self.abilities
            .get(slot)
            .cloned()
            .unwrap_or_else(|| "---".to_string())
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }
}

/// Game generation a species debuted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
    VIII,
    IX,
    Unknown(String),
}

impl Generation {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "generation-i" => Generation::I,
            "generation-ii" => Generation::II,
            "generation-iii" => Generation::III,
            "generation-iv" => Generation::IV,
            "generation-v" => Generation::V,
            "generation-vi" => Generation::VI,
            "generation-vii" => Generation::VII,
            "generation-viii" => Generation::VIII,
            "generation-ix" => Generation::IX,
            other => Generation::Unknown(other.to_string()),
        }
    }

    /// Region name shown in the species panel. Unknown tags are shown verbatim.
    pub fn region(&self) -> &str {
        match self {
            Generation::I => "Kanto",
            Generation::II => "Johto",
            Generation::III => "Hoenn",
            Generation::IV => "Sinnoh",
            Generation::V => "Unova",
            Generation::VI => "Kalos",
            Generation::VII => "Alola",
            Generation::VIII => "Galar",
            Generation::IX => "Paldea",
            Generation::Unknown(tag) => tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlavorText {
    pub text: String,
    pub language: String,
}

/// Species metadata: generation, rarity flags and localized flavor text.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub name: String,
    pub generation: Generation,
    pub is_legendary: bool,
    pub is_mythical: bool,
    pub flavor_texts: Vec<FlavorText>,
    pub evolution_chain_url: Option<String>,
}

impl Species {
    /// Portuguese flavor text if any, else English. Line breaks are flattened to spaces.
    pub fn description(&self) -> Option<String> {
        let pick = |lang: &str| self.flavor_texts.iter().find(|f| f.language == lang);
        pick("pt")
            .or_else(|| pick("en"))
            .map(|f| f.text.replace(['\n', '\u{c}', '\r'], " "))
    }

    /// Legendary wins over mythical when both are set.
    pub fn status_label(&self) -> Option<&'static str> {
        if self.is_legendary {
            Some("Lendário")
        } else if self.is_mythical {
            Some("Mítico")
        } else {
            None
        }
    }
}

/// One node of a flattened evolution chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionStage {
    pub name: String,
    pub id: u32,
}

/// Species data plus the flattened chain. `species: None` with an empty chain
/// means the lookup degraded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeciesAndEvolution {
    pub species: Option<Species>,
    pub evolution: Vec<EvolutionStage>,
}

impl SpeciesAndEvolution {
    pub fn unavailable() -> Self {
        Self::default()
    }
}

// PokéAPI payloads. Only the consumed fields are modelled.

#[derive(Debug, Deserialize, Clone)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiPokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<ApiTypeSlot>,
    #[serde(default)]
    pub abilities: Vec<ApiAbilitySlot>,
    #[serde(default)]
    pub stats: Vec<ApiStat>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub sprites: Option<ApiSprites>,
    #[serde(default)]
    pub cries: Option<ApiCries>,
}

#[derive(Debug, Deserialize)]
pub struct ApiTypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Deserialize)]
pub struct ApiAbilitySlot {
    pub ability: NamedResource,
}

#[derive(Debug, Deserialize)]
pub struct ApiStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiSprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<ApiOtherSprites>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiOtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<ApiArtwork>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiArtwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiCries {
    #[serde(default)]
    pub latest: Option<String>,
    #[serde(default)]
    pub legacy: Option<String>,
}

impl From<ApiPokemon> for Pokemon {
    fn from(api: ApiPokemon) -> Self {
        let sprites = api.sprites.unwrap_or_default();
        let artwork_url = sprites
            .other
            .and_then(|o| o.official_artwork)
            .and_then(|a| a.front_default);
        let cry_url = api.cries.and_then(|c| c.latest.or(c.legacy));
        Pokemon {
            name: api.name,
            id: api.id,
            types: api.types.into_iter().map(|t| t.kind.name).collect(),
            abilities: api.abilities.into_iter().map(|a| a.ability.name).collect(),
            height: api.height.unwrap_or(0),
            weight: api.weight.unwrap_or(0),
            base_experience: api.base_experience.unwrap_or(0),
            stats: api
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    base: s.base_stat,
                })
                .collect(),
            artwork_url,
            sprite_url: sprites.front_default,
            cry_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiSpecies {
    pub name: String,
    pub generation: NamedResource,
    #[serde(default)]
    pub is_legendary: bool,
    #[serde(default)]
    pub is_mythical: bool,
    #[serde(default)]
    pub flavor_text_entries: Vec<ApiFlavorText>,
    #[serde(default)]
    pub evolution_chain: Option<ApiUrlRef>,
}

#[derive(Debug, Deserialize)]
pub struct ApiFlavorText {
    pub flavor_text: String,
    pub language: NamedResource,
}

#[derive(Debug, Deserialize)]
pub struct ApiUrlRef {
    #[serde(default)]
    pub url: Option<String>,
}

impl From<ApiSpecies> for Species {
    fn from(api: ApiSpecies) -> Self {
        Species {
            name: api.name,
            generation: Generation::from_tag(&api.generation.name),
            is_legendary: api.is_legendary,
            is_mythical: api.is_mythical,
            flavor_texts: api
                .flavor_text_entries
                .into_iter()
                .map(|f| FlavorText {
                    text: f.flavor_text,
                    language: f.language.name,
                })
                .collect(),
            evolution_chain_url: api
                .evolution_chain
                .and_then(|c| c.url)
                .filter(|u| !u.is_empty()),
        }
    }
}
