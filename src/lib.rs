//! Terminal Pokédex
//!
//! Looks Pokémon up on PokéAPI and shows them as a card with stats, abilities,
//! species details and the evolution line, next to a list of recent lookups.
//!
//! ## Layout
//!
//! - [`fetch`]: PokéAPI client and the [`fetch::DexApi`] seam
//! - [`evolution`]: flattening of evolution chains
//! - [`recents`]: the persisted most-recent-first list
//! - [`controller`]: the lookup-and-render pipeline
//! - [`ui`]: the [`ui::View`] contract, the in-memory [`ui::App`] and its ratatui paint
//! - [`sprite`]: card image preload with artwork/sprite fallback
//!
//! ## Environment Configuration
//!
//! ```bash
//! export POKEDEX_API_BASE=https://pokeapi.co/api/v2
//! export POKEDEX_RECENTS_FILE=~/.pokedex/recents.json
//! export POKEDEX_LOG=debug
//! ```

pub mod cli;
pub mod controller;
pub mod error;
pub mod evolution;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod recents;
pub mod sprite;
pub mod state;
pub mod ui;
pub mod utils;

pub use controller::Controller;
pub use error::{DexError, Result};
pub use fetch::{DexApi, PokeApi};
pub use models::{EvolutionStage, Pokemon, Species, SpeciesAndEvolution};
pub use recents::RecentsStore;
pub use state::Outcome;
