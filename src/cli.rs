//! Command-line arguments and the resolved runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use crate::fetch::API_BASE_URL;

const APP_DIR: &str = "pokedex-tui";

/// Terminal Pokédex backed by PokéAPI.
#[derive(Debug, Parser)]
#[clap(name = "pokedex", version)]
pub struct Cli {
    /// Pokémon name or number to show first (defaults to the most recent one).
    pub pokemon: Option<String>,

    /// PokéAPI base URL.
    #[clap(long, env = "POKEDEX_API_BASE", default_value = API_BASE_URL)]
    pub api_base: String,

    /// Where the recents list is stored.
    #[clap(long, env = "POKEDEX_RECENTS_FILE")]
    pub recents_file: Option<PathBuf>,

    /// Log file (the terminal is taken by the UI).
    #[clap(long, env = "POKEDEX_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace.
    #[clap(long, env = "POKEDEX_LOG", default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,

    /// Loading transition length in milliseconds.
    #[clap(long, default_value_t = 300)]
    pub fade_ms: u64,

    /// Look up one Pokémon, print it as text and exit.
    #[clap(long)]
    pub print: bool,

    /// Forget the recents list and exit.
    #[clap(long)]
    pub clear_recents: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub initial: Option<String>,
    pub api_base: String,
    pub recents_path: PathBuf,
    pub log_path: PathBuf,
    pub log_level: LevelFilter,
    pub fade: Duration,
    pub print: bool,
    pub clear_recents: bool,
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            initial: self
                .pokemon
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty()),
            api_base: self.api_base,
            recents_path: self
                .recents_file
                .unwrap_or_else(|| data_dir().join("recents.json")),
            log_path: self
                .log_file
                .unwrap_or_else(|| data_dir().join("pokedex.log")),
            log_level: self.log_level,
            fade: Duration::from_millis(self.fade_ms),
            print: self.print,
            clear_recents: self.clear_recents,
        }
    }
}
