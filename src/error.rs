//! Error types for the Pokédex.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DexError>;

#[derive(Error, Debug)]
pub enum DexError {
    #[error("Pokémon not found: {identifier}")]
    NotFound { identifier: String },

    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Recents file {path} is corrupt: {source}")]
    CorruptRecents {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Malformed resource URL: {url}")]
    MalformedResource { url: String },

    #[error("No Pokémon name or id given")]
    EmptyIdentifier,
}

impl DexError {
    /// Short text shown on the card when a lookup fails.
    pub fn user_message(&self) -> String {
        match self {
            DexError::NotFound { .. } => "Pokémon não encontrado".to_string(),
            other => other.to_string(),
        }
    }
}
