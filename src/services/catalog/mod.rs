use rand::{Rng, seq::IndexedRandom};

use crate::error::{AppError, Result};

pub mod loader;
pub mod types;

pub use loader::{CatalogLoader, HttpCatalogLoader};
pub use types::{CatalogDocument, CatalogEntry, Fortune, Reading};

/// Non-empty, validated set of fortunes.
#[derive(Debug, Clone)]
pub struct FortuneCatalog {
    entries: Vec<CatalogEntry>,
}

impl FortuneCatalog {
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(AppError::EmptyCatalog);
        }

        for (index, entry) in entries.iter().enumerate() {
            entry
                .check()
                .map_err(|reason| AppError::InvalidFortune { index, reason })?;
        }

        Ok(Self { entries })
    }

    /// Parses a catalog document, trying TOML first and JSON second.
    pub fn parse(contents: &str, origin: &str) -> Result<Self> {
        let document: CatalogDocument = toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                AppError::CatalogParse(format!(
                    "{origin}: toml error: {toml_err}; json error: {json_err}"
                ))
            })
        })?;

        Self::from_entries(document.fortunes)
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&CatalogEntry> {
        self.entries.choose(rng).ok_or(AppError::EmptyCatalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}
