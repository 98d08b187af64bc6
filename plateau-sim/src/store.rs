//! JSON-backed settings store
//!
//! The simulator persists the same two records the firmware keeps in
//! flash, as one pretty-printed JSON file. Hand-editing that file is
//! the quickest way to set up an unusual plate inventory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use plateau_core::config::{PromptConfig, WeightsConfig};
use plateau_core::traits::{ConfigStore, MemoryStore, StoreError};

/// On-disk layout of the settings file
#[derive(Serialize, Deserialize)]
struct SettingsFile {
    weights: WeightsConfig,
    prompt: PromptConfig,
}

/// Settings store over a JSON file
///
/// Wraps a [`MemoryStore`] and rewrites the file after every change,
/// mirroring the write-through behavior of the flash store.
pub struct JsonStore {
    path: PathBuf,
    memory: MemoryStore,
}

impl JsonStore {
    /// Load settings from `path`, seeding factory defaults when the
    /// file is missing or does not decode
    pub fn open(path: &Path) -> Result<Self> {
        let memory = match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<SettingsFile>(&text) {
                Ok(file) => {
                    info!("loaded settings from {}", path.display());
                    MemoryStore::with(file.weights, file.prompt)
                }
                Err(e) => {
                    warn!(
                        "settings file {} does not decode ({}), using factory defaults",
                        path.display(),
                        e
                    );
                    MemoryStore::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("no settings at {}, seeding factory defaults", path.display());
                MemoryStore::default()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read {}", path.display()));
            }
        };

        let store = Self {
            path: path.to_owned(),
            memory,
        };
        store.flush().context("seed settings file")?;
        Ok(store)
    }

    /// Rewrite the whole settings file from the in-memory copies
    fn flush(&self) -> Result<()> {
        let file = SettingsFile {
            weights: self.memory.weights().clone(),
            prompt: self.memory.prompt().clone(),
        };
        let text = serde_json::to_string_pretty(&file).context("encode settings")?;
        fs::write(&self.path, text).with_context(|| format!("write {}", self.path.display()))?;
        debug!("settings flushed to {}", self.path.display());
        Ok(())
    }
}

impl ConfigStore for JsonStore {
    fn weights(&self) -> &WeightsConfig {
        self.memory.weights()
    }

    fn prompt(&self) -> &PromptConfig {
        self.memory.prompt()
    }

    fn write_weights(&mut self, weights: WeightsConfig) -> Result<(), StoreError> {
        self.memory.write_weights(weights)?;
        self.flush().map_err(|e| {
            warn!("settings write failed: {:#}", e);
            StoreError::Write
        })
    }

    fn write_prompt(&mut self, prompt: PromptConfig) -> Result<(), StoreError> {
        self.memory.write_prompt(prompt)?;
        self.flush().map_err(|e| {
            warn!("settings write failed: {:#}", e);
            StoreError::Write
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use plateau_core::config::DenominationGroup;
    use plateau_core::units::Unit;

    #[test]
    fn test_open_missing_seeds_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = JsonStore::open(&path).unwrap();
        assert_eq!(store.weights(), &WeightsConfig::default());
        assert_eq!(store.prompt().unit_state, 0);
        // The file exists afterwards and decodes cleanly
        let text = fs::read_to_string(&path).unwrap();
        let file: SettingsFile = serde_json::from_str(&text).unwrap();
        assert_eq!(file.weights, WeightsConfig::default());
    }

    #[test]
    fn test_writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = JsonStore::open(&path).unwrap();
        let mut weights = store.weights().clone();
        assert!(weights.unit_mut(Unit::Kg).toggle_plate("25"));
        store.write_weights(weights.clone()).unwrap();

        let mut prompt = store.prompt().clone();
        prompt.unit_state = 2;
        store.write_prompt(prompt).unwrap();
        drop(store);

        let reopened = JsonStore::open(&path).unwrap();
        assert!(!reopened
            .weights()
            .unit(Unit::Kg)
            .is_using(DenominationGroup::Plates, "25"));
        assert_eq!(reopened.prompt().unit_state, 2);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonStore::open(&path).unwrap();
        assert_eq!(store.weights(), &WeightsConfig::default());
        // The broken file was replaced with a good one
        let text = fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<SettingsFile>(&text).is_ok());
    }
}
