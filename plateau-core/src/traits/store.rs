//! Configuration store contract
//!
//! Typed read/write over the two persisted keys, `weights` and `prompt`.
//! Reads come from an in-memory copy materialized at startup; writes go
//! through to the backing medium before returning (write-through).

use crate::config::{PromptConfig, WeightsConfig};

/// Errors from configuration persistence
///
/// Backends log their specific failure before mapping into one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// The backing medium rejected a read
    Read,
    /// The backing medium rejected a write
    Write,
    /// Stored bytes did not decode as the schema
    Corrupt,
}

/// The configuration document as the UI core sees it
pub trait ConfigStore {
    /// The loaded weight inventory
    fn weights(&self) -> &WeightsConfig;

    /// The loaded prompt settings
    fn prompt(&self) -> &PromptConfig;

    /// Replace and persist the weight inventory
    fn write_weights(&mut self, weights: WeightsConfig) -> Result<(), StoreError>;

    /// Replace and persist the prompt settings
    fn write_prompt(&mut self, prompt: PromptConfig) -> Result<(), StoreError>;
}

/// Store with no backing medium
///
/// Backs the core's own tests; the simulator also embeds one and flushes
/// it to disk after each write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    weights: WeightsConfig,
    prompt: PromptConfig,
}

impl MemoryStore {
    /// A store holding the factory defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the given document
    pub fn with(weights: WeightsConfig, prompt: PromptConfig) -> Self {
        Self { weights, prompt }
    }
}

impl ConfigStore for MemoryStore {
    fn weights(&self) -> &WeightsConfig {
        &self.weights
    }

    fn prompt(&self) -> &PromptConfig {
        &self.prompt
    }

    fn write_weights(&mut self, weights: WeightsConfig) -> Result<(), StoreError> {
        self.weights = weights;
        Ok(())
    }

    fn write_prompt(&mut self, prompt: PromptConfig) -> Result<(), StoreError> {
        self.prompt = prompt;
        Ok(())
    }
}
