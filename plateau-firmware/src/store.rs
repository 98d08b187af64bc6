//! Flash-backed settings store
//!
//! Uses sequential-storage for wear-leveled key-value storage in the
//! last 64KB of flash. The working copies live in RAM; every write
//! through [`ConfigStore`] persists before it returns, so settings
//! survive the reset that wakes the panel from sleep.

use defmt::{info, warn};
use embassy_futures::block_on;
use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

use plateau_core::config::{PromptConfig, WeightsConfig};
use plateau_core::traits::{ConfigStore, StoreError};

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico
pub const CONFIG_PARTITION_SIZE: usize = 64 * 1024;
pub const CONFIG_PARTITION_START: usize = FLASH_SIZE - CONFIG_PARTITION_SIZE;

/// Flash range for the settings partition
pub const CONFIG_RANGE: core::ops::Range<u32> =
    (CONFIG_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch buffer size for sequential-storage operations
const DATA_BUFFER_SIZE: usize = 2048;

/// Serialized size cap for a single settings record
const RECORD_SIZE: usize = 512;

/// Storage keys for the persisted settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StorageKey {
    /// Plate, bar and collar inventory for both units (postcard)
    Weights = 0,
    /// Prompt screen state, currently just the unit ring index
    Prompt = 1,
}

impl StorageKey {
    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        let key = match buffer[0] {
            0 => StorageKey::Weights,
            1 => StorageKey::Prompt,
            _ => return Err(sequential_storage::map::SerializationError::InvalidFormat),
        };
        Ok((key, 1))
    }
}

/// Settings store over the RP2040 flash
///
/// Holds the live copies the UI reads and writes each record back as
/// a postcard blob under its [`StorageKey`].
pub struct FlashStore<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
    weights: WeightsConfig,
    prompt: PromptConfig,
}

impl<'d> FlashStore<'d> {
    /// Open the settings partition and load both records
    ///
    /// A record that is missing or does not decode is replaced with
    /// factory defaults, which are persisted right away.
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        let mut store = Self {
            flash: Flash::new(flash, dma),
            weights: WeightsConfig::default(),
            prompt: PromptConfig::default(),
        };

        match store.fetch::<WeightsConfig>(StorageKey::Weights) {
            Some(weights) => store.weights = weights,
            None => {
                warn!("no stored weights, seeding factory defaults");
                if store.persist(StorageKey::Weights).is_err() {
                    warn!("could not seed weights record");
                }
            }
        }

        match store.fetch::<PromptConfig>(StorageKey::Prompt) {
            Some(prompt) => store.prompt = prompt,
            None => {
                warn!("no stored prompt state, seeding defaults");
                if store.persist(StorageKey::Prompt).is_err() {
                    warn!("could not seed prompt record");
                }
            }
        }

        info!("settings loaded, unit ring index {}", store.prompt.unit_state);
        store
    }

    /// Fetch and decode one record
    fn fetch<T: serde::de::DeserializeOwned>(&mut self, key: StorageKey) -> Option<T> {
        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];

        let result = block_on(map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
        ));

        match result {
            Ok(Some(data)) => match postcard::from_bytes(data) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("stored record {} is corrupt", key.as_u8());
                    None
                }
            },
            Ok(None) => None,
            Err(_) => {
                warn!("flash fetch failed for record {}", key.as_u8());
                None
            }
        }
    }

    /// Encode and store one record
    fn persist(&mut self, key: StorageKey) -> Result<(), StoreError> {
        let mut record = [0u8; RECORD_SIZE];
        let encoded: &[u8] = match key {
            StorageKey::Weights => postcard::to_slice(&self.weights, &mut record),
            StorageKey::Prompt => postcard::to_slice(&self.prompt, &mut record),
        }
        .map_err(|_| StoreError::Write)?;

        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];
        block_on(map::store_item(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
            &encoded,
        ))
        .map_err(|_| {
            warn!("flash store failed for record {}", key.as_u8());
            StoreError::Write
        })
    }
}

impl ConfigStore for FlashStore<'_> {
    fn weights(&self) -> &WeightsConfig {
        &self.weights
    }

    fn prompt(&self) -> &PromptConfig {
        &self.prompt
    }

    fn write_weights(&mut self, weights: WeightsConfig) -> Result<(), StoreError> {
        self.weights = weights;
        self.persist(StorageKey::Weights)
    }

    fn write_prompt(&mut self, prompt: PromptConfig) -> Result<(), StoreError> {
        self.prompt = prompt;
        self.persist(StorageKey::Prompt)
    }
}
