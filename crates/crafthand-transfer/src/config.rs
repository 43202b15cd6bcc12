//! Transfer configuration.
//!
//! Tunables for the crafting-grid filler, loaded from a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{info, warn};

/// Lowest accepted craft cap.
pub const MIN_CRAFTS_PER_TRANSFER: u32 = 1;
/// Highest accepted craft cap.
pub const MAX_CRAFTS_PER_TRANSFER: u32 = 4096;

/// Allocator tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Honor bulk (shift-click) requests; when off a bulk request fills one craft
    pub bulk_transfer_enabled: bool,
    /// Upper cap on crafts per allocation, on top of stack-size limits
    pub max_crafts_per_transfer: u32,
    /// Return grid contents to the inventory again after a failed match
    pub clean_on_failure: bool,
    /// Publish an event when a commit falls short
    pub report_shortfall_events: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            bulk_transfer_enabled: true,
            max_crafts_per_transfer: 64,
            clean_on_failure: true,
            report_shortfall_events: true,
        }
    }
}

impl TransferConfig {
    /// Load configuration from a file, falling back to defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Transfer config not found, using defaults");
            return Self::default();
        }

        let mut contents = String::new();
        match fs::File::open(path) {
            Ok(mut file) => {
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read transfer config: {e}");
                    return Self::default();
                }
            },
            Err(e) => {
                warn!("Failed to open transfer config: {e}");
                return Self::default();
            },
        }

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded transfer config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse transfer config: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved transfer config to {}", path.display());
        Ok(())
    }

    /// Clamp values to accepted ranges.
    pub fn validate(&mut self) {
        self.max_crafts_per_transfer = self
            .max_crafts_per_transfer
            .clamp(MIN_CRAFTS_PER_TRANSFER, MAX_CRAFTS_PER_TRANSFER);
    }

    /// Returns the craft count to aim for given a bulk request.
    #[must_use]
    pub fn requested_crafts(&self, bulk: bool) -> u32 {
        if bulk && self.bulk_transfer_enabled {
            self.max_crafts_per_transfer
        } else {
            1
        }
    }
}
