//! Engine configuration
//!
//! Stored as postcard binary data next to the host's bonding information,
//! or read from a TOML file on hosts with the `std` feature:
//! ```toml
//! pacing_ms = 50
//! bond_settle_ms = 1000
//! loading_mode = "lazy"
//! ```

use embassy_time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest serialized [`HudConfig`]
pub const MAX_CONFIG_SIZE: usize = 16;

/// When screen uploads are sent to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LoadingMode {
    /// Upload screens as soon as they are enqueued
    #[default]
    Normal,
    /// Hold screen uploads until a screen is first shown
    Lazy,
}

/// Engine timing and loading policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct HudConfig {
    /// Pause between operations (ms)
    pub pacing_ms: u32,
    /// Pause after connecting to a bonded device before service discovery (ms)
    pub bond_settle_ms: u32,
    /// Initial loading mode
    pub loading_mode: LoadingMode,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            pacing_ms: 50,
            bond_settle_ms: 1000,
            loading_mode: LoadingMode::Normal,
        }
    }
}

impl HudConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(u64::from(self.pacing_ms))
    }

    pub fn bond_settle(&self) -> Duration {
        Duration::from_millis(u64::from(self.bond_settle_ms))
    }
}

/// Configuration loading errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Output buffer too small
    Serialize,
    /// Stored bytes are not a valid configuration
    Deserialize,
    /// TOML text is malformed or has unknown keys
    TomlParse,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Serialize => write!(f, "config does not fit the buffer"),
            Self::Deserialize => write!(f, "stored config is corrupt"),
            Self::TomlParse => write!(f, "invalid TOML config"),
        }
    }
}

#[cfg(feature = "serde")]
impl HudConfig {
    /// Serialize into `buf`, returning the used prefix
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize a stored configuration
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)
    }
}

/// Parse a TOML configuration; missing keys keep their defaults
#[cfg(feature = "std")]
pub fn parse_config(input: &str) -> Result<HudConfig, ConfigError> {
    toml::from_str(input).map_err(|_| ConfigError::TomlParse)
}
