//! # Config Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Config Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │      File       │  │     Format      │  │       Content           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Io             │  │  Parse          │  │  InvalidCoupon          │ │
//! │  │  NoConfigPath   │  │  Serialize      │  │  InvalidValue           │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading, validating or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed.
    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be written as TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No path was given and the platform has no config directory.
    #[error("No config path available")]
    NoConfigPath,

    /// A coupon entry is unusable.
    #[error("Invalid coupon '{code}': {reason}")]
    InvalidCoupon { code: String, reason: String },

    /// Any other setting is unusable.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    /// Returns true if the file itself could not be read or written,
    /// as opposed to holding bad content.
    pub fn is_io(&self) -> bool {
        matches!(self, ConfigError::Io(_) | ConfigError::NoConfigPath)
    }
}
