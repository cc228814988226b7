//! # Glimmer Error Types
//!
//! Missing page elements are never errors here; every effect treats them
//! as a silent no-op. What is left is configuration.

use thiserror::Error;

/// Errors that can occur while setting up the effects.
#[derive(Error, Debug)]
pub enum GlimmerError {
    /// The configuration text was not valid TOML for [`crate::EffectsConfig`].
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration parsed but a value is out of range.
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    ConfigRead {
        /// Path that was requested.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for glimmer operations.
pub type GlimmerResult<T> = Result<T, GlimmerError>;
