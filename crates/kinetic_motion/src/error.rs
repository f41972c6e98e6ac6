//! Error types for kinetic_motion

use kinetic_animation::PresetError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the configuration boundary
///
/// Hook operations themselves never fail; numeric options are not validated.
#[derive(Error, Debug)]
pub enum MotionError {
    /// Failed to read a configuration file
    #[error("failed to read {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid TOML for the expected layout
    #[error("invalid motion config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("failed to serialize motion config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A preset name in the configuration does not exist
    #[error(transparent)]
    UnknownPreset(#[from] PresetError),
}

/// Result type for kinetic_motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
