use std::path::PathBuf;

use thiserror::Error;

/// Opaque error surfaced by asset factories and document readers.
pub type AssetError = Box<dyn std::error::Error + Send + Sync>;

/// Error types for particle-system descriptor loading and persistence
#[derive(Error, Debug)]
pub enum FxError {
    /// Document access error (missing node/attribute, bad typed value)
    #[error(transparent)]
    Tree(#[from] tempest_tree::TreeError),

    /// Asset factory or document reader failure, propagated as-is
    #[error("asset error: {0}")]
    Asset(#[source] AssetError),

    /// Model cycle durations must be non-negative
    #[error("negative model cycle value {value}")]
    NegativeModelCycle { value: f32 },

    /// Unknown primitive kind string
    #[error("unknown particle primitive '{value}'")]
    UnknownPrimitive { value: String },

    /// Unknown blend mode string
    #[error("unknown particle blend mode '{value}'")]
    UnknownBlendMode { value: String },

    /// Unknown projectile trajectory string
    #[error("unknown projectile trajectory '{value}'")]
    UnknownTrajectory { value: String },

    /// Malformed vector attribute in a save-state document
    #[error("malformed vector value '{value}': expected {expected} components")]
    MalformedVector { value: String, expected: usize },

    /// A descriptor document failed to load; the whole descriptor tree is
    /// aborted, no partial descriptor is installed
    #[error("error loading particle system '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<FxError>,
    },
}

impl FxError {
    /// Wraps an error with the document path it came from.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        FxError::Load {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// Result type using FxError
pub type Result<T> = std::result::Result<T, FxError>;
