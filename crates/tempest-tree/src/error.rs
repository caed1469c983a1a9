use thiserror::Error;

/// Error types for attributed-tree access
#[derive(Error, Debug)]
pub enum TreeError {
    /// A required child node was not present
    #[error("node '{node}' has no child named '{child}'")]
    MissingChild { node: String, child: String },

    /// A required child node was not present at the requested index
    #[error("node '{node}' has no child '{child}' at index {index}")]
    MissingChildAt {
        node: String,
        child: String,
        index: usize,
    },

    /// A required attribute was not present
    #[error("node '{node}' has no attribute named '{attribute}'")]
    MissingAttribute { node: String, attribute: String },

    /// An attribute value could not be converted to the requested type
    #[error("attribute '{attribute}' has invalid value '{value}': {reason}")]
    InvalidValue {
        attribute: String,
        value: String,
        reason: String,
    },
}

/// Result type using TreeError
pub type Result<T> = std::result::Result<T, TreeError>;
