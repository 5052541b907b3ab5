//! Error types.
//!
//! Only structural violations and bad configuration are errors. Absent
//! keys and ids are ordinary outcomes and are reported through `Option`
//! or `bool` returns by the containers themselves.

use thiserror::Error;

/// An operation was rejected because it would break a structural invariant.
///
/// The container is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// A node was added before the root was set.
    #[error("root node must be set before adding nodes")]
    RootNotSet,

    /// `set_root` was called on a tree that already has a root.
    #[error("root is already set to '{0}'")]
    RootAlreadySet(String),

    /// A node with this ID is already present.
    #[error("node '{0}' already exists")]
    DuplicateId(String),

    /// The requested parent is not in the tree.
    #[error("parent node '{0}' not found")]
    ParentNotFound(String),

    /// The root node cannot be removed.
    #[error("cannot remove root node '{0}'")]
    RootRemoval(String),
}

/// Configuration could not be loaded or is out of range.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field value is outside its valid range.
    #[error("invalid value for '{field}': {value}. {hint}")]
    Range {
        field: &'static str,
        value: String,
        hint: &'static str,
    },

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of a structural mutation.
pub type StructureResult<T> = Result<T, StructureError>;

/// Result of loading configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;
