//! Error types for loading sequences, skeletons and configuration.
//!
//! Missing or invalid marker data is never an error; it is handled by the
//! fallback tables in `marker::taxonomy`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Sequence or skeleton JSON could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Skeleton definition TOML could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("skeleton has no bones")]
    EmptySkeleton,

    /// The first bone must be the root
    #[error("first bone '{0}' has a parent; the root must come first")]
    MissingRoot(String),

    #[error("bone '{bone}' has no parent but '{root}' is already the root")]
    MultipleRoots { root: String, bone: String },

    /// Parent not declared (yet); parents must precede their children
    #[error("bone '{bone}' references unknown parent '{parent}'")]
    UnknownParent { bone: String, parent: String },

    #[error("duplicate bone name '{0}'")]
    DuplicateBone(String),

    #[error("bone index {index} is out of range for a skeleton of {len} bones")]
    BoneOutOfRange { index: usize, len: usize },
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
