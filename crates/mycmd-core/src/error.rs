//! Error types for the MyCMD application.

use thiserror::Error;

/// A shared error type for the MyCMD crates.
///
/// Domain operations return these typed variants; the dispatcher renders
/// each one as its documented transcript line, so no error ever reaches
/// the user as a crash.
#[derive(Error, Debug, Clone)]
pub enum MycmdError {
    /// Category creation over an existing name.
    #[error("category \"{0}\" already exists")]
    CategoryExists(String),

    /// Category lookup or deletion target does not exist.
    #[error("category \"{0}\" does not exist")]
    CategoryMissing(String),

    /// Deletion of a category that still holds items.
    #[error("category \"{name}\" still contains {count} items")]
    CategoryNotEmpty { name: String, count: usize },

    /// Adding an item the duplicate policy already matches.
    #[error("duplicate item \"{0}\"")]
    DuplicateItem(String),

    /// Removal by id from a category that is absent or has no items.
    #[error("nothing to remove from \"{0}\"")]
    NothingToRemove(String),

    /// A 1-based item id outside the valid range.
    #[error("id {id} out of range for \"{category}\" (1-{len})")]
    IdOutOfRange {
        category: String,
        id: usize,
        len: usize,
    },

    /// Removal by name found no matching item.
    #[error("item \"{item}\" not found in {category}")]
    ItemMissing { category: String, item: String },

    /// Removal target named a category that does not exist.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Alias creation over an existing name.
    #[error("alias \"{0}\" already exists")]
    AliasExists(String),

    /// Alias lookup or removal target does not exist.
    #[error("alias \"{0}\" not found")]
    AliasMissing(String),

    /// An import payload whose top-level shape is wrong.
    #[error("invalid backup file: {0}")]
    Validation(String),

    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl MycmdError {
    /// Creates a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a Validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for MycmdError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MycmdError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A type alias for `Result<T, MycmdError>`.
pub type Result<T> = std::result::Result<T, MycmdError>;
