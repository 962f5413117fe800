use thiserror::Error;

/// Errors produced by model operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid category name {name:?}: {reason}")]
    InvalidCategoryName { name: String, reason: String },

    #[error("duplicate category: {0}")]
    DuplicateCategory(String),
}

/// Convenience type alias for model operations.
pub type Result<T> = std::result::Result<T, TypeError>;
