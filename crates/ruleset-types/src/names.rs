//! Category name validation.
//!
//! Valid category names:
//! - Must be non-empty
//! - Must not contain whitespace
//! - Must not contain control characters
//!
//! Names are case-sensitive: `IDE` and `Ide` are distinct categories.

use crate::error::{Result, TypeError};

/// Validate a category name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use ruleset_types::names::validate_category_name;
///
/// assert!(validate_category_name("IDE").is_ok());
/// assert!(validate_category_name("Android_iOS").is_ok());
/// assert!(validate_category_name("").is_err());
/// assert!(validate_category_name("Build Artifacts").is_err());
/// ```
pub fn validate_category_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(TypeError::InvalidCategoryName {
            name: name.to_string(),
            reason: "category name must not be empty".into(),
        });
    }

    if let Some(ch) = name.chars().find(|c| c.is_whitespace()) {
        return Err(TypeError::InvalidCategoryName {
            name: name.to_string(),
            reason: format!("contains whitespace: {ch:?}"),
        });
    }

    if let Some(ch) = name.chars().find(|c| c.is_control()) {
        return Err(TypeError::InvalidCategoryName {
            name: name.to_string(),
            reason: format!("contains control character: {ch:?}"),
        });
    }

    Ok(())
}

/// Returns `true` if `name` can be written as a bare TOML key
/// (`A-Za-z0-9_-`), i.e. without quotes.
pub fn is_bare_key(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
