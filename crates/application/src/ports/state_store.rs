//! Key/value persistence port

use serde_json::Value;
use thiserror::Error;

/// Errors from a [`StateStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing medium could not be read or written.
    #[error("storage I/O failed for '{key}': {message}")]
    Io {
        /// Logical key
        key: String,
        /// Underlying error text
        message: String,
    },

    /// A stored value is not valid JSON.
    #[error("stored value for '{key}' is corrupt: {message}")]
    Corrupt {
        /// Logical key
        key: String,
        /// Parser error text
        message: String,
    },
}

/// Port for a small JSON key/value store, like browser local storage.
///
/// Keys are short logical names such as `qb:tabs`.
pub trait StateStore: Send + Sync {
    /// Reads a value. Missing keys yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value exists but cannot be read or parsed.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Writes a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError>;

    /// Removes a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the value exists but cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
