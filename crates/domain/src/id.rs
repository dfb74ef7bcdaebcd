//! ID generation utilities.

use uuid::Uuid;

/// Generates a new random UUID v4 as a string.
///
/// Every tab, key/value row, environment and history entry uses this format.
#[must_use]
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
