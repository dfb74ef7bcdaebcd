//! Writing QueryBox export files.

use std::path::Path;

use querybox_domain::ExportEnvelope;
use serde::Serialize;
use thiserror::Error;

use crate::serialization::{SerializationError, to_json_stable};

/// Export error type.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// The file could not be written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders an envelope as the text of an export file.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_to_string<T: Serialize>(
    envelope: &ExportEnvelope<T>,
) -> Result<String, ExportError> {
    Ok(to_json_stable(envelope)?)
}

/// Writes an envelope to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_export<T: Serialize>(
    path: &Path,
    envelope: &ExportEnvelope<T>,
) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, export_to_string(envelope)?)?;
    Ok(())
}
