//! Import of QueryBox export files.
//!
//! The envelope is validated strictly and fails fast. Items inside `data`
//! are checked one by one; those that do not decode are dropped and the
//! rest are imported.

use std::path::Path;

use querybox_domain::{
    Collection, EXPORT_FORMAT, EXPORT_VERSION, Environment, ExportEnvelope, ExportFile,
    ExportKind,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Why an import file was rejected.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The text is not JSON.
    #[error("Invalid JSON: the file could not be parsed.")]
    InvalidJson,

    /// The top-level value is not an object.
    #[error("Invalid format: file must be a JSON object.")]
    NotAnObject,

    /// The `format` field is not `querybox`.
    #[error("Invalid format: expected \"{expected}\" but got \"{0}\".", expected = EXPORT_FORMAT)]
    WrongFormat(String),

    /// The `version` field is not supported.
    #[error("Unsupported version: expected {expected} but got \"{0}\".", expected = EXPORT_VERSION)]
    UnsupportedVersion(String),

    /// The `type` field is not a known kind.
    #[error("Invalid type: expected \"collections\" or \"environments\" but got \"{0}\".")]
    InvalidType(String),

    /// The `data` field is not an array.
    #[error("Invalid format: \"data\" must be an array.")]
    DataNotArray,

    /// The file holds a different kind than the caller is importing.
    #[error("This file contains {found}, but you are importing {expected}.")]
    WrongKind {
        /// Kind found in the file
        found: ExportKind,
        /// Kind the caller asked for
        expected: ExportKind,
    },

    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders a field the way it is quoted in error messages.
fn describe(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>, kind: ExportKind) -> Vec<T> {
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| {
            serde_json::from_value(item)
                .map_err(|e| warn!(%kind, error = %e, "skipping invalid import item"))
                .ok()
        })
        .collect();
    debug!(%kind, total, kept = decoded.len(), "import items decoded");
    decoded
}

/// Parses and validates the text of an export file.
///
/// `now_millis` stands in for a missing or non-numeric `exportedAt`.
///
/// # Errors
///
/// Returns an [`ImportError`] describing the first envelope problem found.
pub fn parse_import_file(text: &str, now_millis: i64) -> Result<ExportFile, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(|_| ImportError::InvalidJson)?;
    let Value::Object(mut object) = value else {
        return Err(ImportError::NotAnObject);
    };

    if object.get("format").and_then(Value::as_str) != Some(EXPORT_FORMAT) {
        return Err(ImportError::WrongFormat(describe(object.get("format"))));
    }
    if object.get("version").and_then(Value::as_u64) != Some(u64::from(EXPORT_VERSION)) {
        return Err(ImportError::UnsupportedVersion(describe(object.get("version"))));
    }
    let kind = match object.get("type").and_then(Value::as_str) {
        Some("collections") => ExportKind::Collections,
        Some("environments") => ExportKind::Environments,
        _ => return Err(ImportError::InvalidType(describe(object.get("type")))),
    };
    let Some(Value::Array(items)) = object.remove("data") else {
        return Err(ImportError::DataNotArray);
    };
    let exported_at = exported_at(&object).unwrap_or(now_millis);

    Ok(match kind {
        ExportKind::Collections => ExportFile::Collections(ExportEnvelope::new(
            kind,
            decode_items::<Collection>(items, kind),
            exported_at,
        )),
        ExportKind::Environments => ExportFile::Environments(ExportEnvelope::new(
            kind,
            decode_items::<Environment>(items, kind),
            exported_at,
        )),
    })
}

#[allow(clippy::cast_possible_truncation)]
fn exported_at(object: &Map<String, Value>) -> Option<i64> {
    let value = object.get("exportedAt")?;
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

/// Parses an export file and checks it holds `expected`.
///
/// # Errors
///
/// Returns [`ImportError::WrongKind`] for the other kind, or any envelope error.
pub fn parse_import_file_as(
    text: &str,
    expected: ExportKind,
    now_millis: i64,
) -> Result<ExportFile, ImportError> {
    let file = parse_import_file(text, now_millis)?;
    if file.kind() == expected {
        Ok(file)
    } else {
        Err(ImportError::WrongKind {
            found: file.kind(),
            expected,
        })
    }
}

/// Reads environments from an export file on disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not an environments export.
pub fn read_environments(path: &Path, now_millis: i64) -> Result<Vec<Environment>, ImportError> {
    let text = std::fs::read_to_string(path)?;
    match parse_import_file_as(&text, ExportKind::Environments, now_millis)? {
        ExportFile::Environments(envelope) => Ok(envelope.data),
        ExportFile::Collections(_) => Err(ImportError::WrongKind {
            found: ExportKind::Collections,
            expected: ExportKind::Environments,
        }),
    }
}

/// Reads collections from an export file on disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a collections export.
pub fn read_collections(path: &Path, now_millis: i64) -> Result<Vec<Collection>, ImportError> {
    let text = std::fs::read_to_string(path)?;
    match parse_import_file_as(&text, ExportKind::Collections, now_millis)? {
        ExportFile::Collections(envelope) => Ok(envelope.data),
        ExportFile::Environments(_) => Err(ImportError::WrongKind {
            found: ExportKind::Environments,
            expected: ExportKind::Collections,
        }),
    }
}
