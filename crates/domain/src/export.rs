//! Export envelope and import planning.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::collection::Collection;
use crate::environment::Environment;
use crate::error::DomainError;

/// Value of the envelope's `format` field.
pub const EXPORT_FORMAT: &str = "querybox";

/// Envelope version this build reads and writes.
pub const EXPORT_VERSION: u32 = 1;

/// What an export file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// A list of collections
    Collections,
    /// A list of environments
    Environments,
}

impl ExportKind {
    /// Serialized name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collections => "collections",
            Self::Environments => "environments",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Versioned wrapper around exported data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope<T> {
    /// Always [`EXPORT_FORMAT`]
    pub format: String,
    /// Always [`EXPORT_VERSION`]
    pub version: u32,
    /// Export time, epoch milliseconds
    pub exported_at: i64,
    /// Payload kind
    #[serde(rename = "type")]
    pub kind: ExportKind,
    /// Exported items
    pub data: Vec<T>,
}

impl<T> ExportEnvelope<T> {
    /// Wraps items in a current-version envelope.
    #[must_use]
    pub fn new(kind: ExportKind, data: Vec<T>, exported_at: i64) -> Self {
        Self {
            format: EXPORT_FORMAT.to_string(),
            version: EXPORT_VERSION,
            exported_at,
            kind,
            data,
        }
    }
}

/// A parsed import file of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportFile {
    /// Collections export
    Collections(ExportEnvelope<Collection>),
    /// Environments export
    Environments(ExportEnvelope<Environment>),
}

impl ExportFile {
    /// Payload kind.
    #[must_use]
    pub const fn kind(&self) -> ExportKind {
        match self {
            Self::Collections(_) => ExportKind::Collections,
            Self::Environments(_) => ExportKind::Environments,
        }
    }
}

/// How imported items combine with existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImportStrategy {
    /// Keep existing items, add those whose name is not taken
    #[default]
    Merge,
    /// Discard existing items
    Replace,
}

impl FromStr for ImportStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "replace" => Ok(Self::Replace),
            other => Err(DomainError::InvalidExport(format!(
                "unknown import strategy \"{other}\""
            ))),
        }
    }
}

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Items added
    pub added: usize,
    /// Items skipped because of a name conflict
    pub skipped: usize,
}

/// Items that can be imported by name.
pub trait Importable: Clone {
    /// Name compared case-insensitively during merge.
    fn import_name(&self) -> &str;

    /// Copy with every id regenerated.
    #[must_use]
    fn regenerate_ids(&self) -> Self;
}

impl Importable for Environment {
    fn import_name(&self) -> &str {
        &self.name
    }

    fn regenerate_ids(&self) -> Self {
        self.with_fresh_ids()
    }
}

impl Importable for Collection {
    fn import_name(&self) -> &str {
        &self.name
    }

    fn regenerate_ids(&self) -> Self {
        self.with_fresh_ids()
    }
}

/// Combines `incoming` with `existing` according to `strategy`.
///
/// Every imported item gets fresh ids. Merge skips any item whose name
/// matches, ignoring case, an existing item or an earlier item of the
/// same batch.
#[must_use]
pub fn plan_import<T: Importable>(
    existing: &[T],
    incoming: &[T],
    strategy: ImportStrategy,
) -> (Vec<T>, ImportSummary) {
    match strategy {
        ImportStrategy::Replace => {
            let items: Vec<T> = incoming.iter().map(Importable::regenerate_ids).collect();
            let summary = ImportSummary {
                added: items.len(),
                skipped: 0,
            };
            (items, summary)
        }
        ImportStrategy::Merge => {
            let mut taken: HashSet<String> = existing
                .iter()
                .map(|item| item.import_name().to_lowercase())
                .collect();
            let mut items = existing.to_vec();
            let mut summary = ImportSummary::default();
            for item in incoming {
                if taken.insert(item.import_name().to_lowercase()) {
                    items.push(item.regenerate_ids());
                    summary.added += 1;
                } else {
                    summary.skipped += 1;
                }
            }
            (items, summary)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn env(name: &str) -> Environment {
        Environment::new(name, 0)
    }

    #[test]
    fn test_replace_regenerates_ids() {
        let existing = vec![env("Old")];
        let incoming = vec![env("A"), env("B")];
        let (items, summary) = plan_import(&existing, &incoming, ImportStrategy::Replace);
        assert_eq!(summary, ImportSummary { added: 2, skipped: 0 });
        assert_eq!(items.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(), vec!["A", "B"]);
        assert_ne!(items[0].id, incoming[0].id);
    }

    #[test]
    fn test_merge_skips_case_insensitive_conflicts() {
        let existing = vec![env("Production")];
        let incoming = vec![env("production"), env("Staging"), env("STAGING")];
        let (items, summary) = plan_import(&existing, &incoming, ImportStrategy::Merge);
        assert_eq!(summary, ImportSummary { added: 1, skipped: 2 });
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, existing[0].id);
        assert_eq!(items[1].name, "Staging");
    }

    #[test]
    fn test_envelope_shape() {
        let envelope = ExportEnvelope::new(ExportKind::Environments, vec![env("Dev")], 99);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["format"], "querybox");
        assert_eq!(json["version"], 1);
        assert_eq!(json["exportedAt"], 99);
        assert_eq!(json["type"], "environments");
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Replace".parse::<ImportStrategy>().unwrap(), ImportStrategy::Replace);
        assert!("append".parse::<ImportStrategy>().is_err());
    }
}
