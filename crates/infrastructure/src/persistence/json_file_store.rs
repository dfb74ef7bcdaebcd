//! File-backed state store.
//!
//! Each logical key is stored as its own JSON file inside one directory:
//!
//! ```text
//! data_dir/
//!   qb-tabs.json
//!   qb-active-tab.json
//!   qb-environments.json
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use querybox_application::ports::{StateStore, StoreError};
use serde_json::Value;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// [`StateStore`] writing one pretty-printed JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Maps a logical key onto a portable file stem (`qb:tabs` -> `qb-tabs`).
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn io_error(key: &str, error: &io::Error) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        message: error.to_string(),
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let bytes = match fs::read(self.path_for(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(key, &e)),
        };
        from_json_bytes(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(key, &e))?;
        let bytes = to_json_stable_bytes(value).map_err(|e| StoreError::Io {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, bytes).map_err(|e| io_error(key, &e))?;
        fs::rename(&staging, &path).map_err(|e| io_error(key, &e))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, &e)),
        }
    }
}
