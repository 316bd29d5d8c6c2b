//! Local JSON storage of fetched recipes, unique by recipe id.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::recipe::{RecipeId, RecipeRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize recipes: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub replaced: usize,
}

/// Insertion-ordered set of recipes with at most one record per id.
#[derive(Debug, Default)]
pub struct RecipeStore {
    records: Vec<RecipeRecord>,
    index: HashMap<RecipeId, usize>,
}

impl RecipeStore {
    /// Load previously saved recipes.
    ///
    /// A missing or malformed file yields an empty store. Entries that are not
    /// objects carrying a valid `id` are dropped. Any other read failure is an
    /// error, so the caller never overwrites a file it could not read.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Self::from_slice(&bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no existing output, starting empty");
                Ok(Self::default())
            }
            Err(source) => Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn from_slice(bytes: &[u8]) -> Self {
        let entries = match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                warn!("existing output is not a JSON list, starting empty");
                return Self::default();
            }
            Err(e) => {
                warn!(error = %e, "existing output is not valid JSON, starting empty");
                return Self::default();
            }
        };

        let mut store = Self::default();
        let mut dropped = 0usize;
        for entry in entries {
            match RecipeRecord::from_value(entry) {
                Ok(record) => {
                    store.upsert(record);
                }
                Err(_) => dropped += 1,
            }
        }
        if dropped > 0 {
            warn!(dropped, "ignored stored entries without a usable id");
        }
        store
    }

    /// Insert or replace a record. A replaced record keeps its original position.
    /// Returns `true` when an existing record was replaced.
    fn upsert(&mut self, record: RecipeRecord) -> bool {
        match self.index.get(record.id()) {
            Some(&pos) => {
                self.records[pos] = record;
                true
            }
            None => {
                self.index.insert(record.id().clone(), self.records.len());
                self.records.push(record);
                false
            }
        }
    }

    /// Overlay newly fetched records; on a shared id the new record wins outright.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = RecipeRecord>) -> MergeSummary {
        let mut summary = MergeSummary::default();
        for record in incoming {
            if self.upsert(record) {
                summary.replaced += 1;
            } else {
                summary.added += 1;
            }
        }
        summary
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: &RecipeId) -> Option<&RecipeRecord> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    #[cfg(test)]
    pub(crate) fn records(&self) -> &[RecipeRecord] {
        &self.records
    }

    /// Overwrite `path` with every record as a 4-space indented JSON list.
    ///
    /// Writes a sibling temporary file first and renames it into place, so the
    /// previous contents survive a failed write.
    pub async fn save(&self, path: &Path) -> Result<(), StoreError> {
        let bytes = self.to_json()?;
        let tmp = temp_path(path);
        let io_err = |source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        tokio::fs::write(&tmp, &bytes).await.map_err(io_err)?;
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_err(e));
        }
        debug!(path = %path.display(), records = self.len(), "output written");
        Ok(())
    }

    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.records.serialize(&mut ser)?;
        Ok(buf)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "output.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
