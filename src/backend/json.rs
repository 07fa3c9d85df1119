//! # JSON File Backend
//!
//! One table per file at `<store_path>/<table>.json`, holding
//! `{"content": [record, ...]}`. Every write rewrites the whole file
//! through a temporary sibling and a rename, with fsync before the rename.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use super::errors::{BackendError, BackendResult};
use super::RecordBackend;
use crate::entity::Record;

const CONTENT_KEY: &str = "content";

/// File-backed record storage
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Opens the store file of `table` under `store_path`.
    ///
    /// A missing file is created (with its directories) only when
    /// `create_if_not_exists` is set. A file without a `content` list is
    /// initialized to an empty one.
    ///
    /// # Errors
    ///
    /// `MissingFile` when the file is absent and creation is off; I/O and
    /// JSON errors otherwise.
    pub fn open(
        store_path: impl AsRef<Path>,
        table: &str,
        create_if_not_exists: bool,
    ) -> BackendResult<Self> {
        let path = store_path.as_ref().join(format!("{}.json", table));
        let backend = Self { path };

        if !backend.path.exists() {
            if !create_if_not_exists {
                return Err(BackendError::MissingFile(backend.path));
            }
            if let Some(parent) = backend.path.parent() {
                fs::create_dir_all(parent)?;
            }
            backend.write_document(&json!({ CONTENT_KEY: [] }))?;
            return Ok(backend);
        }

        let document = backend.read_document()?;
        if document.get(CONTENT_KEY).map_or(true, Value::is_null) {
            backend.write_document(&json!({ CONTENT_KEY: [] }))?;
        }
        Ok(backend)
    }

    /// Location of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> BackendResult<Value> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BackendError::MissingFile(self.path.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(json!({}));
        }
        let document: Value = serde_json::from_str(&raw)?;
        if !document.is_object() {
            return Err(self.malformed("top level is not an object"));
        }
        Ok(document)
    }

    fn write_document(&self, document: &Value) -> BackendResult<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        let encoded = serde_json::to_vec_pretty(document)?;

        let mut file = File::create(&tmp_path)?;
        file.write_all(&encoded)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn malformed(&self, reason: impl Into<String>) -> BackendError {
        BackendError::Malformed {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

impl RecordBackend for JsonFileBackend {
    fn load(&self) -> BackendResult<Vec<Record>> {
        let mut document = self.read_document()?;
        let content = match document.get_mut(CONTENT_KEY).map(Value::take) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(self.malformed("content is not a list")),
        };

        content
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(record) => Ok(record),
                _ => Err(self.malformed(format!("content[{}] is not an object", i))),
            })
            .collect()
    }

    fn store(&mut self, records: Vec<Record>) -> BackendResult<()> {
        let content: Vec<Value> = records.into_iter().map(Value::Object).collect();
        self.write_document(&json!({ CONTENT_KEY: content }))
    }
}
