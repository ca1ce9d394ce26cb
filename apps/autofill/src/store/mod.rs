//! Answer store: the session-scoped `label → value` map reused across runs.
//!
//! Lookups are exact first, then case-insensitive. Mutations only touch memory
//! and mark the store dirty; the caller flushes after each new answer. Flushes
//! go through a temp file in the same directory followed by a rename, so a
//! crash mid-write never truncates the existing file.

pub mod handlers;

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read answers file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("answers file {path} is not a JSON object: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write answers file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize answers: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct AnswerStore {
    answers: BTreeMap<String, String>,
    path: Option<PathBuf>,
    dirty: bool,
}

impl AnswerStore {
    /// A store with no file behind it. `flush` is a no-op.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn from_answers<I, K, V>(answers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            answers: answers
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Loads answers from `path`. A missing file yields an empty store bound to
    /// that path; the first flush creates it.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            info!("No answers file at {}, starting empty", path.display());
            return Ok(Self {
                path: Some(path),
                ..Self::default()
            });
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;
        let answers = parse_answers(value).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;

        info!("Loaded {} stored answers from {}", answers.len(), path.display());
        Ok(Self {
            answers,
            path: Some(path),
            dirty: false,
        })
    }

    /// Exact key first, then a case-insensitive match.
    pub fn get(&self, label: &str) -> Option<&str> {
        if let Some(value) = self.answers.get(label) {
            return Some(value.as_str());
        }
        let wanted = label.to_lowercase();
        self.answers
            .iter()
            .find(|(key, _)| key.to_lowercase() == wanted)
            .map(|(_, value)| value.as_str())
    }

    /// Last write wins.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        debug!("Storing answer for '{label}'");
        self.answers.insert(label, value);
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn answers(&self) -> &BTreeMap<String, String> {
        &self.answers
    }

    /// Writes the map to its backing file if anything changed since the last flush.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        let Some(path) = self.path.clone() else {
            self.dirty = false;
            return Ok(());
        };

        let body = serde_json::to_string_pretty(&self.answers)?;
        write_atomically(&path, body.as_bytes())
            .map_err(|source| StoreError::Write { path: path.clone(), source })?;

        self.dirty = false;
        info!("Answers saved to {}", path.display());
        Ok(())
    }
}

/// Temp file in the target directory, then rename over the target.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Keeps string values, stringifies numbers and booleans, skips the rest.
fn parse_answers(value: Value) -> Result<BTreeMap<String, String>, serde_json::Error> {
    let object: serde_json::Map<String, Value> = serde_json::from_value(value)?;
    let mut answers = BTreeMap::new();
    for (label, value) in object {
        match value {
            Value::String(s) => {
                answers.insert(label, s);
            }
            Value::Number(n) => {
                answers.insert(label, n.to_string());
            }
            Value::Bool(b) => {
                answers.insert(label, if b { "Yes" } else { "No" }.to_string());
            }
            other => warn!(
                "Skipping stored answer '{label}': unsupported value type ({})",
                json_type(&other)
            ),
        }
    }
    Ok(answers)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
