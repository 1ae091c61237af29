//! File-mode sink: one file per (tag, remote file name) under a directory.

use crate::error::{ImportError, ImportResult};
use crate::source::RemoteFile;
use monimport_types::Tag;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Character encoding used when writing file content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileEncoding {
    /// UTF-8; every character is representable.
    #[default]
    Utf8,
    /// ISO-8859-1; characters outside it are dropped.
    Latin1,
}

impl FileEncoding {
    /// Encodes a text, dropping what cannot be represented.
    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Latin1 => text
                .chars()
                .filter_map(|c| u8::try_from(u32::from(c)).ok())
                .collect(),
        }
    }

    /// Encodes a remote file value. Only text can be written.
    pub fn encode_value(self, content: &Value) -> ImportResult<Vec<u8>> {
        match content {
            Value::String(text) => Ok(self.encode(text)),
            other => Err(ImportError::Encoding(format!(
                "expected text content, got {}",
                value_kind(other)
            ))),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nil",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "an array",
        Value::Object(_) => "a struct",
    }
}

/// Outcome of writing one tag's files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileWriteSummary {
    /// Paths written.
    pub written: Vec<PathBuf>,
    /// Paths already written earlier in this run.
    pub skipped: Vec<PathBuf>,
    /// Paths that failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl FileWriteSummary {
    /// Folds another summary into this one.
    pub fn absorb(&mut self, other: FileWriteSummary) {
        self.written.extend(other.written);
        self.skipped.extend(other.skipped);
        self.failed.extend(other.failed);
    }
}

/// Writes remote configuration files under a target directory.
///
/// A path is written at most once per sink; later occurrences of the same
/// `<tag>-<name>` are skipped. Files left by earlier runs are overwritten.
#[derive(Debug)]
pub struct FileSink {
    target_dir: PathBuf,
    encoding: FileEncoding,
    written: HashSet<PathBuf>,
}

impl FileSink {
    /// Creates a sink for a directory.
    pub fn new(target_dir: impl Into<PathBuf>, encoding: FileEncoding) -> Self {
        Self {
            target_dir: target_dir.into(),
            encoding,
            written: HashSet::new(),
        }
    }

    /// Returns the target directory.
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Path a remote file of a tag is written to.
    ///
    /// Tag and file name come from the remote side. Either one holding a
    /// path separator, a NUL or a bare `.`/`..` is a `Storage` error, so the
    /// result always names a direct child of the target directory.
    pub fn target_path(&self, tag: &Tag, file_name: &str) -> ImportResult<PathBuf> {
        check_name_part("tag", tag.as_str())?;
        check_name_part("file name", file_name)?;
        Ok(self.target_dir.join(format!("{tag}-{file_name}")))
    }

    /// Returns whether a path was already written by this sink.
    #[must_use]
    pub fn has_written(&self, path: &Path) -> bool {
        self.written.contains(path)
    }

    /// Creates the target directory if absent.
    ///
    /// Failure is only logged; individual writes will then fail.
    pub async fn prepare(&self) {
        if fs::metadata(&self.target_dir).await.is_ok() {
            return;
        }
        match fs::create_dir_all(&self.target_dir).await {
            Ok(()) => info!("Created target directory: {:?}", self.target_dir),
            Err(e) => warn!(
                "Failed to create target directory {:?}: {}",
                self.target_dir, e
            ),
        }
    }

    /// Writes every file of a tag, continuing past individual failures.
    pub async fn write_files(&mut self, tag: &Tag, files: &[RemoteFile]) -> FileWriteSummary {
        let mut summary = FileWriteSummary::default();

        for file in files {
            let path = match self.target_path(tag, &file.name) {
                Ok(path) => path,
                Err(e) => {
                    let name = PathBuf::from(format!("{tag}-{}", file.name));
                    warn!("Refusing to write {:?}: {}", name, e);
                    summary.failed.push((name, e.to_string()));
                    continue;
                }
            };
            if self.written.contains(&path) {
                debug!("Already written this run, skipping: {:?}", path);
                summary.skipped.push(path);
                continue;
            }

            match self.write_one(&path, &file.content).await {
                Ok(size) => {
                    info!("Wrote {:?} ({} bytes)", path, size);
                    self.written.insert(path.clone());
                    summary.written.push(path);
                }
                Err(e) => {
                    warn!("Failed to write {:?}: {}", path, e);
                    summary.failed.push((path, e.to_string()));
                }
            }
        }

        summary
    }

    async fn write_one(&self, path: &Path, content: &Value) -> ImportResult<usize> {
        let bytes = self.encoding.encode_value(content)?;
        fs::write(path, &bytes)
            .await
            .map_err(|e| ImportError::Storage(format!("write failed: {e}")))?;
        Ok(bytes.len())
    }
}

fn check_name_part(what: &str, part: &str) -> ImportResult<()> {
    let unsafe_char = part.chars().any(|c| matches!(c, '/' | '\\' | '\0'));
    if part.is_empty() || part == "." || part == ".." || unsafe_char {
        return Err(ImportError::Storage(format!(
            "{what} {part:?} cannot be used in a file name"
        )));
    }
    Ok(())
}
