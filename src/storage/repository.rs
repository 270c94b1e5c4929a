use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tokio::fs;
use uuid::Uuid;

use crate::domain::Expense;

/// Repository for persisting the whole expense list as one JSON document.
///
/// The document root is the array of expenses itself, with no envelope.
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    /// Create a repository backed by the JSON file at the given path.
    /// The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every expense.
    ///
    /// A missing file is an empty ledger. So is a file that doesn't parse:
    /// corruption is logged and otherwise treated as "no expenses".
    pub async fn load(&self) -> Result<Vec<Expense>> {
        let bytes = match self.raw_document().await? {
            Some(bytes) => bytes,
            None => {
                tracing::debug!(path = %self.path.display(), "expense store missing, starting empty");
                return Ok(Vec::new());
            }
        };

        match serde_json::from_slice::<Vec<Expense>>(&bytes) {
            Ok(expenses) => {
                tracing::debug!(
                    path = %self.path.display(),
                    count = expenses.len(),
                    "loaded expenses"
                );
                Ok(expenses)
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "expense store is not a valid expense list, treating it as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Replace the stored document with the given expenses.
    ///
    /// Writes to a temporary file next to the target and renames it over,
    /// so readers never observe a half-written document.
    pub async fn save(&self, expenses: &[Expense]) -> Result<()> {
        let json = to_pretty_json(expenses)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, &json)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;

        if let Err(err) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(err)
                .with_context(|| format!("Failed to replace {}", self.path.display()));
        }

        tracing::debug!(
            path = %self.path.display(),
            count = expenses.len(),
            "saved expenses"
        );
        Ok(())
    }

    /// The stored document exactly as it is on disk, or `None` if there is none.
    pub async fn raw_document(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "expenses.json".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()))
    }
}

/// Serialize with four-space indentation, the layout the store has always had.
fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .context("Failed to serialize expenses")?;
    Ok(buf)
}
