//! Backends holding the serialized evaluation collection
//!
//! A backend stores one opaque blob under one key, nothing more. Parsing and
//! recovery live in the store.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::StoreError;

/// File name of the persisted collection, named after the web app's storage key
pub const STORAGE_FILE: &str = "identityEvaluations.json";

pub trait Storage {
  /// Read the whole blob, `None` when nothing has been written yet
  fn read(&self) -> Result<Option<String>, StoreError>;

  /// Replace the whole blob
  fn write(&mut self, contents: &str) -> Result<(), StoreError>;

  /// Keep a copy of content about to be overwritten because it could not be
  /// parsed. Earlier backups are never replaced.
  fn preserve(&mut self, contents: &str) -> Result<(), StoreError>;
}

/// Suffix of the file holding unreadable content that was replaced
pub const BACKUP_SUFFIX: &str = "corrupt";

/// Collection kept in a single JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
  path: PathBuf,
}

impl JsonFileStorage {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// Storage file inside `dir`
  pub fn in_dir(dir: impl AsRef<Path>) -> Self {
    Self::new(dir.as_ref().join(STORAGE_FILE))
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// First free backup location: `<file>.corrupt`, then `<file>.corrupt.1`
  /// and so on
  pub fn backup_path(&self) -> PathBuf {
    let base = format!("{}.{BACKUP_SUFFIX}", self.path.display());
    let mut candidate = PathBuf::from(&base);
    let mut n = 1;
    while candidate.exists() {
      candidate = PathBuf::from(format!("{base}.{n}"));
      n += 1;
    }
    candidate
  }

  fn io_error(&self, source: std::io::Error) -> StoreError {
    StoreError::Io { path: self.path.clone(), source }
  }
}

impl Storage for JsonFileStorage {
  fn read(&self) -> Result<Option<String>, StoreError> {
    if !self.path.exists() {
      tracing::debug!(path = %self.path.display(), "no stored evaluations yet");
      return Ok(None);
    }

    let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
    tracing::debug!(path = %self.path.display(), bytes = contents.len(), "read evaluations");
    Ok(Some(contents))
  }

  fn write(&mut self, contents: &str) -> Result<(), StoreError> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
    }

    fs::write(&self.path, contents).map_err(|e| self.io_error(e))?;
    tracing::debug!(path = %self.path.display(), bytes = contents.len(), "wrote evaluations");
    Ok(())
  }

  fn preserve(&mut self, contents: &str) -> Result<(), StoreError> {
    let backup = self.backup_path();
    fs::write(&backup, contents)
      .map_err(|source| StoreError::Io { path: backup.clone(), source })?;
    tracing::warn!(path = %backup.display(), "saved unreadable evaluations");
    Ok(())
  }
}

/// In-memory backend for tests. Clones share the same blob, so a test can
/// keep a handle to inspect or corrupt what a store has written.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
  blob: Rc<RefCell<Option<String>>>,
  backups: Rc<RefCell<Vec<String>>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_contents(contents: impl Into<String>) -> Self {
    Self { blob: Rc::new(RefCell::new(Some(contents.into()))), ..Self::default() }
  }

  pub fn contents(&self) -> Option<String> {
    self.blob.borrow().clone()
  }

  pub fn set_contents(&self, contents: impl Into<String>) {
    *self.blob.borrow_mut() = Some(contents.into());
  }

  /// Everything handed to `preserve`, oldest first
  pub fn backups(&self) -> Vec<String> {
    self.backups.borrow().clone()
  }
}

impl Storage for MemoryStorage {
  fn read(&self) -> Result<Option<String>, StoreError> {
    Ok(self.contents())
  }

  fn write(&mut self, contents: &str) -> Result<(), StoreError> {
    self.set_contents(contents);
    Ok(())
  }

  fn preserve(&mut self, contents: &str) -> Result<(), StoreError> {
    self.backups.borrow_mut().push(contents.to_string());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_file_storage_missing_file_reads_none() {
    let temp = TempDir::new().unwrap();
    let storage = JsonFileStorage::in_dir(temp.path());
    assert_eq!(storage.read().unwrap(), None);
  }

  #[test]
  fn test_file_storage_creates_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let mut storage = JsonFileStorage::in_dir(temp.path().join("nested").join("deeper"));
    storage.write("[]").unwrap();
    assert_eq!(storage.read().unwrap().as_deref(), Some("[]"));
    assert!(storage.path().ends_with(STORAGE_FILE));
  }

  #[test]
  fn test_file_storage_backups_never_overwrite() {
    let temp = TempDir::new().unwrap();
    let mut storage = JsonFileStorage::in_dir(temp.path());

    storage.preserve("first").unwrap();
    storage.preserve("second").unwrap();

    let first = temp.path().join(format!("{STORAGE_FILE}.corrupt"));
    let second = temp.path().join(format!("{STORAGE_FILE}.corrupt.1"));
    assert_eq!(fs::read_to_string(first).unwrap(), "first");
    assert_eq!(fs::read_to_string(second).unwrap(), "second");
  }

  #[test]
  fn test_memory_storage_clones_share_blob() {
    let handle = MemoryStorage::new();
    let mut storage = handle.clone();
    storage.write("[1]").unwrap();
    assert_eq!(handle.contents().as_deref(), Some("[1]"));
  }
}
