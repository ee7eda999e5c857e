//! Durable session slot — a single named record that survives restarts.
//!
//! DESIGN
//! ======
//! The slot stores an opaque string; serialization belongs to the store.
//! `MemorySlot` clones share one cell, which lets tests simulate a restart by
//! opening a second store on a clone. `FileSlot` keeps one JSON file per key.

#[cfg(test)]
#[path = "slot_test.rs"]
mod tests;

use std::cell::RefCell;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Key the session record is stored under unless configured otherwise.
pub const DEFAULT_SLOT_KEY: &str = "userSession";

#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    #[error("slot io failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait SessionSlot {
    /// Read the stored record. `Ok(None)` when nothing is stored.
    fn load(&self) -> Result<Option<String>, SlotError>;

    /// Replace the stored record.
    fn store(&self, record: &str) -> Result<(), SlotError>;

    /// Delete the stored record. Removing an empty slot succeeds.
    fn remove(&self) -> Result<(), SlotError>;
}

// =============================================================================
// MEMORY SLOT
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    cell: Rc<RefCell<Option<String>>>,
}

impl MemorySlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with `record`, as if written by an earlier process.
    #[must_use]
    pub fn with_record(record: impl Into<String>) -> Self {
        Self { cell: Rc::new(RefCell::new(Some(record.into()))) }
    }

    /// Current raw contents.
    #[must_use]
    pub fn peek(&self) -> Option<String> {
        self.cell.borrow().clone()
    }
}

impl SessionSlot for MemorySlot {
    fn load(&self) -> Result<Option<String>, SlotError> {
        Ok(self.peek())
    }

    fn store(&self, record: &str) -> Result<(), SlotError> {
        *self.cell.borrow_mut() = Some(record.to_owned());
        Ok(())
    }

    fn remove(&self) -> Result<(), SlotError> {
        self.cell.borrow_mut().take();
        Ok(())
    }
}

// =============================================================================
// FILE SLOT
// =============================================================================

/// Slot backed by `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self { path: dir.as_ref().join(format!("{key}.json")) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SlotError {
        SlotError::Io { path: self.path.clone(), source }
    }
}

impl SessionSlot for FileSlot {
    fn load(&self) -> Result<Option<String>, SlotError> {
        match std::fs::read_to_string(&self.path) {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn store(&self, record: &str) -> Result<(), SlotError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        std::fs::write(&self.path, record).map_err(|e| self.io_error(e))
    }

    fn remove(&self) -> Result<(), SlotError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
