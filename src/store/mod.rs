//! # Storage Layer
//!
//! The [`LibraryStore`] trait abstracts how the three catalog documents
//! (books, members, issued books) are persisted:
//!
//! - [`fs::FileStore`]: production storage, one JSON document per file
//! - [`memory::InMemoryStore`]: in-memory storage for tests
//!
//! Persistence is deliberately forgiving. Loading never fails: a missing
//! document means an empty collection, a corrupt document or record is
//! reported as a warning and skipped. Saving is a full-state overwrite per
//! document, and a document that cannot be written never stops the others
//! from being attempted.

use crate::model::LibraryData;

pub mod fs;
pub mod memory;

/// Result of loading the catalog. `warnings` holds one human-readable line
/// per document or record that could not be used.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub data: LibraryData,
    pub warnings: Vec<String>,
}

/// Result of a full-state flush. Each failed document contributes one
/// entry; an empty report means every document was written.
#[derive(Debug, Default)]
pub struct SaveReport {
    pub failures: Vec<String>,
}

impl SaveReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Abstract interface for catalog persistence.
pub trait LibraryStore {
    /// Load the full catalog state. Never fatal: whatever could not be
    /// read is reported in the returned warnings.
    fn load(&self) -> LoadReport;

    /// Overwrite the persisted state with the given snapshot.
    fn save(&mut self, data: &LibraryData) -> SaveReport;
}
