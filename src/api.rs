//! # API Facade
//!
//! [`LibraryApi`] is the single entry point for catalog operations,
//! regardless of the UI driving it. It owns the in-memory [`Library`] and
//! the persistence backend, dispatches to the command layer, and flushes
//! the full state to the store after every successful mutation.
//!
//! It is generic over [`LibraryStore`]:
//! - Production: `LibraryApi<FileStore>`
//! - Testing: `LibraryApi<InMemoryStore>`
//!
//! The facade never prints; it returns structured `CmdResult` values and
//! leaves presentation to the caller.

use tracing::warn;

use crate::commands::{self, CmdMessage, CmdResult, NewBook, NewMember};
use crate::error::Result;
use crate::library::Library;
use crate::store::LibraryStore;

pub struct LibraryApi<S: LibraryStore> {
    library: Library,
    store: S,
}

impl<S: LibraryStore> LibraryApi<S> {
    /// Loads persisted state from the store. Load problems come back as
    /// warning messages; the catalog starts from whatever could be read.
    pub fn open(store: S) -> (Self, Vec<CmdMessage>) {
        let report = store.load();
        let messages = report
            .warnings
            .into_iter()
            .map(CmdMessage::warning)
            .collect();
        let library = Library::from_data(report.data);
        (Self { library, store }, messages)
    }

    pub fn add_book(&mut self, new: NewBook) -> Result<CmdResult> {
        let result = commands::add_book::run(&mut self.library, new)?;
        Ok(self.flush(result))
    }

    pub fn add_member(&mut self, new: NewMember) -> Result<CmdResult> {
        let result = commands::add_member::run(&mut self.library, new)?;
        Ok(self.flush(result))
    }

    pub fn issue_book(&mut self, member_id: u32, isbn: &str) -> Result<CmdResult> {
        let result = commands::issue::run(&mut self.library, member_id, isbn)?;
        Ok(self.flush(result))
    }

    pub fn return_book(&mut self, member_id: u32, isbn: &str) -> Result<CmdResult> {
        let result = commands::return_book::run(&mut self.library, member_id, isbn)?;
        Ok(self.flush(result))
    }

    pub fn search_books(&self, term: &str) -> Result<CmdResult> {
        commands::search::run(&self.library, term)
    }

    pub fn list_books(&self) -> Result<CmdResult> {
        commands::list_books::run(&self.library)
    }

    pub fn list_members(&self) -> Result<CmdResult> {
        commands::list_members::run(&self.library)
    }

    pub fn member_loans(&self, member_id: u32) -> Result<CmdResult> {
        commands::list_members::for_member(&self.library, member_id)
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Full-state flush after a successful mutation. A document that could
    /// not be written becomes a warning on the result; the in-memory
    /// mutation stands either way and the next successful save catches up.
    fn flush(&mut self, mut result: CmdResult) -> CmdResult {
        let report = self.store.save(&self.library.data());
        for failure in report.failures {
            warn!("{}", failure);
            result.add_message(CmdMessage::warning(failure));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fs::FileStore;
    use crate::store::memory::InMemoryStore;

    fn new_book(title: &str, isbn: &str, quantity: u32) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Author".to_string(),
            isbn: isbn.to_string(),
            quantity,
        }
    }

    #[test]
    fn every_mutation_is_flushed_to_the_store() {
        let (mut api, warnings) = LibraryApi::open(InMemoryStore::new());
        assert!(warnings.is_empty());

        api.add_book(new_book("Dune", "978-1", 2)).unwrap();
        assert_eq!(api.store().data().books.len(), 1);

        api.add_member(NewMember::Student {
            name: "Alice".to_string(),
            student_id: "S1".to_string(),
        })
        .unwrap();
        assert_eq!(api.store().data().members.len(), 1);

        api.issue_book(1001, "978-1").unwrap();
        assert_eq!(api.store().data().loans[&1001], vec!["978-1".to_string()]);

        api.return_book(1001, "978-1").unwrap();
        assert!(api.store().data().loans.is_empty());
    }

    #[test]
    fn failed_operations_are_not_flushed() {
        let (mut api, _) = LibraryApi::open(InMemoryStore::new());
        api.add_book(new_book("Dune", "978-1", 1)).unwrap();

        assert!(api.issue_book(9999, "978-1").is_err());
        assert!(api.store().data().loans.is_empty());
    }

    #[test]
    fn state_survives_a_reopen_through_the_file_store() {
        let dir = tempfile::tempdir().unwrap();

        let (mut api, _) = LibraryApi::open(FileStore::new(dir.path()));
        api.add_book(new_book("Dune", "978-1", 2)).unwrap();
        api.add_member(NewMember::Faculty {
            name: "Dr. Lee".to_string(),
            department: "CS".to_string(),
        })
        .unwrap();
        api.issue_book(1001, "978-1").unwrap();
        let snapshot = api.library().data();
        drop(api);

        let (api, warnings) = LibraryApi::open(FileStore::new(dir.path()));
        assert!(warnings.is_empty());
        assert_eq!(api.library().data(), snapshot);
        // The reconstructed member is still a faculty with the right limit.
        assert_eq!(api.library().member(1001).unwrap().max_books_allowed(), 10);
        // The allocator resumes past the persisted ids.
        assert_eq!(api.library().peek_next_member_id(), 1002);
    }
}
