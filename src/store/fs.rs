use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::{LibraryStore, LoadReport, SaveReport};
use crate::model::{Book, LibraryData, Member, MemberKind};

/// Default document file names, used when no override is configured.
pub const BOOKS_FILE: &str = "books.json";
pub const MEMBERS_FILE: &str = "members.json";
pub const ISSUED_FILE: &str = "issued_books.json";

/// File-backed storage: three independent JSON documents.
///
/// Each document is loaded and saved as a whole. A document that is
/// missing, unreadable, or corrupt degrades to an empty collection (the
/// file on disk is left alone until the next successful save); a bad
/// record inside an otherwise readable document is skipped on its own.
pub struct FileStore {
    books_path: PathBuf,
    members_path: PathBuf,
    issued_path: PathBuf,
}

/// The members document groups records by kind.
#[derive(serde::Deserialize)]
struct MembersDocument {
    #[serde(default)]
    students: Vec<Value>,
    #[serde(default)]
    faculty: Vec<Value>,
}

impl FileStore {
    /// Store the three documents under `dir` with the default file names.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            books_path: dir.join(BOOKS_FILE),
            members_path: dir.join(MEMBERS_FILE),
            issued_path: dir.join(ISSUED_FILE),
        }
    }

    pub fn with_paths(books_path: PathBuf, members_path: PathBuf, issued_path: PathBuf) -> Self {
        Self {
            books_path,
            members_path,
            issued_path,
        }
    }

    /// Reads a document, or None when it is absent (not an error) or
    /// unreadable (warned about).
    fn read_document(&self, path: &Path, warnings: &mut Vec<String>) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                note(
                    warnings,
                    format!("Could not read {}: {}", path.display(), err),
                );
                None
            }
        }
    }

    fn load_books(&self, warnings: &mut Vec<String>) -> Vec<Book> {
        let raw = match self.read_document(&self.books_path, warnings) {
            Some(raw) => raw,
            None => return Vec::new(),
        };
        let records: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(_) => {
                note(
                    warnings,
                    format!(
                        "{} is corrupted; starting with no books",
                        self.books_path.display()
                    ),
                );
                return Vec::new();
            }
        };

        let mut books: Vec<Book> = Vec::new();
        for record in records {
            match serde_json::from_value::<Book>(record.clone()) {
                Ok(book) => {
                    // A repeated ISBN replaces the earlier record in place,
                    // keeping catalog order stable.
                    match books.iter_mut().find(|known| known.isbn() == book.isbn()) {
                        Some(existing) => *existing = book,
                        None => books.push(book),
                    }
                }
                Err(err) => note(
                    warnings,
                    format!("Skipping invalid book record {}: {}", record, err),
                ),
            }
        }
        books
    }

    fn load_members(&self, warnings: &mut Vec<String>) -> Vec<Member> {
        let raw = match self.read_document(&self.members_path, warnings) {
            Some(raw) => raw,
            None => return Vec::new(),
        };
        let document: MembersDocument = match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(_) => {
                note(
                    warnings,
                    format!(
                        "{} is corrupted; starting with no members",
                        self.members_path.display()
                    ),
                );
                return Vec::new();
            }
        };

        let mut members: Vec<Member> = Vec::new();
        for record in document.students.into_iter().chain(document.faculty) {
            match serde_json::from_value::<Member>(record.clone()) {
                Ok(member) => {
                    match members
                        .iter_mut()
                        .find(|known| known.member_id() == member.member_id())
                    {
                        Some(existing) => *existing = member,
                        None => members.push(member),
                    }
                }
                Err(err) => note(
                    warnings,
                    format!("Skipping invalid member record {}: {}", record, err),
                ),
            }
        }
        members
    }

    fn load_issued(&self, warnings: &mut Vec<String>) -> BTreeMap<u32, Vec<String>> {
        let raw = match self.read_document(&self.issued_path, warnings) {
            Some(raw) => raw,
            None => return BTreeMap::new(),
        };
        let entries: BTreeMap<String, Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(_) => {
                note(
                    warnings,
                    format!(
                        "{} is corrupted; starting with no issued records",
                        self.issued_path.display()
                    ),
                );
                return BTreeMap::new();
            }
        };

        let mut loans = BTreeMap::new();
        for (key, value) in entries {
            let member_id = match key.parse::<u32>() {
                Ok(member_id) if member_id > 0 => member_id,
                _ => {
                    note(
                        warnings,
                        format!("Skipping issued entry with invalid member id '{}'", key),
                    );
                    continue;
                }
            };
            match serde_json::from_value::<Vec<String>>(value) {
                Ok(isbns) => {
                    loans.insert(member_id, isbns);
                }
                Err(err) => note(
                    warnings,
                    format!("Skipping issued entry for member {}: {}", member_id, err),
                ),
            }
        }
        loans
    }

    fn write_document<T: Serialize>(path: &Path, value: &T, report: &mut SaveReport) {
        let payload = match serde_json::to_string_pretty(value) {
            Ok(payload) => payload,
            Err(err) => {
                fail(report, format!("Could not encode {}: {}", path.display(), err));
                return;
            }
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(err) = fs::create_dir_all(parent) {
                    fail(
                        report,
                        format!("Could not create {}: {}", parent.display(), err),
                    );
                    return;
                }
            }
        }
        if let Err(err) = fs::write(path, payload) {
            fail(
                report,
                format!("Could not write {}: {}", path.display(), err),
            );
        }
    }
}

fn note(warnings: &mut Vec<String>, message: String) {
    warn!("{}", message);
    warnings.push(message);
}

fn fail(report: &mut SaveReport, message: String) {
    warn!("{}", message);
    report.failures.push(message);
}

impl LibraryStore for FileStore {
    fn load(&self) -> LoadReport {
        let mut warnings = Vec::new();
        let books = self.load_books(&mut warnings);
        let members = self.load_members(&mut warnings);
        let loans = self.load_issued(&mut warnings);
        LoadReport {
            data: LibraryData {
                books,
                members,
                loans,
            },
            warnings,
        }
    }

    fn save(&mut self, data: &LibraryData) -> SaveReport {
        let mut report = SaveReport::default();

        Self::write_document(&self.books_path, &data.books, &mut report);

        let (students, faculty): (Vec<&Member>, Vec<&Member>) = data
            .members
            .iter()
            .partition(|member| matches!(member.kind(), MemberKind::Student { .. }));
        let members_document = serde_json::json!({
            "students": students,
            "faculty": faculty,
        });
        Self::write_document(&self.members_path, &members_document, &mut report);

        Self::write_document(&self.issued_path, &data.loans, &mut report);

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Member;

    fn sample_data() -> LibraryData {
        let mut data = LibraryData::default();
        data.books
            .push(Book::new("Dune", "Frank Herbert", "978-0441172719", 3).unwrap());
        data.books
            .push(Book::new("Clean Code", "Robert Martin", "978-1", 2).unwrap());
        data.members
            .push(Member::student(1001, "Alice", "S1").unwrap());
        data.members
            .push(Member::faculty(1002, "Dr. Lee", "CS").unwrap());
        data.loans
            .insert(1001, vec!["978-1".to_string(), "978-1".to_string()]);
        data
    }

    #[test]
    fn missing_files_load_empty_and_silent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let report = store.load();
        assert_eq!(report.data, LibraryData::default());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let data = sample_data();

        let report = store.save(&data);
        assert!(report.is_clean());

        let loaded = store.load();
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.data, data);
    }

    #[test]
    fn members_document_groups_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.save(&sample_data());

        let raw = fs::read_to_string(dir.path().join(MEMBERS_FILE)).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["students"].as_array().unwrap().len(), 1);
        assert_eq!(value["faculty"].as_array().unwrap().len(), 1);
        assert_eq!(value["students"][0]["type"], "Student");
    }

    #[test]
    fn issued_document_uses_decimal_string_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.save(&sample_data());

        let raw = fs::read_to_string(dir.path().join(ISSUED_FILE)).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("1001").is_some());
        assert_eq!(value["1001"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn corrupt_document_warns_and_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(BOOKS_FILE), "{not json").unwrap();

        let store = FileStore::new(dir.path());
        let report = store.load();
        assert!(report.data.books.is_empty());
        assert_eq!(report.warnings.len(), 1);

        // The corrupt file stays on disk untouched until the next save.
        assert_eq!(
            fs::read_to_string(dir.path().join(BOOKS_FILE)).unwrap(),
            "{not json"
        );
    }

    #[test]
    fn invalid_record_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let books = r#"[
            {"title":"Dune","author":"Frank Herbert","isbn":"978-0441172719","total_quantity":3,"available_quantity":3},
            {"title":"","author":"Nobody","isbn":"bad","total_quantity":1,"available_quantity":1},
            {"title":"Clean Code","author":"Robert Martin","isbn":"978-1","total_quantity":2,"available_quantity":2}
        ]"#;
        fs::write(dir.path().join(BOOKS_FILE), books).unwrap();

        let store = FileStore::new(dir.path());
        let report = store.load();
        assert_eq!(report.data.books.len(), 2);
        assert_eq!(report.data.books[0].isbn(), "978-0441172719");
        assert_eq!(report.data.books[1].isbn(), "978-1");
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn invalid_member_record_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let members = r#"{
            "students": [
                {"member_id":1001,"name":"Alice","type":"Student","student_id":"S1"},
                {"member_id":1002,"name":"","type":"Student","student_id":"S2"}
            ],
            "faculty": [
                {"member_id":1003,"name":"Dr. Lee","type":"Faculty","department":"CS"}
            ]
        }"#;
        fs::write(dir.path().join(MEMBERS_FILE), members).unwrap();

        let store = FileStore::new(dir.path());
        let report = store.load();
        assert_eq!(report.data.members.len(), 2);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn issued_entries_with_bad_keys_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let issued = r#"{
            "1001": ["978-1"],
            "zero": ["978-2"],
            "0": ["978-3"]
        }"#;
        fs::write(dir.path().join(ISSUED_FILE), issued).unwrap();

        let store = FileStore::new(dir.path());
        let report = store.load();
        assert_eq!(report.data.loans.len(), 1);
        assert_eq!(report.data.loans[&1001], vec!["978-1".to_string()]);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn failed_document_does_not_stop_the_others() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the books document should go makes that write
        // fail while the other two documents still land.
        fs::create_dir(dir.path().join(BOOKS_FILE)).unwrap();

        let mut store = FileStore::new(dir.path());
        let report = store.save(&sample_data());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].contains(BOOKS_FILE));
        assert!(dir.path().join(MEMBERS_FILE).exists());
        assert!(dir.path().join(ISSUED_FILE).exists());
    }

    #[test]
    fn repeated_isbn_keeps_the_later_record() {
        let dir = tempfile::tempdir().unwrap();
        let books = r#"[
            {"title":"Old","author":"A","isbn":"978-1","total_quantity":1,"available_quantity":1},
            {"title":"New","author":"A","isbn":"978-1","total_quantity":5,"available_quantity":5}
        ]"#;
        fs::write(dir.path().join(BOOKS_FILE), books).unwrap();

        let store = FileStore::new(dir.path());
        let report = store.load();
        assert_eq!(report.data.books.len(), 1);
        assert_eq!(report.data.books[0].title(), "New");
    }
}
