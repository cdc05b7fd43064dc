use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LibrisError, Result};

/// Maximum simultaneous loans for a student.
pub const STUDENT_LOAN_LIMIT: usize = 3;
/// Maximum simultaneous loans for a faculty member.
pub const FACULTY_LOAN_LIMIT: usize = 10;

fn non_empty(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LibrisError::Validation(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(trimmed.to_string())
}

/// A cataloged title. The ISBN is the unique key; quantities track how many
/// copies exist and how many are on the shelf right now.
///
/// Fields are private so the `available <= total` invariant can only be
/// changed through the checked methods below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBook")]
pub struct Book {
    title: String,
    author: String,
    isbn: String,
    total_quantity: u32,
    available_quantity: u32,
}

impl Book {
    pub fn new(title: &str, author: &str, isbn: &str, quantity: u32) -> Result<Self> {
        let title = non_empty(title, "Book title")?;
        let author = non_empty(author, "Book author")?;
        let isbn = non_empty(isbn, "Book ISBN")?;
        if quantity == 0 {
            return Err(LibrisError::Validation(
                "Book quantity must be a positive integer".to_string(),
            ));
        }
        Ok(Self {
            title,
            author,
            isbn,
            total_quantity: quantity,
            available_quantity: quantity,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn total_quantity(&self) -> u32 {
        self.total_quantity
    }

    pub fn available_quantity(&self) -> u32 {
        self.available_quantity
    }

    pub fn set_available_quantity(&mut self, quantity: u32) -> Result<()> {
        if quantity > self.total_quantity {
            return Err(LibrisError::Validation(format!(
                "Available quantity {} exceeds total quantity {}",
                quantity, self.total_quantity
            )));
        }
        self.available_quantity = quantity;
        Ok(())
    }

    /// Puts one copy back on the shelf. No-op returning false once every
    /// copy is already present.
    pub fn increment_available(&mut self) -> bool {
        if self.available_quantity < self.total_quantity {
            self.available_quantity += 1;
            true
        } else {
            false
        }
    }

    /// Takes one copy off the shelf. No-op returning false at zero.
    pub fn decrement_available(&mut self) -> bool {
        if self.available_quantity > 0 {
            self.available_quantity -= 1;
            true
        } else {
            false
        }
    }

    /// Adds copies of an already-cataloged title to both quantities.
    pub fn restock(&mut self, additional: u32) -> Result<()> {
        if additional == 0 {
            return Err(LibrisError::Validation(
                "Additional quantity must be positive".to_string(),
            ));
        }
        let total = self.total_quantity.checked_add(additional).ok_or_else(|| {
            LibrisError::Validation("Total quantity is too large".to_string())
        })?;
        self.total_quantity = total;
        self.available_quantity += additional;
        Ok(())
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title: {}, Author: {}, ISBN: {}, Available: {}/{}",
            self.title, self.author, self.isbn, self.available_quantity, self.total_quantity
        )
    }
}

#[derive(Deserialize)]
struct RawBook {
    title: String,
    author: String,
    isbn: String,
    total_quantity: u32,
    available_quantity: u32,
}

impl TryFrom<RawBook> for Book {
    type Error = LibrisError;

    fn try_from(raw: RawBook) -> Result<Self> {
        let mut book = Book::new(&raw.title, &raw.author, &raw.isbn, raw.total_quantity)?;
        book.set_available_quantity(raw.available_quantity)?;
        Ok(book)
    }
}

/// What kind of member this is, with the per-kind fields. The set of kinds
/// is closed: every consumer matches exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MemberKind {
    Student { student_id: String },
    Faculty { department: String },
}

impl MemberKind {
    /// Borrowing limit for this kind of member. There is no default: a new
    /// kind must pick one.
    pub fn max_books_allowed(&self) -> usize {
        match self {
            MemberKind::Student { .. } => STUDENT_LOAN_LIMIT,
            MemberKind::Faculty { .. } => FACULTY_LOAN_LIMIT,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MemberKind::Student { .. } => "Student",
            MemberKind::Faculty { .. } => "Faculty",
        }
    }
}

/// A registered member. Identity (`member_id`) is assigned by the catalog's
/// allocator and never changes; neither does anything else after
/// registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMember")]
pub struct Member {
    member_id: u32,
    name: String,
    #[serde(flatten)]
    kind: MemberKind,
}

impl Member {
    pub fn student(member_id: u32, name: &str, student_id: &str) -> Result<Self> {
        let student_id = non_empty(student_id, "Student ID")?;
        Self::new(member_id, name, MemberKind::Student { student_id })
    }

    pub fn faculty(member_id: u32, name: &str, department: &str) -> Result<Self> {
        let department = non_empty(department, "Department")?;
        Self::new(member_id, name, MemberKind::Faculty { department })
    }

    fn new(member_id: u32, name: &str, kind: MemberKind) -> Result<Self> {
        if member_id == 0 {
            return Err(LibrisError::Validation(
                "Member ID must be a positive integer".to_string(),
            ));
        }
        let name = non_empty(name, "Member name")?;
        Ok(Self {
            member_id,
            name,
            kind,
        })
    }

    pub fn member_id(&self) -> u32 {
        self.member_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &MemberKind {
        &self.kind
    }

    pub fn max_books_allowed(&self) -> usize {
        self.kind.max_books_allowed()
    }

    /// The student id, for uniqueness checks. None for faculty.
    pub fn student_id(&self) -> Option<&str> {
        match &self.kind {
            MemberKind::Student { student_id } => Some(student_id),
            MemberKind::Faculty { .. } => None,
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Member ID: {}, Name: {}", self.member_id, self.name)?;
        match &self.kind {
            MemberKind::Student { student_id } => write!(
                f,
                ", Type: Student, Student ID: {}, Max Books: {}",
                student_id,
                self.max_books_allowed()
            ),
            MemberKind::Faculty { department } => write!(
                f,
                ", Type: Faculty, Department: {}, Max Books: {}",
                department,
                self.max_books_allowed()
            ),
        }
    }
}

#[derive(Deserialize)]
struct RawMember {
    member_id: u32,
    name: String,
    #[serde(flatten)]
    kind: RawMemberKind,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawMemberKind {
    Student { student_id: String },
    Faculty { department: String },
}

impl TryFrom<RawMember> for Member {
    type Error = LibrisError;

    fn try_from(raw: RawMember) -> Result<Self> {
        match raw.kind {
            RawMemberKind::Student { student_id } => {
                Member::student(raw.member_id, &raw.name, &student_id)
            }
            RawMemberKind::Faculty { department } => {
                Member::faculty(raw.member_id, &raw.name, &department)
            }
        }
    }
}

/// Everything the system persists, as one snapshot: the book catalog (in
/// insertion order), the member roster, and the loan ledger keyed by
/// member id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryData {
    pub books: Vec<Book>,
    pub members: Vec<Member>,
    pub loans: BTreeMap<u32, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_construction_trims_fields() {
        let book = Book::new("  Dune ", " Frank Herbert ", " 978-0441172719 ", 3).unwrap();
        assert_eq!(book.title(), "Dune");
        assert_eq!(book.author(), "Frank Herbert");
        assert_eq!(book.isbn(), "978-0441172719");
        assert_eq!(book.total_quantity(), 3);
        assert_eq!(book.available_quantity(), 3);
    }

    #[test]
    fn book_construction_rejects_bad_fields() {
        assert!(Book::new("", "Author", "isbn", 1).is_err());
        assert!(Book::new("   ", "Author", "isbn", 1).is_err());
        assert!(Book::new("Title", " ", "isbn", 1).is_err());
        assert!(Book::new("Title", "Author", "", 1).is_err());
        assert!(Book::new("Title", "Author", "isbn", 0).is_err());
    }

    #[test]
    fn availability_stays_within_bounds() {
        let mut book = Book::new("Title", "Author", "isbn", 2).unwrap();
        assert!(book.decrement_available());
        assert!(book.decrement_available());
        assert!(!book.decrement_available());
        assert_eq!(book.available_quantity(), 0);

        assert!(book.increment_available());
        assert!(book.increment_available());
        assert!(!book.increment_available());
        assert_eq!(book.available_quantity(), 2);
    }

    #[test]
    fn set_available_rejects_values_over_total() {
        let mut book = Book::new("Title", "Author", "isbn", 2).unwrap();
        assert!(book.set_available_quantity(3).is_err());
        assert!(book.set_available_quantity(0).is_ok());
        assert_eq!(book.available_quantity(), 0);
    }

    #[test]
    fn restock_grows_both_quantities() {
        let mut book = Book::new("Title", "Author", "isbn", 2).unwrap();
        book.decrement_available();
        book.restock(3).unwrap();
        assert_eq!(book.total_quantity(), 5);
        assert_eq!(book.available_quantity(), 4);

        assert!(book.restock(0).is_err());
        assert_eq!(book.total_quantity(), 5);
    }

    #[test]
    fn book_roundtrips_through_json() {
        let mut book = Book::new("Dune", "Frank Herbert", "978-0441172719", 3).unwrap();
        book.decrement_available();

        let json = serde_json::to_string(&book).unwrap();
        assert!(json.contains("\"total_quantity\":3"));
        assert!(json.contains("\"available_quantity\":2"));

        let parsed: Book = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, book);
    }

    #[test]
    fn book_deserialization_validates() {
        // available above total
        let bad = r#"{"title":"T","author":"A","isbn":"i","total_quantity":1,"available_quantity":2}"#;
        assert!(serde_json::from_str::<Book>(bad).is_err());

        // empty title
        let bad = r#"{"title":"  ","author":"A","isbn":"i","total_quantity":1,"available_quantity":1}"#;
        assert!(serde_json::from_str::<Book>(bad).is_err());

        // missing field
        let bad = r#"{"title":"T","author":"A","isbn":"i","total_quantity":1}"#;
        assert!(serde_json::from_str::<Book>(bad).is_err());
    }

    #[test]
    fn member_limits_by_kind() {
        let student = Member::student(1001, "Alice", "S1").unwrap();
        let faculty = Member::faculty(1002, "Dr. Lee", "CS").unwrap();
        assert_eq!(student.max_books_allowed(), 3);
        assert_eq!(faculty.max_books_allowed(), 10);
    }

    #[test]
    fn member_construction_rejects_bad_fields() {
        assert!(Member::student(0, "Alice", "S1").is_err());
        assert!(Member::student(1001, " ", "S1").is_err());
        assert!(Member::student(1001, "Alice", "").is_err());
        assert!(Member::faculty(1001, "Dr. Lee", "  ").is_err());
    }

    #[test]
    fn member_roundtrips_with_type_tag() {
        let student = Member::student(1001, "Alice", "S1").unwrap();
        let json = serde_json::to_string(&student).unwrap();
        assert!(json.contains("\"type\":\"Student\""));
        assert!(json.contains("\"student_id\":\"S1\""));
        let parsed: Member = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, student);

        let faculty = Member::faculty(1002, "Dr. Lee", "CS").unwrap();
        let json = serde_json::to_string(&faculty).unwrap();
        assert!(json.contains("\"type\":\"Faculty\""));
        let parsed: Member = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, faculty);
    }

    #[test]
    fn member_deserialization_validates() {
        // unknown tag
        let bad = r#"{"member_id":1001,"name":"Alice","type":"Robot"}"#;
        assert!(serde_json::from_str::<Member>(bad).is_err());

        // missing student_id
        let bad = r#"{"member_id":1001,"name":"Alice","type":"Student"}"#;
        assert!(serde_json::from_str::<Member>(bad).is_err());

        // zero id
        let bad = r#"{"member_id":0,"name":"Alice","type":"Student","student_id":"S1"}"#;
        assert!(serde_json::from_str::<Member>(bad).is_err());
    }
}
