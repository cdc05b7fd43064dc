use std::collections::BTreeMap;

use crate::model::{Book, LibraryData, Member};

/// First id handed out by the member-id allocator.
pub const FIRST_MEMBER_ID: u32 = 1001;

/// The in-memory catalog: the book list (insertion order), the member
/// roster, the loan ledger, and the member-id allocator. The allocator is
/// instance state so independent catalogs (e.g. in tests) never interfere.
///
/// All invariant-checked mutation goes through [`crate::commands`]; this
/// type only offers the primitive lookups and edits those commands compose.
#[derive(Debug)]
pub struct Library {
    books: Vec<Book>,
    members: Vec<Member>,
    loans: BTreeMap<u32, Vec<String>>,
    next_member_id: u32,
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl Library {
    pub fn new() -> Self {
        Self::from_data(LibraryData::default())
    }

    /// Rebuilds the catalog from a persisted snapshot, advancing the id
    /// allocator past the largest member id seen.
    pub fn from_data(data: LibraryData) -> Self {
        let next_member_id = data
            .members
            .iter()
            .map(|member| member.member_id().saturating_add(1))
            .max()
            .map_or(FIRST_MEMBER_ID, |next| next.max(FIRST_MEMBER_ID));
        Self {
            books: data.books,
            members: data.members,
            loans: data.loans,
            next_member_id,
        }
    }

    /// Snapshot of the full state, for persistence.
    pub fn data(&self) -> LibraryData {
        LibraryData {
            books: self.books.clone(),
            members: self.members.clone(),
            loans: self.loans.clone(),
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn book(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.isbn() == isbn)
    }

    pub fn book_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        self.books.iter_mut().find(|book| book.isbn() == isbn)
    }

    pub fn add_book(&mut self, book: Book) {
        self.books.push(book);
    }

    pub fn member(&self, member_id: u32) -> Option<&Member> {
        self.members
            .iter()
            .find(|member| member.member_id() == member_id)
    }

    pub fn student_id_taken(&self, student_id: &str) -> bool {
        self.members
            .iter()
            .any(|member| member.student_id() == Some(student_id))
    }

    /// The id the allocator would assign next. Nothing is consumed until
    /// [`Self::register_member`] runs, so a failed registration never
    /// burns an id.
    pub fn peek_next_member_id(&self) -> u32 {
        self.next_member_id
    }

    /// Adds a member and advances the allocator to `max(next, id + 1)`,
    /// keeping the id space monotonic even when explicit ids arrive out of
    /// order.
    pub fn register_member(&mut self, member: Member) {
        self.next_member_id = self
            .next_member_id
            .max(member.member_id().saturating_add(1));
        self.members.push(member);
    }

    pub fn loans(&self) -> &BTreeMap<u32, Vec<String>> {
        &self.loans
    }

    pub fn loans_of(&self, member_id: u32) -> Option<&[String]> {
        self.loans.get(&member_id).map(|entry| entry.as_slice())
    }

    pub fn loan_count(&self, member_id: u32) -> usize {
        self.loans.get(&member_id).map_or(0, |entry| entry.len())
    }

    /// Appends an ISBN to the member's ledger entry, creating the entry on
    /// first loan. Duplicates are allowed: the same title issued twice
    /// appears twice.
    pub fn record_loan(&mut self, member_id: u32, isbn: &str) {
        self.loans
            .entry(member_id)
            .or_default()
            .push(isbn.to_string());
    }

    /// Removes the first ledger occurrence of the ISBN, dropping the
    /// member's entry entirely once it empties. Returns false when nothing
    /// matched.
    pub fn remove_loan(&mut self, member_id: u32, isbn: &str) -> bool {
        let entry = match self.loans.get_mut(&member_id) {
            Some(entry) => entry,
            None => return false,
        };
        let position = match entry.iter().position(|loaned| loaned == isbn) {
            Some(position) => position,
            None => return false,
        };
        entry.remove(position);
        if entry.is_empty() {
            self.loans.remove(&member_id);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Member;

    #[test]
    fn allocator_starts_at_seed() {
        let library = Library::new();
        assert_eq!(library.peek_next_member_id(), FIRST_MEMBER_ID);
    }

    #[test]
    fn allocator_advances_past_explicit_ids() {
        let mut library = Library::new();
        let member = Member::student(2000, "Alice", "S1").unwrap();
        library.register_member(member);
        assert_eq!(library.peek_next_member_id(), 2001);

        // A later, smaller explicit id must not move the counter backwards.
        let member = Member::student(1500, "Bob", "S2").unwrap();
        library.register_member(member);
        assert_eq!(library.peek_next_member_id(), 2001);
    }

    #[test]
    fn from_data_seeds_allocator_from_roster() {
        let mut data = LibraryData::default();
        data.members
            .push(Member::faculty(1042, "Dr. Lee", "CS").unwrap());
        let library = Library::from_data(data);
        assert_eq!(library.peek_next_member_id(), 1043);

        let library = Library::from_data(LibraryData::default());
        assert_eq!(library.peek_next_member_id(), FIRST_MEMBER_ID);
    }

    #[test]
    fn ledger_entry_created_appended_and_dropped() {
        let mut library = Library::new();
        library.record_loan(1001, "978-1");
        library.record_loan(1001, "978-2");
        library.record_loan(1001, "978-1");
        assert_eq!(library.loan_count(1001), 3);

        assert!(library.remove_loan(1001, "978-1"));
        assert_eq!(
            library.loans_of(1001).unwrap(),
            ["978-2".to_string(), "978-1".to_string()]
        );

        assert!(library.remove_loan(1001, "978-2"));
        assert!(library.remove_loan(1001, "978-1"));
        assert!(library.loans_of(1001).is_none());

        assert!(!library.remove_loan(1001, "978-1"));
    }
}
