use crate::commands::{CmdMessage, CmdResult};
use crate::error::{LibrisError, Result};
use crate::library::Library;

/// Takes one copy back from a member: the first matching ledger entry is
/// removed (duplicates stay), the entry is dropped once empty, and the
/// book goes back on the shelf. Every precondition is checked before
/// anything mutates.
pub fn run(library: &mut Library, member_id: u32, isbn: &str) -> Result<CmdResult> {
    let isbn = isbn.trim();
    let member_name = match library.member(member_id) {
        Some(member) => member.name().to_string(),
        None => return Err(LibrisError::MemberNotFound(member_id)),
    };

    if library.loan_count(member_id) == 0 {
        return Err(LibrisError::NothingBorrowed {
            name: member_name,
            member_id,
        });
    }
    let has_loan = library
        .loans_of(member_id)
        .map_or(false, |loans| loans.iter().any(|loaned| loaned == isbn));
    if !has_loan {
        return Err(LibrisError::NotBorrowed {
            isbn: isbn.to_string(),
            member_id,
        });
    }

    let book = library
        .book_mut(isbn)
        .ok_or_else(|| LibrisError::BookNotFound(isbn.to_string()))?;
    if !book.increment_available() {
        return Err(LibrisError::StockFull(isbn.to_string()));
    }
    let title = book.title().to_string();
    library.remove_loan(member_id, isbn);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Book '{}' returned by {} (ID: {}) successfully.",
        title, member_name, member_id
    )));
    Ok(result)
}
