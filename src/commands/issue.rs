use crate::commands::{CmdMessage, CmdResult};
use crate::error::{LibrisError, Result};
use crate::library::Library;

/// Issues one copy of a book to a member. Every precondition is checked
/// before anything mutates, so a refusal leaves the catalog untouched.
pub fn run(library: &mut Library, member_id: u32, isbn: &str) -> Result<CmdResult> {
    let isbn = isbn.trim();
    let (member_name, limit) = match library.member(member_id) {
        Some(member) => (member.name().to_string(), member.max_books_allowed()),
        None => return Err(LibrisError::MemberNotFound(member_id)),
    };
    let loan_count = library.loan_count(member_id);

    let book = library
        .book_mut(isbn)
        .ok_or_else(|| LibrisError::BookNotFound(isbn.to_string()))?;
    if book.available_quantity() == 0 {
        return Err(LibrisError::OutOfStock {
            title: book.title().to_string(),
            isbn: book.isbn().to_string(),
        });
    }
    if loan_count >= limit {
        return Err(LibrisError::BorrowingLimitReached {
            name: member_name,
            member_id,
            limit,
        });
    }

    book.decrement_available();
    let title = book.title().to_string();
    library.record_loan(member_id, isbn);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Book '{}' issued to {} (ID: {}) successfully.",
        title, member_name, member_id
    )));
    Ok(result)
}
