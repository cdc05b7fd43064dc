use crate::commands::{CmdMessage, CmdResult, NewBook};
use crate::error::Result;
use crate::library::Library;
use crate::model::Book;

/// Adds a title to the catalog, or restocks it when the ISBN is already
/// known: the quantity is added to both total and available, and no new
/// entry is created.
pub fn run(library: &mut Library, new: NewBook) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    if let Some(existing) = library.book_mut(new.isbn.trim()) {
        existing.restock(new.quantity)?;
        result.add_message(CmdMessage::info(format!(
            "A book with ISBN '{}' already exists. Updating its quantity.",
            existing.isbn()
        )));
        result.add_message(CmdMessage::success(format!(
            "Quantity updated for '{}'. New total: {}",
            existing.title(),
            existing.total_quantity()
        )));
        result.books.push(existing.clone());
        return Ok(result);
    }

    let book = Book::new(&new.title, &new.author, &new.isbn, new.quantity)?;
    result.add_message(CmdMessage::success(format!(
        "Book '{}' (ISBN: {}) added successfully.",
        book.title(),
        book.isbn()
    )));
    result.books.push(book.clone());
    library.add_book(book);
    Ok(result)
}
