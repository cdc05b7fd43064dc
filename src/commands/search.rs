use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::library::Library;
use crate::model::Book;

/// Case-insensitive search: substring match on title or author, exact
/// match on ISBN. Results come back in catalog (insertion) order.
///
/// An empty catalog and a fruitless search both yield no books; they are
/// told apart only by the informational message.
pub fn run(library: &Library, term: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if library.books().is_empty() {
        result.add_message(CmdMessage::info("No books available to search."));
        return Ok(result);
    }

    let needle = term.trim().to_lowercase();
    let matches: Vec<Book> = library
        .books()
        .iter()
        .filter(|book| {
            book.title().to_lowercase().contains(&needle)
                || book.author().to_lowercase().contains(&needle)
                || book.isbn().to_lowercase() == needle
        })
        .cloned()
        .collect();

    if matches.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No books found matching '{}'.",
            term.trim()
        )));
    }
    Ok(result.with_books(matches))
}
