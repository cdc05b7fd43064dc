use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::library::Library;

/// Every cataloged title, in insertion order.
pub fn run(library: &Library) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if library.books().is_empty() {
        result.add_message(CmdMessage::info("No books available in the library."));
        return Ok(result);
    }
    Ok(result.with_books(library.books().to_vec()))
}
