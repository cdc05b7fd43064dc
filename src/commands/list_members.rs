use crate::commands::{BorrowedBook, CmdMessage, CmdResult, MemberOverview};
use crate::error::{LibrisError, Result};
use crate::library::Library;
use crate::model::Member;

fn overview(library: &Library, member: &Member) -> MemberOverview {
    let borrowed = library
        .loans_of(member.member_id())
        .unwrap_or(&[])
        .iter()
        .map(|isbn| BorrowedBook {
            isbn: isbn.clone(),
            book: library.book(isbn).cloned(),
        })
        .collect();
    MemberOverview {
        member: member.clone(),
        borrowed,
    }
}

/// Every member with their current loans resolved to books. A ledger entry
/// whose ISBN is no longer cataloged resolves to a placeholder rather than
/// an error.
pub fn run(library: &Library) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if library.members().is_empty() {
        result.add_message(CmdMessage::info("No members registered in the system."));
        return Ok(result);
    }
    let members = library
        .members()
        .iter()
        .map(|member| overview(library, member))
        .collect();
    Ok(result.with_members(members))
}

/// One member's loans, for the return flow.
pub fn for_member(library: &Library, member_id: u32) -> Result<CmdResult> {
    let member = library
        .member(member_id)
        .ok_or(LibrisError::MemberNotFound(member_id))?;
    Ok(CmdResult::default().with_members(vec![overview(library, member)]))
}
