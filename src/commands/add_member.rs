use crate::commands::{CmdMessage, CmdResult, MemberOverview, NewMember};
use crate::error::{LibrisError, Result};
use crate::library::Library;
use crate::model::Member;

/// Registers a member. The member id is taken from the catalog's allocator
/// only after every field validates, so a rejected registration never
/// consumes an id.
pub fn run(library: &mut Library, new: NewMember) -> Result<CmdResult> {
    let member = match &new {
        NewMember::Student { name, student_id } => {
            let trimmed = student_id.trim();
            if library.student_id_taken(trimmed) {
                return Err(LibrisError::DuplicateStudentId(trimmed.to_string()));
            }
            Member::student(library.peek_next_member_id(), name, student_id)?
        }
        NewMember::Faculty { name, department } => {
            Member::faculty(library.peek_next_member_id(), name, department)?
        }
    };

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} '{}' (ID: {}) added successfully.",
        member.kind().label(),
        member.name(),
        member.member_id()
    )));
    result.members.push(MemberOverview {
        member: member.clone(),
        borrowed: Vec::new(),
    });
    library.register_member(member);
    Ok(result)
}
