/// Notes: private, owner-scoped text records
///
/// Listing only returns the requester's own notes. Saving an edit makes the
/// editor the note's owner.

use super::record::{ListScope, OwnedEntity, Record};

/// Kind marker for notes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteKind;

impl OwnedEntity for NoteKind {
    const TABLE: &'static str = "notes";
    const TITLE_MAX_CHARS: usize = 150;
    const LIST_SCOPE: ListScope = ListScope::Owner;
    const REASSIGN_OWNER_ON_UPDATE: bool = true;
}

/// A note
pub type Note = Record<NoteKind>;
