//! Domain model for notes and folder lists.
//!
//! # Responsibility
//! - Define note identity, folder membership, and list metadata.
//! - Keep list ordering rules next to the list type.
//!
//! # Invariants
//! - Every note is identified by a `NoteId` scoped to exactly one folder.
//! - List ordering is derived from `NoteInfo::updated_at`.

pub mod note;
pub mod note_list;
