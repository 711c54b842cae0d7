//! Note identity and list metadata.
//!
//! # Responsibility
//! - Define the folder membership of a note (`Active` or `Archive`).
//! - Define the stable note identifier and the list-facing metadata shape.
//!
//! # Invariants
//! - A note belongs to exactly one folder at a time.
//! - Moving a note toggles `NoteId::folder` and keeps `NoteId::file_name`.
//! - `NoteInfo` is derived from the store and may be stale until refreshed.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Folder a note lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Folder {
    /// Editable notes, eligible for autosave.
    Active,
    /// Read-only notes.
    Archive,
}

impl Folder {
    /// Returns the other folder.
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Archive,
            Self::Archive => Self::Active,
        }
    }

    /// Human-readable folder label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Archive => "Archive",
        }
    }

    /// Whether edits are accepted for notes in this folder.
    pub fn is_editable(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Display for Folder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Stable note identifier: the file name inside its folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId {
    pub folder: Folder,
    pub file_name: String,
}

impl NoteId {
    pub fn new(folder: Folder, file_name: impl Into<String>) -> Self {
        Self {
            folder,
            file_name: file_name.into(),
        }
    }

    /// Identifier of the same file after a folder move.
    pub fn moved(&self) -> Self {
        Self {
            folder: self.folder.toggled(),
            file_name: self.file_name.clone(),
        }
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.folder {
            Folder::Active => write!(f, "{}", self.file_name),
            Folder::Archive => write!(f, "archive/{}", self.file_name),
        }
    }
}

/// List entry metadata for one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInfo {
    pub id: NoteId,
    /// Derived single-line summary of the content. Empty when unreadable.
    pub preview: String,
    /// Display timestamp (`yyyy-MM-dd HH:mm:ss`, local time). Empty when unreadable.
    pub last_modified: String,
    /// Modification time in epoch milliseconds, used for ordering.
    pub updated_at: i64,
}

impl NoteInfo {
    /// Metadata for a note that has no readable content yet.
    pub fn blank(id: NoteId) -> Self {
        Self {
            id,
            preview: String::new(),
            last_modified: String::new(),
            updated_at: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Folder, NoteId};

    #[test]
    fn folder_toggle_is_an_involution() {
        assert_eq!(Folder::Active.toggled(), Folder::Archive);
        assert_eq!(Folder::Archive.toggled().toggled(), Folder::Archive);
    }

    #[test]
    fn moved_id_keeps_file_name() {
        let id = NoteId::new(Folder::Active, "1700000000000.txt");
        let moved = id.moved();
        assert_eq!(moved.folder, Folder::Archive);
        assert_eq!(moved.file_name, id.file_name);
        assert_eq!(moved.to_string(), "archive/1700000000000.txt");
    }

    #[test]
    fn only_active_folder_is_editable() {
        assert!(Folder::Active.is_editable());
        assert!(!Folder::Archive.is_editable());
    }
}
