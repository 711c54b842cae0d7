//! Note persistence contracts and the filesystem implementation.
//!
//! # Responsibility
//! - Define the storage seam (`NoteStore`) used by the editor session.
//! - Map every filesystem failure to one error kind (`StoreError`).
//!
//! # Invariants
//! - `write` has truncate-and-rewrite semantics.
//! - `preview`, `last_modified` and `info` never fail; they degrade to empty
//!   values.
//! - A failed `move_note` leaves the note in its original folder.

use crate::model::note::{Folder, NoteId, NoteInfo};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod fs_store;

pub use fs_store::{derive_preview, FsNoteStore};

pub type StoreResult<T> = Result<T, StoreError>;

/// I/O failure raised by note store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem operation failed.
    Io {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },
    /// Backing directory for the folder was not provisioned at startup.
    Unavailable(Folder),
}

impl StoreError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Short machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => "not_found",
                io::ErrorKind::PermissionDenied => "permission_denied",
                io::ErrorKind::AlreadyExists => "already_exists",
                _ => "io_failed",
            },
            Self::Unavailable(_) => "store_unavailable",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { op, path, source } => {
                write!(f, "{op} failed for `{}`: {source}", path.display())
            }
            Self::Unavailable(folder) => write!(f, "{folder} folder is unavailable"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Unavailable(_) => None,
        }
    }
}

/// Storage interface for notes kept in an Active/Archive folder pair.
pub trait NoteStore {
    /// Whether both backing folders were provisioned.
    fn is_available(&self) -> bool;
    /// Lists metadata of every note in `folder`, in unspecified order.
    fn list(&self, folder: Folder) -> StoreResult<Vec<NoteInfo>>;
    /// Creates an empty note in the Active folder with a time-based id.
    fn create(&self) -> StoreResult<NoteId>;
    /// Reads the note content as lines without terminators.
    fn read(&self, id: &NoteId) -> StoreResult<Vec<String>>;
    /// Replaces the full note content, creating the note when absent.
    fn write(&self, id: &NoteId, lines: &[String]) -> StoreResult<()>;
    /// Deletes the note.
    fn delete(&self, id: &NoteId) -> StoreResult<()>;
    /// Moves the note to the other folder, overwriting a same-named note there.
    fn move_note(&self, id: &NoteId) -> StoreResult<NoteId>;
    /// Derived preview text, `""` when unreadable.
    fn preview(&self, id: &NoteId) -> String;
    /// Formatted modification time, `""` when unreadable.
    fn last_modified(&self, id: &NoteId) -> String;
    /// Fresh list metadata for one note.
    fn info(&self, id: &NoteId) -> NoteInfo;
}
