//! Core domain logic for memo.
//! This crate is the single source of truth for note storage and autosave
//! invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::MemoConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Folder, NoteId, NoteInfo};
pub use model::note_list::NoteList;
pub use service::editor_session::{
    EditorSession, LeaveOutcome, MoveOutcome, NewNoteOutcome, SelectOutcome, SessionError,
    SessionState, TickOutcome,
};
pub use store::{derive_preview, FsNoteStore, NoteStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
