//! Editor session: selection, dirty tracking and autosave.
//!
//! # Responsibility
//! - Own the Active/Archive lists and the single open note buffer.
//! - Decide, per user event and per timer tick, whether to persist the open
//!   note and whether to re-sort the visible list.
//!
//! # Invariants
//! - `ready_to_persist` is true only when `dirty` survived one full tick with
//!   no edit in between (one-tick debounce).
//! - Edits are rejected while the Archive folder is visible, so `dirty` is
//!   never set there.
//! - A failed save never clears `dirty`.
//! - A failed move leaves both lists and the selection unchanged.
//! - All mutation goes through `&mut self`; callers serialize ticks and user
//!   events on one thread.

use crate::model::note::{Folder, NoteId};
use crate::model::note_list::NoteList;
use crate::store::{NoteStore, StoreError, StoreResult};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;

/// Errors returned by editor session operations.
#[derive(Debug)]
pub enum SessionError {
    /// Backing folders were not provisioned; the shell must not start.
    StoreUnavailable,
    /// Store operation failed.
    Store(StoreError),
    /// Edit-enabling action requested while the Archive folder is visible.
    ReadOnlyFolder,
    /// No note is selected.
    NoSelection,
    /// Selection index is outside the visible list.
    IndexOutOfRange(usize),
    /// Blank notes are not moved between folders.
    EmptyNote,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable => write!(f, "note store is unavailable"),
            Self::Store(err) => write!(f, "{err}"),
            Self::ReadOnlyFolder => write!(f, "archive folder is read-only"),
            Self::NoSelection => write!(f, "no note is selected"),
            Self::IndexOutOfRange(index) => write!(f, "no note at position {index}"),
            Self::EmptyNote => write!(f, "an empty note cannot be moved"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Snapshot of the session flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub selected: Option<NoteId>,
    pub folder: Folder,
    pub dirty: bool,
    pub ready_to_persist: bool,
    pub list_needs_resort: bool,
}

/// What one timer tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Archive folder visible; ticks are ignored.
    Inactive,
    /// Nothing to do.
    Idle,
    /// The open note was autosaved.
    Saved,
    /// Autosave failed; retried on the next eligible tick.
    SaveFailed,
    /// The Active list was re-sorted.
    Resorted,
}

/// What happened to the previously open note when leaving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Nothing needed saving.
    Untouched,
    /// Unsaved edits were persisted.
    Saved,
    /// Persisting failed; the switch still happened.
    SaveFailed,
    /// The note was blank and got deleted.
    Deleted,
    /// Deleting the blank note failed; it stays listed.
    DeleteFailed,
}

/// Result of selecting another note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOutcome {
    pub leave: LeaveOutcome,
    /// Whether the new note's content was loaded into the editor.
    pub loaded: bool,
}

/// Result of creating a note from the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNoteOutcome {
    pub id: NoteId,
    pub leave: LeaveOutcome,
}

/// Result of moving the open note to the other folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Identifier of the moved note in its destination folder.
    pub moved_to: NoteId,
    /// Note selected afterwards in the visible folder, if any.
    pub next: Option<NoteId>,
}

/// Single editor session over a note store.
pub struct EditorSession<S: NoteStore> {
    store: S,
    active: NoteList,
    archive: NoteList,
    folder: Folder,
    selected: Option<NoteId>,
    text: String,
    loaded: bool,
    dirty: bool,
    ready_to_persist: bool,
    list_needs_resort: bool,
}

impl<S: NoteStore> EditorSession<S> {
    /// Starts a session from persisted folder state.
    ///
    /// Selects the most recent Active note, or creates one when the Active
    /// folder is empty.
    ///
    /// # Errors
    /// - `StoreUnavailable` when the store failed to provision its folders.
    /// - `Store` when listing fails or the initial note cannot be created.
    pub fn start(store: S) -> Result<Self, SessionError> {
        if !store.is_available() {
            error!("event=session_start module=session status=error error_code=store_unavailable");
            return Err(SessionError::StoreUnavailable);
        }

        let mut active = NoteList::load(&store, Folder::Active)?;
        let mut archive = NoteList::load(&store, Folder::Archive)?;
        active.sort_by_recency();
        archive.sort_by_recency();

        let mut session = Self {
            store,
            active,
            archive,
            folder: Folder::Active,
            selected: None,
            text: String::new(),
            loaded: false,
            dirty: false,
            ready_to_persist: false,
            list_needs_resort: false,
        };

        match session.active.first_id().cloned() {
            Some(first) => {
                session.load_note(first);
            }
            None => {
                session.create_and_select()?;
            }
        }

        info!(
            "event=session_start module=session status=ok active={} archive={}",
            session.active.len(),
            session.archive.len()
        );
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            selected: self.selected.clone(),
            folder: self.folder,
            dirty: self.dirty,
            ready_to_persist: self.ready_to_persist,
            list_needs_resort: self.list_needs_resort,
        }
    }

    /// Current editor buffer.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn folder(&self) -> Folder {
        self.folder
    }

    pub fn selected_id(&self) -> Option<&NoteId> {
        self.selected.as_ref()
    }

    /// Position of the selected note in the visible list.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
            .as_ref()
            .and_then(|id| self.visible_notes().position(id))
    }

    /// List for the visible folder.
    pub fn visible_notes(&self) -> &NoteList {
        match self.folder {
            Folder::Active => &self.active,
            Folder::Archive => &self.archive,
        }
    }

    pub fn active_notes(&self) -> &NoteList {
        &self.active
    }

    pub fn archive_notes(&self) -> &NoteList {
        &self.archive
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Selects the note at `index` of the visible list.
    ///
    /// Leaving an Active note deletes it when blank, otherwise saves it when
    /// dirty. A failed save is reported in the outcome but does not block the
    /// switch.
    pub fn select(&mut self, index: usize) -> Result<SelectOutcome, SessionError> {
        let target = self
            .visible_notes()
            .get(index)
            .map(|entry| entry.id.clone())
            .ok_or(SessionError::IndexOutOfRange(index))?;

        if self.selected.as_ref() == Some(&target) {
            return Ok(SelectOutcome {
                leave: LeaveOutcome::Untouched,
                loaded: self.loaded,
            });
        }

        let leave = self.leave_current();
        let loaded = self.load_note(target);
        Ok(SelectOutcome { leave, loaded })
    }

    /// Replaces the editor buffer with `text`.
    ///
    /// # Errors
    /// - `ReadOnlyFolder` while the Archive folder is visible.
    /// - `NoSelection` when no note is open.
    pub fn edit(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        if !self.folder.is_editable() {
            return Err(SessionError::ReadOnlyFolder);
        }
        if self.selected.is_none() {
            return Err(SessionError::NoSelection);
        }

        let text = text.into();
        if text == self.text {
            return Ok(());
        }
        self.text = text;
        self.dirty = true;
        self.ready_to_persist = false;
        Ok(())
    }

    /// Handles one autosave timer tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.folder != Folder::Active {
            return TickOutcome::Inactive;
        }

        let outcome = if self.dirty && self.ready_to_persist {
            match self.persist_current() {
                Ok(()) => {
                    debug!("event=autosave module=session status=ok");
                    TickOutcome::Saved
                }
                Err(err) => {
                    warn!(
                        "event=autosave module=session status=error error_code={} error={}",
                        err.code(),
                        err
                    );
                    TickOutcome::SaveFailed
                }
            }
        } else if self.list_needs_resort {
            self.active.sort_by_recency();
            self.list_needs_resort = false;
            debug!("event=list_resort module=session status=ok folder=active");
            TickOutcome::Resorted
        } else {
            TickOutcome::Idle
        };

        self.ready_to_persist = self.dirty;
        outcome
    }

    /// Creates a new Active note and opens it.
    ///
    /// The previous note is deleted when blank or saved best-effort when
    /// dirty; a failed save is logged and does not prevent creation.
    pub fn new_note(&mut self) -> Result<NewNoteOutcome, SessionError> {
        if !self.folder.is_editable() {
            return Err(SessionError::ReadOnlyFolder);
        }

        let leave = self.leave_current();
        match self.create_and_select() {
            Ok(id) => Ok(NewNoteOutcome { id, leave }),
            Err(err) => {
                error!(
                    "event=note_new module=session status=error error_code={} error={}",
                    err.code(),
                    err
                );
                self.reselect_after_loss();
                Err(err.into())
            }
        }
    }

    /// Moves the open note to the other folder.
    ///
    /// Blank notes are rejected with `EmptyNote`. Unsaved edits are persisted
    /// first; a failed save aborts the move. The next note in the visible
    /// list is opened afterwards. An emptied Active folder gets a fresh note,
    /// an emptied Archive folder clears the editor.
    pub fn move_current(&mut self) -> Result<MoveOutcome, SessionError> {
        let id = self.selected.clone().ok_or(SessionError::NoSelection)?;
        let index = self
            .visible_notes()
            .position(&id)
            .ok_or(SessionError::NoSelection)?;
        if self.text.trim().is_empty() {
            return Err(SessionError::EmptyNote);
        }

        if self.dirty {
            self.persist_current()?;
        }

        let moved_to = match self.store.move_note(&id) {
            Ok(moved_to) => moved_to,
            Err(err) => {
                warn!(
                    "event=note_move module=session status=error error_code={} error={}",
                    err.code(),
                    err
                );
                return Err(err.into());
            }
        };

        let (from, to) = match self.folder {
            Folder::Active => (&mut self.active, &mut self.archive),
            Folder::Archive => (&mut self.archive, &mut self.active),
        };
        if let Some(entry) = from.get(index).cloned() {
            from.move_to(to, entry);
        }
        to.replace_info(self.store.info(&moved_to));

        let remaining = self.visible_notes().len();
        let next = if remaining > 0 {
            let next_index = index.min(remaining - 1);
            let next_id = self
                .visible_notes()
                .get(next_index)
                .map(|entry| entry.id.clone());
            if let Some(next_id) = next_id.clone() {
                self.load_note(next_id);
            }
            next_id
        } else if self.folder == Folder::Active {
            match self.create_and_select() {
                Ok(created) => Some(created),
                Err(err) => {
                    error!(
                        "event=note_new module=session status=error error_code={} error={}",
                        err.code(),
                        err
                    );
                    self.clear_editor();
                    None
                }
            }
        } else {
            self.clear_editor();
            None
        };

        Ok(MoveOutcome { moved_to, next })
    }

    /// Makes `target` the visible folder.
    ///
    /// Leaving Active with unsaved edits persists them first; a failed save
    /// keeps the Active folder visible.
    pub fn switch_folder(&mut self, target: Folder) -> Result<(), SessionError> {
        if target == self.folder {
            return Ok(());
        }
        if self.folder == Folder::Active && self.dirty {
            if let Err(err) = self.persist_current() {
                warn!(
                    "event=folder_switch module=session status=error error_code={} error={}",
                    err.code(),
                    err
                );
                return Err(err.into());
            }
        }

        self.folder = target;
        self.list_needs_resort = false;
        let first = match target {
            Folder::Active => {
                self.active.sort_by_recency();
                self.active.first_id().cloned()
            }
            Folder::Archive => {
                self.archive.sort_by_recency();
                self.archive.first_id().cloned()
            }
        };

        match (first, target) {
            (Some(first), _) => {
                self.load_note(first);
            }
            (None, Folder::Active) => {
                if let Err(err) = self.create_and_select() {
                    error!(
                        "event=note_new module=session status=error error_code={} error={}",
                        err.code(),
                        err
                    );
                    self.clear_editor();
                }
            }
            (None, Folder::Archive) => self.clear_editor(),
        }

        info!(
            "event=folder_switch module=session status=ok folder={}",
            target.label()
        );
        Ok(())
    }

    /// Persists unsaved edits of the open Active note, if any.
    ///
    /// Returns `Ok(true)` when a save happened.
    pub fn flush(&mut self) -> StoreResult<bool> {
        if self.folder != Folder::Active || !self.dirty {
            return Ok(false);
        }
        self.persist_current()?;
        Ok(true)
    }

    fn persist_current(&mut self) -> StoreResult<()> {
        let Some(id) = self.selected.clone() else {
            return Ok(());
        };

        let lines = self
            .text
            .split('\n')
            .map(str::to_string)
            .collect::<Vec<_>>();
        self.store.write(&id, &lines)?;

        self.dirty = false;
        self.ready_to_persist = false;
        self.active.replace_info(self.store.info(&id));
        self.list_needs_resort =
            !self.text.trim().is_empty() && self.active.position(&id) != Some(0);
        Ok(())
    }

    fn leave_current(&mut self) -> LeaveOutcome {
        if self.folder != Folder::Active {
            return LeaveOutcome::Untouched;
        }
        let Some(id) = self.selected.clone() else {
            return LeaveOutcome::Untouched;
        };

        if self.loaded && self.text.trim().is_empty() {
            return match self.store.delete(&id) {
                Ok(()) => {
                    self.active.remove(&id);
                    LeaveOutcome::Deleted
                }
                Err(StoreError::Io { ref source, .. }) if source.kind() == ErrorKind::NotFound => {
                    self.active.remove(&id);
                    LeaveOutcome::Deleted
                }
                Err(err) => {
                    warn!(
                        "event=note_delete module=session status=error error_code={} error={}",
                        err.code(),
                        err
                    );
                    LeaveOutcome::DeleteFailed
                }
            };
        }

        if !self.dirty {
            return LeaveOutcome::Untouched;
        }
        match self.persist_current() {
            Ok(()) => LeaveOutcome::Saved,
            Err(err) => {
                warn!(
                    "event=note_save module=session status=error error_code={} error={}",
                    err.code(),
                    err
                );
                LeaveOutcome::SaveFailed
            }
        }
    }

    fn load_note(&mut self, id: NoteId) -> bool {
        self.dirty = false;
        self.ready_to_persist = false;
        match self.store.read(&id) {
            Ok(lines) => {
                self.text = lines.join("\n");
                self.loaded = true;
            }
            Err(err) => {
                warn!(
                    "event=note_load module=session status=error error_code={} error={}",
                    err.code(),
                    err
                );
                self.text.clear();
                self.loaded = false;
            }
        }
        self.selected = Some(id);
        self.loaded
    }

    fn create_and_select(&mut self) -> StoreResult<NoteId> {
        let id = self.store.create()?;
        self.active.insert_at_front(self.store.info(&id));
        self.selected = Some(id.clone());
        self.text.clear();
        self.loaded = true;
        self.dirty = false;
        self.ready_to_persist = false;
        Ok(id)
    }

    fn clear_editor(&mut self) {
        self.selected = None;
        self.text.clear();
        self.loaded = false;
        self.dirty = false;
        self.ready_to_persist = false;
    }

    /// Restores a valid selection after the open note left the visible list.
    fn reselect_after_loss(&mut self) {
        let still_listed = self
            .selected
            .as_ref()
            .is_some_and(|id| self.visible_notes().position(id).is_some());
        if still_listed {
            return;
        }
        match self.visible_notes().first_id().cloned() {
            Some(first) => {
                self.load_note(first);
            }
            None => self.clear_editor(),
        }
    }
}
