//! Filesystem-backed note store.
//!
//! # Responsibility
//! - Provision the Active root directory and its Archive subdirectory.
//! - Map note ids to plain-text files and derive list metadata live from
//!   file content and modification time.
//!
//! # Invariants
//! - Every public operation runs inside the store's single lock scope.
//! - Note files are UTF-8 text, one editor line per file line.
//! - No sidecar metadata is written.

use super::{NoteStore, StoreError, StoreResult};
use crate::config::MemoConfig;
use crate::model::note::{Folder, NoteId, NoteInfo};
use chrono::{DateTime, Local, Utc};
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

const TIMESTAMP_PATTERN: &str = "%Y-%m-%d %H:%M:%S";
const NOTE_FILE_EXTENSION: &str = "txt";
const MAX_CREATE_ATTEMPTS: u32 = 1000;
const TRUNCATION_MARKER: &str = "...";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Note store over a `<root>` / `<root>/archive` directory pair.
pub struct FsNoteStore {
    active_dir: Option<PathBuf>,
    archive_dir: Option<PathBuf>,
    preview_line_limit: usize,
    lock: Mutex<()>,
}

impl FsNoteStore {
    /// Provisions the backing directories described by `config`.
    ///
    /// Never fails: a directory that cannot be provisioned leaves the store
    /// unavailable, which callers check through `is_available`.
    pub fn open(config: &MemoConfig) -> Self {
        let active_dir = provision_dir(config.root_dir(), Folder::Active);
        let archive_dir = match active_dir {
            Some(_) => provision_dir(&config.archive_dir(), Folder::Archive),
            None => None,
        };

        Self {
            active_dir,
            archive_dir,
            preview_line_limit: config.preview_line_limit,
            lock: Mutex::new(()),
        }
    }

    /// Absolute path of the note file, when its folder is available.
    pub fn path_of(&self, id: &NoteId) -> StoreResult<PathBuf> {
        Ok(self.dir(id.folder)?.join(&id.file_name))
    }

    fn dir(&self, folder: Folder) -> StoreResult<&Path> {
        let dir = match folder {
            Folder::Active => self.active_dir.as_deref(),
            Folder::Archive => self.archive_dir.as_deref(),
        };
        dir.ok_or(StoreError::Unavailable(folder))
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn preview_unlocked(&self, id: &NoteId) -> String {
        let Ok(path) = self.path_of(id) else {
            return String::new();
        };
        match fs::read_to_string(&path) {
            Ok(content) => derive_preview(&content, self.preview_line_limit),
            Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
            Err(err) => {
                warn!(
                    "event=note_preview module=store status=error note={} error={}",
                    id, err
                );
                String::new()
            }
        }
    }

    fn modified_unlocked(&self, id: &NoteId) -> Option<SystemTime> {
        let path = self.path_of(id).ok()?;
        match fs::metadata(&path).and_then(|meta| meta.modified()) {
            Ok(modified) => Some(modified),
            Err(err) => {
                debug!(
                    "event=note_mtime module=store status=error note={} error={}",
                    id, err
                );
                None
            }
        }
    }

    fn info_unlocked(&self, id: &NoteId) -> NoteInfo {
        let modified = self.modified_unlocked(id);
        NoteInfo {
            id: id.clone(),
            preview: self.preview_unlocked(id),
            last_modified: modified.map(format_timestamp).unwrap_or_default(),
            updated_at: modified.map(epoch_millis).unwrap_or(0),
        }
    }
}

impl NoteStore for FsNoteStore {
    fn is_available(&self) -> bool {
        self.active_dir.is_some() && self.archive_dir.is_some()
    }

    fn list(&self, folder: Folder) -> StoreResult<Vec<NoteInfo>> {
        let _guard = self.guard();
        let dir = self.dir(folder)?;
        let entries = fs::read_dir(dir).map_err(|err| StoreError::io("list", dir, err))?;

        let mut notes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| StoreError::io("list", dir, err))?;
            let is_file = entry
                .file_type()
                .map(|kind| kind.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                warn!(
                    "event=note_list module=store status=skip folder={} reason=non_utf8_name",
                    folder.label()
                );
                continue;
            };
            notes.push(self.info_unlocked(&NoteId::new(folder, file_name)));
        }

        debug!(
            "event=note_list module=store status=ok folder={} count={}",
            folder.label(),
            notes.len()
        );
        Ok(notes)
    }

    fn create(&self) -> StoreResult<NoteId> {
        let _guard = self.guard();
        let dir = self.dir(Folder::Active)?;

        let mut stamp = Utc::now().timestamp_millis();
        let mut attempts = 0;
        loop {
            let file_name = format!("{stamp}.{NOTE_FILE_EXTENSION}");
            let path = dir.join(&file_name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => {
                    info!(
                        "event=note_create module=store status=ok note={}",
                        file_name
                    );
                    return Ok(NoteId::new(Folder::Active, file_name));
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    attempts += 1;
                    if attempts >= MAX_CREATE_ATTEMPTS {
                        return Err(StoreError::io("create", path, err));
                    }
                    stamp += 1;
                }
                Err(err) => {
                    error!(
                        "event=note_create module=store status=error error={}",
                        err
                    );
                    return Err(StoreError::io("create", path, err));
                }
            }
        }
    }

    fn read(&self, id: &NoteId) -> StoreResult<Vec<String>> {
        let _guard = self.guard();
        let path = self.path_of(id)?;
        let content = fs::read_to_string(&path).map_err(|err| StoreError::io("read", &path, err))?;
        Ok(content.lines().map(str::to_string).collect())
    }

    fn write(&self, id: &NoteId, lines: &[String]) -> StoreResult<()> {
        let _guard = self.guard();
        let path = self.path_of(id)?;
        let mut content = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(&path, content).map_err(|err| {
            error!(
                "event=note_write module=store status=error note={} error={}",
                id, err
            );
            StoreError::io("write", &path, err)
        })
    }

    fn delete(&self, id: &NoteId) -> StoreResult<()> {
        let _guard = self.guard();
        let path = self.path_of(id)?;
        fs::remove_file(&path).map_err(|err| StoreError::io("delete", &path, err))?;
        info!("event=note_delete module=store status=ok note={}", id);
        Ok(())
    }

    fn move_note(&self, id: &NoteId) -> StoreResult<NoteId> {
        let _guard = self.guard();
        let source = self.path_of(id)?;
        let target_id = id.moved();
        let target = self.path_of(&target_id)?;
        fs::rename(&source, &target).map_err(|err| StoreError::io("move", &source, err))?;
        info!(
            "event=note_move module=store status=ok from={} to={}",
            id, target_id
        );
        Ok(target_id)
    }

    fn preview(&self, id: &NoteId) -> String {
        let _guard = self.guard();
        self.preview_unlocked(id)
    }

    fn last_modified(&self, id: &NoteId) -> String {
        let _guard = self.guard();
        self.modified_unlocked(id)
            .map(format_timestamp)
            .unwrap_or_default()
    }

    fn info(&self, id: &NoteId) -> NoteInfo {
        let _guard = self.guard();
        self.info_unlocked(id)
    }
}

/// Derives list preview text from raw note content.
///
/// Joins the first `line_limit` lines with single spaces, appends `...` when
/// lines were cut, collapses whitespace runs, and trims.
pub fn derive_preview(content: &str, line_limit: usize) -> String {
    let mut lines = content.lines();
    let mut parts: Vec<&str> = lines.by_ref().take(line_limit).collect();
    if lines.next().is_some() {
        parts.push(TRUNCATION_MARKER);
    }
    let joined = parts.join(" ");
    WHITESPACE_RE.replace_all(&joined, " ").trim().to_string()
}

fn provision_dir(path: &Path, folder: Folder) -> Option<PathBuf> {
    if path.is_dir() {
        return Some(path.to_path_buf());
    }
    match fs::create_dir_all(path) {
        Ok(()) => {
            info!(
                "event=store_provision module=store status=ok folder={} created=true path={}",
                folder.label(),
                path.display()
            );
            Some(path.to_path_buf())
        }
        Err(err) => {
            error!(
                "event=store_provision module=store status=error folder={} path={} error={}",
                folder.label(),
                path.display(),
                err
            );
            None
        }
    }
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format(TIMESTAMP_PATTERN)
        .to_string()
}

fn epoch_millis(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::{derive_preview, format_timestamp};
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn preview_joins_lines_with_single_spaces() {
        assert_eq!(derive_preview("first\n  second\t\tline\n", 128), "first second line");
    }

    #[test]
    fn preview_marks_truncated_content() {
        assert_eq!(derive_preview("a\nb\nc", 2), "a b ...");
    }

    #[test]
    fn preview_of_blank_content_is_empty() {
        assert_eq!(derive_preview("", 128), "");
        assert_eq!(derive_preview("\n \n\t", 128), "");
    }

    #[test]
    fn timestamp_format_is_second_resolution() {
        let formatted = format_timestamp(UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        assert_eq!(formatted.len(), "yyyy-MM-dd HH:mm:ss".len());
        assert_eq!(&formatted[4..5], "-");
        assert_eq!(&formatted[13..14], ":");
    }
}
