//! Ordered in-memory note list for one folder.
//!
//! # Responsibility
//! - Hold the visible metadata entries of one folder.
//! - Re-derive recency order on demand.
//!
//! # Invariants
//! - Ordering is derived, not authoritative; it may be stale between a save
//!   and the next `sort_by_recency`.
//! - `sort_by_recency` is stable: entries with equal `updated_at` keep their
//!   relative order, so repeated sorts of unchanged data are idempotent.

use crate::model::note::{Folder, NoteId, NoteInfo};
use crate::store::{NoteStore, StoreResult};

/// Ordered collection of note metadata for a single folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteList {
    folder: Folder,
    entries: Vec<NoteInfo>,
}

impl NoteList {
    pub fn new(folder: Folder) -> Self {
        Self {
            folder,
            entries: Vec::new(),
        }
    }

    /// Populates a list from the store. Entry order follows the store listing.
    pub fn load<S: NoteStore + ?Sized>(store: &S, folder: Folder) -> StoreResult<Self> {
        let entries = store.list(folder)?;
        Ok(Self { folder, entries })
    }

    pub fn folder(&self) -> Folder {
        self.folder
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NoteInfo> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteInfo> {
        self.entries.iter()
    }

    /// Index of the entry with `id`, if present.
    pub fn position(&self, id: &NoteId) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.id == id)
    }

    pub fn first_id(&self) -> Option<&NoteId> {
        self.entries.first().map(|entry| &entry.id)
    }

    /// Sorts newest first. Stable for equal timestamps.
    pub fn sort_by_recency(&mut self) {
        self.entries
            .sort_by(|left, right| right.updated_at.cmp(&left.updated_at));
    }

    /// Inserts a freshly created note; new notes are most recent by construction.
    pub fn insert_at_front(&mut self, entry: NoteInfo) {
        self.entries.insert(0, entry);
    }

    pub fn push_back(&mut self, entry: NoteInfo) {
        self.entries.push(entry);
    }

    /// Removes and returns the entry at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<NoteInfo> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Removes the entry with `id`, returning whether it was present.
    pub fn remove(&mut self, id: &NoteId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Moves `entry` into `other`, appending it at the end.
    ///
    /// The entry is removed from this list when present; its id is rewritten to
    /// the destination folder. A same-named entry already in `other` is
    /// replaced, matching the overwrite in the store.
    pub fn move_to(&mut self, other: &mut NoteList, mut entry: NoteInfo) {
        self.remove(&entry.id);
        if entry.id.folder != other.folder {
            entry.id = NoteId::new(other.folder, entry.id.file_name);
        }
        other.remove(&entry.id);
        other.push_back(entry);
    }

    /// Replaces metadata of the entry with the same id. Returns `false` when absent.
    pub fn replace_info(&mut self, info: NoteInfo) -> bool {
        match self.position(&info.id) {
            Some(index) => {
                self.entries[index] = info;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NoteList;
    use crate::model::note::{Folder, NoteId, NoteInfo};

    fn entry(name: &str, updated_at: i64) -> NoteInfo {
        NoteInfo {
            id: NoteId::new(Folder::Active, name),
            preview: name.to_string(),
            last_modified: String::new(),
            updated_at,
        }
    }

    fn names(list: &NoteList) -> Vec<String> {
        list.iter().map(|e| e.id.file_name.clone()).collect()
    }

    #[test]
    fn sort_orders_newest_first() {
        let mut list = NoteList::new(Folder::Active);
        list.push_back(entry("old", 1));
        list.push_back(entry("new", 3));
        list.push_back(entry("mid", 2));
        list.sort_by_recency();
        assert_eq!(names(&list), vec!["new", "mid", "old"]);
    }

    #[test]
    fn sort_keeps_insertion_order_for_ties() {
        let mut list = NoteList::new(Folder::Active);
        list.push_back(entry("a", 5));
        list.push_back(entry("b", 5));
        list.push_back(entry("c", 9));
        list.push_back(entry("d", 5));
        for _ in 0..3 {
            list.sort_by_recency();
            assert_eq!(names(&list), vec!["c", "a", "b", "d"]);
        }
    }

    #[test]
    fn move_to_rewrites_folder() {
        let mut active = NoteList::new(Folder::Active);
        let mut archive = NoteList::new(Folder::Archive);
        active.push_back(entry("x", 1));
        let moving = active.get(0).cloned().unwrap();
        active.move_to(&mut archive, moving);
        assert!(active.is_empty());
        assert_eq!(archive.get(0).unwrap().id.folder, Folder::Archive);
    }

    #[test]
    fn move_to_replaces_same_named_destination_entry() {
        let mut active = NoteList::new(Folder::Active);
        let mut archive = NoteList::new(Folder::Archive);
        active.push_back(entry("x", 9));
        archive.push_back(NoteInfo {
            id: NoteId::new(Folder::Archive, "x"),
            preview: "stale".to_string(),
            last_modified: String::new(),
            updated_at: 1,
        });
        archive.push_back(NoteInfo::blank(NoteId::new(Folder::Archive, "y")));

        let moving = active.get(0).cloned().unwrap();
        active.move_to(&mut archive, moving);
        assert_eq!(names(&archive), vec!["y", "x"]);
        assert_eq!(archive.get(1).unwrap().preview, "x");
    }

    #[test]
    fn remove_at_out_of_range_is_none() {
        let mut list = NoteList::new(Folder::Active);
        assert!(list.remove_at(0).is_none());
    }
}
