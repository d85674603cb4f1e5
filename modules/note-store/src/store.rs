//! In-memory note collection mirrored to a snapshot on every change.
//!
//! Invariants:
//! - Ids are unique within the collection and never change.
//! - New notes go to the front; updates never reorder.
//! - `updated_at` never moves backwards and is never before `created_at`.
//! - Every mutation rewrites the full snapshot; selection changes do not.

use crate::storage::{SnapshotStorage, StorageError};
use chrono::{DateTime, Utc};
use note_assist_types::Note;
use std::collections::HashSet;

/// Partial update applied by [`NoteStore::update`]. `None` fields are left as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NotePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: None,
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            title: None,
            content: Some(content.into()),
        }
    }
}

pub struct NoteStore<S: SnapshotStorage> {
    notes: Vec<Note>,
    selected: Option<String>,
    storage: S,
    last_id_millis: i64,
}

impl<S: SnapshotStorage> NoteStore<S> {
    /// Load the stored snapshot, or start empty if there is none.
    ///
    /// A snapshot that cannot be read is logged and treated as empty; it will
    /// be overwritten by the next mutation.
    pub fn open(storage: S) -> Self {
        let notes = match storage.load() {
            Ok(notes) => dedupe(notes),
            Err(StorageError::Parse(e)) => {
                log::warn!("[NOTE_STORE] Discarding malformed snapshot: {}", e);
                Vec::new()
            }
            Err(e) => {
                log::error!("[NOTE_STORE] Could not load snapshot: {}", e);
                Vec::new()
            }
        };
        log::debug!("[NOTE_STORE] Opened with {} notes", notes.len());

        let last_id_millis = notes
            .iter()
            .filter_map(|n| n.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);

        Self {
            notes,
            selected: None,
            storage,
            last_id_millis,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected note, resolved against the current collection.
    pub fn selected(&self) -> Option<&Note> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Create a blank note at the front of the collection and select it.
    pub fn create(&mut self) -> &Note {
        let now = Utc::now();
        let id = self.next_id(now);
        self.notes.insert(0, Note::new(id.clone(), now));
        self.selected = Some(id);
        self.persist();
        &self.notes[0]
    }

    /// Apply `patch` to the note with `id`. Returns `None` if there is no such note.
    pub fn update(&mut self, id: &str, patch: NotePatch) -> Option<&Note> {
        let idx = self.position(id)?;
        {
            let note = &mut self.notes[idx];
            if let Some(title) = patch.title {
                note.title = title;
            }
            if let Some(content) = patch.content {
                note.content = content;
            }
            note.updated_at = touch(note.updated_at);
        }
        self.persist();
        self.notes.get(idx)
    }

    /// Append `text` to the note's content, separated by a blank line.
    pub fn append_content(&mut self, id: &str, text: &str) -> Option<&Note> {
        let content = format!("{}\n\n{}", self.get(id)?.content, text);
        self.update(id, NotePatch::content(content))
    }

    /// Remove the note with `id`, clearing the selection if it pointed at it.
    pub fn delete(&mut self, id: &str) -> Option<Note> {
        let idx = self.position(id)?;
        let removed = self.notes.remove(idx);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.persist();
        Some(removed)
    }

    /// Make `id` the active note. Returns `false` if there is no such note.
    pub fn select(&mut self, id: &str) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }

    /// Millisecond timestamp id, bumped past the last one handed out so two
    /// notes created in the same millisecond still differ.
    ///
    /// Once the bump reaches `i64::MAX` (a loaded id can push it there) the
    /// search wraps back to `now` and takes the first free value.
    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let now_millis = now.timestamp_millis();
        let start = now_millis.max(self.last_id_millis.saturating_add(1));
        let millis = (start..=i64::MAX)
            .chain(now_millis..start)
            .find(|m| self.position(&m.to_string()).is_none())
            .unwrap_or(start);
        self.last_id_millis = self.last_id_millis.max(millis);
        millis.to_string()
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.notes) {
            log::error!("[NOTE_STORE] Failed to save {} notes: {}", self.notes.len(), e);
        }
    }
}

fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous)
}

fn dedupe(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    let total = notes.len();
    let unique: Vec<Note> = notes
        .into_iter()
        .filter(|n| seen.insert(n.id.clone()))
        .collect();
    if unique.len() != total {
        log::warn!(
            "[NOTE_STORE] Dropped {} notes with duplicate ids",
            total - unique.len()
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySnapshotStorage;
    use note_assist_types::DEFAULT_NOTE_TITLE;

    fn empty_store() -> NoteStore<MemorySnapshotStorage> {
        NoteStore::open(MemorySnapshotStorage::new())
    }

    #[test]
    fn test_create_prepends_and_selects() {
        let mut store = empty_store();
        let first = store.create().id.clone();
        let second = store.create().id.clone();

        assert_ne!(first, second);
        assert_eq!(store.notes()[0].id, second);
        assert_eq!(store.notes()[1].id, first);
        assert_eq!(store.selected_id(), Some(second.as_str()));

        let note = store.selected().unwrap();
        assert_eq!(note.title, DEFAULT_NOTE_TITLE);
        assert!(note.content.is_empty());
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn test_ids_unique_under_burst() {
        let mut store = empty_store();
        for _ in 0..100 {
            store.create();
        }
        let ids: HashSet<_> = store.notes().iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_update_refreshes_timestamp_without_reordering() {
        let mut store = empty_store();
        let older = store.create().id.clone();
        let newer = store.create().id.clone();
        let before = store.get(&older).unwrap().updated_at;

        let updated = store.update(&older, NotePatch::title("Groceries")).unwrap();
        assert_eq!(updated.title, "Groceries");
        assert!(updated.updated_at >= before);
        assert!(updated.updated_at >= updated.created_at);

        assert_eq!(store.notes()[0].id, newer);
        assert_eq!(store.notes()[1].id, older);
    }

    #[test]
    fn test_updated_at_is_monotonic() {
        let mut store = empty_store();
        let id = store.create().id.clone();
        let mut last = store.get(&id).unwrap().updated_at;
        for i in 0..20 {
            let note = store.update(&id, NotePatch::content(format!("v{}", i))).unwrap();
            assert!(note.updated_at >= last);
            assert!(note.updated_at >= note.created_at);
            last = note.updated_at;
        }
    }

    #[test]
    fn test_selection_reflects_updates() {
        let mut store = empty_store();
        let id = store.create().id.clone();
        store.update(&id, NotePatch::content("fresh"));
        assert_eq!(store.selected().unwrap().content, "fresh");
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = empty_store();
        store.create();
        let writes = store.storage().write_count();
        assert!(store.update("missing", NotePatch::title("x")).is_none());
        assert_eq!(store.storage().write_count(), writes);
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut store = empty_store();
        let id = store.create().id.clone();
        assert!(store.delete(&id).is_some());
        assert!(store.selected().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_other_keeps_selection() {
        let mut store = empty_store();
        let other = store.create().id.clone();
        let active = store.create().id.clone();
        store.delete(&other);
        assert_eq!(store.selected_id(), Some(active.as_str()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut store = empty_store();
        store.create();
        store.create();
        let before = store.notes().to_vec();
        let writes = store.storage().write_count();

        assert!(store.delete("nope").is_none());
        assert_eq!(store.notes(), before.as_slice());
        assert_eq!(store.storage().write_count(), writes);
    }

    #[test]
    fn test_select_is_view_state_only() {
        let mut store = empty_store();
        let first = store.create().id.clone();
        store.create();
        let writes = store.storage().write_count();

        assert!(store.select(&first));
        assert_eq!(store.selected_id(), Some(first.as_str()));
        assert!(!store.select("missing"));
        assert_eq!(store.selected_id(), Some(first.as_str()));
        store.clear_selection();
        assert!(store.selected().is_none());
        assert_eq!(store.storage().write_count(), writes);
    }

    #[test]
    fn test_every_mutation_writes_snapshot() {
        let mut store = empty_store();
        let id = store.create().id.clone();
        store.update(&id, NotePatch::title("t"));
        store.append_content(&id, "more");
        store.delete(&id);
        assert_eq!(store.storage().write_count(), 4);
        assert_eq!(store.storage().raw().as_deref(), Some("[]"));
    }

    #[test]
    fn test_append_content_separates_with_blank_line() {
        let mut store = empty_store();
        let id = store.create().id.clone();
        store.update(&id, NotePatch::content("Ideas"));
        let note = store.append_content(&id, "• one").unwrap();
        assert_eq!(note.content, "Ideas\n\n• one");
        assert!(store.append_content("missing", "x").is_none());
    }

    #[test]
    fn test_reopen_reproduces_collection() {
        let storage = MemorySnapshotStorage::new();
        let mut store = NoteStore::open(storage.clone());
        let a = store.create().id.clone();
        store.update(&a, NotePatch::content("alpha"));
        store.create();
        store.update(&a, NotePatch::title("A"));
        let expected = store.notes().to_vec();

        let reopened = NoteStore::open(storage);
        assert_eq!(reopened.notes(), expected.as_slice());
        assert!(reopened.selected().is_none());
    }

    #[test]
    fn test_reopened_store_does_not_reuse_ids() {
        let storage = MemorySnapshotStorage::new();
        let mut store = NoteStore::open(storage.clone());
        let existing = store.create().id.clone();

        let mut reopened = NoteStore::open(storage);
        let fresh = reopened.create().id.clone();
        assert_ne!(existing, fresh);
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn test_malformed_snapshot_starts_empty() {
        let storage = MemorySnapshotStorage::with_raw("{ not json");
        let mut store = NoteStore::open(storage.clone());
        assert!(store.is_empty());

        store.create();
        assert_eq!(NoteStore::open(storage).len(), 1);
    }

    #[test]
    fn test_duplicate_ids_in_snapshot_are_dropped() {
        let now = Utc::now();
        let mut dup = Note::new("1", now);
        dup.title = "second copy".into();
        let raw = serde_json::to_string(&vec![Note::new("1", now), dup, Note::new("2", now)]).unwrap();

        let store = NoteStore::open(MemorySnapshotStorage::with_raw(raw));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("1").unwrap().title, DEFAULT_NOTE_TITLE);
    }

    #[test]
    fn test_create_after_loading_maximal_numeric_id() {
        let now = Utc::now();
        let max_id = i64::MAX.to_string();
        let raw = serde_json::to_string(&vec![Note::new(max_id.clone(), now)]).unwrap();
        let mut store = NoteStore::open(MemorySnapshotStorage::with_raw(raw));

        let first = store.create().id.clone();
        let second = store.create().id.clone();
        assert_ne!(first, max_id);
        assert_ne!(second, max_id);
        assert_ne!(first, second);
        assert!(first.parse::<i64>().unwrap() > 0);
        assert_eq!(store.len(), 3);
    }
}
