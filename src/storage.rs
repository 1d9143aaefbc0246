use log::{debug, info, trace, warn};

use crate::{
    Clock, JotError, KeyValueStore, Note, NoteIdentity, RestoreResult, Result, SaveOutcome, Tab,
};

/// Key holding the serialized note collection
pub const NOTES_KEY: &str = "notesData";

/// Key holding the content of the most recent save
pub const BACKUP_KEY: &str = "backupNote";

/// Owns the note collection, the current selection and the backup slot.
///
/// Notes are kept in save order and are never removed or reordered; pins and
/// soft deletes change them in place. Every mutation writes the whole
/// collection back to the blob store before returning.
pub struct NoteStore<S, C> {
    /// Blob store the collection is persisted to
    storage: S,

    /// Source of save timestamps
    clock: C,

    /// Notes in save order
    notes: Vec<Note>,

    /// Index of the note being edited; `None` means a new, unsaved note
    selection: Option<usize>,

    /// Content of the most recent save, whichever note it was
    backup_content: String,
}

impl<S: KeyValueStore, C: Clock> NoteStore<S, C> {
    /// Creates an empty store with nothing selected.
    ///
    /// Call [`NoteStore::load`] to pull in what the blob store holds, or use
    /// [`NoteStore::open`] to do both.
    pub fn new(storage: S, clock: C) -> Self {
        Self {
            storage,
            clock,
            notes: Vec::new(),
            selection: None,
            backup_content: String::new(),
        }
    }

    /// Creates a store and loads the persisted notes and backup slot.
    pub fn open(storage: S, clock: C) -> Result<Self> {
        let mut store = Self::new(storage, clock);
        store.load()?;
        Ok(store)
    }

    /// Replaces the in-memory state with what the blob store holds.
    ///
    /// An absent or malformed collection loads as empty; an absent backup
    /// loads as empty text. The selection is reset.
    ///
    /// # Returns
    ///
    /// The number of notes loaded, or an error if the blob store itself
    /// could not be read
    pub fn load(&mut self) -> Result<usize> {
        let raw_notes = self.storage.get(NOTES_KEY)?;
        self.notes = decode_notes(raw_notes.as_deref());
        self.backup_content = self.storage.get(BACKUP_KEY)?.unwrap_or_default();
        self.selection = None;

        info!("Loaded {} notes", self.notes.len());
        Ok(self.notes.len())
    }

    /// Saves the editor contents into the selected note, or as a new note
    /// when nothing is selected.
    ///
    /// Overwriting keeps the note's `pinned` and `deleted` flags. Either way
    /// the backup slot takes `content` and both blobs are persisted. A
    /// selection that no longer points at a note is treated as no selection.
    pub fn save(&mut self, title: &str, content: &str) -> Result<SaveOutcome> {
        let timestamp = self.clock.timestamp();
        let mut note = Note::new(title, content.to_string(), timestamp.clone());

        let (index, created) = match self.selection.filter(|&i| i < self.notes.len()) {
            Some(i) => {
                let existing = &self.notes[i];
                note.pinned = existing.pinned;
                note.deleted = existing.deleted;
                self.notes[i] = note;
                (i, false)
            }
            None => {
                if let Some(stale) = self.selection {
                    warn!("Selection {} is out of range, saving as a new note", stale);
                }
                self.notes.push(note);
                (self.notes.len() - 1, true)
            }
        };
        self.selection = Some(index);
        self.backup_content = content.to_string();

        self.persist_notes()?;
        self.storage.set(BACKUP_KEY, content)?;

        info!(
            "{} note {} at {}",
            if created { "Created" } else { "Updated" },
            index,
            timestamp
        );
        Ok(SaveOutcome {
            index,
            timestamp,
            created,
        })
    }

    /// Sets the pinned flag on the note at `index`.
    pub fn set_pinned(&mut self, index: Option<usize>, value: bool) -> Result<()> {
        let i = self.checked_index(index)?;
        self.notes[i].pinned = value;
        self.persist_notes()?;

        info!("Note {} {}", i, if value { "pinned" } else { "unpinned" });
        Ok(())
    }

    /// Flips the pinned flag on the note at `index` and returns the new value.
    pub fn toggle_pinned(&mut self, index: Option<usize>) -> Result<bool> {
        let i = self.checked_index(index)?;
        let value = !self.notes[i].pinned;
        self.set_pinned(Some(i), value)?;
        Ok(value)
    }

    /// Moves the note at `index` to the trash.
    pub fn soft_delete(&mut self, index: Option<usize>) -> Result<()> {
        let i = self.checked_index(index)?;
        self.notes[i].deleted = true;
        self.persist_notes()?;

        info!("Note {} moved to trash", i);
        Ok(())
    }

    /// Takes the first note carrying `identity` out of the trash.
    ///
    /// A matching note that is not in the trash is left as is and still
    /// reported as restored. No match is an ordinary outcome, not an error.
    pub fn restore(&mut self, identity: &NoteIdentity) -> Result<RestoreResult> {
        let Some(i) = self.find(identity) else {
            debug!(
                "No note matches title {:?} at {:?}",
                identity.title, identity.timestamp
            );
            return Ok(RestoreResult::NotFound);
        };

        if self.notes[i].deleted {
            self.notes[i].deleted = false;
            self.persist_notes()?;
            info!("Note {} restored from trash", i);
        } else {
            debug!("Note {} is not in the trash, nothing to restore", i);
        }
        Ok(RestoreResult::Restored(i))
    }

    /// Drops the selection and removes the backup slot from storage.
    ///
    /// Notes are untouched. The in-memory backup text survives until the
    /// next load, so [`NoteStore::restore_backup`] still offers it.
    pub fn clear(&mut self) -> Result<()> {
        self.selection = None;
        self.storage.remove(BACKUP_KEY)?;
        debug!("Selection cleared and backup slot removed");
        Ok(())
    }

    /// Makes the first note carrying `identity` the current selection.
    ///
    /// Leaves the selection alone when nothing matches.
    pub fn select(&mut self, identity: &NoteIdentity) -> Option<usize> {
        let found = self.find(identity);
        if found.is_some() {
            self.selection = found;
        }
        found
    }

    /// Makes the note at `index` the current selection.
    pub fn select_index(&mut self, index: usize) -> Result<&Note> {
        let i = self.checked_index(Some(index))?;
        self.selection = Some(i);
        Ok(&self.notes[i])
    }

    /// Selects the newest note if nothing is selected yet.
    ///
    /// # Returns
    ///
    /// The selection after the call
    pub fn select_latest(&mut self) -> Option<usize> {
        if self.selection.is_none() && !self.notes.is_empty() {
            self.selection = Some(self.notes.len() - 1);
        }
        self.selection
    }

    /// Notes visible in `tab` whose title or content contains `search`,
    /// ignoring case, in save order.
    ///
    /// The iterator borrows the store and can be cloned to walk the results
    /// again.
    pub fn query<'a>(
        &'a self,
        tab: Tab,
        search: &str,
    ) -> impl Iterator<Item = &'a Note> + Clone + 'a {
        self.query_indexed(tab, search).map(|(_, note)| note)
    }

    /// Like [`NoteStore::query`], paired with each note's index.
    pub fn query_indexed<'a>(
        &'a self,
        tab: Tab,
        search: &str,
    ) -> impl Iterator<Item = (usize, &'a Note)> + Clone + 'a {
        let needle = search.to_lowercase();
        trace!("Querying {:?} for {:?}", tab, needle);
        self.notes
            .iter()
            .enumerate()
            .filter(move |(_, note)| in_tab(note, tab) && note.contains_lowercase(&needle))
    }

    /// The backup text, if there is any to restore into the editor.
    pub fn restore_backup(&self) -> Option<&str> {
        if self.backup_content.is_empty() {
            None
        } else {
            Some(&self.backup_content)
        }
    }

    /// The selected note, if any
    pub fn current(&self) -> Option<&Note> {
        self.selection.and_then(|i| self.notes.get(i))
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn backup_content(&self) -> &str {
        &self.backup_content
    }

    /// Hands back the blob store, e.g. to reload it in a fresh session.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn find(&self, identity: &NoteIdentity) -> Option<usize> {
        self.notes.iter().position(|note| note.matches(identity))
    }

    fn checked_index(&self, index: Option<usize>) -> Result<usize> {
        match index {
            Some(i) if i < self.notes.len() => Ok(i),
            _ => Err(JotError::InvalidSelection { index }),
        }
    }

    fn persist_notes(&mut self) -> Result<()> {
        let json = encode_notes(&self.notes)?;
        self.storage.set(NOTES_KEY, &json)?;
        trace!("Persisted {} notes", self.notes.len());
        Ok(())
    }
}

fn in_tab(note: &Note, tab: Tab) -> bool {
    match tab {
        Tab::All => !note.deleted,
        Tab::Pinned => note.pinned && !note.deleted,
        Tab::Trash => note.deleted,
    }
}

/// Serializes the collection in the persisted `notesData` format.
pub fn encode_notes(notes: &[Note]) -> Result<String> {
    Ok(serde_json::to_string(notes)?)
}

/// Lenient decoding of a persisted collection.
///
/// Missing data yields an empty collection, and so does anything that is not
/// a JSON array of notes; the bad blob is logged and otherwise ignored.
pub fn decode_notes(raw: Option<&str>) -> Vec<Note> {
    let Some(raw) = raw else {
        debug!("No persisted notes, starting empty");
        return Vec::new();
    };

    match serde_json::from_str::<Option<Vec<Note>>>(raw) {
        Ok(notes) => notes.unwrap_or_default(),
        Err(e) => {
            warn!("Discarding malformed notes data: {}", e);
            Vec::new()
        }
    }
}
