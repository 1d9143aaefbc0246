//! The note record and the identity used to look notes up.
use serde::{Deserialize, Serialize};

/// Title given to notes saved with a blank title.
pub const UNTITLED: &str = "Untitled Note";

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Note title
    pub title: String,
    /// Full note body
    pub content: String,
    /// Human-readable time of the last save
    pub timestamp: String,
    /// Whether the note shows up in the pinned view
    #[serde(default)]
    pub pinned: bool,
    /// Soft-delete flag; deleted notes live in the trash
    #[serde(default)]
    pub deleted: bool,
}

impl Note {
    /// Creates a new, unpinned and undeleted note.
    ///
    /// The title is trimmed and replaced with [`UNTITLED`] when blank.
    pub fn new(title: &str, content: String, timestamp: String) -> Self {
        Note {
            title: normalize_title(title),
            content,
            timestamp,
            pinned: false,
            deleted: false,
        }
    }

    /// The (title, timestamp) pair this note is looked up by.
    pub fn identity(&self) -> NoteIdentity {
        NoteIdentity {
            title: self.title.clone(),
            timestamp: self.timestamp.clone(),
        }
    }

    /// Whether this note carries the given identity.
    pub fn matches(&self, identity: &NoteIdentity) -> bool {
        self.title == identity.title && self.timestamp == identity.timestamp
    }

    /// Case-insensitive substring match over title and content.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn contains_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
    }
}

/// Notes have no stable id; a note is identified by its title and the
/// timestamp of its last save. Same-second saves with the same title
/// collide, and lookups then act on the first match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteIdentity {
    pub title: String,
    pub timestamp: String,
}

impl NoteIdentity {
    pub fn new(title: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            timestamp: timestamp.into(),
        }
    }
}

fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}
