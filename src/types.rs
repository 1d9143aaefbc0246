//! Core data structures for the jotter application.
//!
//! This module contains the small value types passed between the note store
//! and its callers, plus the CLI subcommands.
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::JotError;

/// A specialized Result type for jotter operations.
pub type Result<T> = std::result::Result<T, JotError>;

/// Browsing views over the note collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Tab {
    /// Notes that are not in the trash
    #[default]
    All,
    /// Pinned notes that are not in the trash
    Pinned,
    /// Soft-deleted notes
    Trash,
}

/// What a save did, for the "last saved" display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Index of the saved note, now the current selection
    pub index: usize,
    /// Timestamp written into the note
    pub timestamp: String,
    /// Whether the save appended a new note
    pub created: bool,
}

/// Outcome of restoring a note from the trash by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreResult {
    /// The note at this index is out of the trash
    Restored(usize),
    /// No note carries the identity
    NotFound,
}

/// Output format for exported notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    /// Raw note content
    #[default]
    Text,
    /// Content rendered from Markdown to HTML
    Html,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Html => "html",
        }
    }
}

/// Available subcommands for the jotter application
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save a note, either new or over an existing index
    Save {
        /// Index of the note to overwrite (omit to create a new note)
        #[clap(short, long)]
        index: Option<usize>,

        /// Title of the note; keeps the existing title when saving over an
        /// index, and a blank title becomes "Untitled Note"
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// Content of the note
        #[clap(short, long, conflicts_with_all = ["file", "edit"])]
        content: Option<String>,

        /// Path to a file containing the note's content
        #[clap(short, long, conflicts_with = "edit")]
        file: Option<PathBuf>,

        /// Write the content in an editor (required when no content or
        /// file is given)
        #[clap(short, long)]
        edit: bool,
    },

    /// Show a note by index
    Show {
        /// Index of the note as printed by `list`
        index: usize,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Show the most recently created note
    Latest,

    /// List notes in a view, optionally filtered by a search term
    List {
        /// Which view to list
        #[clap(short, long, value_enum, default_value_t = Tab::All)]
        tab: Tab,

        /// Case-insensitive text to look for in titles and content
        #[clap(short, long, default_value = "")]
        search: String,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Pin, unpin or toggle the pin on a note
    Pin {
        /// Index of the note
        index: usize,

        /// Unpin instead of pin
        #[clap(long, conflicts_with = "toggle")]
        off: bool,

        /// Flip the current pin state
        #[clap(long)]
        toggle: bool,
    },

    /// Move a note to the trash
    Delete {
        /// Index of the note
        index: usize,
    },

    /// Bring a note back from the trash
    Restore {
        /// Title of the trashed note
        #[clap(short = 'T', long)]
        title: String,

        /// Timestamp of the trashed note
        #[clap(short = 's', long)]
        timestamp: String,
    },

    /// Drop the current selection and the backup slot
    Clear,

    /// Print the content of the last save
    Backup,

    /// Export a note to a file
    Export {
        /// Index of the note
        index: usize,

        /// Directory to write into (defaults to the configured export dir)
        #[clap(short, long)]
        output: Option<PathBuf>,

        /// Format to export to
        #[clap(short, long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,
    },

    /// Word and character counts for a note or a piece of text
    Stats {
        /// Index of the note
        #[clap(short, long, conflicts_with = "text")]
        index: Option<usize>,

        /// Text to count
        #[clap(short, long)]
        text: Option<String>,
    },
}
