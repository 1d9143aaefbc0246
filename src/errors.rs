//! Error types for the jotter application.
//!
//! This module defines custom error types that categorize different failures
//! that can occur during note management operations.

use std::io;

use thiserror::Error;

/// The main error type for the jotter application.
#[derive(Error, Debug)]
pub enum JotError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The operation needs a selected note, but none is selected or the
    /// index no longer points at a note.
    #[error("Invalid selection: {}", describe_selection(.index))]
    InvalidSelection { index: Option<usize> },

    /// A save was asked for without content, a file or the editor.
    #[error("No content given: pass --content, --file or --edit")]
    MissingContent,

    /// A strftime pattern the clock cannot render.
    #[error("Invalid timestamp format: {format:?}")]
    InvalidTimestampFormat { format: String },

    /// A key rejected by the blob store.
    #[error("Invalid storage key: {key:?}")]
    InvalidKey { key: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// file not found
    #[error("File not found: {file_path}")]
    FileNotFound { file_path: String },

    #[error("{message}")]
    EditorError { message: String },
}

fn describe_selection(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!("no note at index {}", i),
        None => "no note selected".to_string(),
    }
}
