//! Note-taking library
//!
//! This library keeps an ordered list of notes in a key-value blob store and
//! provides saving, pinning, soft deletion, restore from trash and filtered
//! browsing over them.

mod cli;
mod clock;
mod config;
mod errors;
mod helper;
mod kv;
mod note;
mod storage;
mod types;

// Re-export key components
pub use cli::*;
pub use clock::*;
pub use config::*;
pub use errors::*;
pub use helper::*;
pub use kv::*;
pub use note::*;
pub use storage::*;
pub use types::*;
