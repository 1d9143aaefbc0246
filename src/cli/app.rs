//! CLI module for the jotter application
//!
//! This module handles the command-line interface for interacting with the
//! note store. One invocation is one editing session.
use std::{
    fs::{self, read_to_string, OpenOptions},
    io::{self, stdin, Write},
    path::{Path, PathBuf},
    process::Command,
};

use log::{debug, info};
use shell_words::split;
use tempfile::Builder;

use crate::{
    export_file_name, render_export, strip_editor_template, Clock, Commands, Config,
    ExportFormat, JotError, KeyValueStore, Note, NoteIdentity, NoteStore, RestoreResult, Result,
    Tab, TextStats, EDITOR_TEMPLATE,
};

/// CLI Application handler - processes CLI commands and interfaces with NoteStore
pub struct App<S, C> {
    /// The note store backend
    store: NoteStore<S, C>,

    /// Application configuration
    config: Config,

    /// Whether to display verbose output
    verbose: bool,
}

impl<S: KeyValueStore, C: Clock> App<S, C> {
    /// Create a new CLI application with the given store and config
    pub fn new(store: NoteStore<S, C>, config: Config, verbose: bool) -> Self {
        Self {
            store,
            config,
            verbose,
        }
    }

    /// The store behind this session
    pub fn store(&self) -> &NoteStore<S, C> {
        &self.store
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Save {
                index,
                title,
                content,
                file,
                edit,
            } => self.handle_save(index, title, content, file, edit)?,

            Commands::Show { index, json } => self.handle_show(index, json)?,

            Commands::Latest => self.handle_latest()?,

            Commands::List { tab, search, json } => self.handle_list(tab, &search, json)?,

            Commands::Pin { index, off, toggle } => self.handle_pin(index, off, toggle)?,

            Commands::Delete { index } => {
                self.store.soft_delete(Some(index))?;
                println!("Note moved to trash!");
            }

            Commands::Restore { title, timestamp } => {
                let identity = NoteIdentity::new(title, timestamp);
                match self.store.restore(&identity)? {
                    RestoreResult::Restored(i) => println!("Note {} restored!", i),
                    RestoreResult::NotFound => println!(
                        "No note titled {:?} saved at {:?} was found.",
                        identity.title, identity.timestamp
                    ),
                }
            }

            Commands::Clear => {
                self.store.clear()?;
                println!("Last saved: --");
            }

            Commands::Backup => match self.store.restore_backup() {
                Some(content) => {
                    println!("{}", content);
                    self.print_stats(content);
                }
                None => println!("No backup found."),
            },

            Commands::Export {
                index,
                output,
                format,
            } => {
                let path = self.handle_export(index, output, format)?;
                println!("Exported to {}", path.display());
            }

            Commands::Stats { index, text } => {
                let text = match (index, text) {
                    (Some(i), _) => self.store.select_index(i)?.content.clone(),
                    (None, Some(t)) => t,
                    (None, None) => io::read_to_string(stdin())?,
                };
                self.print_stats(&text);
            }
        }

        Ok(())
    }

    fn handle_save(
        &mut self,
        index: Option<usize>,
        title: Option<String>,
        content: Option<String>,
        file: Option<PathBuf>,
        edit: bool,
    ) -> Result<()> {
        if let Some(i) = index {
            self.store.select_index(i)?;
        }

        let note_content = match (content, file) {
            (Some(c), _) => c,
            (_, Some(file_path)) => {
                if !file_path.exists() {
                    return Err(JotError::FileNotFound {
                        file_path: file_path.display().to_string(),
                    });
                }
                read_to_string(file_path)?
            }
            (None, None) => {
                if !edit {
                    return Err(JotError::MissingContent);
                }
                let existing = self
                    .store
                    .current()
                    .map(|note| note.content.clone())
                    .unwrap_or_default();
                self.open_editor_for_content(&existing)?
            }
        };

        // An existing note keeps its title unless a new one is given
        let title = match title {
            Some(t) => t,
            None => self
                .store
                .current()
                .map(|note| note.title.clone())
                .unwrap_or_default(),
        };
        debug!("Saving {:?} ({} bytes)", title, note_content.len());

        let outcome = self.store.save(&title, &note_content)?;
        if outcome.created {
            println!("Note saved as #{}", outcome.index);
        } else {
            println!("Note #{} updated", outcome.index);
        }
        println!("Last saved: {}", outcome.timestamp);
        self.print_stats(&note_content);
        Ok(())
    }

    fn handle_show(&mut self, index: usize, json: bool) -> Result<()> {
        let note = self.store.select_index(index)?.clone();
        if json {
            println!("{}", serde_json::to_string_pretty(&note)?);
        } else {
            self.display_note(index, &note);
        }
        Ok(())
    }

    fn handle_latest(&mut self) -> Result<()> {
        match self.store.select_latest() {
            Some(i) => {
                let note = self.store.notes()[i].clone();
                self.display_note(i, &note);
            }
            None => println!("No notes yet."),
        }
        Ok(())
    }

    fn handle_pin(&mut self, index: usize, off: bool, toggle: bool) -> Result<()> {
        let pinned = if toggle {
            self.store.toggle_pinned(Some(index))?
        } else {
            self.store.set_pinned(Some(index), !off)?;
            !off
        };
        println!("{}", if pinned { "Note pinned!" } else { "Note unpinned!" });
        Ok(())
    }

    fn handle_export(
        &mut self,
        index: usize,
        output: Option<PathBuf>,
        format: ExportFormat,
    ) -> Result<PathBuf> {
        let note = self.store.select_index(index)?;
        let dir = output.unwrap_or_else(|| self.config.export_dir.clone());
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let path = dir.join(export_file_name(&note.title, format));
        fs::write(&path, render_export(&note.content, format))?;

        info!("Exported note {} to {}", index, path.display());
        Ok(path)
    }

    /// List notes in a view according to the search term
    fn handle_list(&self, tab: Tab, search: &str, json: bool) -> Result<()> {
        let notes: Vec<(usize, &Note)> = self.store.query_indexed(tab, search).collect();

        if json {
            let entries: Vec<serde_json::Value> = notes
                .iter()
                .map(|(index, note)| {
                    serde_json::json!({
                        "index": index,
                        "title": note.title,
                        "timestamp": note.timestamp,
                        "pinned": note.pinned,
                        "deleted": note.deleted,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        if notes.is_empty() {
            println!("No notes found matching the criteria.");
            return Ok(());
        }

        for (index, note) in &notes {
            let marker = if note.pinned { "*" } else { " " };
            println!(
                "{:>3} {} {}  {}",
                index,
                marker,
                console::style(&note.title).bold(),
                console::style(&note.timestamp).dim()
            );
            if self.verbose {
                let preview = get_content_preview(&note.content, 60);
                if !preview.is_empty() {
                    println!("        {}", preview);
                }
            }
        }

        println!(
            "\nFound {} note{}",
            notes.len(),
            if notes.len() == 1 { "" } else { "s" }
        );
        Ok(())
    }

    fn display_note(&self, index: usize, note: &Note) {
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        println!("#{} {}", index, console::style(&note.title).bold());
        let mut flags = Vec::new();
        if note.pinned {
            flags.push("pinned");
        }
        if note.deleted {
            flags.push("in trash");
        }
        if flags.is_empty() {
            println!("Last saved: {}", note.timestamp);
        } else {
            println!(
                "Last saved: {} ({})",
                note.timestamp,
                console::style(flags.join(", ")).cyan()
            );
        }
        println!("{}", "-".repeat(term_width.min(50)));
        println!("{}", note.content);
        println!("{}", "-".repeat(term_width.min(50)));
        self.print_stats(&note.content);
    }

    fn print_stats(&self, text: &str) {
        let stats = TextStats::of(text);
        println!("Words: {}  Characters: {}", stats.words, stats.characters);
    }

    fn open_editor_for_content(&self, existing: &str) -> Result<String> {
        let temp_file = Builder::new().suffix(".md").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        let editor_cmd = self.config.get_editor_command();

        self.write_editor_template(&temp_path, existing)?;

        info!("Opening editor to write note content. Save and exit when done...");
        self.launch_editor(&editor_cmd, &temp_path)?;

        let content = read_to_string(&temp_path)?;
        Ok(strip_editor_template(&content))
    }

    fn write_editor_template(&self, path: &Path, existing: &str) -> Result<()> {
        let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
        file.write_all(EDITOR_TEMPLATE.as_bytes())?;
        file.write_all(existing.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        let path_str = file_path.to_string_lossy();

        let args = split(editor_cmd).map_err(|e| JotError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        let Some((program, rest)) = args.split_first() else {
            return Err(JotError::EditorError {
                message: "Empty editor command".to_string(),
            });
        };

        let status = Command::new(program)
            .args(rest)
            .arg(path_str.as_ref())
            .status()?;

        if !status.success() {
            return Err(JotError::EditorError {
                message: "Editor exited with non-zero status".to_string(),
            });
        }

        Ok(())
    }
}

/// First non-empty line of `content`, cut to `max_len` characters
fn get_content_preview(content: &str, max_len: usize) -> String {
    let first_line = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("")
        .trim();

    if first_line.chars().count() <= max_len {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_len).collect();
        format!("{}...", cut)
    }
}
