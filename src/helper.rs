use log::{trace, warn};
use pulldown_cmark::{html, Options, Parser};

use crate::ExportFormat;

/// Word and character counts shown under the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    pub words: usize,
    pub characters: usize,
}

impl TextStats {
    /// Words are runs of non-whitespace; characters are Unicode scalar values.
    pub fn of(text: &str) -> Self {
        TextStats {
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
        }
    }
}

/// File name a note is exported under: its trimmed title, or `note` when
/// the title is blank, with the format's extension.
pub fn export_file_name(title: &str, format: ExportFormat) -> String {
    let trimmed = title.trim();
    let stem = if trimmed.is_empty() { "note" } else { trimmed };
    let stem: String = stem
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}.{}", stem, format.extension())
}

/// Renders note content for export.
pub fn render_export(content: &str, format: ExportFormat) -> String {
    match format {
        ExportFormat::Text => content.to_string(),
        ExportFormat::Html => {
            trace!("Rendering {} bytes of Markdown", content.len());
            let options =
                Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
            let parser = Parser::new_ext(content, options);
            let mut output = String::with_capacity(content.len() * 3 / 2);
            html::push_html(&mut output, parser);
            output
        }
    }
}

/// Header written above the note content when it is opened in an editor.
pub const EDITOR_TEMPLATE: &str = "<!--\n\
Write your note below. This comment block is dropped when you save.\n\
Save and exit the editor when you're done.\n\
-->\n\
\n";

/// Removes the leading template block from an edited buffer.
///
/// The block runs from an opening `<!--` line to the first `-->` line, plus
/// one blank line after it. Everything else is returned byte for byte. A
/// buffer that does not open with the block, or never closes it, comes back
/// unchanged.
pub fn strip_editor_template(buffer: &str) -> String {
    let mut lines = buffer.split_inclusive('\n');
    let Some(first) = lines.next().filter(|line| line.trim() == "<!--") else {
        return buffer.to_string();
    };

    let mut offset = first.len();
    for line in lines {
        offset += line.len();
        if line.trim() == "-->" {
            let rest = &buffer[offset..];
            let rest = rest
                .strip_prefix("\r\n")
                .or_else(|| rest.strip_prefix('\n'))
                .unwrap_or(rest);
            return rest.to_string();
        }
    }

    warn!("Editor template was never closed, keeping the whole buffer");
    buffer.to_string()
}
