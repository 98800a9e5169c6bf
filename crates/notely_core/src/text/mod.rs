//! Pure text transforms behind the editor toolbar and find/replace.
//!
//! # Responsibility
//! - Wrap selections in inline markdown delimiters.
//! - Insert line-prefix and date/time snippets at the cursor.
//! - Case-insensitive find, replace-first and replace-all.
//! - Word/character counts, reading time, and "last edited" labels.
//!
//! # Invariants
//! - Every function is side-effect free and returns new text.
//! - Cursor and selection positions count Unicode scalar values and are
//!   clamped to the text length, so no input can split a character.
//! - An empty search term is a no-op, never "match everything".

pub mod find;
pub mod format;
pub mod stats;

pub use find::{find_all, replace_all, replace_first, MatchSpan};
pub use format::{format_selection, insert_snippet, FormatStyle, SnippetKind, TextEdit};
pub use stats::{char_count, estimate_reading_minutes, relative_time_label, word_count};

/// Converts a character position into a byte offset, clamped to `text.len()`.
pub(crate) fn byte_offset(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map_or(text.len(), |(offset, _)| offset)
}

#[cfg(test)]
mod tests {
    use super::byte_offset;

    #[test]
    fn byte_offset_clamps_and_respects_multibyte_chars() {
        assert_eq!(byte_offset("héllo", 2), 3);
        assert_eq!(byte_offset("abc", 10), 3);
        assert_eq!(byte_offset("", 0), 0);
    }
}
