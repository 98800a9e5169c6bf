//! Selection formatting and snippet insertion.

use super::byte_offset;
use chrono::{Local, NaiveDateTime};

const DATE_FORMAT: &str = "%-m/%-d/%Y";
const TIME_FORMAT: &str = "%I:%M %p";

/// Result of an editing transform: new text plus new cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub text: String,
    /// Character position.
    pub cursor: usize,
}

/// Inline style applied by the formatting toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatStyle {
    Bold,
    Italic,
    Strikethrough,
}

impl FormatStyle {
    /// Delimiter written on both sides of the selection.
    pub fn delimiter(self) -> &'static str {
        match self {
            Self::Bold => "**",
            Self::Italic => "*",
            Self::Strikethrough => "~~",
        }
    }

    /// Parses a toolbar action name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bold" => Some(Self::Bold),
            "italic" => Some(Self::Italic),
            "strikethrough" | "strike" => Some(Self::Strikethrough),
            _ => None,
        }
    }
}

/// Snippet inserted by the formatting toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetKind {
    Heading1,
    Heading2,
    Bullet,
    Numbered,
    Checkbox,
    CodeBlock,
    Divider,
    Date,
    Time,
}

impl SnippetKind {
    /// Parses a toolbar action name (`h1`, `bullet`, `code`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "h1" | "heading1" => Some(Self::Heading1),
            "h2" | "heading2" => Some(Self::Heading2),
            "bullet" => Some(Self::Bullet),
            "numbered" => Some(Self::Numbered),
            "checkbox" => Some(Self::Checkbox),
            "code" | "codeblock" => Some(Self::CodeBlock),
            "divider" => Some(Self::Divider),
            "date" => Some(Self::Date),
            "time" => Some(Self::Time),
            _ => None,
        }
    }

    /// Whether the snippet must start on its own line.
    pub fn is_line_prefix(self) -> bool {
        !matches!(self, Self::Date | Self::Time)
    }
}

/// Wraps `[start, end)` in the style's delimiters.
///
/// With an empty selection an empty delimiter pair is inserted and the
/// cursor is placed between the delimiters. Otherwise the cursor lands right
/// after the closing delimiter. Reversed selections are normalized.
pub fn format_selection(text: &str, start: usize, end: usize, style: FormatStyle) -> TextEdit {
    let len = text.chars().count();
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let start = start.min(len);
    let end = end.min(len);

    let delimiter = style.delimiter();
    let delimiter_len = delimiter.chars().count();
    let start_byte = byte_offset(text, start);
    let end_byte = byte_offset(text, end);
    let selected = &text[start_byte..end_byte];

    let cursor = if selected.is_empty() {
        start + delimiter_len
    } else {
        end + 2 * delimiter_len
    };

    let mut result = String::with_capacity(text.len() + 2 * delimiter.len());
    result.push_str(&text[..start_byte]);
    result.push_str(delimiter);
    result.push_str(selected);
    result.push_str(delimiter);
    result.push_str(&text[end_byte..]);

    TextEdit {
        text: result,
        cursor,
    }
}

/// Inserts a snippet at `cursor` using the local clock for date/time.
pub fn insert_snippet(text: &str, cursor: usize, kind: SnippetKind) -> TextEdit {
    insert_snippet_at(text, cursor, kind, Local::now().naive_local())
}

/// Inserts a snippet at `cursor`, rendering date/time snippets from `now`.
///
/// Line-prefix snippets get a leading newline when the preceding character
/// exists and is not a newline. Code blocks leave the cursor on the empty
/// line inside the fence.
pub fn insert_snippet_at(
    text: &str,
    cursor: usize,
    kind: SnippetKind,
    now: NaiveDateTime,
) -> TextEdit {
    let cursor = cursor.min(text.chars().count());
    let insert_at = byte_offset(text, cursor);
    let needs_newline =
        kind.is_line_prefix() && text[..insert_at].chars().next_back().is_some_and(|c| c != '\n');
    let prefix = if needs_newline { "\n" } else { "" };

    let body = match kind {
        SnippetKind::Heading1 => "# ".to_string(),
        SnippetKind::Heading2 => "## ".to_string(),
        SnippetKind::Bullet => "- ".to_string(),
        SnippetKind::Numbered => "1. ".to_string(),
        SnippetKind::Checkbox => "- [ ] ".to_string(),
        SnippetKind::CodeBlock => "```\n\n```\n".to_string(),
        SnippetKind::Divider => "---\n".to_string(),
        SnippetKind::Date => now.format(DATE_FORMAT).to_string(),
        SnippetKind::Time => now.format(TIME_FORMAT).to_string(),
    };
    let snippet = format!("{prefix}{body}");

    let offset = match kind {
        // Lands after the opening fence line.
        SnippetKind::CodeBlock => prefix.len() + "```\n".len(),
        _ => snippet.chars().count(),
    };

    let mut result = String::with_capacity(text.len() + snippet.len());
    result.push_str(&text[..insert_at]);
    result.push_str(&snippet);
    result.push_str(&text[insert_at..]);

    TextEdit {
        text: result,
        cursor: cursor + offset,
    }
}

#[cfg(test)]
mod tests {
    use super::{format_selection, insert_snippet, insert_snippet_at, FormatStyle, SnippetKind};
    use chrono::NaiveDate;

    fn fixed_now() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|date| date.and_hms_opt(14, 5, 0))
            .expect("valid fixed timestamp")
    }

    #[test]
    fn bold_wraps_selection_and_moves_cursor_past_closing_delimiter() {
        let edit = format_selection("hello world", 0, 5, FormatStyle::Bold);
        assert_eq!(edit.text, "**hello** world");
        assert_eq!(edit.cursor, 9);
    }

    #[test]
    fn empty_italic_selection_inserts_pair_and_parks_cursor_inside() {
        let edit = format_selection("hello", 2, 2, FormatStyle::Italic);
        assert_eq!(edit.text, "he**llo");
        assert_eq!(edit.cursor, 3);
    }

    #[test]
    fn strikethrough_on_empty_text() {
        let edit = format_selection("", 0, 0, FormatStyle::Strikethrough);
        assert_eq!(edit.text, "~~~~");
        assert_eq!(edit.cursor, 2);
    }

    #[test]
    fn selection_is_clamped_and_normalized() {
        let edit = format_selection("abc", 99, 1, FormatStyle::Italic);
        assert_eq!(edit.text, "a*bc*");
        assert_eq!(edit.cursor, 5);
    }

    #[test]
    fn selection_counts_characters_not_bytes() {
        let edit = format_selection("café au lait", 0, 4, FormatStyle::Bold);
        assert_eq!(edit.text, "**café** au lait");
        assert_eq!(edit.cursor, 8);
    }

    #[test]
    fn bullet_after_text_starts_a_new_line() {
        let edit = insert_snippet("abc", 3, SnippetKind::Bullet);
        assert_eq!(edit.text, "abc\n- ");
        assert_eq!(edit.cursor, 6);
    }

    #[test]
    fn bullet_on_empty_text_has_no_newline() {
        let edit = insert_snippet("", 0, SnippetKind::Bullet);
        assert_eq!(edit.text, "- ");
        assert_eq!(edit.cursor, 2);
    }

    #[test]
    fn heading_after_newline_does_not_add_another() {
        let edit = insert_snippet("abc\n", 4, SnippetKind::Heading2);
        assert_eq!(edit.text, "abc\n## ");
        assert_eq!(edit.cursor, 7);
    }

    #[test]
    fn code_block_cursor_lands_inside_fence() {
        let edit = insert_snippet("", 0, SnippetKind::CodeBlock);
        assert_eq!(edit.text, "```\n\n```\n");
        assert_eq!(edit.cursor, 4);

        let edit = insert_snippet("x", 1, SnippetKind::CodeBlock);
        assert_eq!(edit.text, "x\n```\n\n```\n");
        assert_eq!(edit.cursor, 6);
    }

    #[test]
    fn snippet_inserted_mid_text_keeps_tail() {
        let edit = insert_snippet("ab", 1, SnippetKind::Divider);
        assert_eq!(edit.text, "a\n---\nb");
        assert_eq!(edit.cursor, 6);
    }

    #[test]
    fn date_and_time_never_get_a_newline() {
        let date = insert_snippet_at("Due ", 4, SnippetKind::Date, fixed_now());
        assert_eq!(date.text, "Due 3/7/2024");
        assert_eq!(date.cursor, 12);

        let time = insert_snippet_at("at", 2, SnippetKind::Time, fixed_now());
        assert_eq!(time.text, "at02:05 PM");
        assert_eq!(time.cursor, 10);
    }

    #[test]
    fn action_names_parse() {
        assert_eq!(SnippetKind::from_name("code"), Some(SnippetKind::CodeBlock));
        assert_eq!(SnippetKind::from_name("H1"), Some(SnippetKind::Heading1));
        assert_eq!(FormatStyle::from_name("strikethrough"), Some(FormatStyle::Strikethrough));
        assert_eq!(FormatStyle::from_name("underline"), None);
    }
}
