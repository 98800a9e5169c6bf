//! Case-insensitive find and replace.

use super::byte_offset;

/// One match, as a half-open range of character positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

// Lowercased characters, each tagged with the index of the source character
// it came from. One source char can lowercase to several.
struct Folded {
    chars: Vec<char>,
    origin: Vec<usize>,
}

fn fold(text: &str) -> Folded {
    let mut chars = Vec::with_capacity(text.len());
    let mut origin = Vec::with_capacity(text.len());
    for (index, source) in text.chars().enumerate() {
        for lower in source.to_lowercase() {
            chars.push(lower);
            origin.push(index);
        }
    }
    Folded { chars, origin }
}

fn lowercase_chars(term: &str) -> Vec<char> {
    term.chars().flat_map(char::to_lowercase).collect()
}

// A folded match only counts when it covers whole source characters.
fn on_boundaries(haystack: &Folded, start: usize, end: usize) -> bool {
    let starts_clean = start == 0 || haystack.origin[start - 1] != haystack.origin[start];
    let ends_clean = end == haystack.chars.len() || haystack.origin[end - 1] != haystack.origin[end];
    starts_clean && ends_clean
}

fn find_spans(haystack: &Folded, needle: &[char], limit: Option<usize>) -> Vec<MatchSpan> {
    let mut spans = Vec::new();
    if needle.is_empty() || needle.len() > haystack.chars.len() {
        return spans;
    }

    let mut position = 0;
    while position + needle.len() <= haystack.chars.len() {
        let end = position + needle.len();
        if haystack.chars[position..end] == *needle && on_boundaries(haystack, position, end) {
            spans.push(MatchSpan {
                start: haystack.origin[position],
                end: haystack.origin[end - 1] + 1,
            });
            if limit.is_some_and(|max| spans.len() >= max) {
                break;
            }
            position = end;
        } else {
            position += 1;
        }
    }
    spans
}

/// Returns every non-overlapping, case-insensitive match of `term`, left to
/// right. An empty `term` yields no matches.
pub fn find_all(text: &str, term: &str) -> Vec<MatchSpan> {
    if term.is_empty() {
        return Vec::new();
    }
    find_spans(&fold(text), &lowercase_chars(term), None)
}

/// Case-insensitive substring test. An empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    !find_spans(&fold(haystack), &lowercase_chars(needle), Some(1)).is_empty()
}

/// Replaces the first case-insensitive occurrence of `term`.
///
/// Returns `text` unchanged when `term` is empty or absent.
pub fn replace_first(text: &str, term: &str, replacement: &str) -> String {
    replace_spans(text, term, replacement, Some(1))
}

/// Replaces every case-insensitive occurrence of `term`, left to right and
/// without overlap, exactly the spans `find_all` reports.
///
/// Both `term` and `replacement` are literal (`.` and `$1` mean themselves).
/// An empty `term` is a no-op.
pub fn replace_all(text: &str, term: &str, replacement: &str) -> String {
    replace_spans(text, term, replacement, None)
}

fn replace_spans(text: &str, term: &str, replacement: &str, limit: Option<usize>) -> String {
    if term.is_empty() {
        return text.to_string();
    }
    let spans = find_spans(&fold(text), &lowercase_chars(term), limit);
    if spans.is_empty() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len() + spans.len() * replacement.len());
    let mut copied = 0;
    for span in spans {
        let start = byte_offset(text, span.start);
        result.push_str(&text[copied..start]);
        result.push_str(replacement);
        copied = byte_offset(text, span.end);
    }
    result.push_str(&text[copied..]);
    result
}

#[cfg(test)]
mod tests {
    use super::{contains_ignore_case, find_all, replace_all, replace_first, MatchSpan};

    #[test]
    fn find_all_is_case_insensitive_and_ordered() {
        let spans = find_all("Cat cat CAT", "cat");
        assert_eq!(
            spans,
            vec![
                MatchSpan { start: 0, end: 3 },
                MatchSpan { start: 4, end: 7 },
                MatchSpan { start: 8, end: 11 },
            ]
        );
    }

    #[test]
    fn find_all_does_not_overlap() {
        assert_eq!(
            find_all("aaaa", "aa"),
            vec![MatchSpan { start: 0, end: 2 }, MatchSpan { start: 2, end: 4 }]
        );
    }

    #[test]
    fn find_all_with_empty_term_or_text() {
        assert!(find_all("anything", "").is_empty());
        assert!(find_all("", "x").is_empty());
    }

    #[test]
    fn find_all_reports_character_positions() {
        assert_eq!(find_all("épée ÉPÉE", "épée")[1], MatchSpan { start: 5, end: 9 });
    }

    #[test]
    fn replace_first_touches_only_first_match() {
        assert_eq!(replace_first("Foo foo FOO", "foo", "bar"), "bar foo FOO");
        assert_eq!(replace_first("abc", "zzz", "y"), "abc");
        assert_eq!(replace_first("abc", "", "y"), "abc");
    }

    #[test]
    fn replace_all_treats_term_literally() {
        assert_eq!(replace_all("a.b a.b", "a.b", "X"), "X X");
        assert_eq!(replace_all("axb", "a.b", "X"), "axb");
        assert_eq!(replace_all("(1) (1)", "(1)", "[2]"), "[2] [2]");
    }

    #[test]
    fn replace_all_is_case_insensitive_and_keeps_replacement_literal() {
        assert_eq!(replace_all("Tea TEA tea", "tea", "$0"), "$0 $0 $0");
        assert_eq!(replace_all("x", "", "y"), "x");
        assert_eq!(replace_all("drop me", "drop ", ""), "me");
    }

    #[test]
    fn replace_all_matches_exactly_what_find_all_reports() {
        for (text, term) in [("ς", "Σ"), ("aaaa", "aa"), ("Straße STRASSE", "straße")] {
            let replaced = replace_all(text, term, "#");
            assert_eq!(
                replaced.matches('#').count(),
                find_all(text, term).len(),
                "text: {text}, term: {term}"
            );
        }
        assert_eq!(replace_all("aaaa", "aa", "b"), "bb");
        assert_eq!(replace_all("épée ÉPÉE", "épée", "x"), "x x");
    }

    #[test]
    fn contains_ignore_case_matches_substrings() {
        assert!(contains_ignore_case("Grocery List", "LIST"));
        assert!(!contains_ignore_case("Grocery List", "lists"));
        assert!(contains_ignore_case("", ""));
    }
}
