//! Pure renderers for exported note files.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold regex"));
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic regex"));
static STRIKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.*?)~~").expect("valid strike regex"));
static H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mi)^# (.*)$").expect("valid h1 regex"));
static H2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mi)^## (.*)$").expect("valid h2 regex"));
static H3_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mi)^### (.*)$").expect("valid h3 regex"));
static UNCHECKED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^- \[ \] (.*)$").expect("valid unchecked regex"));
static CHECKED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^- \[x\] (.*)$").expect("valid checked regex"));
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mi)^- (.*)$").expect("valid bullet regex"));

const HTML_STYLE: &str = "    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
      max-width: 800px;
      margin: 40px auto;
      padding: 20px;
      line-height: 1.6;
      color: #333;
    }
    h1 { font-size: 2em; margin-bottom: 0.5em; }
    h2 { font-size: 1.5em; margin-top: 1em; }
    h3 { font-size: 1.2em; margin-top: 1em; }
    code { background: #f4f4f4; padding: 2px 6px; border-radius: 3px; }
    pre { background: #f4f4f4; padding: 15px; border-radius: 5px; overflow-x: auto; }";

/// Export encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    PlainText,
    Markdown,
    Html,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }

    /// Parses `txt|text|md|markdown|html`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" | "plain" => Some(Self::PlainText),
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

/// Renders a note in the requested encoding.
pub fn render(format: ExportFormat, title: &str, content: &str) -> String {
    match format {
        ExportFormat::PlainText => format!("{title}\n\n{content}"),
        ExportFormat::Markdown => format!("# {title}\n\n{content}"),
        ExportFormat::Html => render_html_document(title, content),
    }
}

/// Converts markdown-flavoured note content into an HTML fragment.
///
/// Inline rules run before line rules, and line rules run before the final
/// newline-to-`<br>` pass, which would otherwise erase line starts.
pub fn content_to_html(content: &str) -> String {
    let html = BOLD_RE.replace_all(content, "<strong>$1</strong>");
    let html = ITALIC_RE.replace_all(&html, "<em>$1</em>");
    let html = STRIKE_RE.replace_all(&html, "<del>$1</del>");
    let html = H1_RE.replace_all(&html, "<h1>$1</h1>");
    let html = H2_RE.replace_all(&html, "<h2>$1</h2>");
    let html = H3_RE.replace_all(&html, "<h3>$1</h3>");
    let html = UNCHECKED_RE.replace_all(&html, "<input type=\"checkbox\"> $1<br>");
    let html = CHECKED_RE.replace_all(&html, "<input type=\"checkbox\" checked> $1<br>");
    let html = BULLET_RE.replace_all(&html, "<li>$1</li>");
    html.replace('\n', "<br>")
}

fn render_html_document(title: &str, content: &str) -> String {
    let body = content_to_html(content);
    format!(
        "
<!DOCTYPE html>
<html>
<head>
  <meta charset=\"UTF-8\">
  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">
  <title>{title}</title>
  <style>
{HTML_STYLE}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <div>{body}</div>
</body>
</html>"
    )
}

#[cfg(test)]
mod tests {
    use super::{content_to_html, render, ExportFormat};

    #[test]
    fn text_and_markdown_layouts() {
        assert_eq!(render(ExportFormat::PlainText, "T", "body"), "T\n\nbody");
        assert_eq!(render(ExportFormat::Markdown, "T", "body"), "# T\n\nbody");
    }

    #[test]
    fn inline_styles_convert() {
        assert_eq!(
            content_to_html("**b** *i* ~~s~~"),
            "<strong>b</strong> <em>i</em> <del>s</del>"
        );
    }

    #[test]
    fn headings_convert_per_level() {
        assert_eq!(
            content_to_html("# One\n## Two\n### Three"),
            "<h1>One</h1><br><h2>Two</h2><br><h3>Three</h3>"
        );
    }

    #[test]
    fn checkboxes_convert_before_bullets() {
        assert_eq!(
            content_to_html("- [ ] open\n- [x] done\n- item"),
            "<input type=\"checkbox\"> open<br><br><input type=\"checkbox\" checked> done<br><br><li>item</li>"
        );
    }

    #[test]
    fn html_document_wraps_title_and_body() {
        let html = render(ExportFormat::Html, "Trip", "line1\nline2");
        assert!(html.contains("<title>Trip</title>"));
        assert!(html.contains("<h1>Trip</h1>"));
        assert!(html.contains("<div>line1<br>line2</div>"));
        assert!(html.contains("<!DOCTYPE html>"));
    }

    #[test]
    fn format_names_parse() {
        assert_eq!(ExportFormat::from_name("MD"), Some(ExportFormat::Markdown));
        assert_eq!(ExportFormat::from_name("pdf"), None);
        assert_eq!(ExportFormat::Html.extension(), "html");
    }
}
