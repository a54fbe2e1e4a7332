//! HTML to readable text
//!
//! Toot bodies are converted to markdown without line wrapping.

/// Convert an HTML fragment to markdown text
///
/// The result is trimmed and ends with a single newline, or is empty if the
/// fragment has no text.
pub fn to_text(html: &str) -> String {
    let markdown = html2md::parse_html(html);
    let trimmed = markdown.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed)
    }
}
