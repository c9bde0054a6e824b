//! HTML views for the results viewer
//!
//! Pages are assembled with [`Html`], which only accepts dynamic values through
//! [`Html::text`] and [`Html::display`]. Both route through [`escape_html`], so
//! report data can never reach the output unescaped. Static markup goes in
//! with [`Html::raw`] and must never carry data.

use std::{
    borrow::Cow,
    fmt::Display,
};

mod detail;
mod index;

pub use detail::{
    render_detail,
    DetailPage,
};
pub use index::render_index;

/// Title used in the navigation bar and page titles
pub const SITE_TITLE: &str = "WASI Testsuite Results";

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; color: #1f2328; background: #f6f8fa; }
nav { background: #24292f; padding: 0.75rem 1.5rem; }
nav a { color: #fff; font-weight: 600; text-decoration: none; }
main { max-width: 72rem; margin: 0 auto; padding: 1.5rem; }
footer { text-align: center; color: #656d76; font-size: 0.85rem; padding: 2rem 0; }
.cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); gap: 1rem; }
.card { background: #fff; border: 1px solid #d0d7de; border-radius: 6px; padding: 1rem; }
.card h2 { margin: 0 0 0.5rem; font-size: 1.1rem; }
.card progress { width: 100%; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid #d0d7de; vertical-align: top; }
td.path { font-family: ui-monospace, monospace; word-break: break-all; }
.pass { color: #1a7f37; font-weight: 600; }
.fail { color: #cf222e; font-weight: 600; }
details summary { cursor: pointer; }
details pre { white-space: pre-wrap; font-weight: normal; color: #1f2328; background: #f6f8fa; padding: 0.5rem; max-height: 24rem; overflow: auto; }
"#;

/// Escape text for use in element content or quoted attribute values
///
/// `&`, `<` and `>` become `&amp;`, `&lt;` and `&gt;`; the quote characters
/// become the numeric references `&#34;` and `&#39;`. Text without any of
/// these characters is returned as-is.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    let first = match input.find(['&', '<', '>', '"', '\'']) {
        Some(index) => index,
        None => return Cow::Borrowed(input),
    };

    let mut escaped = String::with_capacity(input.len() + 16);
    escaped.push_str(&input[..first]);
    for c in input[first..].chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// String builder for HTML documents with a single escape path
#[derive(Debug, Default)]
pub struct Html {
    buf: String,
}

impl Html {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append static markup verbatim
    pub fn raw(&mut self, markup: &str) -> &mut Self {
        self.buf.push_str(markup);
        self
    }

    /// Append escaped text
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(&escape_html(text));
        self
    }

    /// Append any displayable value, escaped
    pub fn display(&mut self, value: impl Display) -> &mut Self {
        self.text(&value.to_string())
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Wrap page content in the shared document chrome
pub(crate) fn document(title: &str, content: Html) -> String {
    let mut html = Html::new();
    html.raw("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n")
        .raw("<meta charset=\"utf-8\">\n")
        .raw("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n")
        .raw("<title>")
        .text(title)
        .raw("</title>\n<style>")
        .raw(STYLE)
        .raw("</style>\n</head>\n<body>\n")
        .raw("<nav><a href=\"/\">")
        .text(SITE_TITLE)
        .raw("</a></nav>\n<main>\n")
        .raw(&content.finish())
        .raw("</main>\n<footer>Results published by the WASI testsuite runners</footer>\n")
        .raw("</body>\n</html>\n");
    html.finish()
}

/// Minimal page for error outcomes; carries no upstream detail
pub fn render_error_page(status_line: &str, detail: &str) -> String {
    let mut content = Html::new();
    content
        .raw("<h1>")
        .text(status_line)
        .raw("</h1>\n<p>")
        .text(detail)
        .raw("</p>\n<p><a href=\"/\">Back to all results</a></p>\n");
    document(status_line, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape_html("<boom>"), "&lt;boom&gt;");
        assert_eq!(
            escape_html(r#"a & b "c" 'd'"#),
            "a &amp; b &#34;c&#34; &#39;d&#39;"
        );
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_safe_text_is_borrowed() {
        let input = "assertion failed: left == right (exit code 1)";
        match escape_html(input) {
            Cow::Borrowed(s) => assert_eq!(s, input),
            Cow::Owned(_) => panic!("safe text was copied"),
        }
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_escape_leaves_no_special_characters() {
        let inputs = [
            "<<>>&&\"\"''",
            "mixed <tag attr=\"v\"> & 'text' ünïcödé",
            "&amp; already escaped",
            "trailing <",
        ];
        for input in inputs {
            let escaped = escape_html(input);
            // Only entity ampersands may remain
            let stripped = escaped
                .replace("&amp;", "")
                .replace("&lt;", "")
                .replace("&gt;", "")
                .replace("&#34;", "")
                .replace("&#39;", "");
            for c in ['<', '>', '&', '"', '\''] {
                assert!(!stripped.contains(c), "{:?} left {:?}", input, c);
            }
        }
    }

    #[test]
    fn test_escape_preserves_multibyte_text() {
        assert_eq!(escape_html("ü<ß>"), "ü&lt;ß&gt;");
    }

    #[test]
    fn test_builder_escapes_dynamic_values() {
        let mut html = Html::new();
        html.raw("<p>").text("<b>").display(42).display("&").raw("</p>");
        assert_eq!(html.finish(), "<p>&lt;b&gt;42&amp;</p>");
    }

    #[test]
    fn test_error_page() {
        let page = render_error_page("404 Not Found", "No results at <here>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>404 Not Found</title>"));
        assert!(page.contains("No results at &lt;here&gt;"));
        assert!(page.contains("name=\"viewport\""));
    }
}
