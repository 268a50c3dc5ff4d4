//! The page shown in place of a document that failed to load or render.
//!
//! The template is ordinary HTML and goes through the same pipeline as any
//! other document.

use crate::error::PageError;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>{{title}}</title>
<style>
body { padding: 48px; background-color: #f6f6f6; color: #333; }
h1 { font-size: 28px; margin: 0 0 8px 0; }
.subtitle { color: #666; margin: 0 0 24px 0; }
.message { padding: 12px; background-color: #fff; border: 1px solid #ddd; white-space: pre-wrap; }
</style>
</head>
<body>
<h1>{{title}}</h1>
<p class="subtitle">{{subtitle}}</p>
<div class="message">{{message}}</div>
</body>
</html>
"#;

/// [§ 13.1.2.6 Restrictions on the contents of raw text and escapable raw text elements](https://html.spec.whatwg.org/multipage/syntax.html#cdata-rcdata-restrictions)
///
/// Escape text for use inside element content.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Fill the template with a title, subtitle and message.
#[must_use]
pub fn render_template(title: &str, subtitle: &str, message: &str) -> String {
    TEMPLATE
        .replace("{{title}}", &escape(title))
        .replace("{{subtitle}}", &escape(subtitle))
        .replace("{{message}}", &escape(message))
}

/// The error page for `error`.
#[must_use]
pub fn error_page_html(error: &PageError) -> String {
    let kind = error.kind();
    render_template(kind.title(), kind.subtitle(), &error.chain())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;

    #[test]
    fn test_message_is_escaped() {
        let html = render_template("t", "s", "<script>&");
        assert!(html.contains("&lt;script&gt;&amp;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_error_page_parses_with_title() {
        let error = PageError::from(LoadError::HttpStatus {
            url: "https://example.com/".into(),
            code: 404,
        });
        let dom = wren_html::parse(&error_page_html(&error));
        assert_eq!(wren_html::document_title(&dom).as_deref(), Some("The server returned an error"));
        let body = dom.text_content(dom.body().unwrap());
        assert!(body.contains("https://example.com/ answered with HTTP 404"));
    }
}
