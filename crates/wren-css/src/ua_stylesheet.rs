//! User-agent stylesheet
//!
//! [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "User agents are expected to have a default style sheet that presents
//! elements of HTML documents in ways consistent with general user
//! expectations."
//!
//! Default `display` values come from [`wren_dom::ElementKind::default_display`];
//! this sheet carries everything else. The page has no default body margin
//! so that author padding lines up with the viewport edge.

use crate::parser::{Stylesheet, parse_stylesheet};

/// [WHATWG HTML § 15.3](https://html.spec.whatwg.org/multipage/rendering.html#the-css-user-agent-style-sheet-and-presentational-hints)
const UA_CSS: &str = r"
html, body { margin: 0; }

/* § 15.3.6 Sections and headings */
h1 { font-size: 2em; font-weight: bold; margin-top: 0.67em; margin-bottom: 0.67em; }
h2 { font-size: 1.5em; font-weight: bold; margin-top: 0.83em; margin-bottom: 0.83em; }
h3 { font-size: 1.17em; font-weight: bold; margin-top: 1em; margin-bottom: 1em; }
h4 { font-weight: bold; margin-top: 1.33em; margin-bottom: 1.33em; }
h5 { font-size: 0.83em; font-weight: bold; margin-top: 1.67em; margin-bottom: 1.67em; }
h6 { font-size: 0.67em; font-weight: bold; margin-top: 2.33em; margin-bottom: 2.33em; }

/* § 15.3.3 Flow content */
p, blockquote, figure, pre, dl { margin-top: 1em; margin-bottom: 1em; }
blockquote, figure { margin-left: 40px; margin-right: 40px; }
dd { margin-left: 40px; }
hr { border: 1px inset; margin-top: 0.5em; margin-bottom: 0.5em; }
pre, code, kbd, samp { font-family: monospace; }
pre { white-space: pre; }
center { text-align: center; }

/* § 15.3.7 Lists */
ol, ul { margin-top: 1em; margin-bottom: 1em; padding-left: 40px; }
ul { list-style-type: disc; }
ol { list-style-type: decimal; }
ul ul, ol ul { list-style-type: circle; margin-top: 0; margin-bottom: 0; }
ol ul ul, ol ol ul, ul ol ul, ul ul ul { list-style-type: square; }

/* § 15.3.8 Text-level semantics */
b, strong, th { font-weight: bolder; }
i, cite, em, var, dfn, address { font-style: italic; }
small, sub, sup { font-size: smaller; }
a:link { color: #0000EE; }

/* § 15.3.10 Tables */
table { border-spacing: 2px; box-sizing: border-box; }
td, th { padding: 1px; }
th { text-align: center; }

/* § 15.5 Form controls */
input, textarea, select, button { border: 2px inset; padding: 1px 2px; }
";

/// The parsed user-agent stylesheet. Constructed once per page and passed
/// to the cascade.
#[derive(Debug, Clone)]
pub struct UserAgentStylesheet {
    sheet: Stylesheet,
}

impl UserAgentStylesheet {
    /// Parse the built-in sheet.
    #[must_use]
    pub fn load() -> Self {
        Self {
            sheet: parse_stylesheet(UA_CSS),
        }
    }

    /// A UA sheet from custom CSS in place of the built-in rules.
    #[must_use]
    pub fn from_css(css: &str) -> Self {
        Self {
            sheet: parse_stylesheet(css),
        }
    }

    /// An empty UA sheet, for callers that want author styles only.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            sheet: Stylesheet::default(),
        }
    }

    /// The parsed rules.
    #[must_use]
    pub const fn stylesheet(&self) -> &Stylesheet {
        &self.sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_ua_rule_parses() {
        let ua = UserAgentStylesheet::load();
        assert_eq!(ua.stylesheet().rules.len(), 27);
        assert!(
            ua.stylesheet()
                .rules
                .iter()
                .all(|r| !r.declarations.is_empty())
        );
    }
}
