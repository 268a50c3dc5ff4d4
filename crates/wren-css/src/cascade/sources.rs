//! Stylesheet discovery in the document.

use wren_common::warning::warn_once;
use wren_dom::{DomTree, ElementKind, NodeId};

use crate::media::{MediaQuery, MediaType};

/// Where an author stylesheet comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleSource {
    /// [§ 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
    Inline {
        /// The element's text.
        css: String,
        /// Parsed `media` attribute.
        media: Option<MediaQuery>,
    },
    /// [§ 4.2.4 The link element](https://html.spec.whatwg.org/multipage/semantics.html#the-link-element)
    /// with `rel=stylesheet`.
    External {
        /// The `href` as written.
        href: String,
        /// Parsed `media` attribute.
        media: Option<MediaQuery>,
    },
}

/// Collect `<style>` and `<link rel=stylesheet>` in document order.
#[must_use]
pub fn collect_stylesheets(tree: &DomTree) -> Vec<StyleSource> {
    let mut sources = Vec::new();
    for id in tree.descendants(NodeId::ROOT) {
        let Some(element) = tree.as_element(id) else {
            continue;
        };
        let media = element.attr("media").map(parse_media_attribute);
        if element.is(ElementKind::Style) {
            sources.push(StyleSource::Inline {
                css: tree.text_content(id),
                media,
            });
        } else if element.is(ElementKind::Link)
            && element
                .attr("rel")
                .is_some_and(|rel| rel.split_ascii_whitespace().any(|r| r.eq_ignore_ascii_case("stylesheet")))
            && let Some(href) = element.attr("href")
        {
            sources.push(StyleSource::External {
                href: href.to_string(),
                media,
            });
        }
    }
    sources
}

/// "If the media attribute is omitted, ... the default value is 'all'."
/// An unparseable list applies to nothing.
fn parse_media_attribute(value: &str) -> MediaQuery {
    if value.trim().is_empty() {
        return MediaQuery::Type(MediaType::All);
    }
    MediaQuery::parse(value).unwrap_or_else(|| {
        warn_once("CSS", &format!("invalid media attribute '{value}'"));
        MediaQuery::not_all()
    })
}
