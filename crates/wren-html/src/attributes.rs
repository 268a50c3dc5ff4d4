//! Start-tag parsing: tag name, attributes and the self-closing flag.
//!
//! The attribute scanner works on the raw text between `<` and `>`. It
//! tolerates whitespace around `=`, mixes quoted, unquoted and boolean
//! attributes, and never normalises whitespace inside quoted values:
//! `class="a  b"` keeps both spaces and is split into classes later.

use wren_dom::AttributesMap;

use crate::entities::decode_entities;

/// A parsed start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Lower-cased tag name.
    pub name: String,
    /// Attributes; the first occurrence of a duplicated name wins.
    pub attrs: AttributesMap,
    /// Written as `<name ... />`.
    pub self_closing: bool,
}

/// Parse the inside of a start tag (without the surrounding `<` and `>`).
pub fn parse_start_tag(raw: &str) -> StartTag {
    let bytes = raw.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() && !is_tag_name_terminator(bytes[pos]) {
        pos += 1;
    }
    let name = raw[..pos].to_ascii_lowercase();

    let mut attrs = AttributesMap::new();
    let mut self_closing = false;

    while pos < bytes.len() {
        let b = bytes[pos];
        if b.is_ascii_whitespace() {
            pos += 1;
            continue;
        }
        if b == b'/' {
            // Only a trailing slash makes the tag self-closing.
            self_closing = raw[pos + 1..].trim().is_empty();
            pos += 1;
            continue;
        }

        let name_start = pos;
        while pos < bytes.len() && !is_attr_name_terminator(bytes[pos]) {
            pos += 1;
        }
        if pos == name_start {
            // A stray `=` or quote with no name in front of it.
            pos += 1;
            continue;
        }
        let attr_name = raw[name_start..pos].to_ascii_lowercase();

        let after_name = skip_whitespace(bytes, pos);
        let value = if bytes.get(after_name) == Some(&b'=') {
            let value_start = skip_whitespace(bytes, after_name + 1);
            let (value, end) = read_attr_value(raw, value_start);
            pos = end;
            value
        } else {
            String::new()
        };

        let _ = attrs.entry(attr_name).or_insert(value);
    }

    StartTag {
        name,
        attrs,
        self_closing,
    }
}

/// Read an attribute value starting at `start`, returning the decoded value
/// and the byte index just past it.
fn read_attr_value(raw: &str, start: usize) -> (String, usize) {
    let bytes = raw.as_bytes();
    match bytes.get(start) {
        Some(&quote @ (b'"' | b'\'')) => {
            let body_start = start + 1;
            match raw[body_start..].find(char::from(quote)) {
                Some(len) => (
                    decode_entities(&raw[body_start..body_start + len]),
                    body_start + len + 1,
                ),
                None => (decode_entities(&raw[body_start..]), raw.len()),
            }
        }
        Some(_) => {
            let mut end = start;
            while end < bytes.len() && !bytes[end].is_ascii_whitespace() {
                end += 1;
            }
            let value = raw[start..end].trim_end_matches('/');
            (decode_entities(value), end)
        }
        None => (String::new(), start),
    }
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

fn is_tag_name_terminator(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'/'
}

fn is_attr_name_terminator(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'=' | b'/' | b'"' | b'\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only() {
        let tag = parse_start_tag("DIV");
        assert_eq!(tag.name, "div");
        assert!(tag.attrs.is_empty());
        assert!(!tag.self_closing);
    }

    #[test]
    fn test_whitespace_around_equals() {
        let tag = parse_start_tag("a href = \"x.html\"   id=main");
        assert_eq!(tag.attrs.get("href").map(String::as_str), Some("x.html"));
        assert_eq!(tag.attrs.get("id").map(String::as_str), Some("main"));
    }

    #[test]
    fn test_quoted_multi_token_value_kept_verbatim() {
        let tag = parse_start_tag("p class=\"a  b\" title='it is'");
        assert_eq!(tag.attrs.get("class").map(String::as_str), Some("a  b"));
        assert_eq!(tag.attrs.get("title").map(String::as_str), Some("it is"));
    }

    #[test]
    fn test_boolean_attribute_and_self_closing() {
        let tag = parse_start_tag("input disabled type=checkbox /");
        assert_eq!(tag.attrs.get("disabled").map(String::as_str), Some(""));
        assert_eq!(tag.attrs.get("type").map(String::as_str), Some("checkbox"));
        assert!(tag.self_closing);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let tag = parse_start_tag("div id=a id=b");
        assert_eq!(tag.attrs.get("id").map(String::as_str), Some("a"));
    }

    #[test]
    fn test_entities_in_values() {
        let tag = parse_start_tag("a title=\"x &amp; y\"");
        assert_eq!(tag.attrs.get("title").map(String::as_str), Some("x & y"));
    }
}
