//! Removal of markup declarations before the tag scan.
//!
//! Comments (`<!-- ... -->`), processing instructions and XML prologues
//! (`<? ... ?>`) and document type declarations (`<!DOCTYPE ...>`) carry no
//! content for the renderer. Stripping them up front keeps the scanner
//! limited to tags and text.

use wren_common::warning::warn_once;

/// A markup declaration recognised by its opening sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Declaration {
    Comment,
    ProcessingInstruction,
    Doctype,
}

impl Declaration {
    fn opener(self) -> &'static str {
        match self {
            Self::Comment => "<!--",
            Self::ProcessingInstruction => "<?",
            Self::Doctype => "<!doctype",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::ProcessingInstruction => "processing instruction",
            Self::Doctype => "DOCTYPE",
        }
    }
}

/// Strip comments, processing instructions and DOCTYPE declarations.
///
/// An unterminated declaration is reported and everything from its start to
/// the end of the input is dropped. This never fails.
pub fn strip_declarations(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while let Some((start, decl)) = find_next_declaration(input, pos) {
        out.push_str(&input[pos..start]);
        match find_declaration_end(input, start, decl) {
            Some(end) => pos = end,
            None => {
                warn_once(
                    "HTML",
                    &format!("unterminated {} at byte {start}, dropping the rest", decl.name()),
                );
                return out;
            }
        }
    }

    out.push_str(&input[pos..]);
    out
}

/// Locate the earliest declaration opener at or after `from`.
fn find_next_declaration(input: &str, from: usize) -> Option<(usize, Declaration)> {
    let bytes = input.as_bytes();
    let mut i = from;
    while let Some(offset) = input[i..].find('<') {
        let at = i + offset;
        let rest = &bytes[at..];
        if rest.starts_with(b"<!--") {
            return Some((at, Declaration::Comment));
        }
        if rest.starts_with(b"<?") {
            return Some((at, Declaration::ProcessingInstruction));
        }
        if rest.len() >= 9 && rest[..9].eq_ignore_ascii_case(b"<!doctype") {
            return Some((at, Declaration::Doctype));
        }
        i = at + 1;
    }
    None
}

/// Byte index just past the end of the declaration starting at `start`.
fn find_declaration_end(input: &str, start: usize, decl: Declaration) -> Option<usize> {
    let body_start = start + decl.opener().len();
    match decl {
        Declaration::Comment => input[body_start..]
            .find("-->")
            .map(|i| body_start + i + 3),
        Declaration::ProcessingInstruction => input[body_start..]
            .find("?>")
            .map(|i| body_start + i + 2),
        // Internal subsets may nest `<...>` pairs, so balance the brackets.
        Declaration::Doctype => {
            let mut depth = 1usize;
            for (i, b) in input.as_bytes()[body_start..].iter().enumerate() {
                match b {
                    b'<' => depth += 1,
                    b'>' => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(body_start + i + 1);
                        }
                    }
                    _ => {}
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_comment() {
        assert_eq!(strip_declarations("a<!-- b -->c"), "ac");
    }

    #[test]
    fn test_strips_prologue_and_doctype() {
        let html = "<?xml version=\"1.0\"?><!DOCTYPE html><p>x</p>";
        assert_eq!(strip_declarations(html), "<p>x</p>");
    }

    #[test]
    fn test_doctype_with_internal_subset() {
        let html = "<!DOCTYPE note [<!ENTITY a \"b\">]><p></p>";
        assert_eq!(strip_declarations(html), "<p></p>");
    }

    #[test]
    fn test_unterminated_comment_drops_rest() {
        assert_eq!(strip_declarations("<p>a</p><!-- never closed <b>"), "<p>a</p>");
    }

    #[test]
    fn test_comment_containing_tags() {
        assert_eq!(strip_declarations("<!-- <div> -->x"), "x");
    }
}
