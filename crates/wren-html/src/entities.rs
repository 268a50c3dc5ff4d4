//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html)
//!
//! A small table of the references that show up in ordinary documents, plus
//! decimal and hexadecimal numeric references. Anything unrecognised is kept
//! literally.

/// Named references understood by the decoder.
const NAMED: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("copy", '\u{a9}'),
    ("reg", '\u{ae}'),
    ("trade", '\u{2122}'),
    ("mdash", '\u{2014}'),
    ("ndash", '\u{2013}'),
    ("hellip", '\u{2026}'),
    ("laquo", '\u{ab}'),
    ("raquo", '\u{bb}'),
    ("bull", '\u{2022}'),
    ("middot", '\u{b7}'),
    ("times", '\u{d7}'),
    ("euro", '\u{20ac}'),
];

/// Longest reference body we try to match (`&#x10FFFF;` is the longest).
const MAX_REFERENCE_LEN: usize = 10;

/// Decode character references in `text`.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp + 1..];
        match decode_reference(candidate) {
            Some((c, consumed)) => {
                out.push(c);
                rest = &candidate[consumed..];
            }
            None => {
                out.push('&');
                rest = candidate;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode one reference body (text after `&`), returning the character and
/// the number of bytes consumed including the `;`.
fn decode_reference(s: &str) -> Option<(char, usize)> {
    let semi = s.find(';')?;
    if semi == 0 || semi > MAX_REFERENCE_LEN {
        return None;
    }
    let body = &s[..semi];
    let c = if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        char::from_u32(code).unwrap_or('\u{fffd}')
    } else {
        NAMED.iter().find(|(name, _)| *name == body).map(|&(_, c)| c)?
    };
    Some((c, semi + 1))
}
