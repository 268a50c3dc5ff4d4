//! Keyword-valued properties.
//!
//! Each enum parses from its CSS keyword through `strum`, ASCII
//! case-insensitively.

use serde::Serialize;
use strum_macros::{AsRefStr, EnumString};

/// [§ 3.2 font-style](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FontStyle {
    /// Upright glyphs.
    #[default]
    Normal,
    /// Italic face.
    Italic,
    /// Slanted face.
    Oblique,
}

/// [§ 7.1 text-align](https://www.w3.org/TR/css-text-3/#text-align-property)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TextAlign {
    /// Flush with the line start.
    #[default]
    #[strum(serialize = "left", serialize = "start")]
    Left,
    /// Flush with the line end.
    #[strum(serialize = "right", serialize = "end")]
    Right,
    /// Centered within the line box.
    Center,
    /// Spread across the line, except on the last line.
    Justify,
}

/// [§ 3 white-space](https://www.w3.org/TR/css-text-3/#white-space-property)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum WhiteSpace {
    /// Collapse whitespace, wrap lines.
    #[default]
    Normal,
    /// Preserve whitespace, no wrapping.
    Pre,
    /// Collapse whitespace, no wrapping.
    Nowrap,
    /// Preserve whitespace, wrap lines.
    PreWrap,
    /// Collapse spaces, preserve newlines.
    PreLine,
}

impl WhiteSpace {
    /// Whether runs of whitespace collapse to one space.
    #[must_use]
    pub const fn collapses(self) -> bool {
        matches!(self, Self::Normal | Self::Nowrap | Self::PreLine)
    }

    /// Whether text may wrap at soft break opportunities.
    #[must_use]
    pub const fn wraps(self) -> bool {
        matches!(self, Self::Normal | Self::PreWrap | Self::PreLine)
    }
}

/// [§ 3.3 list-style-type](https://www.w3.org/TR/css-lists-3/#text-markers)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ListStyleType {
    /// A filled circle.
    #[default]
    Disc,
    /// A hollow circle.
    Circle,
    /// A filled square.
    Square,
    /// Decimal numbers starting from 1.
    Decimal,
    /// `a.` `b.` ... `z.` `aa.`
    #[strum(serialize = "lower-alpha", serialize = "lower-latin")]
    LowerAlpha,
    /// `A.` `B.` ...
    #[strum(serialize = "upper-alpha", serialize = "upper-latin")]
    UpperAlpha,
    /// `i.` `ii.` ...
    LowerRoman,
    /// `I.` `II.` ...
    UpperRoman,
    /// No marker.
    None,
}

impl ListStyleType {
    /// [CSS Counter Styles § 6](https://www.w3.org/TR/css-counter-styles-3/#predefined-counters)
    ///
    /// The marker string for the item at `ordinal`, or `None` when no marker
    /// is generated.
    #[must_use]
    pub fn marker_text(self, ordinal: i64) -> Option<String> {
        Some(match self {
            Self::Disc => "\u{2022}".to_string(),
            Self::Circle => "\u{25E6}".to_string(),
            Self::Square => "\u{25AA}".to_string(),
            Self::Decimal => format!("{ordinal}."),
            Self::LowerAlpha => format!("{}.", alphabetic(ordinal)),
            Self::UpperAlpha => format!("{}.", alphabetic(ordinal).to_ascii_uppercase()),
            Self::LowerRoman => format!("{}.", roman(ordinal)),
            Self::UpperRoman => format!("{}.", roman(ordinal).to_ascii_uppercase()),
            Self::None => return None,
        })
    }

    /// Whether this style counts items (as opposed to a bullet glyph).
    #[must_use]
    pub const fn is_ordinal(self) -> bool {
        matches!(
            self,
            Self::Decimal | Self::LowerAlpha | Self::UpperAlpha | Self::LowerRoman | Self::UpperRoman
        )
    }
}

/// "alphabetic" counter system: `a..z, aa, ab, ...`. Falls back to decimal
/// outside the representable range.
fn alphabetic(ordinal: i64) -> String {
    if ordinal < 1 {
        return ordinal.to_string();
    }
    let mut n = ordinal;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.iter().rev().map(|&b| char::from(b)).collect()
}

/// "additive" roman numerals for 1..=3999, decimal otherwise.
fn roman(ordinal: i64) -> String {
    const TABLE: &[(i64, &str)] = &[
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    if !(1..=3999).contains(&ordinal) {
        return ordinal.to_string();
    }
    let mut n = ordinal;
    let mut out = String::new();
    for &(value, glyphs) in TABLE {
        while n >= value {
            out.push_str(glyphs);
            n -= value;
        }
    }
    out
}

/// [§ 11.2 visibility](https://www.w3.org/TR/CSS2/visufx.html#visibility)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Visibility {
    /// Painted.
    #[default]
    Visible,
    /// Laid out but not painted.
    Hidden,
    /// Same as hidden outside tables.
    Collapse,
}

/// [§ 4.4 box-sizing](https://www.w3.org/TR/css-sizing-3/#box-sizing)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BoxSizing {
    /// `width` sizes the content box.
    #[default]
    ContentBox,
    /// `width` sizes the border box.
    BorderBox,
}

/// [§ 3.2 border-style](https://www.w3.org/TR/css-backgrounds-3/#border-style)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BorderStyle {
    /// No border; the used width is 0.
    #[default]
    None,
    /// Like `none`.
    Hidden,
    /// Dotted line.
    Dotted,
    /// Dashed line.
    Dashed,
    /// Single solid line.
    Solid,
    /// Two solid lines.
    Double,
    /// Carved.
    Groove,
    /// Embossed.
    Ridge,
    /// Sunken.
    Inset,
    /// Raised.
    Outset,
}

impl BorderStyle {
    /// `none` and `hidden` force a zero used border width.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::None | Self::Hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_keywords_parse_case_insensitively() {
        assert_eq!(TextAlign::from_str("CENTER").unwrap(), TextAlign::Center);
        assert_eq!(TextAlign::from_str("start").unwrap(), TextAlign::Left);
        assert_eq!(WhiteSpace::from_str("pre-wrap").unwrap(), WhiteSpace::PreWrap);
        assert_eq!(ListStyleType::from_str("lower-latin").unwrap(), ListStyleType::LowerAlpha);
        assert_eq!(BoxSizing::from_str("border-box").unwrap(), BoxSizing::BorderBox);
        assert!(FontStyle::from_str("slanty").is_err());
    }

    #[test]
    fn test_marker_text() {
        assert_eq!(ListStyleType::Disc.marker_text(1).as_deref(), Some("\u{2022}"));
        assert_eq!(ListStyleType::Circle.marker_text(1).as_deref(), Some("\u{25E6}"));
        assert_eq!(ListStyleType::Square.marker_text(1).as_deref(), Some("\u{25AA}"));
        assert_eq!(ListStyleType::Decimal.marker_text(3).as_deref(), Some("3."));
        assert_eq!(ListStyleType::LowerAlpha.marker_text(28).as_deref(), Some("ab."));
        assert_eq!(ListStyleType::UpperRoman.marker_text(1994).as_deref(), Some("MCMXCIV."));
        assert_eq!(ListStyleType::None.marker_text(1), None);
    }
}
