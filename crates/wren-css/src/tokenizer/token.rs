//! CSS token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! The subset needed by the renderer: url, bad-string, bad-url and CDO/CDC
//! tokens fold into the closest ordinary token.

use core::fmt;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
#[derive(Debug, Clone, PartialEq)]
pub enum CSSToken {
    /// `<ident-token>`
    Ident(String),
    /// `<function-token>`: the name, without the opening parenthesis.
    Function(String),
    /// `<at-keyword-token>`: the name, without the `@`.
    AtKeyword(String),
    /// `<hash-token>`: the value, without the `#`.
    Hash(String),
    /// `<string-token>`
    String(String),
    /// `<number-token>`
    Number(f64),
    /// `<percentage-token>`
    Percentage(f64),
    /// `<dimension-token>`
    Dimension {
        /// Numeric value.
        value: f64,
        /// Unit, lower-cased.
        unit: String,
    },
    /// `<delim-token>`
    Delim(char),
    /// `<whitespace-token>`
    Whitespace,
    /// `<colon-token>`
    Colon,
    /// `<semicolon-token>`
    Semicolon,
    /// `<comma-token>`
    Comma,
    /// `<[-token>`
    LeftBracket,
    /// `<]-token>`
    RightBracket,
    /// `<(-token>`
    LeftParen,
    /// `<)-token>`
    RightParen,
    /// `<{-token>`
    LeftBrace,
    /// `<}-token>`
    RightBrace,
    /// End of input.
    EOF,
}

impl CSSToken {
    /// True for the end-of-input marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EOF)
    }

    /// True if this is an identifier equal to `name` (ASCII case-insensitive).
    #[must_use]
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(self, Self::Ident(ident) if ident.eq_ignore_ascii_case(name))
    }
}

/// Serializes the token back to CSS source. Selector and media preludes
/// are re-read from this form.
impl fmt::Display for CSSToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(s) => write!(f, "{s}"),
            Self::Function(name) => write!(f, "{name}("),
            Self::AtKeyword(name) => write!(f, "@{name}"),
            Self::Hash(value) => write!(f, "#{value}"),
            Self::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Self::Number(n) => write!(f, "{n}"),
            Self::Percentage(n) => write!(f, "{n}%"),
            Self::Dimension { value, unit } => write!(f, "{value}{unit}"),
            Self::Delim(c) => write!(f, "{c}"),
            Self::Whitespace => f.write_str(" "),
            Self::Colon => f.write_str(":"),
            Self::Semicolon => f.write_str(";"),
            Self::Comma => f.write_str(","),
            Self::LeftBracket => f.write_str("["),
            Self::RightBracket => f.write_str("]"),
            Self::LeftParen => f.write_str("("),
            Self::RightParen => f.write_str(")"),
            Self::LeftBrace => f.write_str("{"),
            Self::RightBrace => f.write_str("}"),
            Self::EOF => Ok(()),
        }
    }
}
