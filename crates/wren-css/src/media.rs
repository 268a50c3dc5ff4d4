//! CSS Media Queries
//!
//! [§ 2 Media Queries](https://www.w3.org/TR/mediaqueries-4/#media)
//!
//! A media query is a boolean expression tree. Terminals are media types
//! (`all`, `screen`, `print`) and media features such as `(min-width: 600px)`;
//! interior nodes are `not`, `only`, `and` and `or` (a comma-separated list is
//! an `or`). Evaluation is bottom-up against a [`MediaContext`].
//!
//! ```css
//! @media screen { ... }
//! @media (min-width: 768px) and (max-width: 1024px) { ... }
//! @media not print, (orientation: landscape) { ... }
//! ```

use serde::Serialize;
use wren_common::warning::warn_once;

use crate::tokenizer::{CSSToken, tokenize};

/// Default font size used to resolve `em`/`rem` in media features.
///
/// [§ 5.1 Units](https://www.w3.org/TR/mediaqueries-4/#units)
/// "Relative length units in media queries are based on the initial value
/// of the font-size property."
const INITIAL_FONT_SIZE: f32 = 16.0;

/// [§ 2.3 Media Types](https://www.w3.org/TR/mediaqueries-4/#media-types)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaType {
    /// Matches all devices.
    All,
    /// Computer screens.
    Screen,
    /// Paged media.
    Print,
    /// A type this renderer never is (`tv`, `speech`, ...).
    Other,
}

/// [§ 4.2 Orientation](https://www.w3.org/TR/mediaqueries-4/#orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    /// Height is greater than or equal to width.
    Portrait,
    /// Width is greater than height.
    Landscape,
}

/// A media feature test. Lengths are stored in px.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MediaFeature {
    /// `(width: V)`
    Width(f32),
    /// `(min-width: V)`, inclusive.
    MinWidth(f32),
    /// `(max-width: V)`, inclusive.
    MaxWidth(f32),
    /// `(height: V)`
    Height(f32),
    /// `(min-height: V)`, inclusive.
    MinHeight(f32),
    /// `(max-height: V)`, inclusive.
    MaxHeight(f32),
    /// `(orientation: portrait | landscape)`
    Orientation(Orientation),
    /// `(width)` or `(height)` in boolean context: true for a non-zero value.
    Boolean(String),
    /// A feature this renderer does not evaluate; never matches.
    Unknown(String),
}

/// A parsed media query expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MediaQuery {
    /// A media type terminal.
    Type(MediaType),
    /// A media feature terminal.
    Feature(MediaFeature),
    /// `not <query>`
    Not(Box<MediaQuery>),
    /// `only <query>`; evaluates like its operand.
    Only(Box<MediaQuery>),
    /// `<a> and <b>`
    And(Box<MediaQuery>, Box<MediaQuery>),
    /// `<a> or <b>`, or `<a>, <b>`
    Or(Box<MediaQuery>, Box<MediaQuery>),
}

/// The environment a query is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaContext {
    /// Viewport width in px.
    pub width: f32,
    /// Viewport height in px.
    pub height: f32,
    /// The medium being rendered to.
    pub media_type: MediaType,
}

impl MediaContext {
    /// A screen context with the given viewport.
    #[must_use]
    pub const fn screen(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            media_type: MediaType::Screen,
        }
    }

    /// Evaluate `query` in this context.
    #[must_use]
    pub fn evaluate(&self, query: &MediaQuery) -> bool {
        query.matches(self)
    }

    fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

impl MediaQuery {
    /// Parse a media query list. Returns `None` on a syntax error.
    ///
    /// [§ 3.2 Error Handling](https://www.w3.org/TR/mediaqueries-4/#error-handling)
    /// "A media query that does not match the grammar ... is replaced by
    /// not all" is left to the caller, which also decides how to log it.
    pub fn parse(input: &str) -> Option<Self> {
        let tokens: Vec<CSSToken> = tokenize(input)
            .into_iter()
            .filter(|t| *t != CSSToken::Whitespace)
            .collect();
        let mut parser = MediaParser { tokens, pos: 0 };
        let query = parser.parse_query_list()?;
        parser.at_end().then_some(query)
    }

    /// The query `not all`, which never matches.
    #[must_use]
    pub fn not_all() -> Self {
        Self::Not(Box::new(Self::Type(MediaType::All)))
    }

    /// `a and b`
    #[must_use]
    pub fn and(a: Self, b: Self) -> Self {
        Self::And(Box::new(a), Box::new(b))
    }

    /// `a or b`
    #[must_use]
    pub fn or(a: Self, b: Self) -> Self {
        Self::Or(Box::new(a), Box::new(b))
    }

    /// Evaluate bottom-up against `ctx`.
    #[must_use]
    pub fn matches(&self, ctx: &MediaContext) -> bool {
        match self {
            Self::Type(MediaType::All) => true,
            Self::Type(MediaType::Other) => false,
            Self::Type(t) => *t == ctx.media_type,
            Self::Feature(feature) => feature.matches(ctx),
            Self::Not(inner) => !inner.matches(ctx),
            Self::Only(inner) => inner.matches(ctx),
            Self::And(a, b) => a.matches(ctx) && b.matches(ctx),
            Self::Or(a, b) => a.matches(ctx) || b.matches(ctx),
        }
    }
}

impl MediaFeature {
    fn matches(&self, ctx: &MediaContext) -> bool {
        match self {
            Self::Width(v) => ctx.width == *v,
            Self::MinWidth(v) => ctx.width >= *v,
            Self::MaxWidth(v) => ctx.width <= *v,
            Self::Height(v) => ctx.height == *v,
            Self::MinHeight(v) => ctx.height >= *v,
            Self::MaxHeight(v) => ctx.height <= *v,
            Self::Orientation(o) => ctx.orientation() == *o,
            Self::Boolean(name) => match name.as_str() {
                "width" => ctx.width > 0.0,
                "height" => ctx.height > 0.0,
                _ => true,
            },
            Self::Unknown(_) => false,
        }
    }

    fn parse(name: &str, value: Option<&CSSToken>) -> Option<Self> {
        let Some(value) = value else {
            return Some(match name {
                "width" | "height" | "orientation" => Self::Boolean(name.to_string()),
                _ => {
                    warn_once("CSS", &format!("unsupported media feature '{name}'"));
                    Self::Unknown(name.to_string())
                }
            });
        };
        let feature = match name {
            "width" => Self::Width(length_px(value)?),
            "min-width" => Self::MinWidth(length_px(value)?),
            "max-width" => Self::MaxWidth(length_px(value)?),
            "height" => Self::Height(length_px(value)?),
            "min-height" => Self::MinHeight(length_px(value)?),
            "max-height" => Self::MaxHeight(length_px(value)?),
            "orientation" => match value {
                CSSToken::Ident(v) if v.eq_ignore_ascii_case("portrait") => {
                    Self::Orientation(Orientation::Portrait)
                }
                CSSToken::Ident(v) if v.eq_ignore_ascii_case("landscape") => {
                    Self::Orientation(Orientation::Landscape)
                }
                _ => return None,
            },
            other => {
                warn_once("CSS", &format!("unsupported media feature '{other}'"));
                Self::Unknown(other.to_string())
            }
        };
        Some(feature)
    }
}

fn length_px(token: &CSSToken) -> Option<f32> {
    match token {
        CSSToken::Dimension { value, unit } => {
            let value = *value as f32;
            match unit.as_str() {
                "px" => Some(value),
                "em" | "rem" => Some(value * INITIAL_FONT_SIZE),
                "pt" => Some(value * 4.0 / 3.0),
                _ => None,
            }
        }
        CSSToken::Number(n) if *n == 0.0 => Some(0.0),
        _ => None,
    }
}

/// Recursive-descent parser over whitespace-free tokens.
///
/// ```text
/// query-list   = query ("," query)*
/// query        = ["not" | "only"] type ["and" condition] | condition
/// condition    = "not" in-parens | in-parens (("and" | "or") in-parens)*
/// in-parens    = "(" condition ")" | "(" feature ")"
/// ```
struct MediaParser {
    tokens: Vec<CSSToken>,
    pos: usize,
}

impl MediaParser {
    fn parse_query_list(&mut self) -> Option<MediaQuery> {
        let mut query = self.parse_query()?;
        while self.peek() == Some(&CSSToken::Comma) {
            self.pos += 1;
            query = MediaQuery::or(query, self.parse_query()?);
        }
        Some(query)
    }

    fn parse_query(&mut self) -> Option<MediaQuery> {
        if self.peek() == Some(&CSSToken::LeftParen) {
            return self.parse_condition();
        }

        let modifier = match self.peek() {
            Some(t) if t.is_ident("not") => Some(true),
            Some(t) if t.is_ident("only") => Some(false),
            _ => None,
        };
        if modifier.is_some() {
            self.pos += 1;
            // `not (width: 1px)` is a negated condition, not a typed query.
            if modifier == Some(true) && self.peek() == Some(&CSSToken::LeftParen) {
                return Some(MediaQuery::Not(Box::new(self.parse_in_parens()?)));
            }
        }

        let media_type = match self.next()? {
            CSSToken::Ident(name) => match name.to_ascii_lowercase().as_str() {
                "all" => MediaType::All,
                "screen" => MediaType::Screen,
                "print" => MediaType::Print,
                _ => MediaType::Other,
            },
            _ => return None,
        };

        let mut query = MediaQuery::Type(media_type);
        if self.peek().is_some_and(|t| t.is_ident("and")) {
            self.pos += 1;
            query = MediaQuery::and(query, self.parse_condition()?);
        }

        Some(match modifier {
            Some(true) => MediaQuery::Not(Box::new(query)),
            Some(false) => MediaQuery::Only(Box::new(query)),
            None => query,
        })
    }

    fn parse_condition(&mut self) -> Option<MediaQuery> {
        if self.peek().is_some_and(|t| t.is_ident("not")) {
            self.pos += 1;
            return Some(MediaQuery::Not(Box::new(self.parse_in_parens()?)));
        }

        let mut condition = self.parse_in_parens()?;
        let mut operator: Option<&'static str> = None;
        loop {
            let op = match self.peek() {
                Some(t) if t.is_ident("and") => "and",
                Some(t) if t.is_ident("or") => "or",
                _ => return Some(condition),
            };
            // Mixing `and` and `or` without parentheses is invalid.
            if operator.is_some_and(|prev| prev != op) {
                return None;
            }
            operator = Some(op);
            self.pos += 1;
            let rhs = self.parse_in_parens()?;
            condition = if op == "and" {
                MediaQuery::and(condition, rhs)
            } else {
                MediaQuery::or(condition, rhs)
            };
        }
    }

    fn parse_in_parens(&mut self) -> Option<MediaQuery> {
        if self.next()? != CSSToken::LeftParen {
            return None;
        }

        // A nested condition starts with `(` or `not`.
        let nested = match self.peek() {
            Some(CSSToken::LeftParen) => true,
            Some(t) if t.is_ident("not") => true,
            _ => false,
        };
        let inner = if nested {
            self.parse_condition()?
        } else {
            let name = match self.next()? {
                CSSToken::Ident(name) => name.to_ascii_lowercase(),
                _ => return None,
            };
            let value = if self.peek() == Some(&CSSToken::Colon) {
                self.pos += 1;
                Some(self.next()?)
            } else {
                None
            };
            MediaQuery::Feature(MediaFeature::parse(&name, value.as_ref())?)
        };

        (self.next()? == CSSToken::RightParen).then_some(inner)
    }

    fn peek(&self) -> Option<&CSSToken> {
        self.tokens.get(self.pos).filter(|t| !t.is_eof())
    }

    fn next(&mut self) -> Option<CSSToken> {
        let token = self.peek().cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at_end(&self) -> bool {
        self.peek().is_none()
    }
}
