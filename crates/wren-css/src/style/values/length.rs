//! CSS length values
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)

use serde::Serialize;

use crate::parser::ComponentValue;
use crate::tokenizer::CSSToken;

/// User agent default font size.
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths)
///
/// Absolute units other than `px` are converted at parse time. Font-relative
/// and viewport units are made absolute by the cascade; percentages survive
/// into layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LengthValue {
    /// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
    Px(f32),
    /// "Equal to the computed value of the font-size property of the element"
    Em(f32),
    /// "Equal to the computed value of font-size on the root element."
    Rem(f32),
    /// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    Percent(f32),
    /// "1vw = 1% of viewport width"
    Vw(f32),
    /// "1vh = 1% of viewport height"
    Vh(f32),
}

impl LengthValue {
    /// `0px`
    pub const ZERO: Self = Self::Px(0.0);

    /// Make font-relative and viewport units absolute. Percentages are kept.
    #[must_use]
    pub fn absolutize(self, font_size: f32, root_font_size: f32, viewport: (f32, f32)) -> Self {
        match self {
            Self::Em(em) => Self::Px(em * font_size),
            Self::Rem(rem) => Self::Px(rem * root_font_size),
            Self::Vw(vw) => Self::Px(vw * viewport.0 / 100.0),
            Self::Vh(vh) => Self::Px(vh * viewport.1 / 100.0),
            other => other,
        }
    }

    /// Resolve against a percentage basis. Returns `None` for a percentage
    /// when no basis is known.
    ///
    /// Lengths that were never absolutized fall back to the default font
    /// size and a zero viewport.
    #[must_use]
    pub fn resolve(self, basis: Option<f32>) -> Option<f32> {
        match self {
            Self::Px(px) => Some(px),
            Self::Percent(pct) => basis.map(|b| pct * b / 100.0),
            Self::Em(v) | Self::Rem(v) => Some(v * DEFAULT_FONT_SIZE_PX),
            Self::Vw(_) | Self::Vh(_) => Some(0.0),
        }
    }

    /// Resolve against `basis`, treating an unresolvable value as zero.
    #[must_use]
    pub fn resolve_or_zero(self, basis: f32) -> f32 {
        self.resolve(Some(basis)).unwrap_or(0.0)
    }

    /// Whether the value depends on the containing block.
    #[must_use]
    pub const fn is_percent(&self) -> bool {
        matches!(self, Self::Percent(_))
    }
}

/// A length that may also be `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AutoLength {
    /// The `auto` keyword.
    Auto,
    /// An explicit length.
    Length(LengthValue),
}

impl AutoLength {
    /// Whether this is `auto`.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// The length, unless `auto`.
    #[must_use]
    pub const fn length(&self) -> Option<LengthValue> {
        match self {
            Self::Auto => None,
            Self::Length(l) => Some(*l),
        }
    }
}

impl Default for AutoLength {
    fn default() -> Self {
        Self::Length(LengthValue::ZERO)
    }
}

/// Parse one component value as a length.
///
/// [§ 6.2 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
/// "1in = 2.54cm = 96px", "1pt = 1/72th of 1in".
pub fn parse_length(value: &ComponentValue) -> Option<LengthValue> {
    let value = value.token()?;
    match value {
        CSSToken::Dimension { value, unit } => {
            let v = *value as f32;
            Some(match unit.as_str() {
                "px" => LengthValue::Px(v),
                "pt" => LengthValue::Px(v * 96.0 / 72.0),
                "pc" => LengthValue::Px(v * 16.0),
                "in" => LengthValue::Px(v * 96.0),
                "cm" => LengthValue::Px(v * 96.0 / 2.54),
                "mm" => LengthValue::Px(v * 96.0 / 25.4),
                "em" => LengthValue::Em(v),
                "rem" => LengthValue::Rem(v),
                "vw" => LengthValue::Vw(v),
                "vh" => LengthValue::Vh(v),
                _ => return None,
            })
        }
        CSSToken::Percentage(p) => Some(LengthValue::Percent(*p as f32)),
        // "the unit identifier may be omitted" for zero lengths.
        CSSToken::Number(n) if *n == 0.0 => Some(LengthValue::ZERO),
        _ => None,
    }
}

/// Parse one component value as a length or `auto`.
pub fn parse_auto_length(value: &ComponentValue) -> Option<AutoLength> {
    match value.token() {
        Some(t) if t.is_ident("auto") => Some(AutoLength::Auto),
        _ => parse_length(value).map(AutoLength::Length),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_declarations;

    fn first(css: &str) -> ComponentValue {
        parse_declarations(&format!("x: {css}"))[0].value[0].clone()
    }

    #[test]
    fn test_units() {
        assert_eq!(parse_length(&first("10px")), Some(LengthValue::Px(10.0)));
        assert_eq!(parse_length(&first("12pt")), Some(LengthValue::Px(16.0)));
        assert_eq!(parse_length(&first("2em")), Some(LengthValue::Em(2.0)));
        assert_eq!(parse_length(&first("50%")), Some(LengthValue::Percent(50.0)));
        assert_eq!(parse_length(&first("0")), Some(LengthValue::ZERO));
        assert_eq!(parse_length(&first("5")), None);
        assert_eq!(parse_length(&first("3furlongs")), None);
        assert_eq!(parse_auto_length(&first("AUTO")), Some(AutoLength::Auto));
    }

    #[test]
    fn test_absolutize_and_resolve() {
        let vp = (1000.0, 500.0);
        assert_eq!(LengthValue::Em(2.0).absolutize(10.0, 16.0, vp), LengthValue::Px(20.0));
        assert_eq!(LengthValue::Rem(2.0).absolutize(10.0, 16.0, vp), LengthValue::Px(32.0));
        assert_eq!(LengthValue::Vw(10.0).absolutize(10.0, 16.0, vp), LengthValue::Px(100.0));
        assert_eq!(LengthValue::Vh(10.0).absolutize(10.0, 16.0, vp), LengthValue::Px(50.0));
        assert_eq!(LengthValue::Percent(50.0).resolve(Some(300.0)), Some(150.0));
        assert_eq!(LengthValue::Percent(50.0).resolve(None), None);
    }
}
