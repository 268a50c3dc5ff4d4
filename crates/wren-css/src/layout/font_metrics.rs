//! Text measurement.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use crate::style::{ComputedStyle, FontStyle};

/// The font a piece of text is set in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontQuery<'a> {
    /// First family of `font-family`.
    pub family: &'a str,
    /// Font size in px.
    pub size: f32,
    /// Numeric weight, 100 to 900.
    pub weight: u16,
    /// Upright or slanted.
    pub style: FontStyle,
}

impl<'a> FontQuery<'a> {
    /// The font described by a computed style.
    #[must_use]
    pub fn from_style(style: &'a ComputedStyle) -> Self {
        Self {
            family: &style.font_family,
            size: style.font_size,
            weight: style.font_weight,
            style: style.font_style,
        }
    }
}

/// Measured extent of a run of text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    /// Sum of glyph advances.
    pub width: f32,
    /// Height of one line of the font.
    pub height: f32,
}

/// Font metrics oracle used by layout.
///
/// Implementors provide advance widths and line heights; layout calls
/// [`FontMetrics::measure`] for every text fragment it places and for every
/// candidate line break.
pub trait FontMetrics {
    /// Measure `text` set in `font`.
    fn measure(&self, text: &str, font: &FontQuery<'_>) -> TextMetrics;

    /// Width of `text` set in `font`.
    fn text_width(&self, text: &str, font: &FontQuery<'_>) -> f32 {
        self.measure(text, font).width
    }
}

/// Approximate font metrics using fixed ratios.
///
/// The average advance of Latin glyphs in a proportional font is about
/// 0.6× the font size; line height uses 1.2×, the upper end of the range
/// recommended for `line-height: normal`. Used when no font file is
/// available, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontMetrics;

impl ApproximateFontMetrics {
    /// Advance width per character relative to the font size.
    pub const CHAR_WIDTH_RATIO: f32 = 0.6;
    /// Line height relative to the font size.
    pub const LINE_HEIGHT_RATIO: f32 = 1.2;
}

impl FontMetrics for ApproximateFontMetrics {
    fn measure(&self, text: &str, font: &FontQuery<'_>) -> TextMetrics {
        TextMetrics {
            width: text.chars().count() as f32 * font.size * Self::CHAR_WIDTH_RATIO,
            height: font.size * Self::LINE_HEIGHT_RATIO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approximate_metrics() {
        let style = ComputedStyle::default();
        let font = FontQuery::from_style(&style);
        let metrics = ApproximateFontMetrics.measure("abcde", &font);
        assert!((metrics.width - 48.0).abs() < 1e-3);
        assert!((metrics.height - 19.2).abs() < 1e-3);
    }
}
