//! Font metrics services for layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow};
use fontdue::{Font, FontSettings};
use wren_css::style::FontStyle;
use wren_css::{ApproximateFontMetrics, FontMetrics, FontQuery, TextMetrics};

/// Font metrics backed by fontdue's per-glyph metrics.
///
/// One face serves every family, weight and style; only the size is
/// honoured. Advances come from `Font::metrics()` rather than
/// `Font::rasterize()` so no bitmaps are produced.
pub struct FontdueMetrics {
    font: Font,
}

impl FontdueMetrics {
    /// Parse a TrueType or OpenType font.
    ///
    /// # Errors
    ///
    /// Returns an error if fontdue rejects the data.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|e| anyhow!("invalid font data: {e}"))?;
        Ok(Self { font })
    }

    /// Load a font file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
        Self::from_bytes(&bytes).with_context(|| format!("parsing font {}", path.display()))
    }
}

impl FontMetrics for FontdueMetrics {
    fn measure(&self, text: &str, font: &FontQuery<'_>) -> TextMetrics {
        let width = text
            .chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| self.font.metrics(ch, font.size).advance_width)
            .sum();
        // [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
        // `line-height: normal` uses the face's own line spacing.
        let height = self
            .font
            .horizontal_line_metrics(font.size)
            .map_or(font.size * ApproximateFontMetrics::LINE_HEIGHT_RATIO, |m| m.new_line_size);
        TextMetrics { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    family: String,
    size: u32,
    weight: u16,
    style: FontStyle,
}

/// Memoizing wrapper around another [`FontMetrics`].
///
/// Layout measures the same words many times while trying line breaks; a
/// page keeps one cache for all of its passes.
pub struct CachedMetrics {
    inner: Box<dyn FontMetrics + Send>,
    cache: RefCell<HashMap<CacheKey, TextMetrics>>,
    hits: Cell<u64>,
}

impl CachedMetrics {
    /// Wrap `inner` with an empty cache.
    #[must_use]
    pub fn new(inner: Box<dyn FontMetrics + Send>) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
        }
    }

    /// Distinct measurements held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Whether nothing has been measured yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    /// Measurements answered from the cache.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.get()
    }

    /// Forget every measurement, for a newly loaded page.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
        self.hits.set(0);
    }
}

impl FontMetrics for CachedMetrics {
    fn measure(&self, text: &str, font: &FontQuery<'_>) -> TextMetrics {
        let key = CacheKey {
            text: text.to_string(),
            family: font.family.to_string(),
            size: font.size.to_bits(),
            weight: font.weight,
            style: font.style,
        };
        if let Some(metrics) = self.cache.borrow().get(&key) {
            self.hits.set(self.hits.get() + 1);
            return *metrics;
        }
        let metrics = self.inner.measure(text, font);
        let _ = self.cache.borrow_mut().insert(key, metrics);
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wren_css::ComputedStyle;

    #[test]
    fn test_cache_answers_repeats() {
        let metrics = CachedMetrics::new(Box::new(ApproximateFontMetrics));
        let style = ComputedStyle::default();
        let font = FontQuery::from_style(&style);

        let first = metrics.measure("hello", &font);
        let second = metrics.measure("hello", &font);
        assert_eq!(first, second);
        assert_eq!(first, ApproximateFontMetrics.measure("hello", &font));
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics.hits(), 1);

        let _ = metrics.measure("other", &font);
        assert_eq!(metrics.len(), 2);
        metrics.clear();
        assert!(metrics.is_empty());
    }

    #[test]
    fn test_cache_keys_on_font_size() {
        let metrics = CachedMetrics::new(Box::new(ApproximateFontMetrics));
        let mut style = ComputedStyle::default();
        let small = metrics.measure("x", &FontQuery::from_style(&style)).width;
        style.font_size *= 2.0;
        let large = metrics.measure("x", &FontQuery::from_style(&style)).width;
        assert!((large - 2.0 * small).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_font_is_rejected() {
        assert!(FontdueMetrics::from_bytes(b"not a font").is_err());
    }
}
