//! Line breaking.
//!
//! [CSS Text § 5 Line Breaking and Word Boundaries](https://www.w3.org/TR/css-text-3/#line-breaking)
//!
//! Text is split greedily at soft wrap opportunities. Each returned range is
//! a line's slice of the input; the ranges are contiguous and together cover
//! the whole text, so whitespace at a break hangs at the end of the line that
//! precedes it.

use std::ops::Range;

use crate::style::WhiteSpace;

/// Where lines may break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakMode {
    /// Soft wrap opportunities at spaces are honoured.
    pub wrap: bool,
    /// Every `\n` forces a break.
    pub preserve_newlines: bool,
}

impl BreakMode {
    /// Collapsed, wrapping text.
    pub const NORMAL: Self = Self {
        wrap: true,
        preserve_newlines: false,
    };

    /// [CSS Text § 3 white-space](https://www.w3.org/TR/css-text-3/#white-space-property)
    #[must_use]
    pub const fn for_white_space(white_space: WhiteSpace) -> Self {
        Self {
            wrap: white_space.wraps(),
            preserve_newlines: !white_space.collapses(),
        }
    }
}

/// Split `text` into lines.
///
/// The first line may use `first_width` (the space left on the current
/// line); every later line uses `later_width`. A word that exceeds its
/// budget on its own is placed alone; a prefix whose width equals the
/// budget exactly fits. Trailing whitespace of a line is not counted
/// against its budget.
pub fn break_lines(
    text: &str,
    first_width: f32,
    later_width: f32,
    mode: BreakMode,
    measure: impl Fn(&str) -> f32,
) -> Vec<Range<usize>> {
    if text.is_empty() {
        return vec![0..0];
    }
    let mut lines = Vec::new();
    let mut budget = first_width;

    for segment in hard_segments(text, mode.preserve_newlines) {
        if !mode.wrap {
            lines.push(segment);
            budget = later_width;
            continue;
        }

        let opportunities = wrap_opportunities(text, segment.start, segment.end);
        let mut line_start = segment.start;
        let mut last_fit: Option<usize> = None;
        let mut i = 0;
        while i < opportunities.len() {
            let end = opportunities[i];
            if measure(trim_hanging(&text[line_start..end])) <= budget {
                last_fit = Some(end);
                i += 1;
                continue;
            }
            if let Some(fit) = last_fit {
                // Retry this opportunity on the next line.
                lines.push(line_start..fit);
                line_start = fit;
            } else {
                // A single word wider than the whole budget.
                lines.push(line_start..end);
                line_start = end;
                i += 1;
            }
            last_fit = None;
            budget = later_width;
        }
        if line_start < segment.end {
            lines.push(line_start..segment.end);
        }
        budget = later_width;
    }

    if mode.preserve_newlines && text.ends_with('\n') {
        lines.push(text.len()..text.len());
    }
    lines
}

/// The part of a line that counts against its width budget.
#[must_use]
pub fn trim_hanging(line: &str) -> &str {
    line.trim_end_matches([' ', '\t', '\n'])
}

/// Segments ending after each preserved newline, plus the tail.
fn hard_segments(text: &str, preserve_newlines: bool) -> Vec<Range<usize>> {
    if !preserve_newlines {
        return vec![0..text.len()];
    }
    let mut segments = Vec::new();
    let mut start = 0;
    for (index, _) in text.match_indices('\n') {
        segments.push(start..index + 1);
        start = index + 1;
    }
    if start < text.len() {
        segments.push(start..text.len());
    }
    segments
}

/// [CSS Text § 5.1](https://www.w3.org/TR/css-text-3/#line-break-details)
///
/// End offsets of every candidate line in `text[start..end]`: just before
/// each word that follows whitespace, and the segment end.
fn wrap_opportunities(text: &str, start: usize, end: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut previous_space = false;
    let mut seen_word = false;
    for (offset, ch) in text[start..end].char_indices() {
        let is_space = ch == ' ' || ch == '\t' || ch == '\n';
        if !is_space && previous_space && seen_word {
            out.push(start + offset);
        }
        if !is_space {
            seen_word = true;
        }
        previous_space = is_space;
    }
    out.push(end);
    out
}
