//! [§ 16.2 Alignment: the 'text-align' property](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
//!
//! "This property describes how inline-level content of a block container
//! is aligned. ... If 'text-align' is 'justify', this property specifies
//! that the inline-level boxes are to be stretched ... The last line of a
//! block is aligned to the start."

use crate::style::TextAlign;

/// Horizontal shift of each item of one line box, given the item widths.
///
/// `extent` is the width of the content on the line and `line_width` the
/// width of the line box. Justified lines spread the free space evenly
/// between the items that have a width; empty items move with the item
/// before them. A line that overflows is never shifted.
pub(crate) fn line_offsets(
    widths: &[f32],
    extent: f32,
    line_width: f32,
    align: TextAlign,
    is_last: bool,
) -> Vec<f32> {
    let free = (line_width - extent).max(0.0);
    let uniform = |offset: f32| vec![offset; widths.len()];
    match align {
        TextAlign::Left => uniform(0.0),
        TextAlign::Right => uniform(free),
        TextAlign::Center => uniform(free / 2.0),
        TextAlign::Justify => {
            let visible = widths.iter().filter(|&&w| w > 0.0).count();
            if is_last || visible < 2 {
                return uniform(0.0);
            }
            let per_gap = free / (visible - 1) as f32;
            let mut seen = 0usize;
            widths
                .iter()
                .map(|&w| {
                    if w > 0.0 {
                        seen += 1;
                    }
                    per_gap * seen.saturating_sub(1) as f32
                })
                .collect()
        }
    }
}
