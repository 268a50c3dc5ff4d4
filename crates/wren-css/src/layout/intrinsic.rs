//! Intrinsic sizes.
//!
//! [CSS Sizing § 5 Intrinsic Size Determination](https://www.w3.org/TR/css-sizing-3/#intrinsic-sizes)
//!
//! "The min-content inline size of a box is ... the narrowest inline size
//! it could take while fitting around its contents if all soft wrap
//! opportunities within the box were taken."
//!
//! "The max-content inline size of a box is ... the narrowest inline size
//! it could take while fitting around its contents if none of the soft
//! wrap opportunities within the box were taken."
//!
//! Measurement is read-only: nothing here writes geometry.

use wren_dom::ElementKind;

use crate::style::{ComputedStyle, InnerDisplayType, LengthValue};

use super::block::{content_size, resolve_edges};
use super::box_tree::BoxId;
use super::font_metrics::FontQuery;
use super::{LayoutError, Layouter};

/// Deeper subtrees measure as zero width.
const MAX_MEASURE_DEPTH: usize = 64;

/// Running totals while measuring an inline formatting context.
#[derive(Debug, Default)]
struct InlineExtent {
    min: f32,
    max: f32,
    line: f32,
}

impl InlineExtent {
    fn add(&mut self, min: f32, max: f32) {
        self.min = self.min.max(min);
        self.line += max;
        self.max = self.max.max(self.line);
    }

    fn advance(&mut self, by: f32) {
        self.line += by;
        self.max = self.max.max(self.line);
    }
}

impl Layouter<'_> {
    /// Min-content and max-content widths of the content box of `id`.
    pub(crate) fn content_intrinsic(&self, id: BoxId) -> Result<(f32, f32), LayoutError> {
        self.content_intrinsic_inner(id, 0)
    }

    pub(crate) fn content_intrinsic_inner(&self, id: BoxId, depth: usize) -> Result<(f32, f32), LayoutError> {
        if depth >= MAX_MEASURE_DEPTH {
            return Ok((0.0, 0.0));
        }
        let b = self.tree.node(id)?;
        if b.is_text || b.is_pseudo {
            return self.text_intrinsic(id);
        }
        if b.display.inner == InnerDisplayType::Table {
            let context = b.table_context.ok_or(LayoutError::NoTableContext(id))?;
            let spacing = b.style.border_spacing.resolve_or_zero(0.0);
            let extents = self.column_extents(context, depth + 1)?;
            let gaps = if extents.min.is_empty() {
                0.0
            } else {
                spacing * (extents.min.len() + 1) as f32
            };
            return Ok((
                extents.min.iter().sum::<f32>() + gaps,
                extents.max.iter().sum::<f32>() + gaps,
            ));
        }

        let children: Vec<BoxId> = b
            .children
            .iter()
            .copied()
            .filter(|&c| self.tree.get(c).is_some_and(|c| c.is_in_flow()))
            .collect();
        let has_block_children = children
            .iter()
            .any(|&c| self.tree.get(c).is_some_and(|c| c.is_block_level()));

        if has_block_children {
            // Blocks stack: the widest child decides.
            let mut extent = (0.0_f32, 0.0_f32);
            for child in children {
                let (min, max) = self.outer_intrinsic(child, depth + 1)?;
                extent = (extent.0.max(min), extent.1.max(max));
            }
            return Ok(extent);
        }

        let mut extent = InlineExtent::default();
        for child in children {
            self.inline_intrinsic(child, depth + 1, &mut extent)?;
        }
        Ok((extent.min, extent.max))
    }

    /// Intrinsic widths of `id` including its borders, padding and fixed
    /// margins. A fixed `width` in px overrides the content; percentages
    /// count as `auto`.
    pub(crate) fn outer_intrinsic(&self, id: BoxId, depth: usize) -> Result<(f32, f32), LayoutError> {
        let b = self.tree.node(id)?;
        if b.is_text {
            return self.text_intrinsic(id);
        }
        let style = b.style.clone();
        let edges = resolve_edges(&style, 0.0);
        let frame = edges.frame_width();
        let (mut min, mut max) = match fixed_width(&style, frame) {
            Some(width) => (width, width),
            None => self.content_intrinsic_inner(id, depth)?,
        };
        if let LengthValue::Px(px) = style.min_width {
            let floor = content_size(px, frame, style.box_sizing);
            min = min.max(floor);
            max = max.max(floor);
        }
        if let Some(LengthValue::Px(px)) = style.max_width {
            let ceiling = content_size(px, frame, style.box_sizing);
            max = max.min(ceiling).max(min);
        }
        let outside = frame + edges.margin().horizontal();
        Ok((min + outside, max + outside))
    }

    fn inline_intrinsic(&self, id: BoxId, depth: usize, extent: &mut InlineExtent) -> Result<(), LayoutError> {
        let b = self.tree.node(id)?;
        if b.is_pseudo {
            return Ok(());
        }
        if b.is_text {
            let (min, max) = self.text_intrinsic(id)?;
            extent.add(min, max);
            return Ok(());
        }
        if b.display.is_atomic_inline() {
            let (min, max) = self.outer_intrinsic(id, depth)?;
            extent.add(min, max);
            return Ok(());
        }
        if b.element == Some(ElementKind::Br) {
            extent.line = 0.0;
            return Ok(());
        }
        let edges = resolve_edges(&b.style, 0.0);
        let margin = edges.margin();
        let left = margin.left + edges.border.left + edges.padding.left;
        let right = margin.right + edges.border.right + edges.padding.right;
        let children = b.children.clone();
        extent.advance(left);
        extent.min = extent.min.max(left + right);
        if depth < MAX_MEASURE_DEPTH {
            for child in children {
                self.inline_intrinsic(child, depth + 1, extent)?;
            }
        }
        extent.advance(right);
        Ok(())
    }

    /// Min-content: the widest word, or the whole text where it cannot
    /// wrap. Max-content: the widest forced line.
    fn text_intrinsic(&self, id: BoxId) -> Result<(f32, f32), LayoutError> {
        let b = self.tree.node(id)?;
        let text = self.tree.text(id).ok_or(LayoutError::MissingText(id))?;
        let font = FontQuery::from_style(&b.style);
        let measure = |s: &str| self.metrics.text_width(s, &font);
        let white_space = b.style.white_space;

        let max = if white_space.collapses() {
            measure(text)
        } else {
            text.split('\n').map(measure).fold(0.0, f32::max)
        };
        let min = if white_space.wraps() {
            text.split([' ', '\t', '\n'])
                .map(measure)
                .fold(0.0, f32::max)
        } else {
            max
        };
        Ok((min, max))
    }
}

fn fixed_width(style: &ComputedStyle, frame: f32) -> Option<f32> {
    match style.width.length() {
        Some(LengthValue::Px(px)) => Some(content_size(px, frame, style.box_sizing)),
        _ => None,
    }
}
