//! CSS Layout Engine
//!
//! This module implements the CSS Visual Formatting Model for the box tree.
//!
//! # Relevant Specifications
//!
//! - [CSS Display Module Level 3](https://www.w3.org/TR/css-display-3/)
//! - [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS 2.1 Tables](https://www.w3.org/TR/CSS2/tables.html)
//! - [CSS Text Module Level 3](https://www.w3.org/TR/css-text-3/)
//!
//! # Module Structure
//!
//! - [`box_model`] - Rectangles, edge sizes and box geometry
//! - [`box_tree`] - Box generation, anonymous boxes, formatting contexts
//! - [`font_metrics`] - Text measurement oracle
//! - [`text`] - Line breaking
//! - `intrinsic` - Min-content and max-content widths
//! - `block` - Block formatting contexts, widths, heights and margins
//! - `inline` - Inline formatting contexts and line boxes
//! - `table` - Table column and row sizing
//! - `justify` - Horizontal alignment within line boxes
//!
//! # Passes
//!
//! Layout walks the box tree once from the root. For each box, edges
//! resolve against the parent's content width and `max-*`/`min-*` clamp
//! the used size top-down; shrink-to-fit boxes measure their natural width
//! first. Children are then positioned in the box's formatting context,
//! text is broken into lines, and auto heights propagate back up. Line
//! content is aligned once each inline formatting context is complete.

pub mod box_model;
pub mod box_tree;
pub mod font_metrics;
pub mod text;

mod block;
mod inline;
mod intrinsic;
mod justify;
mod table;

pub use box_model::{BoxGeometry, EdgeSizes, Rect};
pub use box_tree::{BoxId, BoxTree, LayoutBox, TableCell, TableGrid};
pub use font_metrics::{ApproximateFontMetrics, FontMetrics, FontQuery, TextMetrics};
pub use text::{BreakMode, break_lines, trim_hanging};

use log::debug;
use serde::Serialize;
use thiserror::Error;

/// Structural failure during layout. Unresolvable CSS never produces one;
/// it falls back to auto or zero.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// A box index points outside the tree.
    #[error("box {0} is not in the box tree")]
    DanglingBox(BoxId),
    /// A text box has no text behind it.
    #[error("text box {0} has no text")]
    MissingText(BoxId),
    /// A table box was never given a table formatting context.
    #[error("table box {0} has no formatting context")]
    NoTableContext(BoxId),
    /// A table formatting context has no grid.
    #[error("table formatting context {0} has no grid")]
    MissingTable(usize),
}

/// Result of a layout pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LayoutSummary {
    /// Height of the root box: the total content height of the page.
    pub content_height: f32,
    /// Boxes in the tree after line wrapping.
    pub box_count: usize,
    /// Line boxes created.
    pub line_count: usize,
}

/// Sizes of the nearest ancestor with a definite width and height, used to
/// resolve percentage sizes and size constraints.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Basis {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

/// Shared state of one layout pass.
pub(crate) struct Layouter<'a> {
    pub tree: &'a mut BoxTree,
    pub metrics: &'a dyn FontMetrics,
    pub lines: usize,
}

/// Lay out `tree` for a viewport `available_width` px wide, writing every
/// box's geometry in place.
///
/// Running layout again on the same tree recomputes it from scratch.
pub fn layout(
    tree: &mut BoxTree,
    available_width: f32,
    metrics: &dyn FontMetrics,
) -> Result<LayoutSummary, LayoutError> {
    tree.reset_continuations();
    let root = tree.root();
    let root_style = tree.node(root)?.style.clone();
    let edges = block::resolve_edges(&root_style, available_width);
    let width = (available_width - edges.frame_width()).max(0.0);

    let mut layouter = Layouter {
        tree,
        metrics,
        lines: 0,
    };
    let basis = Basis {
        width: Some(available_width),
        height: None,
    };
    layouter.layout_sized_box(root, 0.0, 0.0, width, &edges, basis)?;

    let summary = LayoutSummary {
        content_height: layouter.tree.node(root)?.geometry.rect.height,
        box_count: layouter.tree.len(),
        line_count: layouter.lines,
    };
    debug!(
        "layout: {} boxes, {} lines, content height {}",
        summary.box_count, summary.line_count, summary.content_height
    );
    Ok(summary)
}

impl Layouter<'_> {
    /// Move `id` and everything inside it.
    pub(crate) fn translate(&mut self, id: BoxId, dx: f32, dy: f32) {
        for inner in self.tree.descendants(id) {
            if let Ok(b) = self.tree.node_mut(inner) {
                b.geometry.rect.x += dx;
                b.geometry.rect.y += dy;
                if let Some(top) = &mut b.first_line_top {
                    *top += dy;
                }
            }
        }
    }
}
