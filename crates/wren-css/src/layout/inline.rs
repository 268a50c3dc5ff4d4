//! Inline formatting contexts.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block. ... The
//! rectangular area that contains the boxes that form a line is called a
//! line box."
//!
//! Text boxes are split at line breaks; each piece becomes its own box so
//! that every fragment has a single rectangle.

use wren_dom::ElementKind;

use crate::style::{ComputedStyle, LineHeight};

use super::block::resolve_edges;
use super::box_model::Rect;
use super::box_tree::BoxId;
use super::font_metrics::FontQuery;
use super::justify::line_offsets;
use super::text::{BreakMode, break_lines, trim_hanging};
use super::{Basis, LayoutError, Layouter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemKind {
    Text,
    /// An inline-block or inline-table, laid out at the origin and moved
    /// into place once its line is known.
    Atomic,
    /// An inline box with no content, or an empty text fragment.
    Empty,
    /// A `<br>`.
    Break,
}

/// One piece of a line box.
#[derive(Debug, Clone, Copy)]
struct LineItem {
    id: BoxId,
    kind: ItemKind,
    /// Offset from the start of the line.
    x: f32,
    width: f32,
    height: f32,
}

#[derive(Debug, Default)]
struct Line {
    items: Vec<LineItem>,
    /// Right edge of the content placed so far.
    extent: f32,
}

/// Accumulates items into line boxes of a fixed width.
struct LineBuilder {
    width: f32,
    pen: f32,
    current: Line,
    lines: Vec<Line>,
}

impl LineBuilder {
    fn new(width: f32) -> Self {
        Self {
            width,
            pen: 0.0,
            current: Line::default(),
            lines: Vec::new(),
        }
    }

    fn is_line_empty(&self) -> bool {
        self.current
            .items
            .iter()
            .all(|item| item.kind == ItemKind::Empty && item.width <= 0.0)
            && self.pen <= 0.0
    }

    fn remaining(&self) -> f32 {
        (self.width - self.pen).max(0.0)
    }

    fn push(&mut self, id: BoxId, kind: ItemKind, width: f32, height: f32) {
        self.current.items.push(LineItem {
            id,
            kind,
            x: self.pen,
            width,
            height,
        });
        self.pen += width;
        self.current.extent = self.current.extent.max(self.pen);
    }

    fn advance(&mut self, by: f32) {
        self.pen += by;
        self.current.extent = self.current.extent.max(self.pen);
    }

    fn break_line(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
        self.pen = 0.0;
    }

    fn finish(mut self) -> Vec<Line> {
        if !self.current.items.is_empty() {
            self.break_line();
        }
        self.lines
    }
}

impl Layouter<'_> {
    /// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// Height of one line of `text`: the font's own line height for
    /// `line-height: normal`, the computed line height otherwise.
    pub(crate) fn text_height(&self, style: &ComputedStyle, text: &str) -> f32 {
        match style.line_height {
            LineHeight::Normal => self.metrics.measure(text, &FontQuery::from_style(style)).height,
            _ => style.line_height_px(),
        }
    }

    /// Lay out the inline-level children of `id` into line boxes inside
    /// `content`. Returns the total height of the line boxes.
    pub(crate) fn layout_inline_children(
        &mut self,
        id: BoxId,
        content: Rect,
        basis: Basis,
    ) -> Result<f32, LayoutError> {
        let container = self.tree.node(id)?;
        let align = container.style.text_align;
        let children = container.children.clone();

        let mut builder = LineBuilder::new(content.width);
        for &child in &children {
            self.feed_inline(child, &mut builder, basis)?;
        }
        let lines = builder.finish();

        // STEP 1: Stack the line boxes and place their items.
        let mut top = content.y;
        let mut first_line_top = None;
        let count = lines.len();
        for (index, line) in lines.iter().enumerate() {
            let height = line.items.iter().map(|item| item.height).fold(0.0, f32::max);
            let is_last = index + 1 == count
                || line.items.last().is_some_and(|item| item.kind == ItemKind::Break);
            let widths: Vec<f32> = line.items.iter().map(|item| item.width).collect();
            let offsets = line_offsets(&widths, line.extent, content.width, align, is_last);
            for (item, offset) in line.items.iter().zip(offsets) {
                // Items sit on the bottom of the line box.
                let x = content.x + item.x + offset;
                let y = top + height - item.height;
                match item.kind {
                    ItemKind::Atomic => self.translate(item.id, x, y),
                    ItemKind::Text | ItemKind::Empty | ItemKind::Break => {
                        let b = self.tree.node_mut(item.id)?;
                        b.geometry.rect = Rect::new(x, y, item.width, item.height);
                        if item.kind == ItemKind::Text {
                            b.line_count = 1;
                        }
                    }
                }
            }
            if first_line_top.is_none() {
                first_line_top = Some(top);
            }
            top += height;
        }

        // STEP 2: Inline boxes wrap whatever they contain.
        for &child in &children {
            self.settle_inline_box(child)?;
        }

        let b = self.tree.node_mut(id)?;
        b.line_count = count;
        b.first_line_top = first_line_top;
        self.lines += count;
        Ok(top - content.y)
    }

    fn feed_inline(&mut self, id: BoxId, builder: &mut LineBuilder, basis: Basis) -> Result<(), LayoutError> {
        let b = self.tree.node(id)?;
        if b.is_pseudo {
            return Ok(());
        }
        if b.is_text {
            return self.feed_text(id, builder);
        }
        let style = b.style.clone();
        if b.display.is_atomic_inline() {
            return self.feed_atomic(id, &style, builder, basis);
        }
        if b.element == Some(ElementKind::Br) {
            let height = self.text_height(&style, "");
            builder.push(id, ItemKind::Break, 0.0, height);
            builder.break_line();
            return Ok(());
        }

        // [§ 10.6.1 Inline, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-non-replaced)
        // Horizontal margins, borders and padding take room on the line.
        let children = b.children.clone();
        let edges = resolve_edges(&style, builder.width);
        let left = edges.margin_left.unwrap_or(0.0) + edges.border.left + edges.padding.left;
        let right = edges.margin_right.unwrap_or(0.0) + edges.border.right + edges.padding.right;
        {
            let b = self.tree.node_mut(id)?;
            b.geometry.margin = edges.margin();
            b.geometry.border = edges.border;
            b.geometry.padding = edges.padding;
        }
        if children.is_empty() {
            builder.push(id, ItemKind::Empty, left + right, edges.frame_height());
            return Ok(());
        }
        builder.advance(left);
        for child in children {
            self.feed_inline(child, builder, basis)?;
        }
        builder.advance(right);
        Ok(())
    }

    /// [CSS Text § 4.1.2](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
    ///
    /// "A sequence of collapsible spaces at the beginning of a line is
    /// removed." Removed spaces stay in the first fragment's slice but take
    /// no width, so the fragments still cover the whole text.
    fn feed_text(&mut self, id: BoxId, builder: &mut LineBuilder) -> Result<(), LayoutError> {
        let style = self.tree.node(id)?.style.clone();
        let text = self
            .tree
            .text(id)
            .ok_or(LayoutError::MissingText(id))?
            .to_string();
        let font = FontQuery::from_style(&style);
        let metrics = self.metrics;
        let measure = |s: &str| metrics.text_width(s, &font);
        let mode = BreakMode::for_white_space(style.white_space);
        let height = self.text_height(&style, &text);
        self.tree.node_mut(id)?.natural_width = Some(measure(&text));

        let collapses = style.white_space.collapses();
        let mut skip = 0;
        if collapses && builder.is_line_empty() {
            skip = text.len() - text.trim_start_matches(' ').len();
        }
        let collapsed = skip;
        if skip == text.len() {
            let _ = self.tree.split_text(id, &[0..text.len()])?;
            builder.push(id, ItemKind::Empty, 0.0, 0.0);
            return Ok(());
        }

        // The first range goes on the current line unless a break is taken.
        let mut ranges = Vec::new();
        let mut first_budget = builder.remaining();
        if mode.wrap && !builder.is_line_empty() {
            let rest = &text[skip..];
            let lead = rest.len() - rest.trim_start_matches([' ', '\t']).len();
            let word_end = rest[lead..]
                .find([' ', '\t', '\n'])
                .map_or(rest.len(), |end| lead + end);
            if lead < rest.len() && measure(&rest[..word_end]) > builder.remaining() {
                if lead > 0 {
                    // The spaces are a break opportunity and hang at the end
                    // of the current line.
                    ranges.push(skip..skip + lead);
                    skip += lead;
                } else {
                    // No opportunity inside the text: break before it.
                    builder.break_line();
                }
                first_budget = builder.width;
            }
        }
        let offset = skip;
        ranges.extend(
            break_lines(&text[offset..], first_budget, builder.width, mode, measure)
                .into_iter()
                .map(|r| r.start + offset..r.end + offset),
        );
        // Leading collapsed spaces join the first fragment.
        if let Some(first) = ranges.first_mut() {
            first.start = 0;
        }

        let fragments = self.tree.split_text(id, &ranges)?;
        let last = ranges.len() - 1;
        for (index, (range, fragment)) in ranges.iter().zip(fragments).enumerate() {
            if index > 0 {
                builder.break_line();
            }
            let visible = if index == 0 { collapsed } else { range.start };
            let slice = &text[visible..range.end];
            let width = if index == last {
                measure(slice.trim_end_matches('\n'))
            } else {
                measure(trim_hanging(slice))
            };
            builder.push(fragment, ItemKind::Text, width, height);
        }
        Ok(())
    }

    /// [§ 10.3.9 'Inline-block', non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#inlineblock-width)
    fn feed_atomic(
        &mut self,
        id: BoxId,
        style: &ComputedStyle,
        builder: &mut LineBuilder,
        basis: Basis,
    ) -> Result<(), LayoutError> {
        let edges = resolve_edges(style, builder.width);
        self.layout_block_box(id, 0.0, builder.width, edges.margin_top, &edges, basis)?;
        let geometry = self.tree.node(id)?.geometry;
        let width = geometry.rect.width + geometry.margin.horizontal();
        let height = geometry.rect.height + geometry.margin.vertical();
        if !builder.is_line_empty() && width > builder.remaining() {
            builder.break_line();
        }
        builder.push(id, ItemKind::Atomic, width, height);
        Ok(())
    }

    /// Give a non-atomic inline box the rectangle around its fragments,
    /// grown by its borders and padding.
    fn settle_inline_box(&mut self, id: BoxId) -> Result<(), LayoutError> {
        let b = self.tree.node(id)?;
        if b.is_text || b.is_pseudo || b.display.is_atomic_inline() || b.children.is_empty() {
            return Ok(());
        }
        let children = b.children.clone();
        for &child in &children {
            self.settle_inline_box(child)?;
        }
        let mut bounds: Option<Rect> = None;
        for &child in &children {
            let c = self.tree.node(child)?;
            if c.is_pseudo {
                continue;
            }
            let rect = c.geometry.rect;
            bounds = Some(bounds.map_or(rect, |r| r.union(&rect)));
        }
        let b = self.tree.node_mut(id)?;
        if let Some(inner) = bounds {
            let frame = b.geometry.border.add(&b.geometry.padding);
            b.geometry.rect = Rect::new(
                inner.x - frame.left,
                inner.y - frame.top,
                inner.width + frame.horizontal(),
                inner.height + frame.vertical(),
            );
        }
        Ok(())
    }
}
