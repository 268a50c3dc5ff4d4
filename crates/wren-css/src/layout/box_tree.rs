//! Box tree generation.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! Every render node produces one principal box. Anonymous boxes are
//! inserted so that every block container holds either only block-level or
//! only inline-level children, and so that table cells always sit in rows.
//! Formatting-context ids record which boxes are laid out together.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use log::debug;
use serde::Serialize;
use wren_dom::ElementKind;

use crate::render::{RenderId, RenderKind, RenderTree};
use crate::style::{
    ComputedStyle, Display, DisplayValue, InnerDisplayType, LengthValue, OuterDisplayType,
};

use super::LayoutError;
use super::box_model::BoxGeometry;

/// Index of a box in the [`BoxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BoxId(pub usize);

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A box in the box tree.
#[derive(Debug, Clone)]
pub struct LayoutBox {
    /// This box's index.
    pub id: BoxId,
    /// The render node that generated this box; `None` for anonymous boxes.
    pub render: Option<RenderId>,
    /// The element kind of the generating node.
    pub element: Option<ElementKind>,
    /// Style used for layout. Anonymous boxes inherit from their parent.
    pub style: ComputedStyle,
    /// Outer and inner display type.
    pub display: DisplayValue,
    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    pub is_anonymous: bool,
    /// A run of text.
    pub is_text: bool,
    /// A generated pseudo-element box (list markers).
    pub is_pseudo: bool,
    /// Non-owning back-reference.
    pub parent: Option<BoxId>,
    /// Children in order.
    pub children: Vec<BoxId>,
    /// Block formatting context this box participates in.
    pub block_context: Option<usize>,
    /// Inline formatting context this box participates in.
    pub inline_context: Option<usize>,
    /// Table formatting context this box belongs to.
    pub table_context: Option<usize>,
    /// Start of this box's slice of the render node's text.
    pub text_start: usize,
    /// End (exclusive) of this box's slice of the render node's text.
    pub text_end: usize,
    /// For boxes created by line wrapping, the box whose text was split.
    pub continuation_of: Option<BoxId>,
    /// Border box and resolved edges. Unset until layout.
    pub geometry: BoxGeometry,
    /// Max-content width, once measured.
    pub natural_width: Option<f32>,
    /// Line boxes established (containers) or occupied (text).
    pub line_count: usize,
    /// Top of the first line box inside this box.
    pub first_line_top: Option<f32>,
}

impl LayoutBox {
    fn new(id: BoxId, style: ComputedStyle, display: DisplayValue) -> Self {
        Self {
            id,
            render: None,
            element: None,
            style,
            display,
            is_anonymous: false,
            is_text: false,
            is_pseudo: false,
            parent: None,
            children: Vec::new(),
            block_context: None,
            inline_context: None,
            table_context: None,
            text_start: 0,
            text_end: 0,
            continuation_of: None,
            geometry: BoxGeometry::default(),
            natural_width: None,
            line_count: 0,
            first_line_top: None,
        }
    }

    /// The text slice as a range.
    #[must_use]
    pub const fn text_range(&self) -> Range<usize> {
        self.text_start..self.text_end
    }

    /// Whether this box takes part in flow layout among its siblings.
    #[must_use]
    pub const fn is_in_flow(&self) -> bool {
        !self.is_pseudo
    }

    /// Block-level box.
    #[must_use]
    pub fn is_block_level(&self) -> bool {
        self.display.is_block_level()
    }

    /// Whether children are laid out by block/inline flow.
    #[must_use]
    pub const fn is_flow_container(&self) -> bool {
        matches!(
            self.display.inner,
            InnerDisplayType::Flow | InnerDisplayType::FlowRoot | InnerDisplayType::TableCell
        )
    }
}

/// [§ 17.5 Visual layout of table contents](https://www.w3.org/TR/CSS2/tables.html#table-layout)
///
/// Placement of one cell in its table's grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    /// The cell box.
    pub cell: BoxId,
    /// Row of the top edge.
    pub row: usize,
    /// Column of the left edge.
    pub column: usize,
    /// Number of rows covered, at least 1.
    pub row_span: usize,
    /// Number of columns covered, at least 1.
    pub col_span: usize,
    /// Fixed `width` in px, if specified.
    pub fixed_width: Option<f32>,
    /// Fixed `height` in px, if specified.
    pub fixed_height: Option<f32>,
    /// Min-content width, filled during table sizing.
    pub min_width: f32,
    /// Max-content width, filled during table sizing.
    pub max_width: f32,
}

/// The grid of one table formatting context.
#[derive(Debug, Clone, PartialEq)]
pub struct TableGrid {
    /// The table box.
    pub table: BoxId,
    /// Row boxes in grid order; row groups are flattened.
    pub rows: Vec<BoxId>,
    /// Every cell with its slot.
    pub cells: Vec<TableCell>,
    /// Number of columns.
    pub columns: usize,
}

/// The box tree: the subject of layout.
#[derive(Debug, Clone)]
pub struct BoxTree {
    boxes: Vec<LayoutBox>,
    texts: HashMap<RenderId, String>,
    tables: Vec<TableGrid>,
    next_context: usize,
}

impl BoxTree {
    /// Generate boxes for every render node.
    #[must_use]
    pub fn build(render: &RenderTree) -> Self {
        let mut tree = Self {
            boxes: Vec::new(),
            texts: HashMap::new(),
            tables: Vec::new(),
            next_context: 0,
        };
        let root_style = render
            .get(render.root())
            .map(|node| node.style.clone())
            .unwrap_or_default();
        let root = tree.alloc(root_style, DisplayValue::block());
        tree.boxes[root.0].render = Some(render.root());
        for &child in render.children(render.root()) {
            if let Some(child_box) = tree.build_node(render, child) {
                tree.append(root, child_box);
            }
        }
        tree.fix_block_container(root);
        tree.assign_contexts(root);
        tree.build_table_grids(render);
        debug!(
            "box tree: {} boxes, {} formatting contexts, {} tables",
            tree.boxes.len(),
            tree.next_context,
            tree.tables.len()
        );
        tree
    }

    /// The root box, standing in for the initial containing block.
    #[must_use]
    pub const fn root(&self) -> BoxId {
        BoxId(0)
    }

    /// Look up a box.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&LayoutBox> {
        self.boxes.get(id.0)
    }

    /// Look up a box, failing on a dangling id.
    pub fn node(&self, id: BoxId) -> Result<&LayoutBox, LayoutError> {
        self.boxes.get(id.0).ok_or(LayoutError::DanglingBox(id))
    }

    /// Mutable lookup, failing on a dangling id.
    pub fn node_mut(&mut self, id: BoxId) -> Result<&mut LayoutBox, LayoutError> {
        self.boxes.get_mut(id.0).ok_or(LayoutError::DanglingBox(id))
    }

    /// Children of `id`; empty for an unknown id.
    #[must_use]
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        self.get(id).map_or(&[], |b| &b.children)
    }

    /// Boxes attached to the tree, in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutBox> {
        self.descendants(self.root())
            .into_iter()
            .filter_map(|id| self.get(id))
    }

    /// `id` and every box below it, in pre-order.
    #[must_use]
    pub fn descendants(&self, id: BoxId) -> Vec<BoxId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if self.get(next).is_none() {
                continue;
            }
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    /// Number of boxes attached to the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descendants(self.root()).len()
    }

    /// Always false: the root box exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// The text slice a text or marker box displays.
    #[must_use]
    pub fn text(&self, id: BoxId) -> Option<&str> {
        let b = self.get(id)?;
        let full = self.texts.get(&b.render?)?;
        full.get(b.text_range())
    }

    /// The whole text of the render node behind a text box.
    #[must_use]
    pub fn full_text(&self, id: BoxId) -> Option<&str> {
        let b = self.get(id)?;
        self.texts.get(&b.render?).map(String::as_str)
    }

    /// Table grids, indexed by table formatting-context id.
    #[must_use]
    pub fn tables(&self) -> &[TableGrid] {
        &self.tables
    }

    /// The grid of the table formatting context `context`.
    pub fn table_mut(&mut self, context: usize) -> Result<&mut TableGrid, LayoutError> {
        self.tables.get_mut(context).ok_or(LayoutError::MissingTable(context))
    }

    /// Grid lookup.
    pub fn table(&self, context: usize) -> Result<&TableGrid, LayoutError> {
        self.tables.get(context).ok_or(LayoutError::MissingTable(context))
    }

    /// Split a text box at line breaks: the box keeps the first range and a
    /// continuation sibling is inserted after it for each further range.
    /// Ranges are relative to the box's current slice.
    pub fn split_text(&mut self, id: BoxId, ranges: &[Range<usize>]) -> Result<Vec<BoxId>, LayoutError> {
        let original = self.node(id)?.clone();
        let parent = original.parent.ok_or(LayoutError::DanglingBox(id))?;
        let base = original.text_start;
        let mut ids = Vec::with_capacity(ranges.len());
        let mut insert_at = self
            .children(parent)
            .iter()
            .position(|&c| c == id)
            .ok_or(LayoutError::DanglingBox(id))?;

        for (index, range) in ranges.iter().enumerate() {
            if index == 0 {
                let b = self.node_mut(id)?;
                b.text_start = base + range.start;
                b.text_end = base + range.end;
                ids.push(id);
                continue;
            }
            let new_id = BoxId(self.boxes.len());
            let mut continuation = original.clone();
            continuation.id = new_id;
            continuation.text_start = base + range.start;
            continuation.text_end = base + range.end;
            continuation.continuation_of = Some(id);
            continuation.geometry = BoxGeometry::default();
            continuation.natural_width = None;
            continuation.line_count = 0;
            self.boxes.push(continuation);
            insert_at += 1;
            self.node_mut(parent)?.children.insert(insert_at, new_id);
            ids.push(new_id);
        }
        Ok(ids)
    }

    /// Undo earlier line wrapping so layout can run again on the same tree.
    pub fn reset_continuations(&mut self) {
        let continuations: Vec<(BoxId, Option<BoxId>)> = self
            .boxes
            .iter()
            .filter(|b| b.continuation_of.is_some() && b.parent.is_some())
            .map(|b| (b.id, b.parent))
            .collect();
        for (id, parent) in continuations {
            if let Some(parent) = parent {
                self.boxes[parent.0].children.retain(|&c| c != id);
            }
            self.boxes[id.0].parent = None;
        }
        for index in 0..self.boxes.len() {
            if self.boxes[index].is_text || self.boxes[index].is_pseudo {
                let full = self.full_text(BoxId(index)).map_or(0, str::len);
                let b = &mut self.boxes[index];
                b.text_start = 0;
                b.text_end = full;
            }
        }
    }

    fn alloc(&mut self, style: ComputedStyle, display: DisplayValue) -> BoxId {
        let id = BoxId(self.boxes.len());
        self.boxes.push(LayoutBox::new(id, style, display));
        id
    }

    fn append(&mut self, parent: BoxId, child: BoxId) {
        self.boxes[child.0].parent = Some(parent);
        self.boxes[parent.0].children.push(child);
    }

    fn build_node(&mut self, render: &RenderTree, id: RenderId) -> Option<BoxId> {
        let node = render.get(id)?;
        match &node.kind {
            RenderKind::Text { text } | RenderKind::Marker { text, .. } => {
                let b = self.alloc(node.style.clone(), DisplayValue::inline());
                let _ = self.texts.insert(id, text.clone());
                let layout_box = &mut self.boxes[b.0];
                layout_box.render = Some(id);
                layout_box.is_text = !node.is_marker();
                layout_box.is_pseudo = node.is_marker();
                layout_box.text_end = text.len();
                Some(b)
            }
            RenderKind::Root | RenderKind::Element { .. } => {
                let display = node.style.display.to_display_value()?;
                let b = self.alloc(node.style.clone(), display);
                self.boxes[b.0].render = Some(id);
                self.boxes[b.0].element = node.element_kind();
                for &child in &node.children {
                    if let Some(child_box) = self.build_node(render, child) {
                        self.append(b, child_box);
                    }
                }
                self.fix_box(b);
                Some(b)
            }
        }
    }

    fn fix_box(&mut self, id: BoxId) {
        // [§ 9.2.1.1](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
        // "When an inline box contains an in-flow block-level box, the inline
        // box (and its inline ancestors within the same line box) are broken
        // around the block-level box". Here the inline box is promoted.
        let display = self.boxes[id.0].display;
        if !display.is_block_level()
            && display.inner == InnerDisplayType::Flow
            && self.has_block_child(id)
        {
            self.boxes[id.0].display.outer = OuterDisplayType::Block;
        }

        match self.boxes[id.0].display.inner {
            InnerDisplayType::Table | InnerDisplayType::TableRowGroup => self.fix_table_children(id),
            InnerDisplayType::TableRow => self.fix_row_children(id),
            InnerDisplayType::Flow | InnerDisplayType::FlowRoot | InnerDisplayType::TableCell => {
                self.fix_block_container(id);
            }
        }
    }

    fn has_block_child(&self, id: BoxId) -> bool {
        self.children(id).iter().any(|&c| {
            let child = &self.boxes[c.0];
            child.is_in_flow() && child.is_block_level()
        })
    }

    fn is_whitespace_text(&self, id: BoxId) -> bool {
        self.boxes[id.0].is_text && self.text(id).is_some_and(|t| t.trim().is_empty())
    }

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "if a block container box has a block-level box inside it, then we
    /// force it to have only block-level boxes inside it." Maximal runs of
    /// inline-level children are wrapped in anonymous blocks; runs holding
    /// only collapsible whitespace are dropped.
    fn fix_block_container(&mut self, id: BoxId) {
        if !self.has_block_child(id) {
            return;
        }
        let children = std::mem::take(&mut self.boxes[id.0].children);
        let mut fixed = Vec::with_capacity(children.len());
        let mut run: Vec<BoxId> = Vec::new();
        for child in children {
            let b = &self.boxes[child.0];
            if !b.is_in_flow() {
                fixed.push(child);
            } else if b.is_block_level() {
                self.flush_inline_run(id, &mut run, &mut fixed);
                fixed.push(child);
            } else {
                run.push(child);
            }
        }
        self.flush_inline_run(id, &mut run, &mut fixed);
        self.boxes[id.0].children = fixed;
    }

    fn flush_inline_run(&mut self, parent: BoxId, run: &mut Vec<BoxId>, out: &mut Vec<BoxId>) {
        if run.is_empty() {
            return;
        }
        let items = std::mem::take(run);
        if items.iter().all(|&c| self.is_whitespace_text(c)) {
            for c in items {
                self.boxes[c.0].parent = None;
            }
            return;
        }
        let wrapper = self.anonymous(parent, Display::Block, DisplayValue::block());
        for c in items {
            self.append(wrapper, c);
        }
        out.push(wrapper);
    }

    fn anonymous(&mut self, parent: BoxId, display: Display, value: DisplayValue) -> BoxId {
        let mut style = ComputedStyle::inherit_from(&self.boxes[parent.0].style);
        style.display = display;
        let id = self.alloc(style, value);
        self.boxes[id.0].is_anonymous = true;
        self.boxes[id.0].parent = Some(parent);
        id
    }

    /// [§ 17.2.1 Anonymous table objects](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes)
    ///
    /// "If a child C of a 'table' or 'inline-table' box is not a proper
    /// table child, then generate an anonymous 'table-row' box around C and
    /// all consecutive siblings of C that are not proper table children."
    fn fix_table_children(&mut self, id: BoxId) {
        let children = std::mem::take(&mut self.boxes[id.0].children);
        let mut fixed = Vec::with_capacity(children.len());
        let mut run: Vec<BoxId> = Vec::new();
        for child in children {
            if self.is_whitespace_text(child) {
                self.boxes[child.0].parent = None;
                continue;
            }
            let inner = self.boxes[child.0].display.inner;
            if matches!(inner, InnerDisplayType::TableRow | InnerDisplayType::TableRowGroup) {
                self.flush_row_run(id, &mut run, &mut fixed);
                fixed.push(child);
            } else {
                run.push(child);
            }
        }
        self.flush_row_run(id, &mut run, &mut fixed);
        self.boxes[id.0].children = fixed;
    }

    fn flush_row_run(&mut self, parent: BoxId, run: &mut Vec<BoxId>, out: &mut Vec<BoxId>) {
        if run.is_empty() {
            return;
        }
        let row = self.anonymous(parent, Display::TableRow, DisplayValue::table_row());
        for c in std::mem::take(run) {
            self.append(row, c);
        }
        self.fix_row_children(row);
        out.push(row);
    }

    /// "If a child C of a 'table-row' box is not a 'table-cell', then
    /// generate an anonymous 'table-cell' box around C and all consecutive
    /// siblings of C that are not 'table-cell' boxes."
    fn fix_row_children(&mut self, id: BoxId) {
        let children = std::mem::take(&mut self.boxes[id.0].children);
        let mut fixed = Vec::with_capacity(children.len());
        let mut run: Vec<BoxId> = Vec::new();
        for child in children {
            if self.is_whitespace_text(child) {
                self.boxes[child.0].parent = None;
                continue;
            }
            if self.boxes[child.0].display.inner == InnerDisplayType::TableCell {
                self.flush_cell_run(id, &mut run, &mut fixed);
                fixed.push(child);
            } else {
                run.push(child);
            }
        }
        self.flush_cell_run(id, &mut run, &mut fixed);
        self.boxes[id.0].children = fixed;
    }

    fn flush_cell_run(&mut self, parent: BoxId, run: &mut Vec<BoxId>, out: &mut Vec<BoxId>) {
        if run.is_empty() {
            return;
        }
        let cell = self.anonymous(parent, Display::TableCell, DisplayValue::table_cell());
        for c in std::mem::take(run) {
            self.append(cell, c);
        }
        self.fix_block_container(cell);
        out.push(cell);
    }

    fn next_context_id(&mut self) -> usize {
        let id = self.next_context;
        self.next_context += 1;
        id
    }

    /// [§ 9.4 Normal flow](https://www.w3.org/TR/CSS2/visuren.html#normal-flow)
    ///
    /// Give the children of every container a shared formatting-context id.
    fn assign_contexts(&mut self, id: BoxId) {
        let b = &self.boxes[id.0];
        if b.is_text || b.is_pseudo {
            return;
        }
        if b.display.inner == InnerDisplayType::Table {
            let context = self.next_context_id();
            for inner in self.descendants(id) {
                let is_table_part = inner == id || self.boxes[inner.0].display.is_table_internal();
                if is_table_part && self.owning_table(inner) == Some(id) {
                    self.boxes[inner.0].table_context = Some(context);
                }
            }
            // Cells lay out their own contents.
            let cells: Vec<BoxId> = self
                .descendants(id)
                .into_iter()
                .filter(|&c| {
                    self.boxes[c.0].display.inner == InnerDisplayType::TableCell
                        && self.boxes[c.0].table_context == Some(context)
                })
                .collect();
            for cell in cells {
                self.assign_flow_contexts(cell);
            }
            return;
        }
        self.assign_flow_contexts(id);
    }

    fn owning_table(&self, id: BoxId) -> Option<BoxId> {
        let mut current = Some(id);
        while let Some(c) = current {
            if self.boxes[c.0].display.inner == InnerDisplayType::Table {
                return Some(c);
            }
            current = self.boxes[c.0].parent;
        }
        None
    }

    fn assign_flow_contexts(&mut self, id: BoxId) {
        let children: Vec<BoxId> = self.boxes[id.0].children.clone();
        if children.is_empty() {
            return;
        }
        if self.has_block_child(id) {
            let context = self.next_context_id();
            for child in children {
                if self.boxes[child.0].is_in_flow() {
                    self.boxes[child.0].block_context = Some(context);
                }
                self.assign_contexts(child);
            }
        } else {
            let context = self.next_context_id();
            self.assign_inline_context(&children, context);
        }
    }

    fn assign_inline_context(&mut self, boxes: &[BoxId], context: usize) {
        for &child in boxes {
            if self.boxes[child.0].is_pseudo {
                continue;
            }
            self.boxes[child.0].inline_context = Some(context);
            let b = &self.boxes[child.0];
            if b.display.is_atomic_inline() {
                self.assign_contexts(child);
            } else if !b.is_text {
                let nested = b.children.clone();
                self.assign_inline_context(&nested, context);
            }
        }
    }

    /// [§ 17.5 Visual layout of table contents](https://www.w3.org/TR/CSS2/tables.html#table-layout)
    ///
    /// Resolve every cell's slot, skipping slots taken by row spans from
    /// earlier rows.
    fn build_table_grids(&mut self, render: &RenderTree) {
        let mut tables: Vec<(usize, BoxId)> = self
            .iter()
            .filter(|b| b.display.inner == InnerDisplayType::Table)
            .filter_map(|b| b.table_context.map(|c| (c, b.id)))
            .collect();
        tables.sort_unstable();

        for (context, table) in tables {
            let rows = self.table_rows(table);
            let mut occupied: Vec<Vec<bool>> = vec![Vec::new(); rows.len()];
            let mut cells = Vec::new();
            let mut columns = 0;
            for (r, &row) in rows.iter().enumerate() {
                let mut column = 0;
                for &cell in self.children(row) {
                    let b = &self.boxes[cell.0];
                    if b.display.inner != InnerDisplayType::TableCell {
                        continue;
                    }
                    while occupied[r].get(column).copied().unwrap_or(false) {
                        column += 1;
                    }
                    let attrs = b.render.and_then(|rid| render.get(rid)).map(|n| &n.attrs);
                    let span = |name: &str| {
                        attrs
                            .and_then(|a| a.get(name))
                            .and_then(|v| v.trim().parse::<usize>().ok())
                    };
                    let col_span = span("colspan").unwrap_or(1).clamp(1, 1000);
                    let remaining = rows.len() - r;
                    let row_span = match span("rowspan") {
                        Some(0) => remaining,
                        Some(n) => n.min(remaining),
                        None => 1,
                    };
                    for occupied_row in occupied.iter_mut().skip(r).take(row_span) {
                        if occupied_row.len() < column + col_span {
                            occupied_row.resize(column + col_span, false);
                        }
                        for slot in &mut occupied_row[column..column + col_span] {
                            *slot = true;
                        }
                    }
                    let fixed = |length: Option<LengthValue>| match length {
                        Some(LengthValue::Px(px)) => Some(px),
                        _ => None,
                    };
                    cells.push(TableCell {
                        cell,
                        row: r,
                        column,
                        row_span,
                        col_span,
                        fixed_width: fixed(b.style.width.length()),
                        fixed_height: fixed(b.style.height.length()),
                        min_width: 0.0,
                        max_width: 0.0,
                    });
                    column += col_span;
                    columns = columns.max(column);
                }
            }
            while self.tables.len() <= context {
                self.tables.push(TableGrid {
                    table,
                    rows: Vec::new(),
                    cells: Vec::new(),
                    columns: 0,
                });
            }
            self.tables[context] = TableGrid {
                table,
                rows,
                cells,
                columns,
            };
        }
    }

    /// Rows of a table in order, looking inside row groups.
    fn table_rows(&self, table: BoxId) -> Vec<BoxId> {
        let mut rows = Vec::new();
        for &child in self.children(table) {
            match self.boxes[child.0].display.inner {
                InnerDisplayType::TableRow => rows.push(child),
                InnerDisplayType::TableRowGroup => rows.extend(
                    self.children(child)
                        .iter()
                        .copied()
                        .filter(|&r| self.boxes[r.0].display.inner == InnerDisplayType::TableRow),
                ),
                _ => {}
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::Cascade;
    use crate::media::MediaContext;
    use crate::ua_stylesheet::UserAgentStylesheet;

    fn boxes(html: &str) -> BoxTree {
        let dom = wren_html::parse(html);
        let ua = UserAgentStylesheet::load();
        let styles = Cascade::new(&ua, &[], MediaContext::screen(800.0, 600.0)).compute(&dom);
        BoxTree::build(&RenderTree::build(&dom, &styles))
    }

    fn find(tree: &BoxTree, kind: ElementKind) -> BoxId {
        tree.iter()
            .find(|b| b.element == Some(kind))
            .map(|b| b.id)
            .unwrap_or_else(|| panic!("no {kind:?} box"))
    }

    #[test]
    fn test_mixed_children_get_anonymous_block() {
        let tree = boxes("<div>text<p>para</p>more</div>");
        let div = find(&tree, ElementKind::Div);
        let children = tree.children(div);
        assert_eq!(children.len(), 3);
        assert!(tree.get(children[0]).is_some_and(|b| b.is_anonymous && b.is_block_level()));
        assert!(tree.get(children[2]).is_some_and(|b| b.is_anonymous));
    }

    #[test]
    fn test_inline_with_block_child_is_promoted() {
        let tree = boxes("<div><span>a<div>b</div></span></div>");
        let span = find(&tree, ElementKind::Span);
        assert!(tree.get(span).is_some_and(LayoutBox::is_block_level));
    }

    #[test]
    fn test_inline_run_shares_context() {
        let tree = boxes("<p>a <b>b</b> c</p>");
        let contexts: Vec<Option<usize>> = tree
            .iter()
            .filter(|b| b.is_text)
            .map(|b| b.inline_context)
            .collect();
        assert!(contexts.iter().all(|c| c.is_some() && *c == contexts[0]));
    }

    #[test]
    fn test_cells_wrapped_in_anonymous_row() {
        let tree = boxes("<table><td>a</td><td>b</td></table>");
        let table = find(&tree, ElementKind::Table);
        let rows = tree.children(table);
        assert_eq!(rows.len(), 1);
        let row = tree.get(rows[0]).map(|b| (b.is_anonymous, b.display.inner));
        assert_eq!(row, Some((true, InnerDisplayType::TableRow)));
        assert_eq!(tree.children(rows[0]).len(), 2);
    }

    #[test]
    fn test_row_spans_shift_later_cells() {
        let tree = boxes(
            "<table><tr><td rowspan=\"2\">a</td><td>b</td></tr><tr><td>c</td></tr></table>",
        );
        let grid = &tree.tables()[0];
        let slots: Vec<(usize, usize, usize)> =
            grid.cells.iter().map(|c| (c.row, c.column, c.row_span)).collect();
        assert_eq!(slots, vec![(0, 0, 2), (0, 1, 1), (1, 1, 1)]);
        assert_eq!(grid.columns, 2);
    }

    #[test]
    fn test_marker_is_pseudo() {
        let tree = boxes("<ul><li>x</li></ul>");
        let markers: Vec<&LayoutBox> = tree.iter().filter(|b| b.is_pseudo).collect();
        assert_eq!(markers.len(), 1);
        assert_eq!(tree.text(markers[0].id), Some("\u{2022}"));
    }
}
