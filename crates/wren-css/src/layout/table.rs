//! [§ 17 Tables](https://www.w3.org/TR/CSS2/tables.html)
//!
//! Automatic table layout in the separated borders model.
//!
//! [§ 17.5.2.2 Automatic table layout](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
//!
//! "Calculate the minimum content width (MCW) of each cell ... Also,
//! calculate the 'maximum' cell width of each cell: formatting the content
//! without breaking lines other than where explicit line breaks occur."

use crate::style::InnerDisplayType;

use super::block::{Edges, resolve_edges};
use super::box_model::{EdgeSizes, Rect};
use super::box_tree::BoxId;
use super::{Basis, LayoutError, Layouter};

/// Minimum and maximum width of every column, plus each cell's own.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ColumnExtents {
    pub min: Vec<f32>,
    pub max: Vec<f32>,
    /// Per cell, in grid order.
    pub cells: Vec<(f32, f32)>,
}

/// [§ 17.5.2.2](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
///
/// Share `available` px between columns. Max-content widths are used when
/// they fit, with the rest spread evenly; min-content widths when even
/// those overflow; otherwise each column moves the same fraction of the
/// way from its minimum towards its maximum.
pub(crate) fn distribute_columns(min: &[f32], max: &[f32], available: f32) -> Vec<f32> {
    if min.is_empty() {
        return Vec::new();
    }
    let sum_min: f32 = min.iter().sum();
    let sum_max: f32 = max.iter().sum();
    if sum_max <= available {
        let extra = (available - sum_max) / min.len() as f32;
        return max.iter().map(|w| w + extra).collect();
    }
    if sum_min >= available || sum_max <= sum_min {
        return min.to_vec();
    }
    let t = (available - sum_min) / (sum_max - sum_min);
    min.iter().zip(max).map(|(lo, hi)| lo + t * (hi - lo)).collect()
}

/// Spread `needed - covered` evenly over `slots`, when positive.
fn spread_excess(slots: &mut [f32], needed: f32, covered: f32) {
    if needed > covered && !slots.is_empty() {
        let share = (needed - covered) / slots.len() as f32;
        for slot in slots {
            *slot += share;
        }
    }
}

/// Width of a span of `span` tracks starting at `start`, including the
/// spacing between them.
fn span_extent(sizes: &[f32], start: usize, span: usize, spacing: f32) -> f32 {
    let end = (start + span).min(sizes.len());
    let sum: f32 = sizes[start.min(end)..end].iter().sum();
    sum + spacing * span.saturating_sub(1) as f32
}

/// Left edge of each track.
fn track_offsets(sizes: &[f32], start: f32, spacing: f32) -> Vec<f32> {
    let mut offsets = Vec::with_capacity(sizes.len());
    let mut cursor = start + spacing;
    for &size in sizes {
        offsets.push(cursor);
        cursor += size + spacing;
    }
    offsets
}

impl Layouter<'_> {
    /// [§ 17.5.2.2](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
    ///
    /// "For each column, determine a minimum and maximum column width from
    /// the cells that span only that column." Cells spanning several
    /// columns then widen those columns evenly by whatever they lack.
    pub(crate) fn column_extents(&self, context: usize, depth: usize) -> Result<ColumnExtents, LayoutError> {
        let grid = self.tree.table(context)?;
        let table_style = &self.tree.node(grid.table)?.style;
        let spacing = table_style.border_spacing.resolve_or_zero(0.0);

        let mut extents = ColumnExtents {
            min: vec![0.0; grid.columns],
            max: vec![0.0; grid.columns],
            cells: Vec::with_capacity(grid.cells.len()),
        };
        for cell in &grid.cells {
            let (min, max) = self.outer_intrinsic(cell.cell, depth)?;
            extents.cells.push((min, max.max(min)));
        }

        // STEP 1: Single-column cells.
        for (cell, &(min, max)) in grid.cells.iter().zip(&extents.cells) {
            if cell.col_span == 1 && cell.column < grid.columns {
                extents.min[cell.column] = extents.min[cell.column].max(min);
                extents.max[cell.column] = extents.max[cell.column].max(max);
            }
        }

        // STEP 2: Spanning cells, narrowest span first.
        let mut spanning: Vec<usize> = (0..grid.cells.len())
            .filter(|&i| grid.cells[i].col_span > 1)
            .collect();
        spanning.sort_by_key(|&i| grid.cells[i].col_span);
        for index in spanning {
            let cell = &grid.cells[index];
            let (min, max) = extents.cells[index];
            let end = (cell.column + cell.col_span).min(grid.columns);
            let covered_min = span_extent(&extents.min, cell.column, cell.col_span, spacing);
            spread_excess(&mut extents.min[cell.column..end], min, covered_min);
            let covered_max = span_extent(&extents.max, cell.column, cell.col_span, spacing);
            spread_excess(&mut extents.max[cell.column..end], max, covered_max);
        }

        for (max, &min) in extents.max.iter_mut().zip(&extents.min) {
            *max = max.max(min);
        }
        Ok(extents)
    }

    /// Lay out a table's rows and cells inside `content` and return the
    /// height they occupy.
    pub(crate) fn layout_table(&mut self, id: BoxId, content: Rect, basis: Basis) -> Result<f32, LayoutError> {
        let table = self.tree.node(id)?;
        let context = table.table_context.ok_or(LayoutError::NoTableContext(id))?;
        let spacing = table.style.border_spacing.resolve_or_zero(content.width);
        let groups: Vec<BoxId> = table
            .children
            .iter()
            .copied()
            .filter(|&c| {
                self.tree
                    .get(c)
                    .is_some_and(|b| b.display.inner == InnerDisplayType::TableRowGroup)
            })
            .collect();

        // STEP 1: Column widths.
        let extents = self.column_extents(context, 0)?;
        let grid = self.tree.table_mut(context)?;
        for (cell, &(min, max)) in grid.cells.iter_mut().zip(&extents.cells) {
            cell.min_width = min;
            cell.max_width = max;
        }
        let grid = grid.clone();
        let columns = grid.columns;
        let available = content.width - spacing * (columns + 1) as f32;
        let widths = distribute_columns(&extents.min, &extents.max, available);
        let column_x = track_offsets(&widths, content.x, spacing);

        // STEP 2: Lay out every cell at its column width, at the origin.
        let mut cell_heights = Vec::with_capacity(grid.cells.len());
        for cell in &grid.cells {
            let width = span_extent(&widths, cell.column, cell.col_span, spacing);
            let style = self.tree.node(cell.cell)?.style.clone();
            let edges = resolve_edges(&style, width);
            let inner = (width - edges.frame_width()).max(0.0);
            let cell_edges = Edges {
                margin_top: 0.0,
                margin_bottom: 0.0,
                margin_left: Some(0.0),
                margin_right: Some(0.0),
                ..edges
            };
            let cell_basis = Basis {
                width: Some(inner),
                height: basis.height,
            };
            self.layout_sized_box(cell.cell, 0.0, 0.0, inner, &cell_edges, cell_basis)?;
            cell_heights.push(self.tree.node(cell.cell)?.geometry.rect.height);
        }

        // STEP 3: Row heights.
        // [§ 17.5.3](https://www.w3.org/TR/CSS2/tables.html#height-layout)
        // "The height of a 'table-row' element's box is calculated once the
        // user agent has all the cells in the row available: it is the
        // maximum of the row's computed 'height', the computed 'height' of
        // each cell in the row, and the minimum height (MIN) required by
        // the cells."
        let mut heights = Vec::with_capacity(grid.rows.len());
        for &row in &grid.rows {
            let style = &self.tree.node(row)?.style;
            let own = style.height.length().and_then(|h| h.resolve(None)).unwrap_or(0.0);
            heights.push(own);
        }
        for (cell, &height) in grid.cells.iter().zip(&cell_heights) {
            if cell.row_span == 1 && cell.row < heights.len() {
                let fixed = cell.fixed_height.unwrap_or(0.0);
                heights[cell.row] = heights[cell.row].max(height).max(fixed);
            }
        }
        for (cell, &height) in grid.cells.iter().zip(&cell_heights) {
            if cell.row_span > 1 {
                let end = (cell.row + cell.row_span).min(heights.len());
                let covered = span_extent(&heights, cell.row, cell.row_span, spacing);
                spread_excess(&mut heights[cell.row..end], height, covered);
            }
        }
        let row_y = track_offsets(&heights, content.y, spacing);

        // STEP 4: Move cells into place and stretch them over their rows.
        for cell in &grid.cells {
            let (Some(&x), Some(&y)) = (column_x.get(cell.column), row_y.get(cell.row)) else {
                continue;
            };
            self.translate(cell.cell, x, y);
            let height = span_extent(&heights, cell.row, cell.row_span, spacing);
            let b = self.tree.node_mut(cell.cell)?;
            b.geometry.rect.height = b.geometry.rect.height.max(height);
        }

        // STEP 5: Rows span every column; row groups wrap their rows.
        let row_width = (content.width - 2.0 * spacing).max(0.0);
        for ((&row, &y), &height) in grid.rows.iter().zip(&row_y).zip(&heights) {
            let b = self.tree.node_mut(row)?;
            b.geometry.rect = Rect::new(content.x + spacing, y, row_width, height);
            b.geometry.margin = EdgeSizes::default();
        }
        for group in groups {
            let rows = self.tree.children(group).to_vec();
            let mut bounds: Option<Rect> = None;
            for row in rows {
                let rect = self.tree.node(row)?.geometry.rect;
                bounds = Some(bounds.map_or(rect, |r| r.union(&rect)));
            }
            self.tree.node_mut(group)?.geometry.rect =
                bounds.unwrap_or_else(|| Rect::new(content.x, content.y, content.width, 0.0));
        }

        if grid.rows.is_empty() {
            return Ok(0.0);
        }
        let first_cell_top = grid
            .cells
            .first()
            .and_then(|cell| self.tree.get(cell.cell))
            .and_then(|b| b.first_line_top);
        self.tree.node_mut(id)?.first_line_top = first_cell_top;
        Ok(heights.iter().sum::<f32>() + spacing * (heights.len() + 1) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribute_max_fits() {
        assert_eq!(distribute_columns(&[10.0, 10.0], &[20.0, 40.0], 80.0), vec![30.0, 50.0]);
    }

    #[test]
    fn test_distribute_min_overflows() {
        assert_eq!(distribute_columns(&[30.0, 30.0], &[50.0, 50.0], 40.0), vec![30.0, 30.0]);
    }

    #[test]
    fn test_distribute_interpolates() {
        assert_eq!(distribute_columns(&[10.0, 10.0], &[30.0, 50.0], 40.0), vec![15.0, 25.0]);
    }

    #[test]
    fn test_span_extent_includes_spacing() {
        assert_eq!(span_extent(&[10.0, 20.0, 30.0], 1, 2, 2.0), 52.0);
    }

    #[test]
    fn test_track_offsets() {
        assert_eq!(track_offsets(&[10.0, 20.0], 5.0, 2.0), vec![7.0, 19.0]);
    }
}
