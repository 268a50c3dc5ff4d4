//! Block formatting contexts.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block. The vertical
//! distance between two sibling boxes is determined by the 'margin'
//! properties. Vertical margins between adjacent block-level boxes in a
//! block formatting context collapse."

use crate::style::{AutoLength, BoxSizing, ComputedStyle, InnerDisplayType, LengthValue, Sides};

use super::box_model::{EdgeSizes, Rect};
use super::box_tree::BoxId;
use super::{Basis, LayoutError, Layouter};

/// Marker box width relative to the marker's font size.
const MARKER_BOX_EM: f32 = 1.25;

/// Used margins, borders and padding of one box. `None` margins are `auto`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Edges {
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: Option<f32>,
    pub margin_right: Option<f32>,
    pub border: EdgeSizes,
    pub padding: EdgeSizes,
}

impl Edges {
    /// Border plus padding, left and right.
    pub fn frame_width(&self) -> f32 {
        self.border.horizontal() + self.padding.horizontal()
    }

    /// Border plus padding, top and bottom.
    pub fn frame_height(&self) -> f32 {
        self.border.vertical() + self.padding.vertical()
    }

    /// Margins with `auto` as zero.
    pub fn margin(&self) -> EdgeSizes {
        EdgeSizes {
            top: self.margin_top,
            right: self.margin_right.unwrap_or(0.0),
            bottom: self.margin_bottom,
            left: self.margin_left.unwrap_or(0.0),
        }
    }
}

/// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
///
/// "The percentage is calculated with respect to the width of the
/// generated box's containing block. Note that this is true for
/// 'margin-top' and 'margin-bottom' as well."
pub(crate) fn resolve_edges(style: &ComputedStyle, containing_width: f32) -> Edges {
    let length = |l: LengthValue| l.resolve_or_zero(containing_width);
    let margin = |m: AutoLength| m.length().map(length);
    let border = |width: LengthValue, visible: bool| if visible { length(width) } else { 0.0 };
    let sides = |s: Sides<f32>| EdgeSizes {
        top: s.top,
        right: s.right,
        bottom: s.bottom,
        left: s.left,
    };
    Edges {
        margin_top: margin(style.margin.top).unwrap_or(0.0),
        margin_bottom: margin(style.margin.bottom).unwrap_or(0.0),
        margin_left: margin(style.margin.left),
        margin_right: margin(style.margin.right),
        border: sides(Sides {
            top: border(style.border_width.top, style.border_style.top.is_visible()),
            right: border(style.border_width.right, style.border_style.right.is_visible()),
            bottom: border(style.border_width.bottom, style.border_style.bottom.is_visible()),
            left: border(style.border_width.left, style.border_style.left.is_visible()),
        }),
        padding: sides(style.padding.map(length)),
    }
}

/// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
///
/// "When two or more margins collapse, the resulting margin width is the
/// maximum of the collapsing margins' widths. In the case of negative
/// margins, the maximum of the absolute values of the negative adjoining
/// margins is deducted from the maximum of the positive adjoining margins.
/// If there are no positive margins, the maximum of the absolute values
/// of the adjoining margins is deducted from zero."
pub(crate) fn collapse_margins(a: f32, b: f32) -> f32 {
    if a >= 0.0 && b >= 0.0 {
        a.max(b)
    } else if a < 0.0 && b < 0.0 {
        a.min(b)
    } else {
        a + b
    }
}

/// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
///
/// "'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
/// 'padding-right' + 'border-right-width' + 'margin-right' = width of
/// containing block"
///
/// Returns the used content width and left and right margins.
pub(crate) fn solve_horizontal(
    containing_width: f32,
    width: Option<f32>,
    margin_left: Option<f32>,
    margin_right: Option<f32>,
    frame: f32,
) -> (f32, f32, f32) {
    let (mut margin_left, mut margin_right) = (margin_left, margin_right);

    // "If 'width' is not 'auto' and [the sum] is larger than the width of
    // the containing block, then any 'auto' values for 'margin-left' or
    // 'margin-right' are, for the following rules, treated as zero."
    if let Some(w) = width
        && w + frame + margin_left.unwrap_or(0.0) + margin_right.unwrap_or(0.0) > containing_width
    {
        margin_left = margin_left.or(Some(0.0));
        margin_right = margin_right.or(Some(0.0));
    }

    match (width, margin_left, margin_right) {
        // "If 'width' is set to 'auto', any other 'auto' values become '0'
        // and 'width' follows from the resulting equality."
        (None, ml, mr) => {
            let (ml, mr) = (ml.unwrap_or(0.0), mr.unwrap_or(0.0));
            ((containing_width - ml - mr - frame).max(0.0), ml, mr)
        }
        // "If both 'margin-left' and 'margin-right' are 'auto', their used
        // values are equal."
        (Some(w), None, None) => {
            let half = (containing_width - w - frame) / 2.0;
            (w, half, half)
        }
        // "If there is exactly one value specified as 'auto', its used value
        // follows from the equality."
        (Some(w), None, Some(mr)) => (w, containing_width - w - frame - mr, mr),
        // Over-constrained or `margin-right: auto`: with 'ltr' the
        // specified 'margin-right' is ignored.
        (Some(w), Some(ml), _) => (w, ml, containing_width - w - frame - ml),
    }
}

/// Convert a specified `width`/`height` to a content-box size.
pub(super) fn content_size(specified: f32, frame: f32, sizing: BoxSizing) -> f32 {
    match sizing {
        BoxSizing::ContentBox => specified,
        BoxSizing::BorderBox => (specified - frame).max(0.0),
    }
}

impl Layouter<'_> {
    /// Lay out a block-level or atomic inline box whose containing block
    /// content area starts at `containing_x` and is `containing_width`
    /// wide, with its border box top at `border_y`.
    ///
    /// Inline-level boxes and tables with `width: auto` shrink to fit;
    /// inline-level boxes treat `auto` margins as zero.
    pub(crate) fn layout_block_box(
        &mut self,
        id: BoxId,
        containing_x: f32,
        containing_width: f32,
        border_y: f32,
        edges: &Edges,
        basis: Basis,
    ) -> Result<(), LayoutError> {
        let b = self.tree.node(id)?;
        let style = b.style.clone();
        let inline_level = !b.is_block_level();
        let shrink_to_fit = inline_level || b.display.inner == InnerDisplayType::Table;
        let frame = edges.frame_width();

        // STEP 1: Resolve the specified width.
        let specified = style
            .width
            .length()
            .and_then(|w| w.resolve(Some(containing_width)))
            .map(|w| content_size(w, frame, style.box_sizing));

        // STEP 2: Shrink-to-fit.
        // [§ 10.3.5](https://www.w3.org/TR/CSS2/visudet.html#float-width)
        // "min(max(preferred minimum width, available width), preferred width)"
        let mut margin_left = edges.margin_left;
        let mut margin_right = edges.margin_right;
        if inline_level {
            margin_left = margin_left.or(Some(0.0));
            margin_right = margin_right.or(Some(0.0));
        }
        let width = match specified {
            Some(w) => Some(w),
            None if shrink_to_fit => {
                let available = containing_width
                    - margin_left.unwrap_or(0.0)
                    - margin_right.unwrap_or(0.0)
                    - frame;
                let (min, max) = self.content_intrinsic(id)?;
                self.tree.node_mut(id)?.natural_width = Some(max + frame);
                Some(max.min(min.max(available)).max(0.0))
            }
            None => None,
        };

        // STEP 3: Solve the constraint equation.
        let (mut used, mut ml, mut mr) =
            solve_horizontal(containing_width, width, margin_left, margin_right, frame);

        // STEP 4: Max/min width.
        // [§ 10.4](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
        let clamped = self.clamp_width(&style, used, frame, basis);
        if (clamped - used).abs() > f32::EPSILON {
            (used, ml, mr) = solve_horizontal(containing_width, Some(clamped), margin_left, margin_right, frame);
        }
        if inline_level {
            ml = margin_left.unwrap_or(0.0);
            mr = margin_right.unwrap_or(0.0);
        }

        let resolved = Edges {
            margin_left: Some(ml),
            margin_right: Some(mr),
            ..*edges
        };
        let own_width = if specified.is_some() || !shrink_to_fit {
            Some(used)
        } else {
            None
        };
        let child_basis = Basis {
            width: own_width.or(basis.width),
            height: basis.height,
        };
        self.layout_sized_box(id, containing_x + ml, border_y, used, &resolved, child_basis)
    }

    /// [§ 10.4 Minimum and maximum widths](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
    ///
    /// Percentages resolve against the nearest ancestor with a definite
    /// width; without one a percentage `max-width` is ignored. `min-width`
    /// wins over `max-width`.
    pub(crate) fn clamp_width(&self, style: &ComputedStyle, width: f32, frame: f32, basis: Basis) -> f32 {
        let mut used = width;
        if let Some(max) = style
            .max_width
            .and_then(|m| m.resolve(basis.width))
            .map(|m| content_size(m, frame, style.box_sizing))
        {
            used = used.min(max);
        }
        let min = style
            .min_width
            .resolve(basis.width)
            .map_or(0.0, |m| content_size(m, frame, style.box_sizing));
        used.max(min)
    }

    /// [§ 10.7 Minimum and maximum heights](https://www.w3.org/TR/CSS2/visudet.html#min-max-heights)
    fn clamp_height(style: &ComputedStyle, height: f32, frame: f32, basis: Basis) -> f32 {
        let mut used = height;
        if let Some(max) = style
            .max_height
            .and_then(|m| m.resolve(basis.height))
            .map(|m| content_size(m, frame, style.box_sizing))
        {
            used = used.min(max);
        }
        let min = style
            .min_height
            .resolve(basis.height)
            .map_or(0.0, |m| content_size(m, frame, style.box_sizing));
        used.max(min)
    }

    /// Place a box with a known content width at (`x`, `y`), lay out its
    /// contents and settle its height.
    pub(crate) fn layout_sized_box(
        &mut self,
        id: BoxId,
        x: f32,
        y: f32,
        content_width: f32,
        edges: &Edges,
        basis: Basis,
    ) -> Result<(), LayoutError> {
        let style = self.tree.node(id)?.style.clone();
        let frame_height = edges.frame_height();

        // [§ 10.5 Content height](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
        // "If the height of the containing block is not specified
        // explicitly ... the value computes to 'auto'."
        let specified_height = style
            .height
            .length()
            .and_then(|h| h.resolve(basis.height))
            .map(|h| content_size(h, frame_height, style.box_sizing));

        {
            let b = self.tree.node_mut(id)?;
            b.geometry.margin = edges.margin();
            b.geometry.border = edges.border;
            b.geometry.padding = edges.padding;
            b.geometry.rect = Rect::new(x, y, content_width + edges.frame_width(), frame_height);
        }

        let content = Rect::new(
            x + edges.border.left + edges.padding.left,
            y + edges.border.top + edges.padding.top,
            content_width,
            0.0,
        );
        let child_basis = Basis {
            width: basis.width,
            height: specified_height.or(basis.height),
        };
        let content_height = self.layout_contents(id, content, child_basis)?;

        let height = Self::clamp_height(
            &style,
            specified_height.unwrap_or(content_height),
            frame_height,
            basis,
        );
        self.tree.node_mut(id)?.geometry.rect.height = height + frame_height;
        self.place_markers(id, content)?;
        Ok(())
    }

    /// Lay out the children of `id` inside `content` and return the height
    /// they occupy.
    fn layout_contents(&mut self, id: BoxId, content: Rect, basis: Basis) -> Result<f32, LayoutError> {
        let b = self.tree.node(id)?;
        if b.display.inner == InnerDisplayType::Table {
            return self.layout_table(id, content, basis);
        }
        let has_block_children = b
            .children
            .iter()
            .filter_map(|&c| self.tree.get(c))
            .any(|c| c.is_in_flow() && c.is_block_level());
        if has_block_children {
            self.layout_block_children(id, content, basis)
        } else {
            self.layout_inline_children(id, content, basis)
        }
    }

    /// [§ 9.4.1](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    ///
    /// Stack block-level children, collapsing adjacent sibling margins.
    fn layout_block_children(&mut self, id: BoxId, content: Rect, basis: Basis) -> Result<f32, LayoutError> {
        let children = self.tree.node(id)?.children.clone();
        let mut cursor = content.y;
        let mut previous_margin: Option<f32> = None;
        let mut first_line_top = None;

        for child in children {
            let c = self.tree.node(child)?;
            if !c.is_in_flow() {
                continue;
            }
            let edges = resolve_edges(&c.style, content.width);
            let border_y = match previous_margin {
                Some(previous) => cursor + collapse_margins(previous, edges.margin_top),
                None => cursor + edges.margin_top,
            };
            self.layout_block_box(child, content.x, content.width, border_y, &edges, basis)?;

            let c = self.tree.node(child)?;
            cursor = c.geometry.rect.bottom();
            previous_margin = Some(edges.margin_bottom);
            if first_line_top.is_none() {
                first_line_top = c.first_line_top;
            }
        }

        self.tree.node_mut(id)?.first_line_top = first_line_top;
        Ok(previous_margin.map_or(0.0, |margin| cursor + margin - content.y).max(0.0))
    }

    /// [CSS Lists § 3.1](https://www.w3.org/TR/css-lists-3/#marker-pseudo)
    ///
    /// Markers sit outside the list item's content box, on its first line.
    fn place_markers(&mut self, id: BoxId, content: Rect) -> Result<(), LayoutError> {
        let markers: Vec<BoxId> = self
            .tree
            .node(id)?
            .children
            .iter()
            .copied()
            .filter(|&c| self.tree.get(c).is_some_and(|b| b.is_pseudo))
            .collect();
        if markers.is_empty() {
            return Ok(());
        }
        let top = self.tree.node(id)?.first_line_top.unwrap_or(content.y);
        for marker in markers {
            let style = self.tree.node(marker)?.style.clone();
            let text = self.tree.text(marker).ok_or(LayoutError::MissingText(marker))?;
            let font = super::FontQuery::from_style(&style);
            let natural = self.metrics.text_width(text, &font);
            let height = self.text_height(&style, text);
            let width = style.font_size * MARKER_BOX_EM;
            let b = self.tree.node_mut(marker)?;
            b.geometry.rect = Rect::new(content.x - width, top, width, height);
            b.natural_width = Some(natural);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_margins() {
        assert_eq!(collapse_margins(20.0, 10.0), 20.0);
        assert_eq!(collapse_margins(-5.0, -15.0), -15.0);
        assert_eq!(collapse_margins(20.0, -5.0), 15.0);
    }

    #[test]
    fn test_auto_width_fills() {
        assert_eq!(solve_horizontal(100.0, None, Some(10.0), None, 4.0), (76.0, 10.0, 0.0));
    }

    #[test]
    fn test_auto_margins_center() {
        assert_eq!(solve_horizontal(100.0, Some(50.0), None, None, 0.0), (50.0, 25.0, 25.0));
    }

    #[test]
    fn test_over_constrained_adjusts_right_margin() {
        assert_eq!(
            solve_horizontal(100.0, Some(50.0), Some(10.0), Some(10.0), 0.0),
            (50.0, 10.0, 40.0)
        );
    }

    #[test]
    fn test_border_needs_style() {
        let mut style = ComputedStyle::default();
        style.padding = Sides::all(LengthValue::Percent(10.0));
        let edges = resolve_edges(&style, 200.0);
        assert_eq!(edges.border, EdgeSizes::default());
        assert_eq!(edges.padding.top, 20.0);
    }
}
