//! CSS box model types.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)

use serde::Serialize;

/// A rectangle in absolute page coordinates.
///
/// Layout stores border boxes: the origin is the outer edge of the border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f32,
    /// Vertical position of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Whether `other` lies inside this rectangle, allowing `epsilon` of
    /// floating-point slack on every edge.
    #[must_use]
    pub fn contains(&self, other: &Self, epsilon: f32) -> bool {
        other.x >= self.x - epsilon
            && other.y >= self.y - epsilon
            && other.right() <= self.right() + epsilon
            && other.bottom() <= self.bottom() + epsilon
    }

    /// Shrink by the given edges.
    #[must_use]
    pub fn inset(&self, edges: &EdgeSizes) -> Self {
        Self {
            x: self.x + edges.left,
            y: self.y + edges.top,
            width: (self.width - edges.horizontal()).max(0.0),
            height: (self.height - edges.vertical()).max(0.0),
        }
    }
}

/// Edge sizes for padding, border, or margin.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f32,
    /// Right edge size.
    pub right: f32,
    /// Bottom edge size.
    pub bottom: f32,
    /// Left edge size.
    pub left: f32,
}

impl EdgeSizes {
    /// `left + right`
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// `top + bottom`
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Sum of two sets of edges.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            top: self.top + other.top,
            right: self.right + other.right,
            bottom: self.bottom + other.bottom,
            left: self.left + other.left,
        }
    }
}

/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// "Each box has a content area and optional surrounding padding, border,
/// and margin areas."
///
/// `rect` is the border box; the other areas derive from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoxGeometry {
    /// Border box in absolute coordinates.
    pub rect: Rect,
    /// Resolved margins. Auto margins hold their used value.
    pub margin: EdgeSizes,
    /// Resolved border widths.
    pub border: EdgeSizes,
    /// Resolved padding.
    pub padding: EdgeSizes,
}

impl BoxGeometry {
    /// The content box.
    #[must_use]
    pub fn content_box(&self) -> Rect {
        self.rect.inset(&self.border.add(&self.padding))
    }

    /// The margin box.
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        Rect {
            x: self.rect.x - self.margin.left,
            y: self.rect.y - self.margin.top,
            width: self.rect.width + self.margin.horizontal(),
            height: self.rect.height + self.margin.vertical(),
        }
    }

    /// Border plus padding on both horizontal sides.
    #[must_use]
    pub fn frame_width(&self) -> f32 {
        self.border.horizontal() + self.padding.horizontal()
    }

    /// Border plus padding on both vertical sides.
    #[must_use]
    pub fn frame_height(&self) -> f32 {
        self.border.vertical() + self.padding.vertical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_and_margin_boxes() {
        let geometry = BoxGeometry {
            rect: Rect::new(10.0, 10.0, 100.0, 50.0),
            margin: EdgeSizes { top: 5.0, right: 5.0, bottom: 5.0, left: 5.0 },
            border: EdgeSizes { top: 1.0, right: 1.0, bottom: 1.0, left: 1.0 },
            padding: EdgeSizes { top: 2.0, right: 2.0, bottom: 2.0, left: 2.0 },
        };
        assert_eq!(geometry.content_box(), Rect::new(13.0, 13.0, 94.0, 44.0));
        assert_eq!(geometry.margin_box(), Rect::new(5.0, 5.0, 110.0, 60.0));
    }

    #[test]
    fn test_union_and_contains() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(0.0, 0.0, 15.0, 15.0));
        assert!(u.contains(&a, 0.0));
        assert!(!a.contains(&b, 0.0));
    }
}
