//! CSS value types and their parsers.

mod color;
mod keywords;
mod length;

pub use color::{ColorValue, parse_color};
pub use keywords::{
    BorderStyle, BoxSizing, FontStyle, ListStyleType, TextAlign, Visibility, WhiteSpace,
};
pub use length::{AutoLength, DEFAULT_FONT_SIZE_PX, LengthValue, parse_auto_length, parse_length};

use serde::Serialize;

/// A value per physical box side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Sides<T> {
    /// Top side.
    pub top: T,
    /// Right side.
    pub right: T,
    /// Bottom side.
    pub bottom: T,
    /// Left side.
    pub left: T,
}

impl<T: Copy> Sides<T> {
    /// The same value on every side.
    pub const fn all(value: T) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// [§ 8.3 margin shorthand](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    ///
    /// "If there is only one component value, it applies to all sides. If
    /// there are two values, the top and bottom margins are set to the first
    /// value and the right and left margins are set to the second. If there
    /// are three values, the top is set to the first value, the left and
    /// right are set to the second, and the bottom is set to the third. If
    /// there are four values, they apply to the top, right, bottom, and
    /// left, respectively."
    pub fn from_shorthand(values: &[T]) -> Option<Self> {
        Some(match *values {
            [all] => Self::all(all),
            [vertical, horizontal] => Self {
                top: vertical,
                right: horizontal,
                bottom: vertical,
                left: horizontal,
            },
            [top, horizontal, bottom] => Self {
                top,
                right: horizontal,
                bottom,
                left: horizontal,
            },
            [top, right, bottom, left] => Self {
                top,
                right,
                bottom,
                left,
            },
            _ => return None,
        })
    }

    /// Map every side.
    pub fn map<U>(self, f: impl Fn(T) -> U) -> Sides<U> {
        Sides {
            top: f(self.top),
            right: f(self.right),
            bottom: f(self.bottom),
            left: f(self.left),
        }
    }

    /// The side named `top`, `right`, `bottom` or `left`.
    pub fn side_mut(&mut self, name: &str) -> Option<&mut T> {
        match name {
            "top" => Some(&mut self.top),
            "right" => Some(&mut self.right),
            "bottom" => Some(&mut self.bottom),
            "left" => Some(&mut self.left),
            _ => None,
        }
    }
}
