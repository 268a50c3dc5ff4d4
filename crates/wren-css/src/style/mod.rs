//! CSS computed style representation and value parsing
//!
//! - [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//! - [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)
//! - [CSS Display Module Level 3](https://www.w3.org/TR/css-display-3/)

pub mod computed;
mod display;
pub mod values;

pub use computed::{ComputedStyle, LineHeight, StyleContext};
pub use display::{Display, DisplayValue, InnerDisplayType, OuterDisplayType};
pub use values::{
    AutoLength, BorderStyle, BoxSizing, ColorValue, DEFAULT_FONT_SIZE_PX, FontStyle, LengthValue,
    ListStyleType, Sides, TextAlign, Visibility, WhiteSpace,
};
