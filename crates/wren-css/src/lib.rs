//! CSS tokenizer, parser, media queries, selector matching, cascade, render
//! tree, box tree and layout for the Wren renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Style rules, `@media` blocks and `@import`
//!   - Declarations with `!important`
//! - **Media Queries** ([Media Queries Level 4](https://www.w3.org/TR/mediaqueries-4/))
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, ID, universal and attribute selectors
//!   - Combinators and structural pseudo-classes
//!   - Specificity calculation
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Origins, importance, specificity and order
//!   - Inheritance and presentational hints
//! - **Render tree** ([CSS Display § 2](https://www.w3.org/TR/css-display-3/#the-display-properties))
//!   - List markers and whitespace collapsing
//! - **Box tree and layout** ([CSS 2.1 § 9](https://www.w3.org/TR/CSS2/visuren.html))
//!   - Anonymous boxes and formatting contexts
//!   - Block, inline and table layout
//!   - Line breaking and text alignment
//!
//! # Pipeline
//!
//! ```text
//! DomTree ─ Cascade::compute ─▶ StyleMap ─ RenderTree::build ─▶ RenderTree
//!         ─ BoxTree::build ─▶ BoxTree ─ layout ─▶ geometry
//! ```

/// CSS cascade and style computation per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Box tree and layout per [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Media queries per [Media Queries Level 4](https://www.w3.org/TR/mediaqueries-4/).
pub mod media;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// The render tree: styled, display-filtered nodes with list markers.
pub mod render;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Computed style representation per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod style;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;
/// User-agent stylesheet per [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html).
pub mod ua_stylesheet;

pub use cascade::{Cascade, StyleMap, StyleSource, collect_stylesheets, compute_styles};
pub use layout::{
    ApproximateFontMetrics, BoxGeometry, BoxId, BoxTree, EdgeSizes, FontMetrics, FontQuery,
    LayoutBox, LayoutError, LayoutSummary, Rect, TableCell, TableGrid, TextMetrics, layout,
};
pub use media::{MediaContext, MediaQuery};
pub use parser::{CSSParser, ComponentValue, Declaration, Stylesheet, parse_stylesheet};
pub use render::{RenderId, RenderKind, RenderNode, RenderTree};
pub use selector::{ParsedSelector, Specificity, parse_selector};
pub use style::{
    AutoLength, ColorValue, ComputedStyle, DEFAULT_FONT_SIZE_PX, DisplayValue, InnerDisplayType,
    LengthValue, OuterDisplayType,
};
pub use tokenizer::{CSSToken, CSSTokenizer};
pub use ua_stylesheet::UserAgentStylesheet;
