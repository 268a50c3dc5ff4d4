//! CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).

#[allow(clippy::module_inception)]
mod parser;

pub use parser::{
    CSSParser, ComponentValue, Declaration, ImportRule, StyleRule, Stylesheet,
    parse_declarations, parse_stylesheet,
};
