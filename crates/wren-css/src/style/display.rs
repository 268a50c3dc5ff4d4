//! CSS display property
//!
//! [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)

use serde::Serialize;
use strum_macros::{AsRefStr, EnumString, IntoStaticStr};
use wren_common::warning::warn_once;

/// The specified `display` keyword.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Display {
    /// `display: inline`, the initial value.
    #[default]
    Inline,
    /// `display: block`
    Block,
    /// `display: inline-block`
    InlineBlock,
    /// `display: flow-root`
    FlowRoot,
    /// `display: list-item`
    ListItem,
    /// `display: table`
    Table,
    /// `display: inline-table`
    InlineTable,
    /// `display: table-row-group`
    TableRowGroup,
    /// `display: table-header-group`
    TableHeaderGroup,
    /// `display: table-footer-group`
    TableFooterGroup,
    /// `display: table-row`
    TableRow,
    /// `display: table-cell`
    TableCell,
    /// `display: table-caption`
    TableCaption,
    /// `display: table-column`
    TableColumn,
    /// `display: table-column-group`
    TableColumnGroup,
    /// `display: flex`
    Flex,
    /// `display: inline-flex`
    InlineFlex,
    /// `display: grid`
    Grid,
    /// `display: inline-grid`
    InlineGrid,
    /// `display: contents`
    Contents,
    /// `display: none`
    None,
}

/// [§ 2.1 Outer Display Roles](https://www.w3.org/TR/css-display-3/#outer-role)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum OuterDisplayType {
    /// "The element generates a block-level box when placed in flow layout."
    Block,
    /// "The element generates an inline-level box when placed in flow layout."
    Inline,
}

/// [§ 2.2 Inner Display Layout Models](https://www.w3.org/TR/css-display-3/#inner-model)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum InnerDisplayType {
    /// "The element lays out its contents using flow layout."
    Flow,
    /// Flow layout that always establishes a new block formatting context.
    FlowRoot,
    /// "The element generates a principal table wrapper box."
    Table,
    /// [§ 2.4 Layout-Internal Display Types](https://www.w3.org/TR/css-display-3/#layout-specific-display)
    TableRowGroup,
    /// A table row.
    TableRow,
    /// A table cell; establishes a block formatting context.
    TableCell,
}

/// The (outer, inner) display pair plus the list-item flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayValue {
    /// How the box participates in its parent's formatting context.
    pub outer: OuterDisplayType,
    /// How the box lays out its children.
    pub inner: InnerDisplayType,
    /// [§ 2.3 Generating Marker Boxes](https://www.w3.org/TR/css-display-3/#list-items)
    pub list_item: bool,
}

impl DisplayValue {
    /// `display: block`
    #[must_use]
    pub const fn block() -> Self {
        Self::new(OuterDisplayType::Block, InnerDisplayType::Flow)
    }

    /// `display: inline`
    #[must_use]
    pub const fn inline() -> Self {
        Self::new(OuterDisplayType::Inline, InnerDisplayType::Flow)
    }

    /// `display: flow-root`
    #[must_use]
    pub const fn flow_root() -> Self {
        Self::new(OuterDisplayType::Block, InnerDisplayType::FlowRoot)
    }

    /// `display: inline-block`
    #[must_use]
    pub const fn inline_block() -> Self {
        Self::new(OuterDisplayType::Inline, InnerDisplayType::FlowRoot)
    }

    /// An anonymous table row.
    #[must_use]
    pub const fn table_row() -> Self {
        Self::new(OuterDisplayType::Block, InnerDisplayType::TableRow)
    }

    /// An anonymous table cell.
    #[must_use]
    pub const fn table_cell() -> Self {
        Self::new(OuterDisplayType::Block, InnerDisplayType::TableCell)
    }

    const fn new(outer: OuterDisplayType, inner: InnerDisplayType) -> Self {
        Self {
            outer,
            inner,
            list_item: false,
        }
    }

    /// Block-level box.
    #[must_use]
    pub fn is_block_level(&self) -> bool {
        self.outer == OuterDisplayType::Block
    }

    /// An inline-level box whose inside is not inline: laid out as a unit.
    #[must_use]
    pub fn is_atomic_inline(&self) -> bool {
        self.outer == OuterDisplayType::Inline && self.inner != InnerDisplayType::Flow
    }

    /// Whether the inner display is one of the table-internal types.
    #[must_use]
    pub const fn is_table_internal(&self) -> bool {
        matches!(
            self.inner,
            InnerDisplayType::TableRowGroup | InnerDisplayType::TableRow | InnerDisplayType::TableCell
        )
    }
}

impl Display {
    /// [§ 2.5 Box Generation](https://www.w3.org/TR/css-display-3/#box-generation)
    ///
    /// Map a keyword to its (outer, inner) pair. `None` means no box is
    /// generated. Layout modes this engine does not implement fall back to a
    /// flow-root of the same outer type.
    #[must_use]
    pub fn to_display_value(self) -> Option<DisplayValue> {
        use InnerDisplayType as I;
        use OuterDisplayType as O;

        let (outer, inner, list_item) = match self {
            Self::None | Self::TableColumn | Self::TableColumnGroup => return None,
            Self::Block => (O::Block, I::Flow, false),
            Self::Inline => (O::Inline, I::Flow, false),
            Self::InlineBlock => (O::Inline, I::FlowRoot, false),
            Self::FlowRoot | Self::TableCaption => (O::Block, I::FlowRoot, false),
            Self::ListItem => (O::Block, I::Flow, true),
            Self::Table => (O::Block, I::Table, false),
            Self::InlineTable => (O::Inline, I::Table, false),
            Self::TableRowGroup | Self::TableHeaderGroup | Self::TableFooterGroup => {
                (O::Block, I::TableRowGroup, false)
            }
            Self::TableRow => (O::Block, I::TableRow, false),
            Self::TableCell => (O::Block, I::TableCell, false),
            Self::Flex | Self::Grid => {
                warn_once("Layout", &format!("display: {} laid out as flow-root", self.as_ref()));
                (O::Block, I::FlowRoot, false)
            }
            Self::InlineFlex | Self::InlineGrid => {
                warn_once("Layout", &format!("display: {} laid out as inline-block", self.as_ref()));
                (O::Inline, I::FlowRoot, false)
            }
            Self::Contents => {
                warn_once("Layout", "display: contents laid out as inline");
                (O::Inline, I::Flow, false)
            }
        };
        Some(DisplayValue {
            outer,
            inner,
            list_item,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_compound_keywords() {
        let inline_block = Display::from_str("inline-block").unwrap().to_display_value().unwrap();
        assert_eq!(inline_block, DisplayValue::inline_block());
        assert!(inline_block.is_atomic_inline());

        let li = Display::ListItem.to_display_value().unwrap();
        assert!(li.list_item);
        assert!(li.is_block_level());

        assert_eq!(Display::None.to_display_value(), None);
        assert_eq!(
            Display::from_str("TABLE-HEADER-GROUP").unwrap().to_display_value().unwrap().inner,
            InnerDisplayType::TableRowGroup
        );
    }

    #[test]
    fn test_unsupported_modes_fall_back() {
        assert_eq!(Display::Flex.to_display_value(), Some(DisplayValue::flow_root()));
        assert_eq!(Display::InlineGrid.to_display_value(), Some(DisplayValue::inline_block()));
    }
}
