//! The closed set of HTML elements the renderer understands.
//!
//! Anything that does not parse into an [`ElementKind`] is an unknown
//! element and is pruned from the tree (with its subtree) after parsing.

use strum_macros::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

/// [§ 4 The elements of HTML](https://html.spec.whatwg.org/multipage/#toc-semantics)
///
/// Every element kind known to the pipeline. Element-specific behaviour is
/// expressed as exhaustive matches on this enum, never as string lookups.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, IntoStaticStr, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum ElementKind {
    // Document metadata
    Html,
    Head,
    Title,
    Base,
    Link,
    Meta,
    Style,
    Script,
    Noscript,
    Template,

    // Sections
    Body,
    Article,
    Section,
    Nav,
    Aside,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Header,
    Footer,
    Address,
    Main,

    // Grouping content
    P,
    Hr,
    Pre,
    Blockquote,
    Ol,
    Ul,
    Li,
    Dl,
    Dt,
    Dd,
    Figure,
    Figcaption,
    Div,
    Center,
    Details,
    Summary,

    // Text-level semantics
    A,
    Em,
    Strong,
    Small,
    S,
    Cite,
    Q,
    Abbr,
    Code,
    Var,
    Samp,
    Kbd,
    Sub,
    Sup,
    I,
    B,
    U,
    Mark,
    Span,
    Br,
    Wbr,
    Time,
    Font,
    Del,
    Ins,

    // Embedded content
    Img,
    Iframe,
    Embed,
    Video,
    Audio,
    Source,
    Track,
    Canvas,
    Area,

    // Tabular data
    Table,
    Caption,
    Colgroup,
    Col,
    Tbody,
    Thead,
    Tfoot,
    Tr,
    Td,
    Th,

    // Forms
    Form,
    Label,
    Input,
    Button,
    Select,
    Option,
    Textarea,
    Fieldset,
    Legend,
}

impl ElementKind {
    /// Look up an element kind by tag name (ASCII case-insensitive).
    ///
    /// Returns `None` for unknown elements.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        tag.parse().ok()
    }

    /// The canonical lower-case tag name.
    #[must_use]
    pub fn tag_name(self) -> &'static str {
        self.into()
    }

    /// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
    ///
    /// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
    /// source, track, wbr"
    ///
    /// Void elements never receive children.
    #[must_use]
    pub const fn is_void(self) -> bool {
        matches!(
            self,
            Self::Area
                | Self::Base
                | Self::Br
                | Self::Col
                | Self::Embed
                | Self::Hr
                | Self::Img
                | Self::Input
                | Self::Link
                | Self::Meta
                | Self::Source
                | Self::Track
                | Self::Wbr
        )
    }

    /// Elements whose content is taken verbatim up to the matching end tag.
    #[must_use]
    pub const fn is_raw_text(self) -> bool {
        matches!(self, Self::Script | Self::Style | Self::Title | Self::Textarea)
    }

    /// [§ 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
    ///
    /// The initial `display` keyword for this element before any stylesheet
    /// applies.
    #[must_use]
    pub const fn default_display(self) -> &'static str {
        match self {
            Self::Head
            | Self::Title
            | Self::Base
            | Self::Link
            | Self::Meta
            | Self::Style
            | Self::Script
            | Self::Noscript
            | Self::Template
            | Self::Source
            | Self::Track
            | Self::Area
            | Self::Col
            | Self::Colgroup => "none",

            Self::Html
            | Self::Body
            | Self::Article
            | Self::Section
            | Self::Nav
            | Self::Aside
            | Self::H1
            | Self::H2
            | Self::H3
            | Self::H4
            | Self::H5
            | Self::H6
            | Self::Header
            | Self::Footer
            | Self::Address
            | Self::Main
            | Self::P
            | Self::Hr
            | Self::Pre
            | Self::Blockquote
            | Self::Ol
            | Self::Ul
            | Self::Dl
            | Self::Dt
            | Self::Dd
            | Self::Figure
            | Self::Figcaption
            | Self::Div
            | Self::Center
            | Self::Details
            | Self::Summary
            | Self::Caption
            | Self::Form
            | Self::Fieldset
            | Self::Legend => "block",

            Self::Li => "list-item",

            Self::Table => "table",
            Self::Tbody | Self::Thead | Self::Tfoot => "table-row-group",
            Self::Tr => "table-row",
            Self::Td | Self::Th => "table-cell",

            Self::Img
            | Self::Iframe
            | Self::Embed
            | Self::Video
            | Self::Audio
            | Self::Canvas
            | Self::Input
            | Self::Button
            | Self::Select
            | Self::Textarea => "inline-block",

            Self::A
            | Self::Em
            | Self::Strong
            | Self::Small
            | Self::S
            | Self::Cite
            | Self::Q
            | Self::Abbr
            | Self::Code
            | Self::Var
            | Self::Samp
            | Self::Kbd
            | Self::Sub
            | Self::Sup
            | Self::I
            | Self::B
            | Self::U
            | Self::Mark
            | Self::Span
            | Self::Br
            | Self::Wbr
            | Self::Time
            | Self::Font
            | Self::Del
            | Self::Ins
            | Self::Label
            | Self::Option => "inline",
        }
    }

    /// Whether children of this element are list items that get markers.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::Ol | Self::Ul)
    }
}
