//! CSS cascading and style computation
//!
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/)

mod sources;

pub use sources::{StyleSource, collect_stylesheets};

use std::collections::HashMap;
use std::str::FromStr;

use log::debug;
use wren_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::media::MediaContext;
use crate::parser::{Declaration, Stylesheet, parse_declarations};
use crate::selector::{ParsedSelector, PseudoElement, Specificity};
use crate::style::{ComputedStyle, DEFAULT_FONT_SIZE_PX, Display, StyleContext};
use crate::ua_stylesheet::UserAgentStylesheet;

/// Computed style per element.
pub type StyleMap = HashMap<NodeId, ComputedStyle>;

/// [§ 6.2 Cascade Origins](https://www.w3.org/TR/css-cascade-4/#cascading-origins)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Origin {
    UserAgent,
    /// [§ 6.1.1 Presentational hints](https://www.w3.org/TR/css-cascade-4/#preshint)
    /// "treated as if they were author-level rules placed at the start of
    /// the author style sheet ... with a specificity of zero"
    PresentationalHint,
    Author,
}

impl Origin {
    /// [§ 6.4.1 Origin and Importance](https://www.w3.org/TR/css-cascade-4/#cascade-origin)
    ///
    /// Important declarations rank the origins in reverse.
    const fn rank(self, important: bool) -> u8 {
        let rank = match self {
            Self::UserAgent => 0,
            Self::PresentationalHint => 1,
            Self::Author => 2,
        };
        if important { 2 - rank } else { rank }
    }
}

/// [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// Sorted ascending; later entries win. Importance first, then origin
/// (reversed for `!important`), then the style attribute over rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct CascadeKey {
    important: bool,
    origin: u8,
    inline: bool,
    specificity: Specificity,
    order: usize,
}

impl CascadeKey {
    fn new(origin: Origin, important: bool, inline: bool, specificity: Specificity, order: usize) -> Self {
        Self {
            important,
            origin: origin.rank(important),
            inline,
            specificity,
            order,
        }
    }
}

struct IndexedRule<'a> {
    selector: &'a ParsedSelector,
    declarations: &'a [Declaration],
    origin: Origin,
    order: usize,
}

/// The rules in effect for one viewport, ready to be matched.
pub struct Cascade<'a> {
    rules: Vec<IndexedRule<'a>>,
    media: MediaContext,
}

impl<'a> Cascade<'a> {
    /// Collect UA and author rules whose media guard matches `media`.
    /// Author sheets are in document order.
    #[must_use]
    pub fn new(ua: &'a UserAgentStylesheet, author: &'a [Stylesheet], media: MediaContext) -> Self {
        let sheets = std::iter::once((Origin::UserAgent, ua.stylesheet()))
            .chain(author.iter().map(|sheet| (Origin::Author, sheet)));

        let mut rules = Vec::new();
        let mut skipped = 0usize;
        for (origin, sheet) in sheets {
            for rule in &sheet.rules {
                if rule.media.as_ref().is_some_and(|q| !q.matches(&media)) {
                    skipped += 1;
                    continue;
                }
                for selector in &rule.selectors {
                    let order = rules.len();
                    rules.push(IndexedRule {
                        selector,
                        declarations: &rule.declarations,
                        origin,
                        order,
                    });
                }
            }
        }
        debug!(
            "cascade: {} selectors in effect, {skipped} rules excluded by media at {}x{}",
            rules.len(),
            media.width,
            media.height
        );
        Self { rules, media }
    }

    /// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
    ///
    /// Compute styles for every element of the tree.
    #[must_use]
    pub fn compute(&self, tree: &DomTree) -> StyleMap {
        let mut styles = StyleMap::new();
        let initial = ComputedStyle::default();
        let root_font_size = DEFAULT_FONT_SIZE_PX;
        for &child in tree.children(tree.root()) {
            self.compute_node(tree, child, &initial, root_font_size, &mut styles);
        }
        styles
    }

    fn compute_node(
        &self,
        tree: &DomTree,
        id: NodeId,
        parent: &ComputedStyle,
        root_font_size: f32,
        styles: &mut StyleMap,
    ) {
        let Some(node) = tree.get(id) else { return };
        let NodeType::Element(element) = &node.node_type else {
            // Text takes its parent's style when rendered.
            return;
        };

        let is_root = tree.document_element() == Some(id);
        let ctx = StyleContext {
            parent_font_size: parent.font_size,
            root_font_size: if is_root { DEFAULT_FONT_SIZE_PX } else { root_font_size },
            viewport: (self.media.width, self.media.height),
        };

        // [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
        let mut style = ComputedStyle::inherit_from(parent);
        style.display = element
            .kind
            .and_then(|kind| Display::from_str(kind.default_display()).ok())
            .unwrap_or_default();

        let mut matched: Vec<(CascadeKey, &Declaration)> = Vec::new();
        for rule in &self.rules {
            if rule.selector.matches(tree, id) {
                push_declarations(&mut matched, rule);
            }
        }

        let hints = presentational_hints(element);
        for decl in &hints {
            matched.push((
                CascadeKey::new(Origin::PresentationalHint, false, false, Specificity::default(), 0),
                decl,
            ));
        }

        // [§ 6.4.4 Order of appearance](https://www.w3.org/TR/css-cascade-4/#cascade-order)
        // The style attribute sorts after every rule of equal importance.
        let inline = element.attr("style").map(parse_declarations).unwrap_or_default();
        for decl in &inline {
            let level = if decl.important { 3 } else { 1 };
            matched.push((
                CascadeKey::new(
                    Origin::Author,
                    decl.important,
                    true,
                    Specificity::default().with_level(level),
                    usize::MAX,
                ),
                decl,
            ));
        }

        // Stable sort: equal keys keep declaration order within a rule.
        matched.sort_by_key(|(key, _)| *key);
        for (_, decl) in matched {
            style.apply_declaration(decl, parent, &ctx);
        }
        style.finalize(&ctx);

        let root_font_size = if is_root { style.font_size } else { root_font_size };
        for &child in tree.children(id) {
            self.compute_node(tree, child, &style, root_font_size, styles);
        }
        let _ = styles.insert(id, style);
    }

    /// [CSS Lists § 3.1 ::marker](https://www.w3.org/TR/css-lists-3/#marker-pseudo)
    ///
    /// Style for the marker of list item `li`: inherits from the item, then
    /// applies every `::marker` rule matching the item. Returns `None` when
    /// the item itself has no computed style.
    #[must_use]
    pub fn marker_style(&self, tree: &DomTree, li: NodeId, styles: &StyleMap) -> Option<ComputedStyle> {
        let li_style = styles.get(&li)?;
        let root_font_size = tree
            .document_element()
            .and_then(|root| styles.get(&root))
            .map_or(DEFAULT_FONT_SIZE_PX, |root| root.font_size);
        let ctx = StyleContext {
            parent_font_size: li_style.font_size,
            root_font_size,
            viewport: (self.media.width, self.media.height),
        };
        let mut style = ComputedStyle::inherit_from(li_style);
        style.display = Display::Inline;

        let mut matched: Vec<(CascadeKey, &Declaration)> = Vec::new();
        for rule in &self.rules {
            if rule.selector.matches_pseudo(tree, li, PseudoElement::Marker) {
                push_declarations(&mut matched, rule);
            }
        }
        matched.sort_by_key(|(key, _)| *key);
        for (_, decl) in matched {
            style.apply_declaration(decl, li_style, &ctx);
        }
        style.finalize(&ctx);
        Some(style)
    }
}

fn push_declarations<'a>(
    matched: &mut Vec<(CascadeKey, &'a Declaration)>,
    rule: &IndexedRule<'a>,
) {
    for decl in rule.declarations {
        let level = if decl.important { 2 } else { 0 };
        matched.push((
            CascadeKey::new(
                rule.origin,
                decl.important,
                false,
                rule.selector.specificity.with_level(level),
                rule.order,
            ),
            decl,
        ));
    }
}

/// [WHATWG HTML § 15.3](https://html.spec.whatwg.org/multipage/rendering.html#presentational-hints)
///
/// `width`/`height` attributes on replaced elements and table parts map to
/// the corresponding properties.
fn presentational_hints(element: &ElementData) -> Vec<Declaration> {
    if !matches!(element.tag_name.as_str(), "img" | "iframe" | "video" | "canvas" | "embed" | "table" | "td" | "th") {
        return Vec::new();
    }
    let mut css = String::new();
    for name in ["width", "height"] {
        if let Some(value) = element.attr(name).map(str::trim).filter(|v| !v.is_empty()) {
            if value.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
                css.push_str(&format!("{name}: {value}px;"));
            } else if let Some(pct) = value.strip_suffix('%') {
                css.push_str(&format!("{name}: {pct}%;"));
            }
        }
    }
    parse_declarations(&css)
}

/// Compute styles for every element with the given sheets and viewport.
#[must_use]
pub fn compute_styles(
    tree: &DomTree,
    ua: &UserAgentStylesheet,
    author: &[Stylesheet],
    media: MediaContext,
) -> StyleMap {
    Cascade::new(ua, author, media).compute(tree)
}
