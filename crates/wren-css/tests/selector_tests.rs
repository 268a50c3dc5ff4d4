//! Integration tests for selector matching and specificity.

use std::cmp::Ordering;

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use wren_css::selector::parse_selector_list;
use wren_css::{Specificity, parse_selector};
use wren_dom::{DomTree, NodeId};

fn find(tree: &DomTree, id: &str) -> NodeId {
    tree.descendants(NodeId::ROOT)
        .into_iter()
        .find(|&n| tree.as_element(n).and_then(|e| e.attr("id")) == Some(id))
        .unwrap()
}

fn matches(selector: &str, html: &str, id: &str) -> bool {
    let tree = wren_html::parse(html);
    parse_selector(selector).unwrap().matches(&tree, find(&tree, id))
}

#[test]
fn test_descendant_and_child() {
    let html = r#"<div class="a"><p><span id="s"></span></p></div>"#;
    assert!(matches("div span", html, "s"));
    assert!(matches(".a span", html, "s"));
    assert!(matches("p > span", html, "s"));
    assert!(!matches("div > span", html, "s"));
}

#[test]
fn test_sibling_combinators() {
    let html = r#"<ul><li id="a"></li><li id="b"></li><li id="c"></li></ul>"#;
    assert!(matches("#a + li", html, "b"));
    assert!(!matches("#a + li", html, "c"));
    assert!(matches("#a ~ li", html, "c"));
}

#[test]
fn test_structural_pseudo_classes() {
    let html = r#"<ul><li id="a"></li><li id="b"></li><li id="c"></li></ul>"#;
    assert!(matches("li:first-child", html, "a"));
    assert!(matches("li:last-child", html, "c"));
    assert!(!matches("li:first-child", html, "b"));
}

#[test]
fn test_attribute_selectors() {
    let html = r#"<a id="x" href="https://example.com/page.html" lang="en-US"></a>"#;
    assert!(matches("[href]", html, "x"));
    assert!(matches("[href^=https]", html, "x"));
    assert!(matches(r#"[href$=".html"]"#, html, "x"));
    assert!(matches("[lang|=en]", html, "x"));
    assert!(!matches("[title]", html, "x"));
}

#[test]
fn test_selector_list_specificities() {
    let list = parse_selector_list("p, .a, #b");
    let specificities: Vec<_> = list.iter().map(|s| s.specificity).collect();
    assert_eq!(
        specificities,
        vec![
            Specificity::new(0, 0, 0, 1),
            Specificity::new(0, 0, 1, 0),
            Specificity::new(0, 1, 0, 0),
        ]
    );
}

/// A selector built from a known number of ids, classes and type selectors.
#[derive(Debug, Clone)]
struct Weighted {
    ids: u32,
    classes: u32,
    types: u32,
}

impl Arbitrary for Weighted {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            ids: u32::from(u8::arbitrary(g) % 3),
            classes: u32::from(u8::arbitrary(g) % 4),
            types: u32::from(u8::arbitrary(g) % 4),
        }
    }
}

impl Weighted {
    fn source(&self) -> String {
        let mut out = String::new();
        for _ in 0..self.types {
            out.push_str("div ");
        }
        out.push('*');
        for i in 0..self.ids {
            out.push_str(&format!("#i{i}"));
        }
        for i in 0..self.classes {
            out.push_str(&format!(".c{i}"));
        }
        out
    }

    fn specificity(&self) -> Specificity {
        parse_selector(&self.source()).unwrap().specificity
    }
}

#[quickcheck]
fn specificity_counts_components(s: Weighted) -> bool {
    s.specificity() == Specificity::new(0, s.ids, s.classes, s.types)
}

#[quickcheck]
fn specificity_is_a_strict_weak_order(a: Weighted, b: Weighted, c: Weighted) -> bool {
    let (sa, sb, sc) = (a.specificity(), b.specificity(), c.specificity());
    let irreflexive = sa.cmp(&a.specificity()) == Ordering::Equal;
    let asymmetric = !(sa < sb && sb < sa);
    let transitive = !(sa < sb && sb < sc) || sa < sc;
    let lexicographic = sa.cmp(&sb) == (a.ids, a.classes, a.types).cmp(&(b.ids, b.classes, b.types));
    irreflexive && asymmetric && transitive && lexicographic
}
