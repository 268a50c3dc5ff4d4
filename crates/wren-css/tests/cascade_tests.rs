//! Integration tests for the cascade.

use wren_css::style::Display;
use wren_css::{Cascade, MediaContext, StyleMap, UserAgentStylesheet, parse_stylesheet};
use wren_dom::{DomTree, ElementKind, NodeId};

fn cascade(html: &str, css: &[&str]) -> (DomTree, StyleMap) {
    let dom = wren_html::parse(html);
    let ua = UserAgentStylesheet::load();
    let sheets: Vec<_> = css.iter().map(|c| parse_stylesheet(c)).collect();
    let styles = Cascade::new(&ua, &sheets, MediaContext::screen(800.0, 600.0)).compute(&dom);
    (dom, styles)
}

fn color_of(dom: &DomTree, styles: &StyleMap, id: &str) -> String {
    let node = dom
        .descendants(NodeId::ROOT)
        .into_iter()
        .find(|&n| dom.as_element(n).and_then(|e| e.attr("id")) == Some(id))
        .unwrap();
    styles[&node].color.hex()
}

#[test]
fn test_specificity_beats_order() {
    let (dom, styles) = cascade(
        r#"<p id="x" class="c">t</p>"#,
        &["#x { color: red } .c { color: blue } p { color: green }"],
    );
    assert_eq!(color_of(&dom, &styles, "x"), "FF0000");
}

#[test]
fn test_later_rule_wins_at_equal_specificity() {
    let (dom, styles) = cascade(
        r#"<p id="x">t</p>"#,
        &["p { color: red }", "p { color: blue }"],
    );
    assert_eq!(color_of(&dom, &styles, "x"), "0000FF");
}

#[test]
fn test_inline_style_beats_id() {
    let (dom, styles) = cascade(r#"<p id="x" style="color: red">t</p>"#, &["#x { color: blue }"]);
    assert_eq!(color_of(&dom, &styles, "x"), "FF0000");
}

#[test]
fn test_important_beats_inline_style() {
    let (dom, styles) = cascade(
        r#"<p id="x" style="color: red">t</p>"#,
        &["p { color: green !important }"],
    );
    assert_eq!(color_of(&dom, &styles, "x"), "008000");
}

#[test]
fn test_inline_important_wins_over_everything() {
    let (dom, styles) = cascade(
        r#"<p id="x" style="color: red !important">t</p>"#,
        &["#x { color: green !important }"],
    );
    assert_eq!(color_of(&dom, &styles, "x"), "FF0000");
}

#[test]
fn test_author_overrides_user_agent() {
    let (dom, styles) = cascade("<div><p>t</p></div>", &["p { display: inline }"]);
    let p = dom.find_first(ElementKind::P).unwrap();
    assert_eq!(styles[&p].display, Display::Inline);
}

#[test]
fn test_inheritance_follows_the_tree() {
    let (dom, styles) = cascade(
        r#"<div id="d"><p id="p"><span id="s">t</span></p></div>"#,
        &["#d { color: #123456 }"],
    );
    assert_eq!(color_of(&dom, &styles, "s"), "123456");
}

#[test]
fn test_only_elements_are_styled() {
    let (dom, styles) = cascade("<p>some <b>text</b></p>", &[]);
    for id in dom.descendants(NodeId::ROOT) {
        assert_eq!(styles.contains_key(&id), dom.as_element(id).is_some());
    }
}

#[test]
fn test_user_agent_important_beats_author_important() {
    let dom = wren_html::parse(r#"<p id="x" style="color: blue !important">t</p>"#);
    let ua = UserAgentStylesheet::from_css("p { color: green !important; font-size: 10px }");
    let sheets = vec![parse_stylesheet("#x { color: red !important; font-size: 30px }")];
    let styles = Cascade::new(&ua, &sheets, MediaContext::screen(800.0, 600.0)).compute(&dom);
    assert_eq!(color_of(&dom, &styles, "x"), "008000");
    let p = dom.find_first(ElementKind::P).unwrap();
    // Normal declarations keep author over UA.
    assert!((styles[&p].font_size - 30.0).abs() < 0.01);
}

#[test]
fn test_cascade_is_idempotent() {
    let html = r#"<body><ul class="l"><li>a</li><li style="color: red">b</li></ul><p id="x">c</p></body>"#;
    let css = ["li { color: blue } .l li:first-child { font-size: 20px } #x { margin: 1em }"];
    let dom = wren_html::parse(html);
    let ua = UserAgentStylesheet::load();
    let sheets: Vec<_> = css.iter().map(|c| parse_stylesheet(c)).collect();
    let cascade = Cascade::new(&ua, &sheets, MediaContext::screen(800.0, 600.0));
    let first = cascade.compute(&dom);
    let second = cascade.compute(&dom);
    assert_eq!(first, second);
}

#[test]
fn test_marker_rules_apply_to_markers_only() {
    let dom = wren_html::parse("<ul><li>a</li></ul>");
    let ua = UserAgentStylesheet::load();
    let sheets = vec![parse_stylesheet("li::marker { color: red }")];
    let cascade = Cascade::new(&ua, &sheets, MediaContext::screen(800.0, 600.0));
    let styles = cascade.compute(&dom);
    let li = dom.find_first(ElementKind::Li).unwrap();
    assert_eq!(styles[&li].color.hex(), "000000");
    let marker = cascade.marker_style(&dom, li, &styles).unwrap();
    assert_eq!(marker.color.hex(), "FF0000");
}
