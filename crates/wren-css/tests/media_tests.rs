//! Integration tests for media queries and `@media` rules.

use wren_css::{Cascade, MediaContext, MediaQuery, UserAgentStylesheet, parse_stylesheet};
use wren_dom::ElementKind;

fn screen(width: f32) -> MediaContext {
    MediaContext::screen(width, 600.0)
}

#[test]
fn test_width_range_is_inclusive() {
    let query = MediaQuery::parse("(min-width:100px) and (max-width:200px)").unwrap();
    assert!(query.matches(&screen(100.0)));
    assert!(query.matches(&screen(150.0)));
    assert!(query.matches(&screen(200.0)));
    assert!(!query.matches(&screen(10.0)));
    assert!(!query.matches(&screen(201.0)));
}

#[test]
fn test_unparseable_query_is_rejected() {
    assert!(MediaQuery::parse("(min-width: 100px) and and").is_none());
    assert!(MediaQuery::parse("").is_none());
}

#[test]
fn test_media_rule_applies_only_in_range() {
    let dom = wren_html::parse("<body><p>text</p></body>");
    let p = dom.find_first(ElementKind::P).unwrap();
    let sheet = parse_stylesheet("p { color: red } @media (max-width: 500px) { p { color: blue } }");
    let ua = UserAgentStylesheet::load();
    let sheets = vec![sheet];

    let narrow = Cascade::new(&ua, &sheets, screen(400.0)).compute(&dom);
    assert_eq!(narrow[&p].color.hex(), "0000FF");

    let wide = Cascade::new(&ua, &sheets, screen(800.0)).compute(&dom);
    assert_eq!(wide[&p].color.hex(), "FF0000");
}

#[test]
fn test_style_element_media_attribute() {
    let html = r#"<head><style media="print">p { color: red }</style></head><body><p>x</p></body>"#;
    let dom = wren_html::parse(html);
    let p = dom.find_first(ElementKind::P).unwrap();
    let sheets: Vec<_> = wren_css::collect_stylesheets(&dom)
        .into_iter()
        .map(|source| match source {
            wren_css::StyleSource::Inline { css, media } => parse_stylesheet(&css).with_media(media),
            wren_css::StyleSource::External { .. } => unreachable!(),
        })
        .collect();
    let ua = UserAgentStylesheet::load();
    let styles = Cascade::new(&ua, &sheets, screen(800.0)).compute(&dom);
    assert_eq!(styles[&p].color.hex(), "000000");
}
