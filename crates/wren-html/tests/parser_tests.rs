//! Integration tests for the HTML parser.

use wren_dom::{DomTree, ElementKind, NodeId, NodeType};
use wren_html::{document_title, parse, print_tree};

/// Helper to get the first element by tag name (depth-first)
fn find_element(tree: &DomTree, tag: &str) -> Option<NodeId> {
    tree.descendants(NodeId::ROOT)
        .into_iter()
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == tag))
}

/// Helper to list the tag names (or `#text`) of a node's children
fn child_names(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .map(|&c| match tree.as_element(c) {
            Some(e) => e.tag_name.clone(),
            None => "#text".to_string(),
        })
        .collect()
}

/// Structural fingerprint used for round-trip comparisons
fn shape(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    match tree.get(id).map(|n| &n.node_type) {
        Some(NodeType::Element(e)) => {
            let mut attrs: Vec<_> = e.attrs.iter().collect();
            attrs.sort();
            out.push_str(&format!("<{} {attrs:?}>", e.tag_name));
        }
        Some(NodeType::Text(t)) => out.push_str(&format!("{t:?}")),
        Some(NodeType::Document) | None => out.push_str("#doc"),
    }
    out.push('[');
    for &child in tree.children(id) {
        out.push_str(&shape(tree, child));
    }
    out.push(']');
    out
}

#[test]
fn test_document_structure() {
    let tree = parse("<!DOCTYPE html><html><head><title>T</title></head><body></body></html>");
    let html = tree.document_element().unwrap();
    assert_eq!(child_names(&tree, NodeId::ROOT), vec!["html"]);
    assert_eq!(child_names(&tree, html), vec!["head", "body"]);
}

#[test]
fn test_body_without_html_wrapper() {
    let tree = parse("<body style=\"padding:10px\"><div style=\"height:50px\"></div></body>");
    let body = tree.body().unwrap();
    assert_eq!(tree.parent(body), Some(NodeId::ROOT));
    assert_eq!(child_names(&tree, body), vec!["div"]);
    let style = tree.as_element(body).unwrap().attr("style");
    assert_eq!(style, Some("padding:10px"));
}

#[test]
fn test_no_implied_wrappers() {
    let tree = parse("<title>T</title><p>x</p>");
    assert_eq!(child_names(&tree, NodeId::ROOT), vec!["title", "p"]);
    assert!(tree.body().is_none());
}

#[test]
fn test_void_elements_never_get_children() {
    let tree = parse("<p>a<br>b<img src=x.png>c<hr>d</p>");
    let p = find_element(&tree, "p").unwrap();
    assert_eq!(
        child_names(&tree, p),
        vec!["#text", "br", "#text", "img", "#text", "hr", "#text"]
    );
    for tag in ["br", "img", "hr"] {
        let id = find_element(&tree, tag).unwrap();
        assert!(tree.children(id).is_empty());
    }
}

#[test]
fn test_self_closing_non_void() {
    let tree = parse("<div><span/>x</div>");
    let div = find_element(&tree, "div").unwrap();
    assert_eq!(child_names(&tree, div), vec!["span", "#text"]);
}

#[test]
fn test_closing_tag_pops_to_matching_element() {
    // </div> closes the unclosed <span> as well.
    let tree = parse("<div><span>a</div><p>b</p>");
    let div = find_element(&tree, "div").unwrap();
    let p = find_element(&tree, "p").unwrap();
    assert_eq!(tree.parent(p), Some(NodeId::ROOT));
    assert_eq!(child_names(&tree, div), vec!["span"]);
}

#[test]
fn test_stray_closing_tag_is_ignored() {
    let tree = parse("<div>a</span>b</div>");
    let div = find_element(&tree, "div").unwrap();
    assert_eq!(tree.text_content(div), "ab");
}

#[test]
fn test_comments_are_stripped() {
    let tree = parse("<p>a<!-- <b>hidden</b> -->b</p>");
    let p = find_element(&tree, "p").unwrap();
    assert_eq!(child_names(&tree, p), vec!["#text"]);
    assert_eq!(tree.text_content(p), "ab");
}

#[test]
fn test_raw_text_elements() {
    let tree = parse("<style>p > a { color: red }</style><script>if (a < b) {}</script>");
    let style = find_element(&tree, "style").unwrap();
    let script = find_element(&tree, "script").unwrap();
    assert_eq!(tree.text_content(style), "p > a { color: red }");
    assert_eq!(tree.text_content(script), "if (a < b) {}");
}

#[test]
fn test_whitespace_only_text_sets_flag() {
    let tree = parse("<p><b>a</b> <i>b</i></p>");
    let p = find_element(&tree, "p").unwrap();
    let b = find_element(&tree, "b").unwrap();
    let i = find_element(&tree, "i").unwrap();
    assert_eq!(child_names(&tree, p), vec!["b", "i"]);
    assert!(tree.get(b).unwrap().whitespace_after);
    assert!(!tree.get(i).unwrap().whitespace_after);
}

#[test]
fn test_unknown_elements_pruned_with_subtree() {
    let tree = parse("<div><blink><p>gone</p></blink><span>kept</span></div>");
    let div = find_element(&tree, "div").unwrap();
    assert_eq!(child_names(&tree, div), vec!["span"]);
    assert!(find_element(&tree, "p").is_none());
    assert!(tree
        .descendants(NodeId::ROOT)
        .iter()
        .all(|&id| tree.as_element(id).is_none_or(|e| e.kind.is_some())));
}

#[test]
fn test_entities_decoded_in_text() {
    let tree = parse("<p>Fish &amp; Chips</p>");
    let p = find_element(&tree, "p").unwrap();
    assert_eq!(tree.text_content(p), "Fish & Chips");
}

#[test]
fn test_document_title() {
    let tree = parse("<html><head><title>  My \n Page </title></head></html>");
    assert_eq!(document_title(&tree).as_deref(), Some("My Page"));
    assert_eq!(document_title(&parse("<p>x</p>")), None);
}

#[test]
fn test_round_trip_structure_is_stable() {
    let html = "<html><body><ul class=\"a  b\"><li id=x>one<br></li><li>two<img src=\"i.png\" alt='y'></li></ul>\
                <table><tr><td colspan=2>c</td></tr></table></body></html>";
    let first = parse(html);
    let second = parse(html);
    assert_eq!(shape(&first, NodeId::ROOT), shape(&second, NodeId::ROOT));

    let ul = find_element(&first, "ul").unwrap();
    assert_eq!(child_names(&first, ul), vec!["li", "li"]);
    assert_eq!(first.as_element(ul).unwrap().attr("class"), Some("a  b"));
    let td = find_element(&first, "td").unwrap();
    assert_eq!(first.as_element(td).unwrap().kind, Some(ElementKind::Td));
}

#[test]
fn test_malformed_input_terminates() {
    let inputs = [
        "",
        "<",
        "<<<>>>",
        "</>",
        "<div",
        "<div class=\"unterminated>",
        "<!-- open",
        "<!DOCTYPE",
        "<?xml",
        "text only",
        "</p></p></p>",
        "<a href=x'y>z</a>",
    ];
    for input in inputs {
        let tree = parse(input);
        assert!(!print_tree(&tree).is_empty(), "input {input:?}");
    }
}
