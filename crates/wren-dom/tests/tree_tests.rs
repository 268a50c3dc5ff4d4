//! Integration tests for the arena DOM tree.

use wren_dom::{AttributesMap, DomTree, ElementData, ElementKind, NodeId, NodeType};

fn element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.alloc(NodeType::Element(ElementData::new(tag, AttributesMap::new())));
    tree.append_child(parent, id);
    id
}

#[test]
fn test_append_links_siblings() {
    let mut tree = DomTree::new();
    let body = element(&mut tree, NodeId::ROOT, "body");
    let a = element(&mut tree, body, "p");
    let b = element(&mut tree, body, "div");
    let c = element(&mut tree, body, "span");

    assert_eq!(tree.children(body), &[a, b, c]);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(c), Some(b));
    assert_eq!(tree.preceding_siblings(c).collect::<Vec<_>>(), vec![b, a]);
    assert_eq!(tree.following_siblings(a).collect::<Vec<_>>(), vec![b, c]);
    assert_eq!(tree.ancestors(c).collect::<Vec<_>>(), vec![body, NodeId::ROOT]);
}

#[test]
fn test_detach_relinks_siblings_and_keeps_whitespace() {
    let mut tree = DomTree::new();
    let body = element(&mut tree, NodeId::ROOT, "body");
    let a = element(&mut tree, body, "p");
    let b = element(&mut tree, body, "blink");
    let c = element(&mut tree, body, "span");
    tree.set_whitespace_after(b);

    tree.detach(b);

    assert_eq!(tree.children(body), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_eq!(tree.parent(b), None);
    assert!(tree.get(a).is_some_and(|n| n.whitespace_after));
}

#[test]
fn test_classes_split_on_any_whitespace() {
    let mut attrs = AttributesMap::new();
    let _ = attrs.insert("class".to_string(), "a  b\tc".to_string());
    let data = ElementData::new("DIV", attrs);
    assert_eq!(data.tag_name, "div");
    assert_eq!(data.kind, Some(ElementKind::Div));
    assert_eq!(data.classes().len(), 3);
}

#[test]
fn test_text_content_and_body_lookup() {
    let mut tree = DomTree::new();
    let html = element(&mut tree, NodeId::ROOT, "html");
    let body = element(&mut tree, html, "body");
    let text = tree.alloc(NodeType::Text("hello".to_string()));
    tree.append_child(body, text);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(body));
    assert_eq!(tree.text_content(html), "hello");
}
