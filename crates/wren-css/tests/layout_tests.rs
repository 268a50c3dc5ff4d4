//! End-to-end layout tests: HTML in, geometry out.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use wren_css::layout::{BreakMode, break_lines, trim_hanging};
use wren_css::render::LINE_COUNT;
use wren_css::{
    ApproximateFontMetrics, BoxTree, Cascade, LayoutSummary, MediaContext, Rect, RenderId,
    RenderNode, RenderTree, StyleSource, UserAgentStylesheet, layout, parse_stylesheet,
};
use wren_dom::{DomTree, ElementKind, NodeId};

struct Page {
    dom: DomTree,
    render: RenderTree,
    boxes: BoxTree,
    summary: LayoutSummary,
}

impl Page {
    fn load(html: &str, width: f32) -> Self {
        let dom = wren_html::parse(html);
        let ua = UserAgentStylesheet::load();
        let sheets: Vec<_> = wren_css::collect_stylesheets(&dom)
            .into_iter()
            .filter_map(|source| match source {
                StyleSource::Inline { css, media } => Some(parse_stylesheet(&css).with_media(media)),
                StyleSource::External { .. } => None,
            })
            .collect();
        let cascade = Cascade::new(&ua, &sheets, MediaContext::screen(width, 600.0));
        let styles = cascade.compute(&dom);
        let mut render = RenderTree::build(&dom, &styles);
        render.apply_marker_styles(&dom, &cascade, &styles);
        let mut boxes = BoxTree::build(&render);
        let summary = layout(&mut boxes, width, &ApproximateFontMetrics).unwrap();
        render.apply_geometry(&boxes);
        Self {
            dom,
            render,
            boxes,
            summary,
        }
    }

    fn node(&self, id: &str) -> NodeId {
        self.dom
            .descendants(NodeId::ROOT)
            .into_iter()
            .find(|&n| self.dom.as_element(n).and_then(|e| e.attr("id")) == Some(id))
            .unwrap()
    }

    fn render_id(&self, dom: NodeId) -> RenderId {
        self.render.find_by_dom(dom).unwrap()
    }

    fn rect(&self, id: &str) -> Rect {
        self.render.get(self.render_id(self.node(id))).unwrap().geometry
    }

    /// Text fragments of a text render node, in order.
    fn fragments(&self, text: RenderId) -> Vec<(String, Rect)> {
        self.boxes
            .descendants(self.boxes.root())
            .into_iter()
            .filter_map(|id| self.boxes.get(id))
            .filter(|b| b.is_text && b.render == Some(text))
            .map(|b| (self.boxes.text(b.id).unwrap_or_default().to_string(), b.geometry.rect))
            .collect()
    }

    /// The text render node directly inside the element with `id`.
    fn text_child(&self, id: &str) -> RenderId {
        let parent = self.render_id(self.node(id));
        self.render
            .children(parent)
            .iter()
            .copied()
            .find(|&c| self.render.get(c).is_some_and(|n| n.text().is_some()))
            .unwrap()
    }

    fn rect_of(&self, kind: ElementKind) -> Rect {
        let dom = self.dom.find_first(kind).unwrap();
        self.render.get(self.render_id(dom)).unwrap().geometry
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

fn assert_rect(actual: Rect, x: f32, y: f32, width: f32, height: f32) {
    assert!(
        approx(actual.x, x) && approx(actual.y, y) && approx(actual.width, width) && approx(actual.height, height),
        "expected ({x}, {y}, {width}, {height}), got {actual:?}"
    );
}

#[test]
fn test_body_padding_offsets_child() {
    let page = Page::load(r#"<body style="padding:10px"><div style="height:50px"></div></body>"#, 100.0);
    assert_rect(page.rect_of(ElementKind::Body), 0.0, 0.0, 100.0, 70.0);
    assert_rect(page.rect_of(ElementKind::Div), 10.0, 10.0, 80.0, 50.0);
}

#[test]
fn test_nested_fixed_blocks_stack() {
    let html = r#"<body style="padding:100px">
        <div id="outer" style="width:600px;height:600px"><div id="inner" style="height:100px"></div></div>
        <div id="second" style="width:300px;height:300px"></div>
    </body>"#;
    let page = Page::load(html, 1000.0);
    assert_rect(page.rect("outer"), 100.0, 100.0, 600.0, 600.0);
    assert_rect(page.rect("inner"), 100.0, 100.0, 600.0, 100.0);
    assert_rect(page.rect("second"), 100.0, 700.0, 300.0, 300.0);
    assert!(approx(page.rect_of(ElementKind::Body).height, 1100.0));
    assert!(approx(page.summary.content_height, 1100.0));
}

#[test]
fn test_sibling_margins_collapse() {
    let html = r#"<div id="a" style="height:10px;margin-bottom:20px"></div><div id="b" style="height:10px;margin-top:30px"></div>"#;
    let page = Page::load(html, 200.0);
    assert!(approx(page.rect("b").y - page.rect("a").bottom(), 30.0));
}

#[test]
fn test_auto_margins_center() {
    let page = Page::load(r#"<div id="d" style="width:100px;margin:0 auto;height:5px"></div>"#, 300.0);
    assert_rect(page.rect("d"), 100.0, 0.0, 100.0, 5.0);
}

#[test]
fn test_min_and_max_width_clamp() {
    let html = r#"<div id="a" style="max-width:50px;height:1px"></div><div id="b" style="width:10px;min-width:40px;height:1px"></div>"#;
    let page = Page::load(html, 200.0);
    assert!(approx(page.rect("a").width, 50.0));
    assert!(approx(page.rect("b").width, 40.0));
}

#[test]
fn test_text_wraps_into_lines() {
    // 16px text is 9.6px per character and 19.2px per line.
    let page = Page::load(r#"<div id="d" style="width:60px">aaa bbb ccc</div>"#, 200.0);
    let div = page.render_id(page.node("d"));
    assert!(approx(page.render.get(div).unwrap().geometry.height, 57.6));
    let text = page.render.children(div)[0];
    let node = page.render.get(text).unwrap();
    assert_eq!(node.annotations.get(LINE_COUNT), Some(&3.0));
    assert!(approx(node.geometry.width, 28.8));
}

#[test]
fn test_text_align_center() {
    let page = Page::load(r#"<div id="d" style="width:100px;text-align:center"><span id="s">ab</span></div>"#, 200.0);
    assert!(approx(page.rect("s").x, 40.4));
}

#[test]
fn test_text_align_right() {
    let page = Page::load(r#"<div id="d" style="width:100px;text-align:right"><span id="s">ab</span></div>"#, 200.0);
    assert!(approx(page.rect("s").right(), 100.0));
}

#[test]
fn test_justify_spreads_all_but_last_line() {
    let html = r#"<div style="width:50px;text-align:justify"><span id="a">aa</span><span id="b">bb</span><span id="c">cc</span></div>"#;
    let page = Page::load(html, 200.0);
    assert!(approx(page.rect("a").x, 0.0));
    assert!(approx(page.rect("b").right(), 50.0));
    // The last line keeps start alignment.
    assert!(approx(page.rect("c").x, 0.0));
    assert!(approx(page.rect("c").y, 19.2));
}

#[test]
fn test_br_forces_line() {
    let page = Page::load(r#"<p style="margin:0"><span id="a">a</span><br><span id="b">b</span></p>"#, 200.0);
    assert!(approx(page.rect("b").x, 0.0));
    assert!(page.rect("b").y >= page.rect("a").bottom() - 0.01);
}

#[test]
fn test_inline_block_shrinks_to_fit() {
    let page = Page::load(r#"<div><span id="s" style="display:inline-block">abc</span></div>"#, 300.0);
    assert!(approx(page.rect("s").width, 28.8));
}

#[test]
fn test_list_marker_sits_left_of_item() {
    let page = Page::load("<ul><li>item</li></ul>", 300.0);
    let li = page.rect_of(ElementKind::Li);
    let marker = page.render.iter().find(|n| n.is_marker()).unwrap();
    assert_eq!(marker.text(), Some("•"));
    assert!(approx(marker.geometry.right(), li.x));
    assert!(approx(marker.geometry.y, li.y));
    assert!(approx(li.x, 40.0));
}

#[test]
fn test_table_cells_share_rows_and_columns() {
    let html = r#"<table style="border-spacing:0">
        <tr><td id="w" colspan="2">wide</td></tr>
        <tr><td id="a">a</td><td id="b">bbbb</td></tr>
    </table>"#;
    let page = Page::load(html, 400.0);
    let (w, a, b) = (page.rect("w"), page.rect("a"), page.rect("b"));
    assert!(approx(a.y, b.y));
    assert!(approx(a.height, b.height));
    assert!(approx(b.x, a.right()));
    assert!(approx(w.x, a.x));
    assert!(approx(w.right(), b.right()));
    assert!(w.bottom() <= a.y + 0.01);
    assert!(page.rect_of(ElementKind::Table).contains(&w.union(&b), 0.01));
}

#[test]
fn test_rowspan_cell_stretches() {
    let html = r#"<table>
        <tr><td id="x" rowspan="2">x</td><td id="a">a</td></tr>
        <tr><td id="b">b</td></tr>
    </table>"#;
    let page = Page::load(html, 400.0);
    let (x, a, b) = (page.rect("x"), page.rect("a"), page.rect("b"));
    assert!(approx(x.y, a.y));
    assert!(approx(x.bottom(), b.bottom()));
    assert!(b.y > a.y);
}

const NESTED: &str = r#"<body style="padding:8px">
    <h1>Title</h1>
    <p style="padding:4px;border:2px solid black">Some text that wraps across a few lines of the paragraph.</p>
    <ul><li>one</li><li>two <b>bold</b></li></ul>
    <div style="width:50%"><div style="margin:5px;height:20px"></div><p>more</p></div>
    <table><tr><td>cell</td><td>cell</td></tr></table>
</body>"#;

fn is_block_level(node: &RenderNode) -> bool {
    node.style
        .display
        .to_display_value()
        .is_some_and(|d| d.is_block_level())
}

fn element_nodes(render: &RenderTree) -> impl Iterator<Item = &RenderNode> {
    render
        .iter()
        .filter(|n| n.element_kind().is_some() && is_block_level(n))
}

#[test]
fn test_block_children_stay_inside_parents() {
    let page = Page::load(NESTED, 300.0);
    for node in element_nodes(&page.render) {
        let Some(parent) = node.parent.and_then(|p| page.render.get(p)) else { continue };
        assert!(
            parent.geometry.contains(&node.geometry, 0.01),
            "{:?} escapes {:?}",
            node.kind,
            parent.kind
        );
    }
}

#[test]
fn test_block_siblings_do_not_overlap() {
    let page = Page::load(NESTED, 300.0);
    for node in page.render.iter() {
        let blocks: Vec<Rect> = node
            .children
            .iter()
            .filter_map(|&c| page.render.get(c))
            .filter(|c| c.element_kind().is_some() && is_block_level(c))
            .map(|c| c.geometry)
            .collect();
        for pair in blocks.windows(2) {
            assert!(pair[0].bottom() <= pair[1].y + 0.01, "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }
}

#[test]
fn test_layout_is_repeatable() {
    let first = Page::load(NESTED, 300.0);
    let second = Page::load(NESTED, 300.0);
    let a: Vec<Rect> = first.render.iter().map(|n| n.geometry).collect();
    let b: Vec<Rect> = second.render.iter().map(|n| n.geometry).collect();
    assert_eq!(a, b);
}

/// Words of lowercase letters joined by single spaces.
#[derive(Debug, Clone)]
struct Words(String);

impl Arbitrary for Words {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = usize::arbitrary(g) % 12;
        let words: Vec<String> = (0..count)
            .map(|_| {
                let len = 1 + usize::arbitrary(g) % 9;
                (0..len).map(|_| char::from(b'a' + u8::arbitrary(g) % 26)).collect()
            })
            .collect();
        Self(words.join(" "))
    }
}

fn char_width(s: &str) -> f32 {
    s.chars().count() as f32 * 10.0
}

#[quickcheck]
fn break_lines_covers_the_text(words: Words, budget: u8) -> bool {
    let text = &words.0;
    let ranges = break_lines(text, f32::from(budget), f32::from(budget), BreakMode::NORMAL, char_width);
    let contiguous = ranges.windows(2).all(|pair| pair[0].end == pair[1].start);
    let joined: String = ranges.iter().map(|r| &text[r.clone()]).collect();
    contiguous && ranges.first().is_some_and(|r| r.start == 0) && joined == *text
}

#[quickcheck]
fn break_lines_respects_the_budget(words: Words, budget: u8) -> bool {
    let text = &words.0;
    let budget = f32::from(budget);
    break_lines(text, budget, budget, BreakMode::NORMAL, char_width)
        .into_iter()
        .all(|range| {
            let line = trim_hanging(&text[range]);
            char_width(line) <= budget || !line.contains(' ')
        })
}

#[test]
fn test_text_after_inline_content_wraps_at_the_space() {
    let page = Page::load(r#"<div id="d" style="width:60px"><b>aaaaa</b> bbb ccc</div>"#, 60.0);
    let fragments = page.fragments(page.text_child("d"));
    let texts: Vec<&str> = fragments.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(texts, vec![" ", "bbb ", "ccc"]);
    assert_rect(fragments[1].1, 0.0, 19.2, 28.8, 19.2);
    assert_rect(fragments[2].1, 0.0, 38.4, 28.8, 19.2);
    for (text, rect) in &fragments {
        assert!(rect.right() <= 60.01, "{text:?} overflows: {rect:?}");
    }
    assert!(approx(page.rect("d").height, 57.6));
}

#[test]
fn test_text_after_wrapped_inline_content() {
    let page = Page::load(r#"<div id="d" style="width:60px"><b id="b">aaaaa bbbbb</b> ccc</div>"#, 60.0);
    let bold: Vec<String> = page.fragments(page.text_child("b")).into_iter().map(|(t, _)| t).collect();
    assert_eq!(bold, vec!["aaaaa ", "bbbbb"]);
    let tail = page.fragments(page.text_child("d"));
    let texts: Vec<&str> = tail.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(texts, vec![" ", "ccc"]);
    assert_rect(tail[1].1, 0.0, 38.4, 28.8, 19.2);
}

/// A bold word, then plain words, in a fixed-width block.
#[derive(Debug, Clone)]
struct Paragraph {
    bold: String,
    words: Words,
    width: u8,
}

impl Arbitrary for Paragraph {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = 1 + usize::arbitrary(g) % 9;
        Self {
            bold: (0..len).map(|_| char::from(b'a' + u8::arbitrary(g) % 26)).collect(),
            words: Words::arbitrary(g),
            width: 20 + u8::arbitrary(g) % 200,
        }
    }
}

impl Paragraph {
    fn load(&self) -> Page {
        let width = f32::from(self.width);
        let words = if self.words.0.is_empty() { "z" } else { self.words.0.as_str() };
        let html = format!(r#"<div id="p" style="width:{width}px"><b>{}</b> {words}</div>"#, self.bold);
        Page::load(&html, width)
    }
}

#[quickcheck]
fn laid_out_fragments_cover_the_text(paragraph: Paragraph) -> bool {
    let page = paragraph.load();
    let text = page.text_child("p");
    let joined: String = page.fragments(text).into_iter().map(|(t, _)| t).collect();
    page.render.get(text).and_then(RenderNode::text) == Some(joined.as_str())
}

#[quickcheck]
fn laid_out_lines_fit_the_block(paragraph: Paragraph) -> bool {
    let page = paragraph.load();
    let content = page.rect("p");
    page.fragments(page.text_child("p")).into_iter().all(|(text, rect)| {
        // Spaces hang past the end of the line.
        let hanging = text.trim().is_empty();
        let fits = rect.right() <= content.right() + 0.01;
        let alone = approx(rect.x, content.x) && !text.trim().contains(' ');
        hanging || fits || alone
    })
}
