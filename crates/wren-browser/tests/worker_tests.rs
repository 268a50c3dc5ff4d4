//! Tests for the page worker thread.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use wren_browser::{ErrorKind, Frame, LoadError, PageWorker, PipelineConfig, Resource, ResourceLoader};
use wren_css::{ApproximateFontMetrics, FontMetrics, FontQuery, TextMetrics};

const WAIT: Duration = Duration::from_secs(10);

/// Serves documents from memory.
#[derive(Default)]
struct Site(HashMap<String, String>);

impl Site {
    fn with(mut self, location: &str, text: &str) -> Self {
        let _ = self.0.insert(location.to_string(), text.to_string());
        self
    }
}

impl ResourceLoader for Site {
    fn fetch_document(&self, location: &str) -> Result<Resource, LoadError> {
        self.0
            .get(location)
            .map(|text| Resource {
                location: location.to_string(),
                text: text.clone(),
            })
            .ok_or_else(|| LoadError::NotFound { path: location.into() })
    }

    fn fetch_stylesheet(&self, location: &str) -> Result<String, LoadError> {
        self.fetch_document(location).map(|r| r.text)
    }
}

fn spawn(site: Site) -> PageWorker {
    PageWorker::spawn(
        PipelineConfig::with_viewport(400.0, 300.0),
        Arc::new(site),
        Box::new(ApproximateFontMetrics),
    )
    .unwrap()
}

fn root_width(frame: &Frame) -> f32 {
    let page = frame.page().unwrap();
    page.boxes.get(page.boxes.root()).unwrap().geometry.rect.width
}

#[test]
fn test_show_renders_a_frame() {
    let worker = spawn(Site::default());
    let generation = worker.show("<title>Hello</title><p>hi</p>", None);
    let frame = worker.recv_timeout(WAIT).unwrap();
    assert_eq!(frame.generation(), generation);
    let Frame::Rendered { page, .. } = frame else {
        panic!("expected a rendered frame, got {frame:?}");
    };
    assert_eq!(page.title.as_deref(), Some("Hello"));
    assert_eq!(worker.last_error(), None);
}

#[test]
fn test_load_uses_the_loader_and_its_stylesheets() {
    let site = Site::default()
        .with("mem:/index.html", r#"<link rel="stylesheet" href="mem:/s.css"><p>styled</p>"#)
        .with("mem:/s.css", "p { height: 40px; margin: 0 }");
    let worker = spawn(site);
    let _ = worker.load("mem:/index.html");
    let frame = worker.recv_timeout(WAIT).unwrap();
    let Frame::Rendered { page, .. } = frame else {
        panic!("expected a rendered frame, got {frame:?}");
    };
    assert_eq!(page.location.as_deref(), Some("mem:/index.html"));
    let p = page.dom.find_first(wren_browser::dom::ElementKind::P).unwrap();
    let id = page.render.find_by_dom(p).unwrap();
    assert_eq!(page.render.get(id).unwrap().geometry.height, 40.0);
}

#[test]
fn test_missing_document_shows_error_page() {
    let worker = spawn(Site::default());
    let _ = worker.load("/nowhere/index.html");
    let frame = worker.recv_timeout(WAIT).unwrap();
    let Frame::Error { kind, page, .. } = frame else {
        panic!("expected an error frame, got {frame:?}");
    };
    assert_eq!(kind, ErrorKind::NotFound);
    assert_eq!(page.title.as_deref(), Some("Page not found"));
    let text = page.dom.text_content(page.dom.body().unwrap());
    assert!(text.contains("/nowhere/index.html"));
    assert_eq!(worker.last_error(), Some(ErrorKind::NotFound));
}

#[test]
fn test_redraw_after_error_keeps_the_error_page() {
    let worker = spawn(Site::default());
    let _ = worker.load("/nowhere/index.html");
    let _ = worker.recv_timeout(WAIT).unwrap();

    let generation = worker.redraw(300.0, 200.0);
    let frame = worker.recv_timeout(WAIT).unwrap();
    assert_eq!(frame.generation(), generation);
    assert_eq!(frame.page().unwrap().title.as_deref(), Some("Page not found"));
    assert_eq!(root_width(&frame), 300.0);
    assert_eq!(worker.last_error(), Some(ErrorKind::NotFound));
}

#[test]
fn test_successful_load_clears_the_error() {
    let site = Site::default().with("mem:/ok.html", "<p>fine</p>");
    let worker = spawn(site);
    let _ = worker.load("mem:/missing.html");
    let _ = worker.recv_timeout(WAIT).unwrap();
    assert_eq!(worker.last_error(), Some(ErrorKind::NotFound));

    let _ = worker.load("mem:/ok.html");
    let frame = worker.recv_timeout(WAIT).unwrap();
    assert!(matches!(frame, Frame::Rendered { .. }));
    assert_eq!(worker.last_error(), None);
}

#[test]
fn test_latest_redraw_wins() {
    let body = "<p>word </p>".repeat(200);
    let worker = spawn(Site::default());
    let _ = worker.show(body, None);

    let widths = [320.0, 480.0, 640.0, 720.0, 560.0];
    let mut last = 0;
    for width in widths {
        last = worker.redraw(width, 300.0);
    }

    // One frame per request: the show, then each redraw in order.
    let frames: Vec<Frame> = (0..=widths.len()).map(|_| worker.recv_timeout(WAIT).unwrap()).collect();
    let generations: Vec<u64> = frames.iter().map(Frame::generation).collect();
    assert_eq!(generations, vec![0, 1, 2, 3, 4, 5]);
    for frame in &frames[1..frames.len() - 1] {
        assert!(matches!(frame, Frame::Rendered { .. } | Frame::Cancelled { .. }));
    }

    let final_frame = frames.last().unwrap();
    assert_eq!(final_frame.generation(), last);
    assert!(matches!(final_frame, Frame::Rendered { .. }));
    assert_eq!(root_width(final_frame), 560.0);
}

#[test]
fn test_drop_joins_the_thread() {
    let worker = spawn(Site::default());
    let _ = worker.show("<p>x</p>", None);
    drop(worker);
}

/// Fails on any text containing "boom" or "wrong", so both a document and
/// the internal error page built for it can be made to panic.
struct Explosive;

impl FontMetrics for Explosive {
    fn measure(&self, text: &str, font: &FontQuery<'_>) -> TextMetrics {
        assert!(
            !text.contains("boom") && !text.contains("wrong"),
            "cannot measure {text:?}"
        );
        ApproximateFontMetrics.measure(text, font)
    }
}

#[test]
fn test_panicking_error_page_keeps_the_thread_alive() {
    let worker = PageWorker::spawn(
        PipelineConfig::with_viewport(400.0, 300.0),
        Arc::new(Site::default()),
        Box::new(Explosive),
    )
    .unwrap();

    // The document panics, then its error page ("Something went wrong")
    // panics too: the request is abandoned without a frame.
    let _ = worker.show("<p>boom</p>", None);
    let generation = worker.show("<title>Fine</title><p>fine</p>", None);

    let frame = worker.recv_timeout(WAIT).unwrap();
    assert_eq!(frame.generation(), generation);
    let Frame::Rendered { page, .. } = frame else {
        panic!("expected a rendered frame, got {frame:?}");
    };
    assert_eq!(page.title.as_deref(), Some("Fine"));
    assert_eq!(worker.last_error(), None);
}
