//! End-to-end tests of the content pipeline.

use std::fs;

use wren_browser::{
    DefaultLoader, ErrorKind, LoadError, PageError, Pipeline, PipelineConfig, RenderedPage, ResourceLoader,
    error_page_html,
};
use wren_css::ApproximateFontMetrics;

fn render(html: &str, config: &PipelineConfig) -> RenderedPage {
    Pipeline::new(config, &DefaultLoader, &ApproximateFontMetrics)
        .run(html)
        .unwrap()
        .into_page()
        .unwrap()
}

#[test]
fn test_dump_serializes_the_box_tree() {
    let page = render(
        "<html><head><style>div { height: 10px }</style></head><body><div></div><p>hi</p></body></html>",
        &PipelineConfig::with_viewport(200.0, 100.0),
    );
    let dump = page.dump();
    assert_eq!(dump.label, "#root");
    assert!(dump.len() > 3);

    let json = serde_json::to_value(&dump).unwrap();
    assert_eq!(json["rect"]["width"], 200.0);
    let body = &json["children"][0]["children"][0];
    assert_eq!(body["label"], "body");
    assert_eq!(body["outer"], "block");
    assert_eq!(body["inner"], "flow");
    assert_eq!(body["children"][0]["label"], "div");
    assert_eq!(body["children"][0]["rect"]["height"], 10.0);
    assert!(body["children"][0].get("children").is_none());

    let text = &body["children"][1]["children"][0];
    assert_eq!(text["label"], "#text");
    assert_eq!(text["text"], "hi");
}

#[test]
fn test_content_height_matches_the_root() {
    let page = render(
        "<style>body { margin: 0 } p { margin: 0; height: 30px }</style><p></p><p></p>",
        &PipelineConfig::default(),
    );
    assert_eq!(page.content_height(), 60.0);
}

#[test]
fn test_error_page_renders_through_the_pipeline() {
    let error = PageError::from(LoadError::NotHtml {
        path: "notes.txt".into(),
    });
    let page = render(&error_page_html(&error), &PipelineConfig::default());
    assert_eq!(page.title.as_deref(), Some(ErrorKind::NotHtml.title()));

    let h1 = page.dom.find_first(wren_browser::dom::ElementKind::H1).unwrap();
    let id = page.render.find_by_dom(h1).unwrap();
    let node = page.render.get(id).unwrap();
    assert_eq!(node.style.font_size, 28.0);
    assert!(node.geometry.height > 0.0);
}

#[test]
fn test_file_documents_resolve_their_stylesheets() {
    let dir = std::env::temp_dir().join(format!("wren-pipeline-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("site.css"), "p { color: rgb(1, 2, 3) }").unwrap();
    fs::write(dir.join("index.html"), r#"<link rel="stylesheet" href="site.css"><p>x</p>"#).unwrap();

    let location = dir.join("index.html").display().to_string();
    let resource = DefaultLoader.fetch_document(&location).unwrap();
    let config = PipelineConfig {
        base_url: Some(resource.location.clone()),
        ..PipelineConfig::default()
    };
    let page = render(&resource.text, &config);

    let p = page.dom.find_first(wren_browser::dom::ElementKind::P).unwrap();
    let id = page.render.find_by_dom(p).unwrap();
    assert_eq!(page.render.get(id).unwrap().style.color.hex(), "010203");
    fs::remove_dir_all(&dir).unwrap();
}
