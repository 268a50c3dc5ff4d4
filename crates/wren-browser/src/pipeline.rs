//! The content pipeline.
//!
//! ```text
//! HTML ─ parse ─▶ DomTree ─ stylesheets ─▶ [Stylesheet] ─ cascade ─▶ StyleMap
//!      ─ render tree + marker cascade ─▶ RenderTree ─ box tree ─▶ BoxTree
//!      ─ layout ─▶ RenderedPage
//! ```
//!
//! Every pass starts from the HTML text; nothing is reused between passes.
//! Cancellation is polled between stages only, never inside one.

use log::{debug, warn};
use wren_common::url::resolve_url;
use wren_common::warning::{clear_warnings, warn_once};
use wren_css::{
    BoxTree, Cascade, FontMetrics, MediaContext, MediaQuery, RenderTree, StyleSource, Stylesheet,
    UserAgentStylesheet, layout, parse_stylesheet,
};
use wren_dom::DomTree;

use crate::error::{LayoutFailure, PageError, Stage};
use crate::loader::ResourceLoader;
use crate::page::RenderedPage;

/// Nesting limit for `@import` chains.
const MAX_IMPORT_DEPTH: usize = 8;

/// Settings for one pipeline pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Viewport width in px.
    pub viewport_width: f32,
    /// Viewport height in px, used by media queries.
    pub viewport_height: f32,
    /// Author stylesheets applied after the document's own.
    pub extra_css: Vec<String>,
    /// Location that relative stylesheet links resolve against.
    pub base_url: Option<String>,
    /// Apply the built-in user-agent stylesheet.
    pub user_agent_stylesheet: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            extra_css: Vec::new(),
            base_url: None,
            user_agent_stylesheet: true,
        }
    }
}

impl PipelineConfig {
    /// Defaults with the given viewport.
    #[must_use]
    pub fn with_viewport(width: f32, height: f32) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            ..Self::default()
        }
    }

    fn media(&self) -> MediaContext {
        MediaContext::screen(self.viewport_width, self.viewport_height)
    }
}

/// How a pass ended.
#[derive(Debug)]
pub enum Outcome {
    /// All stages ran.
    Rendered(Box<RenderedPage>),
    /// A newer request superseded this one between stages.
    Cancelled,
}

impl Outcome {
    /// The page, unless the pass was cancelled.
    #[must_use]
    pub fn into_page(self) -> Option<RenderedPage> {
        match self {
            Self::Rendered(page) => Some(*page),
            Self::Cancelled => None,
        }
    }
}

/// One run of the pipeline over a document.
pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    loader: &'a dyn ResourceLoader,
    metrics: &'a dyn FontMetrics,
    cancelled: Option<&'a dyn Fn() -> bool>,
}

impl<'a> Pipeline<'a> {
    /// A pipeline that is never cancelled.
    #[must_use]
    pub fn new(config: &'a PipelineConfig, loader: &'a dyn ResourceLoader, metrics: &'a dyn FontMetrics) -> Self {
        Self {
            config,
            loader,
            metrics,
            cancelled: None,
        }
    }

    /// Poll `cancelled` between stages.
    #[must_use]
    pub fn with_cancellation(mut self, cancelled: &'a dyn Fn() -> bool) -> Self {
        self.cancelled = Some(cancelled);
        self
    }

    /// Run every stage over `html`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Layout`] if a stage hits a structural failure.
    /// Missing or malformed stylesheets are logged and skipped.
    pub fn run(&self, html: &str) -> Result<Outcome, PageError> {
        clear_warnings();

        // STEP 1: Parse.
        let dom = wren_html::parse(html);
        let title = wren_html::document_title(&dom);
        debug!("parse: {} nodes", dom.len());
        if self.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        // STEP 2: Collect and parse stylesheets.
        let sheets = self.stylesheets(&dom);
        debug!("stylesheets: {} author sheets", sheets.len());
        if self.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        // STEP 3: Cascade.
        let ua = if self.config.user_agent_stylesheet {
            UserAgentStylesheet::load()
        } else {
            UserAgentStylesheet::empty()
        };
        let cascade = Cascade::new(&ua, &sheets, self.config.media());
        let styles = cascade.compute(&dom);
        debug!("cascade: {} styled elements", styles.len());
        if self.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        // STEP 4: Render tree, then the second cascade for markers.
        let mut render = RenderTree::build(&dom, &styles);
        render.apply_marker_styles(&dom, &cascade, &styles);
        if self.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        // STEP 5: Box tree.
        let mut boxes = BoxTree::build(&render);
        if self.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        // STEP 6: Layout.
        let summary = layout(&mut boxes, self.config.viewport_width, self.metrics)
            .map_err(|e| LayoutFailure::new(Stage::Layout, e))?;
        render.apply_geometry(&boxes);

        Ok(Outcome::Rendered(Box::new(RenderedPage {
            title,
            location: self.config.base_url.clone(),
            viewport_width: self.config.viewport_width,
            viewport_height: self.config.viewport_height,
            dom,
            render,
            boxes,
            summary,
        })))
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.is_some_and(|cancelled| cancelled())
    }

    /// [§ 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
    /// [§ 4.2.4 The link element](https://html.spec.whatwg.org/multipage/semantics.html#the-link-element)
    ///
    /// Document sheets in tree order, each preceded by its imports, then the
    /// configured extra sheets.
    fn stylesheets(&self, dom: &DomTree) -> Vec<Stylesheet> {
        let base = self.config.base_url.as_deref();
        let mut sheets = Vec::new();
        for source in wren_css::collect_stylesheets(dom) {
            match source {
                StyleSource::Inline { css, media } => {
                    self.push_with_imports(parse_stylesheet(&css), media, base, 0, &mut sheets);
                }
                StyleSource::External { href, media } => {
                    let url = resolve_url(&href, base);
                    if let Some(sheet) = self.fetch(&url) {
                        self.push_with_imports(sheet, media, Some(&url), 0, &mut sheets);
                    }
                }
            }
        }
        for css in &self.config.extra_css {
            self.push_with_imports(parse_stylesheet(css), None, base, 0, &mut sheets);
        }
        sheets
    }

    /// [CSS Cascading § 2 Importing Style Sheets](https://www.w3.org/TR/css-cascade-4/#at-import)
    ///
    /// "The @import rule allows users to import style rules from other style
    /// sheets." Imported rules come before the importing sheet's own.
    fn push_with_imports(
        &self,
        sheet: Stylesheet,
        media: Option<MediaQuery>,
        base: Option<&str>,
        depth: usize,
        out: &mut Vec<Stylesheet>,
    ) {
        for import in &sheet.imports {
            if depth >= MAX_IMPORT_DEPTH {
                warn_once("CSS", &format!("@import nested too deeply: {}", import.href));
                break;
            }
            let url = resolve_url(&import.href, base);
            let Some(imported) = self.fetch(&url) else { continue };
            let guard = match (media.clone(), import.media.clone()) {
                (Some(outer), Some(inner)) => Some(MediaQuery::and(outer, inner)),
                (outer, inner) => outer.or(inner),
            };
            self.push_with_imports(imported, guard, Some(&url), depth + 1, out);
        }
        out.push(sheet.with_media(media));
    }

    fn fetch(&self, url: &str) -> Option<Stylesheet> {
        match self.loader.fetch_stylesheet(url) {
            Ok(css) => Some(parse_stylesheet(&css)),
            Err(e) => {
                warn!("stylesheet {url} skipped: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use wren_css::ApproximateFontMetrics;

    use super::*;
    use crate::error::LoadError;
    use crate::loader::Resource;

    #[derive(Default)]
    struct Sheets(HashMap<String, String>);

    impl ResourceLoader for Sheets {
        fn fetch_document(&self, location: &str) -> Result<Resource, LoadError> {
            Err(LoadError::NotFound { path: location.into() })
        }

        fn fetch_stylesheet(&self, location: &str) -> Result<String, LoadError> {
            self.0
                .get(location)
                .cloned()
                .ok_or_else(|| LoadError::NotFound { path: location.into() })
        }
    }

    fn run(html: &str, config: &PipelineConfig, loader: &Sheets) -> RenderedPage {
        Pipeline::new(config, loader, &ApproximateFontMetrics)
            .run(html)
            .unwrap()
            .into_page()
            .unwrap()
    }

    fn color_of_p(page: &RenderedPage) -> String {
        let p = page.dom.find_first(wren_dom::ElementKind::P).unwrap();
        let id = page.render.find_by_dom(p).unwrap();
        page.render.get(id).unwrap().style.color.hex()
    }

    #[test]
    fn test_linked_and_imported_sheets_apply_in_order() {
        let mut loader = Sheets::default();
        let _ = loader.0.insert(
            "http://site.test/css/main.css".into(),
            "@import \"base.css\"; p { color: blue }".into(),
        );
        let _ = loader
            .0
            .insert("http://site.test/css/base.css".into(), "p { color: red; font-size: 20px }".into());
        let config = PipelineConfig {
            base_url: Some("http://site.test/index.html".into()),
            ..PipelineConfig::default()
        };
        let page = run(r#"<link rel="stylesheet" href="css/main.css"><p>x</p>"#, &config, &loader);
        assert_eq!(color_of_p(&page), "0000FF");
        let p = page.dom.find_first(wren_dom::ElementKind::P).unwrap();
        let id = page.render.find_by_dom(p).unwrap();
        assert_eq!(page.render.get(id).unwrap().style.font_size, 20.0);
    }

    #[test]
    fn test_missing_stylesheet_is_skipped() {
        let page = run(
            r#"<link rel="stylesheet" href="gone.css"><p>x</p>"#,
            &PipelineConfig::default(),
            &Sheets::default(),
        );
        assert_eq!(color_of_p(&page), "000000");
    }

    #[test]
    fn test_extra_css_comes_last() {
        let config = PipelineConfig {
            extra_css: vec!["p { color: green }".into()],
            ..PipelineConfig::default()
        };
        let page = run("<style>p { color: red }</style><p>x</p>", &config, &Sheets::default());
        assert_eq!(color_of_p(&page), "008000");
    }

    #[test]
    fn test_cancellation_between_stages() {
        let polls = Cell::new(0);
        let cancelled = || {
            polls.set(polls.get() + 1);
            polls.get() >= 3
        };
        let config = PipelineConfig::default();
        let loader = Sheets::default();
        let outcome = Pipeline::new(&config, &loader, &ApproximateFontMetrics)
            .with_cancellation(&cancelled)
            .run("<p>x</p>")
            .unwrap();
        assert!(matches!(outcome, Outcome::Cancelled));
        assert_eq!(polls.get(), 3);
    }

    #[test]
    fn test_viewport_drives_media_and_layout() {
        let html = "<style>@media (max-width: 400px) { p { color: red } }</style><p>x</p>";
        let loader = Sheets::default();
        let narrow = run(html, &PipelineConfig::with_viewport(300.0, 200.0), &loader);
        let wide = run(html, &PipelineConfig::with_viewport(900.0, 200.0), &loader);
        assert_eq!(color_of_p(&narrow), "FF0000");
        assert_eq!(color_of_p(&wide), "000000");
        assert_eq!(wide.boxes.get(wide.boxes.root()).unwrap().geometry.rect.width, 900.0);
    }
}
