//! Page loading and pipeline orchestration for the Wren renderer.
//!
//! # Scope
//!
//! This crate provides:
//! - **Resource Loading** - documents and stylesheets from disk or HTTP
//! - **Pipeline** - parse, cascade, render tree, box tree and layout in
//!   one pass, with cancellation between stages
//! - **Error Pages** - classified load and layout failures rendered as HTML
//! - **Page Worker** - a dedicated thread per page fed over a channel
//! - **Font Metrics** - fontdue-backed measurement and a per-page cache
//!
//! # Example
//!
//! ```
//! use wren_browser::{DefaultLoader, Pipeline, PipelineConfig};
//! use wren_css::ApproximateFontMetrics;
//!
//! let config = PipelineConfig::with_viewport(400.0, 300.0);
//! let page = Pipeline::new(&config, &DefaultLoader, &ApproximateFontMetrics)
//!     .run("<title>Hi</title><p>Hello</p>")
//!     .unwrap()
//!     .into_page()
//!     .unwrap();
//! assert_eq!(page.title.as_deref(), Some("Hi"));
//! ```

pub mod error;
pub mod error_page;
pub mod font_metrics;
pub mod loader;
pub mod page;
pub mod pipeline;
pub mod worker;

pub use wren_css as css;
pub use wren_dom as dom;
pub use wren_html as html;

pub use error::{ErrorKind, LayoutFailure, LoadError, PageError, Stage};
pub use error_page::error_page_html;
pub use font_metrics::{CachedMetrics, FontdueMetrics};
pub use loader::{DefaultLoader, FileLoader, HttpLoader, Resource, ResourceLoader};
pub use page::{BoxDump, RenderedPage};
pub use pipeline::{Outcome, Pipeline, PipelineConfig};
pub use worker::{Frame, PageWorker};
