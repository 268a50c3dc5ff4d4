//! The page worker thread.
//!
//! A [`PageWorker`] owns one thread that runs every pipeline pass for one
//! page. Requests go in over a channel and finished frames come out over
//! another. The page state is held behind a mutex for the whole of a pass.
//!
//! Each redraw takes a fresh generation number. A running redraw whose
//! generation is no longer the latest stops at the next stage boundary and
//! reports [`Frame::Cancelled`]. Loads are never cancelled; they queue
//! behind whatever is in flight.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::anyhow;
use log::{debug, error};
use wren_css::FontMetrics;

use crate::error::{ErrorKind, PageError};
use crate::error_page::error_page_html;
use crate::font_metrics::CachedMetrics;
use crate::loader::ResourceLoader;
use crate::page::RenderedPage;
use crate::pipeline::{Outcome, Pipeline, PipelineConfig};

/// Work for the page thread.
#[derive(Debug)]
enum Request {
    /// Fetch a document and render it.
    Load { location: String, generation: u64 },
    /// Render HTML that is already in memory.
    Show {
        html: String,
        base_url: Option<String>,
        generation: u64,
    },
    /// Render the current document at a new viewport size.
    Redraw { width: f32, height: f32, generation: u64 },
}

/// A finished pass.
#[derive(Debug, Clone)]
pub enum Frame {
    /// The document rendered.
    Rendered {
        /// Generation of the request.
        generation: u64,
        /// The result.
        page: Arc<RenderedPage>,
    },
    /// The document failed and the error page rendered in its place.
    Error {
        /// Generation of the request.
        generation: u64,
        /// What went wrong.
        kind: ErrorKind,
        /// The rendered error page.
        page: Arc<RenderedPage>,
    },
    /// A newer redraw superseded this one.
    Cancelled {
        /// Generation of the superseded request.
        generation: u64,
    },
}

impl Frame {
    /// Generation of the request that produced this frame.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        match self {
            Self::Rendered { generation, .. } | Self::Error { generation, .. } | Self::Cancelled { generation } => {
                *generation
            }
        }
    }

    /// The rendered page or error page, if any.
    #[must_use]
    pub fn page(&self) -> Option<&Arc<RenderedPage>> {
        match self {
            Self::Rendered { page, .. } | Self::Error { page, .. } => Some(page),
            Self::Cancelled { .. } => None,
        }
    }
}

/// Everything a page keeps between passes.
struct PageState {
    config: PipelineConfig,
    /// HTML of the current document, or of its error page.
    html: String,
    metrics: CachedMetrics,
    last_error: Option<PageError>,
}

/// Owner of a page thread.
pub struct PageWorker {
    requests: Option<Sender<Request>>,
    frames: Receiver<Frame>,
    generation: Arc<AtomicU64>,
    state: Arc<Mutex<PageState>>,
    handle: Option<JoinHandle<()>>,
}

impl PageWorker {
    /// Start a page thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(
        config: PipelineConfig,
        loader: Arc<dyn ResourceLoader>,
        metrics: Box<dyn FontMetrics + Send>,
    ) -> std::io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel();
        let (frame_tx, frame_rx) = mpsc::channel();
        let generation = Arc::new(AtomicU64::new(0));
        let state = Arc::new(Mutex::new(PageState {
            config,
            html: String::new(),
            metrics: CachedMetrics::new(metrics),
            last_error: None,
        }));

        let context = WorkerContext {
            requests: request_rx,
            frames: frame_tx,
            generation: Arc::clone(&generation),
            state: Arc::clone(&state),
            loader,
        };
        let handle = thread::Builder::new()
            .name("wren-page".to_string())
            .spawn(move || context.run())?;

        Ok(Self {
            requests: Some(request_tx),
            frames: frame_rx,
            generation,
            state,
            handle: Some(handle),
        })
    }

    fn send(&self, request: Request) {
        if let Some(requests) = &self.requests
            && requests.send(request).is_err()
        {
            error!("page thread is gone; request dropped");
        }
    }

    /// The current generation, without starting a new one.
    fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Fetch and render `location`. Returns the request's generation.
    pub fn load(&self, location: impl Into<String>) -> u64 {
        let generation = self.current();
        self.send(Request::Load {
            location: location.into(),
            generation,
        });
        generation
    }

    /// Render `html` as the page's document. Returns the request's
    /// generation.
    pub fn show(&self, html: impl Into<String>, base_url: Option<String>) -> u64 {
        let generation = self.current();
        self.send(Request::Show {
            html: html.into(),
            base_url,
            generation,
        });
        generation
    }

    /// Re-render at a new viewport size, superseding any redraw still in
    /// flight. Returns the request's generation.
    pub fn redraw(&self, width: f32, height: f32) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.send(Request::Redraw {
            width,
            height,
            generation,
        });
        generation
    }

    /// Wait for the next frame.
    #[must_use]
    pub fn recv(&self) -> Option<Frame> {
        self.frames.recv().ok()
    }

    /// Wait up to `timeout` for the next frame.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Frame> {
        self.frames.recv_timeout(timeout).ok()
    }

    /// Classification of the most recent failure, if the current document
    /// failed.
    #[must_use]
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last_error
            .as_ref()
            .map(PageError::kind)
    }
}

impl Drop for PageWorker {
    fn drop(&mut self) {
        // Closing the channel ends the thread's loop.
        drop(self.requests.take());
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            error!("page thread panicked");
        }
    }
}

/// The thread's half.
struct WorkerContext {
    requests: Receiver<Request>,
    frames: Sender<Frame>,
    generation: Arc<AtomicU64>,
    state: Arc<Mutex<PageState>>,
    loader: Arc<dyn ResourceLoader>,
}

impl WorkerContext {
    fn run(self) {
        while let Ok(request) = self.requests.recv() {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let frame = match request {
                Request::Load { location, generation } => {
                    debug!("load {location}");
                    match self.loader.fetch_document(&location) {
                        Ok(resource) => {
                            state.html = resource.text;
                            state.config.base_url = Some(resource.location);
                            state.metrics.clear();
                            state.last_error = None;
                            self.pass(&mut state, generation, false)
                        }
                        Err(e) => self.fail(&mut state, generation, e.into()),
                    }
                }
                Request::Show {
                    html,
                    base_url,
                    generation,
                } => {
                    state.html = html;
                    state.config.base_url = base_url;
                    state.metrics.clear();
                    state.last_error = None;
                    self.pass(&mut state, generation, false)
                }
                Request::Redraw {
                    width,
                    height,
                    generation,
                } => {
                    state.config.viewport_width = width;
                    state.config.viewport_height = height;
                    self.pass(&mut state, generation, true)
                }
            };
            drop(state);
            if let Some(frame) = frame
                && self.frames.send(frame).is_err()
            {
                debug!("frame receiver dropped");
            }
        }
        debug!("page thread exiting");
    }

    /// Run the pipeline over the current document.
    fn pass(&self, state: &mut PageState, generation: u64, cancellable: bool) -> Option<Frame> {
        let latest = &self.generation;
        let superseded = || latest.load(Ordering::SeqCst) != generation;
        let cancelled: Option<&dyn Fn() -> bool> = if cancellable { Some(&superseded) } else { None };
        let result = self.render(&state.config, &state.metrics, &state.html, cancelled);
        match result {
            Ok(Outcome::Rendered(page)) => Some(Frame::Rendered {
                generation,
                page: Arc::from(page),
            }),
            Ok(Outcome::Cancelled) => {
                debug!("redraw {generation} superseded");
                Some(Frame::Cancelled { generation })
            }
            Err(e) => self.fail(state, generation, e),
        }
    }

    /// One pipeline run. A panic inside it becomes [`PageError::Other`].
    fn render(
        &self,
        config: &PipelineConfig,
        metrics: &CachedMetrics,
        html: &str,
        cancelled: Option<&dyn Fn() -> bool>,
    ) -> Result<Outcome, PageError> {
        catch_unwind(AssertUnwindSafe(|| {
            let pipeline = Pipeline::new(config, &*self.loader, metrics);
            match cancelled {
                Some(cancelled) => pipeline.with_cancellation(cancelled).run(html),
                None => pipeline.run(html),
            }
        }))
        .unwrap_or_else(|panic| {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(PageError::Other(anyhow!("pipeline panicked: {message}")))
        })
    }

    /// Record `error` and make the error page the page's document, so later
    /// redraws show it too. If the error page itself fails the request is
    /// abandoned.
    fn fail(&self, state: &mut PageState, generation: u64, error: PageError) -> Option<Frame> {
        error!("{}", error.chain());
        let kind = error.kind();
        state.html = error_page_html(&error);
        state.config.base_url = None;
        state.last_error = Some(error);

        let config = PipelineConfig {
            extra_css: Vec::new(),
            ..state.config.clone()
        };
        match self.render(&config, &state.metrics, &state.html, None) {
            Ok(Outcome::Rendered(page)) => Some(Frame::Error {
                generation,
                kind,
                page: Arc::from(page),
            }),
            Ok(Outcome::Cancelled) => None,
            Err(e) => {
                error!("error page failed to render: {}", e.chain());
                None
            }
        }
    }
}
