//! Page errors.
//!
//! A page fails either while its document is fetched ([`LoadError`]) or
//! while a pipeline stage runs ([`LayoutFailure`]). Both are folded into
//! [`PageError`], whose [`PageError::kind`] picks the error page shown in
//! place of the document.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to fetch a document or stylesheet.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No file at the path.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// The requested path.
        path: PathBuf,
    },
    /// The file exists but could not be read.
    #[error("cannot read {}", path.display())]
    Unreadable {
        /// The requested path.
        path: PathBuf,
        /// The I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file does not have an HTML extension.
    #[error("{} is not an HTML document", path.display())]
    NotHtml {
        /// The requested path.
        path: PathBuf,
    },
    /// The path names a directory.
    #[error("{} is a directory", path.display())]
    IsDirectory {
        /// The requested path.
        path: PathBuf,
    },
    /// The request could not be completed.
    #[error("request to {url} failed")]
    Network {
        /// The requested URL.
        url: String,
        /// The transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("{url} answered with HTTP {code}")]
    HttpStatus {
        /// The requested URL.
        url: String,
        /// The status code.
        code: u16,
    },
    /// The server sent something other than HTML.
    #[error("{url} is {content_type}, not HTML")]
    ContentType {
        /// The requested URL.
        url: String,
        /// The `Content-Type` header as sent.
        content_type: String,
    },
}

/// The pipeline stage a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// HTML parsing.
    Parse,
    /// Stylesheet collection and parsing.
    Stylesheets,
    /// Style computation.
    Cascade,
    /// Render tree generation and the marker cascade.
    RenderTree,
    /// Box tree generation.
    BoxTree,
    /// Box layout.
    Layout,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parse => "parse",
            Self::Stylesheets => "stylesheets",
            Self::Cascade => "cascade",
            Self::RenderTree => "render tree",
            Self::BoxTree => "box tree",
            Self::Layout => "layout",
        })
    }
}

/// A structural failure inside the pipeline.
#[derive(Debug, Error)]
#[error("{stage} stage failed")]
pub struct LayoutFailure {
    /// Where it happened.
    pub stage: Stage,
    /// What went wrong.
    #[source]
    pub cause: anyhow::Error,
}

impl LayoutFailure {
    /// Wrap `cause` as a failure of `stage`.
    pub fn new(stage: Stage, cause: impl Into<anyhow::Error>) -> Self {
        Self {
            stage,
            cause: cause.into(),
        }
    }
}

/// Anything that can keep a page from rendering.
#[derive(Debug, Error)]
pub enum PageError {
    /// The document could not be fetched.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// A pipeline stage failed.
    #[error(transparent)]
    Layout(#[from] LayoutFailure),
    /// Anything else, such as a panicking stage.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Classification of a [`PageError`] for the error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// [`LoadError::NotFound`]
    NotFound,
    /// [`LoadError::Unreadable`]
    Unreadable,
    /// [`LoadError::NotHtml`]
    NotHtml,
    /// [`LoadError::IsDirectory`]
    IsDirectory,
    /// [`LoadError::Network`]
    Network,
    /// [`LoadError::HttpStatus`]
    HttpStatus,
    /// [`LoadError::ContentType`]
    ContentType,
    /// [`PageError::Layout`]
    Layout,
    /// [`PageError::Other`]
    Internal,
}

impl ErrorKind {
    /// Headline of the error page.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::NotFound => "Page not found",
            Self::Unreadable => "Page could not be read",
            Self::NotHtml | Self::ContentType => "Not a web page",
            Self::IsDirectory => "This is a folder",
            Self::Network => "Could not connect",
            Self::HttpStatus => "The server returned an error",
            Self::Layout => "Page could not be displayed",
            Self::Internal => "Something went wrong",
        }
    }

    /// One-line explanation under the headline.
    #[must_use]
    pub const fn subtitle(self) -> &'static str {
        match self {
            Self::NotFound => "Check the path for typos.",
            Self::Unreadable => "The file exists but its contents could not be read.",
            Self::NotHtml => "Only files ending in .html or .htm can be opened.",
            Self::IsDirectory => "Open an HTML file inside it instead.",
            Self::Network => "Check the address and your connection.",
            Self::HttpStatus => "The server answered, but not with the page.",
            Self::ContentType => "The server sent something other than HTML.",
            Self::Layout => "The document was loaded but laying it out failed.",
            Self::Internal => "An unexpected error stopped the page from rendering.",
        }
    }
}

impl PageError {
    /// Which error page this failure gets.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Load(load) => match load {
                LoadError::NotFound { .. } => ErrorKind::NotFound,
                LoadError::Unreadable { .. } => ErrorKind::Unreadable,
                LoadError::NotHtml { .. } => ErrorKind::NotHtml,
                LoadError::IsDirectory { .. } => ErrorKind::IsDirectory,
                LoadError::Network { .. } => ErrorKind::Network,
                LoadError::HttpStatus { .. } => ErrorKind::HttpStatus,
                LoadError::ContentType { .. } => ErrorKind::ContentType,
            },
            Self::Layout(_) => ErrorKind::Layout,
            Self::Other(_) => ErrorKind::Internal,
        }
    }

    /// The error and its causes, outermost first, joined with `: `.
    #[must_use]
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = std::error::Error::source(cause);
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_variant() {
        let error = PageError::from(LoadError::NotFound {
            path: PathBuf::from("/missing.html"),
        });
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.to_string(), "file not found: /missing.html");

        let error = PageError::from(anyhow::anyhow!("boom"));
        assert_eq!(error.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_chain_includes_causes() {
        let error = PageError::from(LayoutFailure::new(Stage::Layout, anyhow::anyhow!("box #3 is not in the box tree")));
        assert_eq!(error.kind(), ErrorKind::Layout);
        assert_eq!(error.chain(), "layout stage failed: box #3 is not in the box tree");
    }

    #[test]
    fn test_unreadable_keeps_io_source() {
        let error = PageError::from(LoadError::Unreadable {
            path: PathBuf::from("a.html"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(error.chain(), "cannot read a.html: denied");
    }
}
