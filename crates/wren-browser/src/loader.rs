//! Document and stylesheet retrieval.
//!
//! [`ResourceLoader`] abstracts where pages come from so the pipeline and
//! the worker can be driven by the filesystem, HTTP, or a test double.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use wren_common::url::is_remote;

use crate::error::LoadError;

/// User-Agent header sent with every request.
const USER_AGENT: &str = concat!("wren/", env!("CARGO_PKG_VERSION"));

/// Upper bound on a single HTTP request.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Extensions accepted for local documents.
const HTML_EXTENSIONS: [&str; 3] = ["html", "htm", "xhtml"];

/// A fetched document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Where the text came from, used as the base for relative links.
    pub location: String,
    /// The decoded text.
    pub text: String,
}

/// Fetches documents and stylesheets.
///
/// Implementations must be `Send + Sync` so one loader can serve the worker
/// thread and its owner.
pub trait ResourceLoader: Send + Sync {
    /// Fetch an HTML document.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] that classifies why the document is
    /// unavailable.
    fn fetch_document(&self, location: &str) -> Result<Resource, LoadError>;

    /// Fetch a stylesheet by resolved URL or path.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the stylesheet is unavailable.
    fn fetch_stylesheet(&self, location: &str) -> Result<String, LoadError>;
}

/// Reads documents from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl FileLoader {
    fn path_of(location: &str) -> PathBuf {
        PathBuf::from(location.strip_prefix("file://").unwrap_or(location))
    }

    fn read(path: &Path) -> Result<String, LoadError> {
        let metadata = fs::metadata(path).map_err(|source| classify_io(path, source))?;
        if metadata.is_dir() {
            return Err(LoadError::IsDirectory {
                path: path.to_path_buf(),
            });
        }
        let bytes = fs::read(path).map_err(|source| classify_io(path, source))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn classify_io(path: &Path, source: io::Error) -> LoadError {
    if source.kind() == io::ErrorKind::NotFound {
        LoadError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ResourceLoader for FileLoader {
    fn fetch_document(&self, location: &str) -> Result<Resource, LoadError> {
        let path = Self::path_of(location);
        let text = Self::read(&path)?;
        let is_html = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| HTML_EXTENSIONS.iter().any(|h| ext.eq_ignore_ascii_case(h)));
        if !is_html {
            return Err(LoadError::NotHtml { path });
        }
        debug!("loaded {} ({} bytes)", path.display(), text.len());
        Ok(Resource {
            location: path.to_string_lossy().into_owned(),
            text,
        })
    }

    fn fetch_stylesheet(&self, location: &str) -> Result<String, LoadError> {
        Self::read(&Self::path_of(location))
    }
}

/// Blocking HTTP client.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpLoader;

impl HttpLoader {
    fn get(url: &str) -> Result<reqwest::blocking::Response, LoadError> {
        let network = |source| LoadError::Network {
            url: url.to_string(),
            source,
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(network)?;
        let response = client.get(url).send().map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }
        Ok(response)
    }
}

/// Whether a `Content-Type` value is one the HTML parser accepts.
fn is_html_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or("").trim();
    essence.eq_ignore_ascii_case("text/html") || essence.eq_ignore_ascii_case("application/xhtml+xml")
}

impl ResourceLoader for HttpLoader {
    fn fetch_document(&self, location: &str) -> Result<Resource, LoadError> {
        let response = Self::get(location)?;
        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            && !is_html_content_type(content_type)
        {
            return Err(LoadError::ContentType {
                url: location.to_string(),
                content_type: content_type.to_string(),
            });
        }
        // Redirects change the base for relative links.
        let final_url = response.url().to_string();
        let text = response.text().map_err(|source| LoadError::Network {
            url: location.to_string(),
            source,
        })?;
        debug!("fetched {final_url} ({} bytes)", text.len());
        Ok(Resource {
            location: final_url,
            text,
        })
    }

    fn fetch_stylesheet(&self, location: &str) -> Result<String, LoadError> {
        Self::get(location)?.text().map_err(|source| LoadError::Network {
            url: location.to_string(),
            source,
        })
    }
}

/// Routes `http(s)` locations to [`HttpLoader`] and everything else to
/// [`FileLoader`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLoader;

impl ResourceLoader for DefaultLoader {
    fn fetch_document(&self, location: &str) -> Result<Resource, LoadError> {
        if is_remote(location) {
            HttpLoader.fetch_document(location)
        } else {
            FileLoader.fetch_document(location)
        }
    }

    fn fetch_stylesheet(&self, location: &str) -> Result<String, LoadError> {
        if is_remote(location) {
            HttpLoader.fetch_stylesheet(location)
        } else {
            FileLoader.fetch_stylesheet(location)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, PageError};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wren-loader-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn kind(result: Result<Resource, LoadError>) -> ErrorKind {
        PageError::from(result.unwrap_err()).kind()
    }

    #[test]
    fn test_reads_html_file() {
        let dir = scratch_dir("ok");
        let path = dir.join("index.HTML");
        fs::write(&path, "<p>hi</p>").unwrap();
        let resource = FileLoader.fetch_document(path.to_str().unwrap()).unwrap();
        assert_eq!(resource.text, "<p>hi</p>");
        assert_eq!(resource.location, path.to_string_lossy());
    }

    #[test]
    fn test_file_errors_are_classified() {
        let dir = scratch_dir("errors");
        let text = dir.join("notes.txt");
        fs::write(&text, "plain").unwrap();

        assert_eq!(kind(FileLoader.fetch_document(dir.join("missing.html").to_str().unwrap())), ErrorKind::NotFound);
        assert_eq!(kind(FileLoader.fetch_document(dir.to_str().unwrap())), ErrorKind::IsDirectory);
        assert_eq!(kind(FileLoader.fetch_document(text.to_str().unwrap())), ErrorKind::NotHtml);
    }

    #[test]
    fn test_file_scheme_is_stripped() {
        let dir = scratch_dir("scheme");
        let path = dir.join("a.css");
        fs::write(&path, "p { color: red }").unwrap();
        let css = DefaultLoader
            .fetch_stylesheet(&format!("file://{}", path.display()))
            .unwrap();
        assert_eq!(css, "p { color: red }");
    }

    #[test]
    fn test_html_content_types() {
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("Application/XHTML+XML"));
        assert!(!is_html_content_type("image/png"));
    }
}
