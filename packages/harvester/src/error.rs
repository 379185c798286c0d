//! Error types for the harvester.
//!
//! `HarvesterError` covers both fatal conditions (transport failures, I/O)
//! and structural page errors. Structural errors are caught at the unit and
//! group-type boundaries and turned into report warnings; everything else
//! propagates to the caller of the crawl.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// All retry attempts failed with transient errors.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// The site answered with a non-success status.
    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// A page does not have the expected shape.
    #[error("Missing required element {element} on {url}")]
    MissingElement { element: String, url: String },

    /// A CSS selector could not be parsed.
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// Reading or writing the response cache failed.
    #[error("Response cache error at {}: {source}", .path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),
}

impl HarvesterError {
    /// Whether this error means a single page did not match the expected markup.
    ///
    /// Structural errors are recoverable at the crawl level: the page is
    /// skipped and its siblings are still harvested.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::MissingElement { .. })
    }

    pub(crate) fn missing(element: impl Into<String>, url: impl Into<String>) -> Self {
        Self::MissingElement {
            element: element.into(),
            url: url.into(),
        }
    }
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
