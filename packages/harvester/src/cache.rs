//! Cached page fetching.
//!
//! The crawl talks to the network only through the [`Fetch`] trait. The
//! production implementation, [`CachedClient`], keeps every successful
//! response on disk so re-running a crawl after a failure is cheap.

use std::cell::Cell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use sha2::{Digest, Sha256};

use crate::error::{HarvesterError, Result};
use crate::http::{create_client, download_text};

/// A fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    /// Create a successful response.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of pages for a crawl.
///
/// Repeated calls with the same URL must return the same body. Calls are
/// always issued sequentially.
pub trait Fetch {
    fn get(&self, url: &str) -> Result<Response>;
}

/// Counters collected by a [`CachedClient`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub stored: usize,
}

/// HTTP client backed by a persistent on-disk cache keyed by URL.
pub struct CachedClient {
    client: Client,
    dir: PathBuf,
    hits: Cell<usize>,
    misses: Cell<usize>,
    stored: Cell<usize>,
}

impl CachedClient {
    /// Open (or create) a cache directory with a default HTTP client.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_client(create_client()?, dir)
    }

    /// Open a cache directory using the given client.
    pub fn with_client(client: Client, dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| HarvesterError::Cache {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            client,
            dir,
            hits: Cell::new(0),
            misses: Cell::new(0),
            stored: Cell::new(0),
        })
    }

    /// Directory holding the cached bodies.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
            stored: self.stored.get(),
        }
    }

    /// Finish using the cache and report what happened.
    ///
    /// Entries are written as soon as they are fetched, so nothing is
    /// pending at this point.
    pub fn close(self) -> CacheStats {
        let stats = self.stats();
        tracing::info!(
            hits = stats.hits,
            misses = stats.misses,
            stored = stats.stored,
            dir = %self.dir.display(),
            "Closed response cache"
        );
        stats
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.html", cache_key(url)))
    }

    fn store(&self, path: &Path, body: &str) -> Result<()> {
        let temp = path.with_extension("html.tmp");
        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&temp)?;
            file.write_all(body.as_bytes())?;
            file.sync_all()?;
            fs::rename(&temp, path)
        };
        write().map_err(|source| HarvesterError::Cache {
            path: path.to_path_buf(),
            source,
        })?;
        self.stored.set(self.stored.get() + 1);
        Ok(())
    }
}

impl Fetch for CachedClient {
    fn get(&self, url: &str) -> Result<Response> {
        let path = self.entry_path(url);

        if path.is_file() {
            let body = fs::read_to_string(&path).map_err(|source| HarvesterError::Cache {
                path: path.clone(),
                source,
            })?;
            self.hits.set(self.hits.get() + 1);
            tracing::debug!(url, "Cache hit");
            return Ok(Response::ok(body));
        }

        self.misses.set(self.misses.get() + 1);
        tracing::debug!(url, "Cache miss");

        let (status, body) = download_text(&self.client, url)?;
        let response = Response { status, body };
        if response.is_success() {
            self.store(&path, &response.body)?;
        }
        Ok(response)
    }
}

/// File name stem for a cached URL.
#[must_use]
pub fn cache_key(url: &str) -> String {
    Sha256::digest(url.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Delete a cache directory and everything in it.
///
/// Returns `false` when there was nothing to delete.
pub fn clear(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(dir).map_err(|source| HarvesterError::Cache {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(true)
}
