//! Configuration constants and URL helpers for the harvester.

use std::path::Path;

use crate::error::{HarvesterError, Result};

/// Origin of the Spectrum site.
pub const SITE_ORIGIN: &str = "https://collectionstrust.org.uk";

/// Index page listing every appendix of the information requirements.
pub const INDEX_URL: &str = "https://collectionstrust.org.uk/spectrum/information-requirements/";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default directory for the on-disk response cache.
pub const DEFAULT_CACHE_DIR: &str = "spectrum_cache";

/// Number of sub-unit levels followed below a listed unit.
pub const DEFAULT_SUBUNIT_DEPTH: usize = 1;

/// Prefix of the generated YAML file name.
pub const OUTPUT_FILE_PREFIX: &str = "spectrum";

/// Options controlling a crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestOptions {
    /// Origin prepended to site-relative links.
    pub site_origin: String,

    /// Page listing the appendices.
    pub index_url: String,

    /// How many levels of nested unit lists are followed.
    pub subunit_depth: usize,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            site_origin: SITE_ORIGIN.to_string(),
            index_url: INDEX_URL.to_string(),
            subunit_depth: DEFAULT_SUBUNIT_DEPTH,
        }
    }
}

impl HarvestOptions {
    #[must_use]
    pub fn with_site_origin(mut self, origin: impl Into<String>) -> Self {
        self.site_origin = origin.into();
        self
    }

    #[must_use]
    pub fn with_index_url(mut self, url: impl Into<String>) -> Self {
        self.index_url = url.into();
        self
    }

    #[must_use]
    pub fn with_subunit_depth(mut self, depth: usize) -> Self {
        self.subunit_depth = depth;
        self
    }
}

/// Normalize a page URL before requesting it.
///
/// Site-relative URLs get the origin prepended, and a trailing slash is
/// added because the site redirects bare paths to their slash form. The
/// slash form is also what ends up as the cache key.
///
/// # Examples
/// ```
/// use spectrum_harvester::config::normalize_page_url;
///
/// assert_eq!(
///     normalize_page_url("/spectrum/units/object-name", "https://collectionstrust.org.uk"),
///     "https://collectionstrust.org.uk/spectrum/units/object-name/"
/// );
/// ```
#[must_use]
pub fn normalize_page_url(url: &str, origin: &str) -> String {
    let mut url = if url.starts_with('/') {
        format!("{}{url}", origin.trim_end_matches('/'))
    } else {
        url.to_string()
    };
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Remove the site origin from a URL, leaving a site-relative path.
#[must_use]
pub fn strip_origin(url: &str, origin: &str) -> String {
    let origin = origin.trim_end_matches('/');
    if origin.is_empty() {
        return url.to_string();
    }
    url.replace(origin, "")
}

/// Check that an output directory exists and is a directory.
pub fn validate_output_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(HarvesterError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Output directory does not exist: {}", path.display()),
        )));
    }
    if !path.is_dir() {
        return Err(HarvesterError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Output path is not a directory: {}", path.display()),
        )));
    }
    Ok(())
}
