//! Non-fatal findings collected during a crawl.

use std::fmt;

use crate::extract::Field;

/// A recoverable condition worth auditing after a crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestWarning {
    /// A canonical field selector matched nothing on a unit page.
    MissingField { url: String, field: Field },

    /// An override selector matched nothing on a page it applies to.
    OverrideMiss {
        url: String,
        url_pattern: String,
        field: Field,
        selector: String,
    },

    /// Two siblings normalized to the same key; the later one was kept.
    KeyCollision {
        parent: String,
        key: String,
        kept_url: String,
        dropped_url: String,
    },

    /// A page did not have the expected shape and was left out.
    SkippedPage { url: String, reason: String },
}

impl fmt::Display for HarvestWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { url, field } => write!(f, "Could not find {field} for {url}"),
            Self::OverrideMiss {
                url,
                url_pattern,
                field,
                selector,
            } => write!(
                f,
                "Override for {url_pattern} could not set {field} from '{selector}' on {url}"
            ),
            Self::KeyCollision {
                parent,
                key,
                kept_url,
                dropped_url,
            } => write!(
                f,
                "Duplicate key {key} in {parent}: kept {kept_url}, dropped {dropped_url}"
            ),
            Self::SkippedPage { url, reason } => write!(f, "Skipped {url}: {reason}"),
        }
    }
}

/// Everything non-fatal that happened during a crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    pub warnings: Vec<HarvestWarning>,
}

impl HarvestReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: HarvestWarning) {
        self.warnings.push(warning);
    }

    pub fn extend(&mut self, warnings: impl IntoIterator<Item = HarvestWarning>) {
        self.warnings.extend(warnings);
    }

    /// Number of member-key collisions seen.
    #[must_use]
    pub fn collisions(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, HarvestWarning::KeyCollision { .. }))
            .count()
    }

    /// Number of pages left out of the tree.
    #[must_use]
    pub fn skipped_pages(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, HarvestWarning::SkippedPage { .. }))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}
