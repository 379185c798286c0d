//! Spectrum Harvester - Crawl the Spectrum information requirements.
//!
//! This crate walks the Collections Trust Spectrum website, from the
//! information-requirements index down to individual units of information,
//! and assembles the result into a tree that can be saved as YAML.
//!
//! # Example
//!
//! ```
//! use spectrum_harvester::config;
//! use spectrum_harvester::text::to_identifier;
//!
//! assert_eq!(to_identifier("Object name"), "object_name");
//! assert_eq!(
//!     config::normalize_page_url("/spectrum/", config::SITE_ORIGIN),
//!     "https://collectionstrust.org.uk/spectrum/"
//! );
//! ```
//!
//! # Architecture
//!
//! The harvester is organized into several modules:
//!
//! - [`config`]: Configuration constants and URL helpers
//! - [`types`]: Core data types (Unit, InformationGroup, InformationGroupType)
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client with retries
//! - [`cache`]: Page fetching through an on-disk cache
//! - [`html`]: HTML navigation helpers
//! - [`text`]: Key and text normalization
//! - [`extract`]: Unit page field extraction
//! - [`report`]: Non-fatal findings of a crawl
//! - [`yaml`]: Mapping view and YAML output
//! - [`cli`]: Command-line interface
//! - [`harvester`]: Main harvester service

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod harvester;
pub mod html;
pub mod http;
pub mod report;
pub mod text;
pub mod types;
pub mod yaml;

// Re-export main functions
pub use harvester::{harvest, Harvest, Harvester};

// Re-export commonly used items
pub use cache::{CachedClient, Fetch, Response};
pub use config::HarvestOptions;
pub use error::{HarvesterError, Result};
pub use report::{HarvestReport, HarvestWarning};
pub use types::{InformationGroup, InformationGroupType, Members, Spectrum, Unit};
