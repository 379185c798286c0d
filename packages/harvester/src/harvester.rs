//! Main harvester service that ties all components together.
//!
//! The crawl runs strictly sequentially:
//!
//! ```text
//! index page
//! └── appendix (InformationGroupType)      build_group_type
//!     └── information group                traverse_group
//!         └── unit                         extract_unit
//!             └── sub-unit (depth-limited)
//! ```

use scraper::{ElementRef, Html};

use crate::cache::Fetch;
use crate::config::{normalize_page_url, strip_origin, HarvestOptions};
use crate::error::{HarvesterError, Result};
use crate::extract::{self, create_spectrum_overrides, OverrideTable, MAIN_SELECTOR};
use crate::html::{
    child_elements, element_text, find_in_document, first_link, has_ancestor_below,
    parent_element, parse, raw_text, select_all, select_first,
};
use crate::report::{HarvestReport, HarvestWarning};
use crate::text::{normalize_text, to_identifier};
use crate::types::{InformationGroup, InformationGroupType, Members, Named, Spectrum, Unit};

/// Container listing the units of an information group.
pub const UNIT_LIST_SELECTOR: &str = "div#unitlist";

/// Region of an appendix page describing its information groups.
pub const DESCRIPTION_SELECTOR: &str = "div.further-description";

/// Links to information groups inside the description region.
pub const GROUP_LINK_SELECTOR: &str = "p > a[href]";

/// Appendix entries on the index page.
pub const APPENDIX_SELECTOR: &str = "li.untranslated";

/// Result of a complete crawl.
#[derive(Debug, Clone)]
pub struct Harvest {
    pub spectrum: Spectrum,
    pub report: HarvestReport,
}

/// Harvest the complete Spectrum tree.
///
/// # Arguments
/// * `fetcher` - Source of pages, usually a [`CachedClient`](crate::cache::CachedClient)
/// * `options` - Crawl options
///
/// # Returns
/// The tree together with every non-fatal finding
pub fn harvest(fetcher: &dyn Fetch, options: HarvestOptions) -> Result<Harvest> {
    let mut harvester = Harvester::new(fetcher, options);
    let spectrum = harvester.collect_all()?;
    Ok(Harvest {
        spectrum,
        report: harvester.into_report(),
    })
}

/// Walks the site and assembles the tree.
pub struct Harvester<'f> {
    fetcher: &'f dyn Fetch,
    options: HarvestOptions,
    overrides: OverrideTable,
    report: HarvestReport,
}

impl<'f> Harvester<'f> {
    /// Create a harvester using the Spectrum override table.
    #[must_use]
    pub fn new(fetcher: &'f dyn Fetch, options: HarvestOptions) -> Self {
        Self {
            fetcher,
            options,
            overrides: create_spectrum_overrides(),
            report: HarvestReport::new(),
        }
    }

    /// Replace the override table.
    #[must_use]
    pub fn with_overrides(mut self, overrides: OverrideTable) -> Self {
        self.overrides = overrides;
        self
    }

    #[must_use]
    pub fn options(&self) -> &HarvestOptions {
        &self.options
    }

    #[must_use]
    pub fn report(&self) -> &HarvestReport {
        &self.report
    }

    #[must_use]
    pub fn into_report(self) -> HarvestReport {
        self.report
    }

    /// Fetch and parse a page.
    ///
    /// # Errors
    /// Transport failures and non-success statuses.
    pub fn fetch_page(&self, url: &str) -> Result<Html> {
        let url = normalize_page_url(url, &self.options.site_origin);
        tracing::debug!(url = %url, "Fetching page");

        let response = self.fetcher.get(&url)?;
        if !response.is_success() {
            return Err(HarvesterError::HttpStatus {
                url,
                status: response.status,
            });
        }
        Ok(parse(&response.body))
    }

    /// Fetch a unit page and extract its fields.
    pub fn extract_unit(&mut self, url: &str) -> Result<Unit> {
        let doc = self.fetch_page(url)?;
        let page = extract::extract_unit(&doc, url, &self.overrides)?;
        self.report.extend(page.warnings);
        Ok(page.unit)
    }

    /// Enumerate the units listed on a group page, in document order.
    ///
    /// A page without a unit listing yields no units.
    pub fn traverse_group(&mut self, listing_url: &str) -> Result<Vec<Unit>> {
        let doc = self.fetch_page(listing_url)?;
        let Some(list) = find_in_document(&doc, UNIT_LIST_SELECTOR)? else {
            tracing::info!(url = listing_url, "No unit listing, group is empty by design");
            return Ok(Vec::new());
        };

        let items: Vec<ElementRef<'_>> = select_all(list, "li")?
            .into_iter()
            .filter(|item| !has_ancestor_below(*item, "li", list))
            .collect();

        let mut units = Vec::with_capacity(items.len());
        for item in items {
            if let Some(unit) = self.listed_unit(item, self.options.subunit_depth)? {
                units.push(unit);
            }
        }
        Ok(units)
    }

    /// Build the unit for one listing item, following nested lists while
    /// `depth` allows.
    fn listed_unit(&mut self, item: ElementRef<'_>, depth: usize) -> Result<Option<Unit>> {
        let Some(link) = first_link(item) else {
            tracing::debug!(text = %element_text(item), "Listing item without link");
            return Ok(None);
        };

        let mut unit = match self.extract_unit(&link.href) {
            Ok(unit) => unit,
            Err(e) if e.is_structural() => {
                self.skip_page(&link.href, &e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        // The listing's link text is more reliable than the page heading.
        unit.name = normalize_text(&link.text);
        unit.url = link.href;

        if let Some(sublist) = select_first(item, "ul")? {
            if depth == 0 {
                tracing::debug!(url = %unit.url, "Ignoring sub-units beyond depth limit");
            } else {
                let mut members = Members::new();
                for sub_item in child_elements(sublist, "li") {
                    if let Some(sub_unit) = self.listed_unit(sub_item, depth - 1)? {
                        let key = to_identifier(&sub_unit.name);
                        self.insert_member(&mut members, &unit.url, key, sub_unit);
                    }
                }
                unit.members = members;
            }
        }

        Ok(Some(unit))
    }

    /// Build an appendix with all of its information groups.
    pub fn build_group_type(&mut self, url: &str) -> Result<InformationGroupType> {
        let doc = self.fetch_page(url)?;
        // Only appendix links carry the site origin; store them relative like the rest.
        let output_url = strip_origin(url, &self.options.site_origin);

        let main = find_in_document(&doc, MAIN_SELECTOR)?
            .ok_or_else(|| HarvesterError::missing(MAIN_SELECTOR, url))?;
        let description_region = select_first(main, DESCRIPTION_SELECTOR)?
            .ok_or_else(|| HarvesterError::missing(DESCRIPTION_SELECTOR, url))?;

        let name = select_first(main, "h1")?
            .map(|h1| normalize_text(&element_text(h1)))
            .unwrap_or_default();
        let description = select_first(description_region, "p")?
            .map(|p| normalize_text(&element_text(p)))
            .unwrap_or_default();

        let mut group_type = InformationGroupType::new(name, description, output_url.clone());

        for anchor in select_all(description_region, GROUP_LINK_SELECTOR)? {
            let group = self.build_group(anchor)?;
            let key = to_identifier(&group.name);
            self.insert_member(&mut group_type.members, &output_url, key, group);
        }

        Ok(group_type)
    }

    /// Build one information group from its link in the description region.
    fn build_group(&mut self, anchor: ElementRef<'_>) -> Result<InformationGroup> {
        let name = normalize_text(&element_text(anchor));
        let url = anchor.value().attr("href").unwrap_or_default().to_string();
        let container_text = parent_element(anchor)
            .map(|p| normalize_text(&raw_text(p)))
            .unwrap_or_default();
        let description = container_text.replacen(&name, "", 1).trim().to_string();

        let mut group = InformationGroup::new(name, description, url.clone());
        for unit in self.traverse_group(&url)? {
            let key = to_identifier(&unit.name);
            self.insert_member(&mut group.members, &url, key, unit);
        }
        Ok(group)
    }

    /// Harvest every appendix listed on the index page.
    pub fn collect_all(&mut self) -> Result<Spectrum> {
        let index_url = self.options.index_url.clone();
        let doc = self.fetch_page(&index_url)?;
        let main = find_in_document(&doc, MAIN_SELECTOR)?
            .ok_or_else(|| HarvesterError::missing(MAIN_SELECTOR, &index_url))?;

        let mut spectrum = Spectrum::new();
        for entry in select_all(main, APPENDIX_SELECTOR)? {
            let Some(link) = first_link(entry).filter(|link| !link.href.is_empty()) else {
                tracing::debug!(text = %element_text(entry), "Appendix entry without link");
                continue;
            };
            let category = normalize_text(&link.text);

            match self.build_group_type(&link.href) {
                Ok(group_type) => {
                    let key = to_identifier(&category);
                    self.insert_member(&mut spectrum, &index_url, key, group_type);
                }
                Err(e) if e.is_structural() => self.skip_page(&link.href, &e),
                Err(e) => return Err(e),
            }
        }

        tracing::info!(group_types = spectrum.len(), "Harvest complete");
        Ok(spectrum)
    }

    /// Insert a member, reporting when it replaces a sibling with the same key.
    fn insert_member<T: Named>(
        &mut self,
        members: &mut Members<T>,
        parent: &str,
        key: String,
        value: T,
    ) {
        let kept_url = value.url().to_string();
        if let Some(previous) = members.insert(key.clone(), value) {
            tracing::warn!(
                parent,
                key = %key,
                kept = %kept_url,
                dropped = previous.url(),
                "Duplicate member key, keeping the later one"
            );
            self.report.push(HarvestWarning::KeyCollision {
                parent: parent.to_string(),
                key,
                kept_url,
                dropped_url: previous.url().to_string(),
            });
        }
    }

    fn skip_page(&mut self, url: &str, error: &HarvesterError) {
        tracing::error!(url, error = %error, "Skipping page with unexpected structure");
        self.report.push(HarvestWarning::SkippedPage {
            url: url.to_string(),
            reason: error.to_string(),
        });
    }
}
