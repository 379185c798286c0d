//! Field extraction for unit pages.
//!
//! A unit page carries up to five documented fields. Each is located with
//! a canonical selector; pages known to deviate from the common markup get
//! their fields re-read through an [`OverrideTable`].

mod examples;
mod field;
mod overrides;

pub use examples::{split_examples, SEMICOLON_EXCEPTIONS};
pub use field::{strip_label_line, Field, FieldValues};
pub use overrides::{create_spectrum_overrides, OverrideRule, OverrideTable};

use scraper::Html;

use crate::error::{HarvesterError, Result};
use crate::html::{element_text, find_in_document, select_first};
use crate::report::HarvestWarning;
use crate::text::normalize_text;
use crate::types::{Members, Unit};

/// Main region of every Spectrum page.
pub const MAIN_SELECTOR: &str = "main.site-main";

/// Content region of a unit page, inside the main region.
pub const CONTENT_SELECTOR: &str = "div.entry-content";

/// A unit read from its page, with the warnings raised while reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPage {
    pub unit: Unit,
    pub warnings: Vec<HarvestWarning>,
}

/// Extract a unit from its parsed page.
///
/// # Errors
/// A page without the main or content region is a structural error. An
/// absent field only produces a warning.
pub fn extract_unit(doc: &Html, url: &str, overrides: &OverrideTable) -> Result<UnitPage> {
    let main = find_in_document(doc, MAIN_SELECTOR)?
        .ok_or_else(|| HarvesterError::missing(MAIN_SELECTOR, url))?;
    let name = select_first(main, "h1")?
        .map(|h1| normalize_text(&element_text(h1)))
        .unwrap_or_default();
    let contents = select_first(main, CONTENT_SELECTOR)?
        .ok_or_else(|| HarvesterError::missing(CONTENT_SELECTOR, url))?;

    let mut values = FieldValues::default();
    let mut warnings = Vec::new();

    for field in Field::ALL {
        match select_first(contents, field.canonical_selector())? {
            Some(element) => {
                let text = element_text(element);
                values.set(field, normalize_text(strip_label_line(&text, field)));
            }
            None => {
                tracing::warn!(url, field = field.key(), "Could not find field");
                warnings.push(HarvestWarning::MissingField {
                    url: url.to_string(),
                    field,
                });
            }
        }
    }

    for rule in overrides.matching(url) {
        match select_first(contents, &rule.selector)? {
            Some(element) => {
                tracing::debug!(url, field = rule.field.key(), selector = %rule.selector, "Applying override");
                values.set(rule.field, normalize_text(&element_text(element)));
            }
            None => {
                tracing::warn!(
                    url,
                    url_pattern = %rule.url_pattern,
                    field = rule.field.key(),
                    selector = %rule.selector,
                    "Override selector matched nothing"
                );
                warnings.push(HarvestWarning::OverrideMiss {
                    url: url.to_string(),
                    url_pattern: rule.url_pattern.clone(),
                    field: rule.field,
                    selector: rule.selector.clone(),
                });
            }
        }
    }

    let examples = split_examples(&values.examples).into_vec();
    let unit = Unit {
        name,
        url: url.to_string(),
        definition: values.definition,
        how_to_record: values.how_to_record,
        examples,
        use_: values.use_,
        information_group: values.information_group,
        members: Members::new(),
    };

    Ok(UnitPage { unit, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse;
    use pretty_assertions::assert_eq;

    fn unit_page(fields: &str) -> String {
        format!(
            r#"<html><body><main class="site-main">
                 <h1>Object name</h1>
                 <div class="entry-content">{fields}</div>
               </main></body></html>"#
        )
    }

    const ALL_FIELDS: &str = r#"
        <div id="unit-definition"><h2>Definition</h2>
<p>The name of the object.</p></div>
        <div id="unit-recording"><h2>How to record</h2>
<p>Record the ‘usual’ name.</p></div>
        <div id="unit-examples"><h2>Examples</h2>
<p>Chair; Table; Vase</p></div>
        <div id="unit-use"><h2>Use</h2>
<p>Use for searching.</p></div>
        <div id="unit-required"><h2>Information group</h2>
<p>Object identification information</p></div>
    "#;

    #[test]
    fn test_extract_all_fields() {
        let html = unit_page(ALL_FIELDS);
        let doc = parse(&html);
        let page = extract_unit(&doc, "/spectrum/units/object-name/", &OverrideTable::new()).unwrap();

        assert!(page.warnings.is_empty());
        let unit = page.unit;
        assert_eq!(unit.name, "Object name");
        assert_eq!(unit.url, "/spectrum/units/object-name/");
        assert_eq!(unit.definition, "The name of the object.");
        assert_eq!(unit.how_to_record, "Record the 'usual' name.");
        assert_eq!(unit.examples, vec!["Chair", "Table", "Vase"]);
        assert_eq!(unit.use_, "Use for searching.");
        assert_eq!(unit.information_group, "Object identification information");
        assert!(unit.members.is_empty());
    }

    #[test]
    fn test_missing_field_warns_once() {
        let html = unit_page(
            r#"<div id="unit-definition"><h2>Definition</h2>
<p>Defined.</p></div>
               <div id="unit-recording"><p>Recorded.</p></div>
               <div id="unit-examples"><p>Example</p></div>
               <div id="unit-required"><p>Group</p></div>"#,
        );
        let doc = parse(&html);
        let url = "/spectrum/units/no-use/";
        let page = extract_unit(&doc, url, &OverrideTable::new()).unwrap();

        assert_eq!(page.unit.use_, "");
        assert_eq!(
            page.warnings,
            vec![HarvestWarning::MissingField {
                url: url.to_string(),
                field: Field::Use
            }]
        );
        assert_eq!(page.unit.examples, vec!["Example"]);
    }

    #[test]
    fn test_missing_examples_is_empty_list() {
        let html = unit_page(r#"<div id="unit-definition"><p>Defined.</p></div>"#);
        let doc = parse(&html);
        let page = extract_unit(&doc, "/u/", &OverrideTable::new()).unwrap();
        assert!(page.unit.examples.is_empty());
        assert_eq!(page.warnings.len(), 4);
    }

    #[test]
    fn test_missing_content_region_is_structural() {
        let doc = parse(r#"<html><body><main class="site-main"><h1>X</h1></main></body></html>"#);
        let err = extract_unit(&doc, "/u/", &OverrideTable::new()).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_missing_main_is_structural() {
        let doc = parse("<html><body><p>Not found</p></body></html>");
        let err = extract_unit(&doc, "/u/", &OverrideTable::new()).unwrap_err();
        assert!(matches!(err, HarvesterError::MissingElement { ref element, .. } if element == MAIN_SELECTOR));
    }

    #[test]
    fn test_override_replaces_only_listed_fields() {
        let html = unit_page(
            r#"<div id="unit-definition"><p>Canonical definition</p></div>
               <div id="unit-recording"><h3>Note</h3><p>Override recording</p></div>
               <div id="unit-examples"><p>Example</p></div>
               <div id="unit-use"><p>Canonical use</p></div>
               <div id="unit-required"><p>Group</p></div>"#,
        );
        let doc = parse(&html);
        let overrides = OverrideTable::new().with_rule(
            "odd-page",
            Field::HowToRecord,
            "div#unit-recording > h3 + p",
        );
        let page = extract_unit(&doc, "/spectrum/units/odd-page/", &overrides).unwrap();

        assert_eq!(page.unit.how_to_record, "Override recording");
        assert_eq!(page.unit.definition, "Canonical definition");
        assert_eq!(page.unit.use_, "Canonical use");
        assert!(page.warnings.is_empty());
    }

    #[test]
    fn test_override_ignored_for_other_urls() {
        let html = unit_page(r#"<div id="unit-recording"><h3>Note</h3><p>Second</p></div>"#);
        let doc = parse(&html);
        let overrides =
            OverrideTable::new().with_rule("odd-page", Field::HowToRecord, "div#unit-recording > h3 + p");
        let page = extract_unit(&doc, "/spectrum/units/normal-page/", &overrides).unwrap();
        assert_eq!(page.unit.how_to_record, "NoteSecond");
    }

    #[test]
    fn test_override_miss_keeps_canonical_value() {
        let html = unit_page(r#"<div id="unit-use"><p>Canonical use</p></div>"#);
        let doc = parse(&html);
        let overrides = OverrideTable::new().with_rule("odd", Field::Use, "div#nowhere > p");
        let page = extract_unit(&doc, "/odd/", &overrides).unwrap();

        assert_eq!(page.unit.use_, "Canonical use");
        assert!(page.warnings.contains(&HarvestWarning::OverrideMiss {
            url: "/odd/".to_string(),
            url_pattern: "odd".to_string(),
            field: Field::Use,
            selector: "div#nowhere > p".to_string(),
        }));
    }
}
