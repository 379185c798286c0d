//! Per-page selector overrides for unit pages with non-standard markup.

use super::field::Field;

/// One override: on pages whose URL contains `url_pattern`, read `field`
/// with `selector` instead of the canonical one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRule {
    pub url_pattern: String,
    pub field: Field,
    pub selector: String,
}

impl OverrideRule {
    #[must_use]
    pub fn new(url_pattern: impl Into<String>, field: Field, selector: impl Into<String>) -> Self {
        Self {
            url_pattern: url_pattern.into(),
            field,
            selector: selector.into(),
        }
    }

    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        url.contains(&self.url_pattern)
    }
}

/// Ordered list of override rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    rules: Vec<OverrideRule>,
}

impl OverrideTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: OverrideRule) {
        self.rules.push(rule);
    }

    #[must_use]
    pub fn with_rule(mut self, url_pattern: &str, field: Field, selector: &str) -> Self {
        self.register(OverrideRule::new(url_pattern, field, selector));
        self
    }

    /// Rules applying to `url`, in registration order.
    pub fn matching<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a OverrideRule> + 'a {
        self.rules.iter().filter(move |rule| rule.matches(url))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Overrides for the known malformed pages of the Spectrum site.
///
/// ```text
/// object-name-note
/// ├── definition     div#unit-recording :first-child
/// └── how_to_record  div#unit-recording > h3 + p
/// legal-licence-requirements-held
/// └── use            div#unit-examples + div#unit-recording > p
/// ```
#[must_use]
pub fn create_spectrum_overrides() -> OverrideTable {
    OverrideTable::new()
        .with_rule(
            "object-name-note",
            Field::Definition,
            "div#unit-recording :first-child",
        )
        .with_rule(
            "object-name-note",
            Field::HowToRecord,
            "div#unit-recording > h3 + p",
        )
        .with_rule(
            "legal-licence-requirements-held",
            Field::Use,
            "div#unit-examples + div#unit-recording > p",
        )
}
