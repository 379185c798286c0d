//! Core data types for the harvester.
//!
//! The Spectrum information requirements form a strict tree: appendices
//! ([`InformationGroupType`]) own information groups, which own units, which
//! may own sub-units. Every `members` map is keyed by
//! [`to_identifier`](crate::text::to_identifier) of the member's name.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::text::to_identifier;

/// Members of an entity, keyed by normalized identifier.
///
/// Inserting a second member under an existing key replaces the first one;
/// the replaced value is handed back so the caller can report the collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Members<T> {
    entries: BTreeMap<String, T>,
}

impl<T> Default for Members<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> Members<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under an already-normalized key.
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        self.entries.insert(key.into(), value)
    }

    /// Insert under the identifier derived from a display name.
    pub fn insert_named(&mut self, name: &str, value: T) -> Option<T> {
        self.insert(to_identifier(name), value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, T> {
        self.entries.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, String, T> {
        self.entries.keys()
    }

    pub fn values(&self) -> btree_map::Values<'_, String, T> {
        self.entries.values()
    }
}

impl<'a, T> IntoIterator for &'a Members<T> {
    type Item = (&'a String, &'a T);
    type IntoIter = btree_map::Iter<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// An entity that can sit in a [`Members`] map.
pub trait Named {
    fn name(&self) -> &str;
    fn url(&self) -> &str;
}

/// Examples of a unit as detected on the page.
///
/// Pages delimit examples with semicolons, line breaks, or not at all.
/// `Unit` only ever stores the list form, see [`Examples::into_vec`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Examples {
    #[default]
    Empty,
    Single(String),
    Many(Vec<String>),
}

impl Examples {
    /// Collapse into the list form stored on a unit.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Empty => Vec::new(),
            Self::Single(example) => vec![example],
            Self::Many(examples) => examples,
        }
    }
}

/// A documented unit of information, optionally composed of sub-units.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Unit {
    pub name: String,
    pub url: String,
    pub definition: String,
    pub how_to_record: String,
    pub examples: Vec<String>,
    pub use_: String,
    /// Free text naming the group the unit is required by, not a relation.
    pub information_group: String,
    pub members: Members<Unit>,
}

impl Unit {
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// Number of units in this subtree, this one included.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        1 + self.members.values().map(Unit::unit_count).sum::<usize>()
    }
}

/// A named requirement group within an appendix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InformationGroup {
    pub name: String,
    pub description: String,
    pub url: String,
    pub members: Members<Unit>,
}

impl InformationGroup {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url: url.into(),
            members: Members::new(),
        }
    }
}

/// A top-level appendix of the standard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InformationGroupType {
    pub name: String,
    pub description: String,
    pub url: String,
    pub members: Members<InformationGroup>,
}

impl InformationGroupType {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url: url.into(),
            members: Members::new(),
        }
    }
}

impl Named for Unit {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> &str {
        &self.url
    }
}

impl Named for InformationGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> &str {
        &self.url
    }
}

impl Named for InformationGroupType {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Root collection: every appendix keyed by its normalized category name.
pub type Spectrum = Members<InformationGroupType>;

/// Entity counts for a harvested tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub group_types: usize,
    pub groups: usize,
    pub units: usize,
}

impl Members<InformationGroupType> {
    /// Count the entities in the tree. Sub-units are included in `units`.
    #[must_use]
    pub fn counts(&self) -> Counts {
        let mut counts = Counts {
            group_types: self.len(),
            ..Counts::default()
        };
        for group_type in self.values() {
            counts.groups += group_type.members.len();
            for group in group_type.members.values() {
                counts.units += group.members.values().map(Unit::unit_count).sum::<usize>();
            }
        }
        counts
    }
}
