//! Nested-mapping view of the harvested tree.
//!
//! Only strings, lists of strings and mappings appear in the output.
//! Fields still at their default (empty string, empty list, no members)
//! are left out.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{InformationGroup, InformationGroupType, Members, Unit};

/// A value in the nested mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MappingValue {
    Text(String),
    List(Vec<String>),
    Map(BTreeMap<String, MappingValue>),
}

impl MappingValue {
    /// Look up a key when this value is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MappingValue> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, MappingValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Conversion into the nested-mapping view.
pub trait ToMapping {
    fn to_mapping(&self) -> MappingValue;
}

/// Builds a mapping while skipping default values.
#[derive(Default)]
struct MappingBuilder {
    entries: BTreeMap<String, MappingValue>,
}

impl MappingBuilder {
    fn text(mut self, key: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.entries
                .insert(key.to_string(), MappingValue::Text(value.to_string()));
        }
        self
    }

    fn list(mut self, key: &str, values: &[String]) -> Self {
        if !values.is_empty() {
            self.entries
                .insert(key.to_string(), MappingValue::List(values.to_vec()));
        }
        self
    }

    fn members<T: ToMapping>(mut self, key: &str, members: &Members<T>) -> Self {
        if !members.is_empty() {
            self.entries.insert(key.to_string(), members.to_mapping());
        }
        self
    }

    fn build(self) -> MappingValue {
        MappingValue::Map(self.entries)
    }
}

impl<T: ToMapping> ToMapping for Members<T> {
    fn to_mapping(&self) -> MappingValue {
        MappingValue::Map(
            self.iter()
                .map(|(key, member)| (key.clone(), member.to_mapping()))
                .collect(),
        )
    }
}

impl ToMapping for Unit {
    fn to_mapping(&self) -> MappingValue {
        MappingBuilder::default()
            .text("name", &self.name)
            .text("url", &self.url)
            .text("definition", &self.definition)
            .text("how_to_record", &self.how_to_record)
            .list("examples", &self.examples)
            .text("use", &self.use_)
            .text("information_group", &self.information_group)
            .members("members", &self.members)
            .build()
    }
}

impl ToMapping for InformationGroup {
    fn to_mapping(&self) -> MappingValue {
        MappingBuilder::default()
            .text("name", &self.name)
            .text("description", &self.description)
            .text("url", &self.url)
            .members("members", &self.members)
            .build()
    }
}

impl ToMapping for InformationGroupType {
    fn to_mapping(&self) -> MappingValue {
        MappingBuilder::default()
            .text("name", &self.name)
            .text("description", &self.description)
            .text("url", &self.url)
            .members("members", &self.members)
            .build()
    }
}
