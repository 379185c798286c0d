//! The five documented fields of a unit page.

use std::fmt;

/// A field of a unit page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Definition,
    HowToRecord,
    Examples,
    Use,
    InformationGroup,
}

impl Field {
    /// All fields, in extraction order.
    pub const ALL: [Field; 5] = [
        Field::Definition,
        Field::HowToRecord,
        Field::Examples,
        Field::Use,
        Field::InformationGroup,
    ];

    /// Key of the field in the output mapping.
    ///
    /// Its length is also what the label-line check compares against.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::HowToRecord => "how_to_record",
            Self::Examples => "examples",
            Self::Use => "use",
            Self::InformationGroup => "information_group",
        }
    }

    /// Selector locating the field on a well-formed unit page.
    #[must_use]
    pub fn canonical_selector(self) -> &'static str {
        match self {
            Self::Definition => "div#unit-definition",
            Self::HowToRecord => "div#unit-recording",
            Self::Examples => "div#unit-examples",
            Self::Use => "div#unit-use",
            Self::InformationGroup => "div#unit-required",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw text of each field while a page is being extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    pub definition: String,
    pub how_to_record: String,
    pub examples: String,
    pub use_: String,
    pub information_group: String,
}

impl FieldValues {
    pub fn set(&mut self, field: Field, text: String) {
        match field {
            Field::Definition => self.definition = text,
            Field::HowToRecord => self.how_to_record = text,
            Field::Examples => self.examples = text,
            Field::Use => self.use_ = text,
            Field::InformationGroup => self.information_group = text,
        }
    }

    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Definition => &self.definition,
            Field::HowToRecord => &self.how_to_record,
            Field::Examples => &self.examples,
            Field::Use => &self.use_,
            Field::InformationGroup => &self.information_group,
        }
    }
}

/// Drop a leading line that repeats the field label.
///
/// Pages put the label ("How to record") as a heading inside the field's
/// container. A first line with the same character count as the field key
/// is taken to be that heading. Only applies to multi-line text.
#[must_use]
pub fn strip_label_line(text: &str, field: Field) -> &str {
    match text.split_once('\n') {
        Some((first, rest)) if first.chars().count() == field.key().chars().count() => rest,
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_match_label_lengths() {
        let labels = [
            (Field::Definition, "Definition"),
            (Field::HowToRecord, "How to record"),
            (Field::Examples, "Examples"),
            (Field::Use, "Use"),
            (Field::InformationGroup, "Information group"),
        ];
        for (field, label) in labels {
            assert_eq!(field.key().len(), label.len(), "{field}");
        }
    }

    #[test]
    fn test_strip_label_line() {
        assert_eq!(
            strip_label_line("Definition\nThe name of the object.", Field::Definition),
            "The name of the object."
        );
        assert_eq!(
            strip_label_line("How to record\nRecord it.\nAgain.", Field::HowToRecord),
            "Record it.\nAgain."
        );
    }

    #[test]
    fn test_strip_label_line_keeps_other_first_lines() {
        let text = "A longer first line\nsecond";
        assert_eq!(strip_label_line(text, Field::Use), text);
    }

    #[test]
    fn test_strip_label_line_single_line_untouched() {
        // Same length as "use" but no line break.
        assert_eq!(strip_label_line("Use", Field::Use), "Use");
    }

    #[test]
    fn test_field_values_dispatch() {
        let mut values = FieldValues::default();
        for field in Field::ALL {
            values.set(field, field.key().to_uppercase());
        }
        assert_eq!(values.use_, "USE");
        assert_eq!(values.get(Field::HowToRecord), "HOW_TO_RECORD");
    }
}
