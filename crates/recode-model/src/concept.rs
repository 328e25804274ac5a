//! Concepts: the building blocks of a codebook.
//!
//! A concept links a source column name to its terminology entry (the
//! concept's own code/display translation) and, optionally, a value set
//! that maps each raw value appearing in registry exports to a coded term.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TranslateError;
use crate::format::OutputFormat;

/// The terminology entry attached to a concept itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terminology {
    pub code: String,
    pub code_system: String,
    pub display_name: String,
}

impl Terminology {
    pub fn render(&self, format: OutputFormat) -> String {
        format.render(&self.code, &self.code_system, &self.display_name)
    }
}

/// One entry of a concept's value set: the coded term for a single raw value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueEntry {
    pub code: String,
    pub code_system: String,
    pub display_name: String,
}

impl ValueEntry {
    pub fn render(&self, format: OutputFormat) -> String {
        format.render(&self.code, &self.code_system, &self.display_name)
    }
}

/// A single named concept from the terminology.
///
/// A concept either has no value set (values pass through untranslated)
/// or a value set in which every raw value occurring in the data is
/// expected to be a key. Value lookup is exact and case-sensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    id: String,
    column_name: String,
    terminology: Option<Terminology>,
    values: HashMap<String, ValueEntry>,
}

impl Concept {
    pub fn new(id: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            column_name: column_name.into(),
            terminology: None,
            values: HashMap::new(),
        }
    }

    /// Identifier the terminology assigned to this concept.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The column name under which this concept appears in registry exports.
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn set_terminology(&mut self, terminology: Terminology) {
        self.terminology = Some(terminology);
    }

    /// Add a value-set entry. A duplicate raw value overwrites the
    /// earlier entry (last one wins).
    pub fn insert_value(&mut self, raw_value: impl Into<String>, entry: ValueEntry) {
        self.values.insert(raw_value.into(), entry);
    }

    pub fn has_value_set(&self) -> bool {
        !self.values.is_empty()
    }

    /// Translate a raw value.
    ///
    /// Concepts without a value set pass the value through unchanged, as
    /// do empty values. An unknown value is a recoverable error for that
    /// cell, never fatal to the run.
    pub fn translate_value(
        &self,
        raw_value: &str,
        format: OutputFormat,
    ) -> Result<String, TranslateError> {
        if self.values.is_empty() || raw_value.is_empty() {
            return Ok(raw_value.to_string());
        }
        match self.values.get(raw_value) {
            Some(entry) => Ok(entry.render(format)),
            None => Err(TranslateError::UnknownValue {
                column: self.column_name.clone(),
                value: raw_value.to_string(),
            }),
        }
    }

    /// Translate the concept's own name through its terminology entry.
    pub fn translate_header(&self, format: OutputFormat) -> Result<String, TranslateError> {
        match &self.terminology {
            Some(terminology) => Ok(terminology.render(format)),
            None => Err(TranslateError::MissingTerminology {
                column: self.column_name.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Concept, Terminology, ValueEntry};
    use crate::error::TranslateError;
    use crate::format::OutputFormat;

    const ALL_FORMATS: [OutputFormat; 5] = [
        OutputFormat::Descriptions,
        OutputFormat::Codes,
        OutputFormat::CodesystemAndCodes,
        OutputFormat::CodesAndDescriptions,
        OutputFormat::CodesystemAndCodesAndDescriptions,
    ];

    fn entry(code: &str, display: &str) -> ValueEntry {
        ValueEntry {
            code: code.to_string(),
            code_system: "SNOMED CT".to_string(),
            display_name: display.to_string(),
        }
    }

    #[test]
    fn no_value_set_passes_values_through() {
        let concept = Concept::new("c1", "naam");
        for format in ALL_FORMATS {
            assert_eq!(concept.translate_value("whatever", format).unwrap(), "whatever");
        }
    }

    #[test]
    fn empty_value_passes_through_even_with_value_set() {
        let mut concept = Concept::new("c1", "locatie");
        concept.insert_value("coecum", entry("C1", "Cecum"));
        assert_eq!(
            concept.translate_value("", OutputFormat::Codes).unwrap(),
            ""
        );
    }

    #[test]
    fn value_lookup_is_case_sensitive() {
        let mut concept = Concept::new("c1", "locatie");
        concept.insert_value("coecum", entry("C1", "Cecum"));
        assert!(matches!(
            concept.translate_value("Coecum", OutputFormat::Codes),
            Err(TranslateError::UnknownValue { .. })
        ));
    }

    #[test]
    fn duplicate_value_keys_keep_the_last_entry() {
        let mut concept = Concept::new("c1", "locatie");
        concept.insert_value("coecum", entry("C1", "First"));
        concept.insert_value("coecum", entry("C2", "Second"));
        assert_eq!(
            concept
                .translate_value("coecum", OutputFormat::Descriptions)
                .unwrap(),
            "Second"
        );
    }

    #[test]
    fn header_translation_requires_terminology() {
        let mut concept = Concept::new("c1", "locatie");
        assert!(matches!(
            concept.translate_header(OutputFormat::Descriptions),
            Err(TranslateError::MissingTerminology { .. })
        ));
        concept.set_terminology(Terminology {
            code: "C99".to_string(),
            code_system: "SNOMED CT".to_string(),
            display_name: "Location".to_string(),
        });
        assert_eq!(
            concept
                .translate_header(OutputFormat::CodesystemAndCodes)
                .unwrap(),
            "SNOMED CT:C99"
        );
    }
}
