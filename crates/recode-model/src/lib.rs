pub mod concept;
pub mod error;
pub mod format;
pub mod header;

pub use concept::{Concept, Terminology, ValueEntry};
pub use error::TranslateError;
pub use format::OutputFormat;
pub use header::OutputHeaderItem;

#[cfg(test)]
mod tests {
    use super::{Concept, OutputFormat, Terminology, ValueEntry};

    #[test]
    fn concept_serializes() {
        let mut concept = Concept::new("2.16.840.1", "locatie");
        concept.set_terminology(Terminology {
            code: "C99".to_string(),
            code_system: "SNOMED CT".to_string(),
            display_name: "Location".to_string(),
        });
        concept.insert_value(
            "coecum",
            ValueEntry {
                code: "C1".to_string(),
                code_system: "SNOMED CT".to_string(),
                display_name: "Cecum".to_string(),
            },
        );
        let json = serde_json::to_string(&concept).expect("serialize concept");
        let round: Concept = serde_json::from_str(&json).expect("deserialize concept");
        assert_eq!(round.column_name(), "locatie");
        assert_eq!(
            round
                .translate_value("coecum", OutputFormat::Descriptions)
                .unwrap(),
            "Cecum"
        );
    }
}
