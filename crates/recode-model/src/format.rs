//! Output formats for translated concepts and values.

use serde::{Deserialize, Serialize};

/// How a translated concept or value is rendered in the output.
///
/// Every rendering is a deterministic `:`-joined template over the
/// (code, code system, display name) triple of a terminology entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Display name only.
    Descriptions,
    /// Code only.
    Codes,
    /// `codeSystem:code`.
    CodesystemAndCodes,
    /// `code:displayName`.
    CodesAndDescriptions,
    /// `codeSystem:code:displayName`.
    CodesystemAndCodesAndDescriptions,
}

impl OutputFormat {
    /// Human-readable label, used in CLI help and run summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::Descriptions => "Text only",
            Self::Codes => "Code only",
            Self::CodesystemAndCodes => "Codesystem and Code",
            Self::CodesAndDescriptions => "Code and Text",
            Self::CodesystemAndCodesAndDescriptions => "Codesystem, Code and Text",
        }
    }

    /// Render a terminology triple in this format.
    pub fn render(self, code: &str, code_system: &str, display_name: &str) -> String {
        match self {
            Self::Descriptions => display_name.to_string(),
            Self::Codes => code.to_string(),
            Self::CodesystemAndCodes => format!("{code_system}:{code}"),
            Self::CodesAndDescriptions => format!("{code}:{display_name}"),
            Self::CodesystemAndCodesAndDescriptions => {
                format!("{code_system}:{code}:{display_name}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OutputFormat;

    #[test]
    fn renders_all_formats() {
        let render = |format: OutputFormat| format.render("C123", "SNOMED CT", "Adenoma");
        assert_eq!(render(OutputFormat::Descriptions), "Adenoma");
        assert_eq!(render(OutputFormat::Codes), "C123");
        assert_eq!(render(OutputFormat::CodesystemAndCodes), "SNOMED CT:C123");
        assert_eq!(render(OutputFormat::CodesAndDescriptions), "C123:Adenoma");
        assert_eq!(
            render(OutputFormat::CodesystemAndCodesAndDescriptions),
            "SNOMED CT:C123:Adenoma"
        );
    }
}
