use serde::{Deserialize, Serialize};

/// One column of the translated output.
///
/// `repeat` is always 1 for flat output; in pivoted wide output it marks
/// which occurrence of a repeated concept the column represents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputHeaderItem {
    original: String,
    translated: String,
    repeat: usize,
    housekeeping: bool,
}

impl OutputHeaderItem {
    pub fn new(
        original: impl Into<String>,
        translated: impl Into<String>,
        housekeeping: bool,
    ) -> Self {
        Self {
            original: original.into(),
            translated: translated.into(),
            repeat: 1,
            housekeeping,
        }
    }

    pub fn with_repeat(&self, repeat: usize) -> Self {
        Self {
            repeat,
            ..self.clone()
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn translated(&self) -> &str {
        &self.translated
    }

    pub fn repeat(&self) -> usize {
        self.repeat
    }

    pub fn is_housekeeping(&self) -> bool {
        self.housekeeping
    }
}
