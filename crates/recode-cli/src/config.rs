//! Protocol catalog: maps a protocol name to the terminology prefix its
//! versions are published under.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct ProtocolCatalog {
    protocols: BTreeMap<String, String>,
    languages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    protocols: BTreeMap<String, String>,
    #[serde(default)]
    languages: Vec<String>,
}

impl Default for ProtocolCatalog {
    fn default() -> Self {
        let mut protocols = BTreeMap::new();
        protocols.insert("colonbiopt".to_string(), "ppcolbio-".to_string());
        protocols.insert("colonrectum carcinoom".to_string(), "ppcolcar-".to_string());
        Self {
            protocols,
            languages: vec!["nl-NL".to_string(), "en-US".to_string()],
        }
    }
}

impl ProtocolCatalog {
    /// The built-in catalog, optionally extended and overridden from a
    /// TOML file with `[protocols]` and `languages` entries.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut catalog = Self::default();
        if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read protocol catalog {}", path.display()))?;
            let file: CatalogFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse protocol catalog {}", path.display()))?;
            catalog.protocols.extend(file.protocols);
            if !file.languages.is_empty() {
                catalog.languages = file.languages;
            }
        }
        Ok(catalog)
    }

    pub fn prefix(&self, protocol: &str) -> Option<&str> {
        self.protocols.get(protocol).map(String::as_str)
    }

    pub fn protocols(&self) -> impl Iterator<Item = (&str, &str)> {
        self.protocols
            .iter()
            .map(|(name, prefix)| (name.as_str(), prefix.as_str()))
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }
}
