//! Version registries: lazily built, cached codebooks per protocol.
//!
//! A protocol registry manages every published version of one protocol's
//! terminology for one source language. Codebooks are built on first use
//! of a version and memoized for the rest of the run; a version with no
//! registered snapshot is warned once and treated as absent, so all data
//! recorded under it passes through untranslated.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use recode_model::OutputFormat;
use tracing::info;

use crate::codebook::Codebook;
use crate::dedupe::WarnDedupe;
use crate::error::CodebookError;
use crate::source::TerminologySource;
use crate::xml::parse_document;

/// Namespace prefix of the version-independent housekeeping columns.
pub const HOUSEKEEPING_PREFIX: &str = "housekeeping";

pub struct ProtocolRegistry {
    prefix: String,
    language: String,
    // version label -> dataset id
    versions: BTreeMap<String, String>,
    languages: Vec<String>,
    source: Box<dyn TerminologySource>,
    // version label -> built codebook; None marks a version known to be absent
    cache: RefCell<BTreeMap<String, Option<Rc<Codebook>>>>,
    warnings: WarnDedupe,
}

impl ProtocolRegistry {
    /// Discover the published versions of a protocol. Failure to obtain
    /// the project index makes the whole protocol unusable and is fatal.
    pub fn discover(
        prefix: impl Into<String>,
        language: impl Into<String>,
        source: Box<dyn TerminologySource>,
        warnings: WarnDedupe,
    ) -> Result<Self, CodebookError> {
        let prefix = prefix.into();
        let index = source.project_index(&prefix)?;
        info!(prefix, count = index.len(), "discovered protocol versions");

        let mut versions = BTreeMap::new();
        let mut languages: Vec<String> = Vec::new();
        for entry in index {
            for language in &entry.languages {
                if !languages.contains(language) {
                    languages.push(language.clone());
                }
            }
            versions.insert(entry.version, entry.dataset_id);
        }
        Ok(Self {
            prefix,
            language: language.into(),
            versions,
            languages,
            source,
            cache: RefCell::new(BTreeMap::new()),
            warnings,
        })
    }

    /// Registry with pre-built codebooks and no backing source, for tests.
    pub fn preloaded(
        language: impl Into<String>,
        codebooks: Vec<Codebook>,
        warnings: WarnDedupe,
    ) -> Self {
        let mut cache = BTreeMap::new();
        let mut versions = BTreeMap::new();
        for codebook in codebooks {
            let version = codebook.version().to_string();
            versions.insert(version.clone(), String::new());
            cache.insert(version, Some(Rc::new(codebook)));
        }
        Self {
            prefix: String::new(),
            language: language.into(),
            versions,
            languages: Vec::new(),
            source: Box::new(crate::source::MemorySource::new()),
            cache: RefCell::new(cache),
            warnings,
        }
    }

    /// Every language the protocol's terminology was published in.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn contains_header(&self, name: &str, version: &str) -> bool {
        match self.codebook(version) {
            Some(codebook) => codebook.contains_header(name, &self.warnings),
            None => false,
        }
    }

    /// Translate a value through the version's codebook, passing it
    /// through unchanged when the version or header is unknown.
    pub fn translate_value(
        &self,
        name: &str,
        value: &str,
        version: &str,
        format: OutputFormat,
    ) -> String {
        if let Some(codebook) = self.codebook(version)
            && !value.is_empty()
            && codebook.contains_header(name, &self.warnings)
        {
            return codebook.translate_concept_value(format, value, name, &self.warnings);
        }
        value.to_string()
    }

    /// Translate a column name through the version's codebook, passing
    /// it through unchanged when the version or header is unknown.
    pub fn translate_concept(&self, name: &str, version: &str, format: OutputFormat) -> String {
        match self.codebook(version) {
            Some(codebook) if codebook.contains_header(name, &self.warnings) => {
                codebook.translate_concept(format, name, &self.warnings)
            }
            _ => name.to_string(),
        }
    }

    fn codebook(&self, version: &str) -> Option<Rc<Codebook>> {
        if let Some(cached) = self.cache.borrow().get(version) {
            return cached.clone();
        }
        let built = self.build_codebook(version);
        self.cache
            .borrow_mut()
            .insert(version.to_string(), built.clone());
        built
    }

    fn build_codebook(&self, version: &str) -> Option<Rc<Codebook>> {
        let Some(dataset_id) = self.versions.get(version) else {
            self.warnings.warn_once(&format!(
                "version {version} of the protocol doesn't seem to exist online. \
                 Data using that version will not be translated."
            ));
            return None;
        };
        match fetch_codebook(self.source.as_ref(), dataset_id, &self.language, version) {
            Ok(codebook) => Some(Rc::new(codebook)),
            Err(error) => {
                self.warnings.warn_once(&format!(
                    "there was an issue retrieving the codebook for version {version} \
                     (dataset {dataset_id}, language {}): {error}",
                    self.language
                ));
                None
            }
        }
    }
}

fn fetch_codebook(
    source: &dyn TerminologySource,
    dataset_id: &str,
    language: &str,
    version: &str,
) -> Result<Codebook, CodebookError> {
    info!(dataset_id, language, version, "building codebook");
    let payload = source.dataset(dataset_id, language)?;
    let root = parse_document(&payload)?;
    Ok(Codebook::build(&root, version))
}

/// Registry for the housekeeping columns shared by all protocols.
///
/// Housekeeping columns are effectively version-less: the registry holds
/// a single codebook built from the newest published snapshot, and
/// always renders descriptions.
pub struct HousekeepingRegistry {
    codebook: Option<Codebook>,
    warnings: WarnDedupe,
}

impl HousekeepingRegistry {
    const FORMAT: OutputFormat = OutputFormat::Descriptions;

    /// Build from the newest housekeeping snapshot. A missing index or
    /// snapshot leaves the registry empty: every query reports
    /// not-found and translations pass through.
    pub fn discover(
        source: &dyn TerminologySource,
        language: &str,
        warnings: WarnDedupe,
    ) -> Self {
        let codebook = match source.project_index(HOUSEKEEPING_PREFIX) {
            Ok(index) => index.last().and_then(|newest| {
                match fetch_codebook(source, &newest.dataset_id, language, "1") {
                    Ok(codebook) => Some(codebook),
                    Err(error) => {
                        warnings.warn_once(&format!(
                            "there was an issue retrieving the housekeeping codebook \
                             (dataset {}): {error}",
                            newest.dataset_id
                        ));
                        None
                    }
                }
            }),
            Err(error) => {
                warnings.warn_once(&format!(
                    "there was an issue retrieving version information of the \
                     housekeeping codebook: {error}"
                ));
                None
            }
        };
        Self { codebook, warnings }
    }

    /// Registry with a pre-built codebook, for tests.
    pub fn preloaded(codebook: Codebook, warnings: WarnDedupe) -> Self {
        Self {
            codebook: Some(codebook),
            warnings,
        }
    }

    /// Check whether a column is a housekeeping column. Probed for
    /// every column during classification, where a miss is the expected
    /// case, so nothing is logged.
    pub fn contains_header(&self, name: &str) -> bool {
        match &self.codebook {
            Some(codebook) => codebook.knows_header(name),
            None => false,
        }
    }

    pub fn translate_value(&self, name: &str, value: &str) -> String {
        match &self.codebook {
            Some(codebook) => {
                codebook.translate_concept_value(Self::FORMAT, value, name, &self.warnings)
            }
            None => value.to_string(),
        }
    }

    pub fn translate_concept(&self, name: &str) -> String {
        match &self.codebook {
            Some(codebook) => codebook.translate_concept(Self::FORMAT, name, &self.warnings),
            None => name.to_string(),
        }
    }
}
