//! Terminology snapshot sources.
//!
//! Retrieval of terminology documents is an external concern: the core
//! only needs a project index (which versions exist, under which dataset
//! identifier, in which languages) and the raw XML payload per dataset.
//! `DirSource` serves both from a directory of previously downloaded
//! files; tests use `MemorySource`.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::xml::{XmlError, parse_document};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error("no dataset registered for id {0}")]
    UnknownDataset(String),
    #[error("no project index registered for prefix {0}")]
    UnknownPrefix(String),
}

/// One published terminology version of a protocol.
#[derive(Debug, Clone)]
pub struct VersionInfo {
    pub version: String,
    pub dataset_id: String,
    pub languages: Vec<String>,
}

pub trait TerminologySource {
    /// Published versions for a protocol prefix, in publication order.
    fn project_index(&self, prefix: &str) -> Result<Vec<VersionInfo>, SourceError>;

    /// Raw XML payload of one terminology snapshot.
    fn dataset(&self, dataset_id: &str, language: &str) -> Result<String, SourceError>;
}

/// Parse a project index document into version infos.
///
/// The index lists `dataset` elements (anywhere in the tree) carrying
/// `versionLabel` and `id` attributes, with `desc` children naming the
/// languages the snapshot was published in.
pub fn parse_project_index(content: &str) -> Result<Vec<VersionInfo>, SourceError> {
    let root = parse_document(content)?;
    let mut datasets = Vec::new();
    root.descendants_named("dataset", &mut datasets);

    let mut versions = Vec::new();
    for dataset in datasets {
        let mut descs = Vec::new();
        dataset.descendants_named("desc", &mut descs);
        versions.push(VersionInfo {
            version: dataset.attr("versionLabel").to_string(),
            dataset_id: dataset.attr("id").to_string(),
            languages: descs
                .iter()
                .map(|desc| desc.attr("language").to_string())
                .filter(|language| !language.is_empty())
                .collect(),
        });
    }
    Ok(versions)
}

/// File-backed source: `<prefix>index.xml` for the project index and
/// `<dataset-id>-<language>.xml` per snapshot.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read(&self, file_name: &str) -> Result<String, SourceError> {
        let path = self.dir.join(file_name);
        fs::read_to_string(&path).map_err(|source| SourceError::Read {
            path: path.display().to_string(),
            source,
        })
    }
}

impl TerminologySource for DirSource {
    fn project_index(&self, prefix: &str) -> Result<Vec<VersionInfo>, SourceError> {
        let content = self.read(&format!("{prefix}index.xml"))?;
        parse_project_index(&content)
    }

    fn dataset(&self, dataset_id: &str, language: &str) -> Result<String, SourceError> {
        self.read(&format!("{dataset_id}-{language}.xml"))
    }
}

/// In-memory source for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    indexes: BTreeMap<String, Vec<VersionInfo>>,
    datasets: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_index(&mut self, prefix: impl Into<String>, versions: Vec<VersionInfo>) {
        self.indexes.insert(prefix.into(), versions);
    }

    pub fn add_dataset(
        &mut self,
        dataset_id: impl Into<String>,
        language: impl Into<String>,
        xml: impl Into<String>,
    ) {
        self.datasets
            .insert(format!("{}-{}", dataset_id.into(), language.into()), xml.into());
    }
}

impl TerminologySource for MemorySource {
    fn project_index(&self, prefix: &str) -> Result<Vec<VersionInfo>, SourceError> {
        self.indexes
            .get(prefix)
            .cloned()
            .ok_or_else(|| SourceError::UnknownPrefix(prefix.to_string()))
    }

    fn dataset(&self, dataset_id: &str, language: &str) -> Result<String, SourceError> {
        self.datasets
            .get(&format!("{dataset_id}-{language}"))
            .cloned()
            .ok_or_else(|| SourceError::UnknownDataset(dataset_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::parse_project_index;

    #[test]
    fn reads_versions_and_languages() {
        let versions = parse_project_index(
            r#"<return>
                 <project prefix="ppcolbio-">
                   <dataset versionLabel="1" id="ds-1">
                     <desc language="nl-NL">Colonbiopt</desc>
                   </dataset>
                   <dataset versionLabel="33" id="ds-33">
                     <desc language="nl-NL">Colonbiopt</desc>
                     <desc language="en-US">Colon biopsy</desc>
                   </dataset>
                 </project>
               </return>"#,
        )
        .expect("parse index");
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].version, "1");
        assert_eq!(versions[1].dataset_id, "ds-33");
        assert_eq!(versions[1].languages, ["nl-NL", "en-US"]);
    }
}
