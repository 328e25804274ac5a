//! Tree-template path mapping and merge-group discovery.
//!
//! A tree template maps base column names to hierarchical paths. Every
//! eligible dataset column resolves to one path, built from the template
//! entry (or a placeholder when none exists) plus the column's translated
//! concept name as the final segment. Columns that resolve to the same
//! path form a merge group and collapse into one output column.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use recode_codebook::{ProtocolRegistry, WarnDedupe};
use recode_ingest::{Dataset, romans};
use recode_model::OutputFormat;
use tracing::warn;

use crate::error::TransformError;

const NO_PATH_FOUND: &str = "NoPathFound/";
const ROMAN_PLACEHOLDER: &str = "{ROMAN}";
const REPEAT_PLACEHOLDER: &str = "{REPNR}";

/// Read a tree template: base column name in the first field, path in
/// the second, tab separated. Rows starting with `#` are comments.
pub fn read_tree_template(
    path: impl AsRef<Path>,
) -> Result<BTreeMap<String, String>, TransformError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| TransformError::TemplateRead {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .has_headers(false)
        .from_reader(file);

    let mut template = BTreeMap::new();
    for record in reader.records() {
        let record = record?;
        let name = record.get(0).unwrap_or("").trim().to_lowercase();
        let tree_path = record.get(1).unwrap_or("").trim();
        if !name.is_empty() && !tree_path.is_empty() {
            let mut tree_path = tree_path.to_string();
            if !tree_path.ends_with('/') {
                tree_path.push('/');
            }
            template.insert(name, tree_path);
        } else if !name.is_empty() && !name.starts_with('#') {
            warn!("item {name} not properly defined in tree");
        }
    }
    Ok(template)
}

#[derive(Debug)]
pub struct PathMap {
    // lowercased original column name -> full path
    by_column: BTreeMap<String, String>,
    // full path -> original column names contributing to it, in column order
    columns_for_path: BTreeMap<String, Vec<String>>,
    max_depth: usize,
}

impl PathMap {
    /// Resolve a path for every eligible column.
    ///
    /// Columns absent from the template get a placeholder path with a
    /// one-time warning, except the subject identifier column which is
    /// never templated. The translated concept name (descriptions) is
    /// appended as the final segment before `{ROMAN}` substitution.
    pub fn build(
        dataset: &Dataset,
        template: &BTreeMap<String, String>,
        protocol: &ProtocolRegistry,
        subject_column: &str,
        warnings: &WarnDedupe,
    ) -> Self {
        let mut by_column = BTreeMap::new();
        let mut columns_for_path: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut max_depth = 0;

        for (index, original) in dataset.headers().iter().enumerate() {
            if !dataset.has_data(index) {
                continue;
            }
            let base = dataset.base_name(index);
            let translated =
                protocol.translate_concept(base, &dataset.max_version(index), OutputFormat::Descriptions);

            let stem = match template.get(base) {
                Some(stem) => stem.clone(),
                None => {
                    if !base.eq_ignore_ascii_case(subject_column) {
                        warnings.warn_once(&format!(
                            "a fake path will be created for {base} as it has no entry \
                             in the tree template"
                        ));
                    }
                    NO_PATH_FOUND.to_string()
                }
            };
            let mut path = format!("{stem}{translated}");
            if path.contains(ROMAN_PLACEHOLDER) {
                path = substitute_roman(path, dataset.marker(index), warnings);
            }

            by_column.insert(original.to_lowercase(), path.clone());
            let depth = path.split('/').count() + 1;
            if depth > max_depth {
                max_depth = depth;
            }
            columns_for_path.entry(path).or_default().push(original.clone());
        }
        Self {
            by_column,
            columns_for_path,
            max_depth,
        }
    }

    pub fn path_for(&self, original: &str) -> Option<&str> {
        self.by_column
            .get(&original.to_lowercase())
            .map(String::as_str)
    }

    /// All original columns sharing the given column's path, in column
    /// order. A group of more than one column is a merge group and is
    /// reported once.
    pub fn merge_group(&self, original: &str, warnings: &WarnDedupe) -> Option<&[String]> {
        let path = self.path_for(original)?;
        let group = self.columns_for_path.get(path)?;
        if group.len() > 1 {
            warnings.warn_once(&format!(
                "a merged column will appear in the output, containing: {}",
                group.join("; ")
            ));
        }
        Some(group)
    }

    /// Whether the column is the first contributor to its path, and so
    /// the one that emits the merged header and values.
    pub fn is_representative(&self, original: &str) -> bool {
        self.merge_group_quiet(original)
            .is_some_and(|group| group[0].eq_ignore_ascii_case(original))
    }

    fn merge_group_quiet(&self, original: &str) -> Option<&[String]> {
        let path = self.path_for(original)?;
        self.columns_for_path.get(path).map(Vec::as_slice)
    }

    /// Path levels plus one, sizing the tree-sheet header.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

fn substitute_roman(path: String, marker: &str, warnings: &WarnDedupe) -> String {
    if marker.is_empty() {
        warnings.warn_once(&format!(
            "the tree suggests the data should have a Roman extension (path: {path}). \
             This is not the case... The resulting path will not be correct."
        ));
        path
    } else {
        path.replace(ROMAN_PLACEHOLDER, romans::render(marker))
    }
}

/// Substitute the repeat placeholder with a report number; applied at
/// tree-sheet emission time, when the repeat is known.
pub fn substitute_repeat(path: &str, repeat: usize) -> String {
    path.replace(REPEAT_PLACEHOLDER, &format!("Report {repeat}"))
}
