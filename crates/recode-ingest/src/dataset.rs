//! Tab-separated registry export with per-column version tracking.
//!
//! Every data line carries the protocol version it was recorded under.
//! Columns appear and disappear between protocol versions, so each
//! column tracks the highest version in which it ever held a value;
//! headers are later translated with that version while values use their
//! own line's version. A column that never held a value keeps the
//! sentinel and is excluded from all output.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use recode_codebook::{HousekeepingRegistry, ProtocolRegistry, WarnDedupe};
use thiserror::Error;
use tracing::info;

use crate::romans;

/// Marks a column without data in any line.
pub const NO_DATA: i64 = -1;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("the input file has no header line")]
    EmptyInput,
    #[error("the protocol version column {0} was not found in the header")]
    MissingVersionColumn(String),
}

#[derive(Debug)]
pub struct Dataset {
    headers: Vec<String>,
    // lowercased, repeat marker stripped
    base_names: Vec<String>,
    // Roman numeral per column, empty when none was resolved
    markers: Vec<String>,
    max_versions: Vec<i64>,
    version_index: usize,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn read_path(
        path: impl AsRef<Path>,
        version_column: &str,
        warnings: &WarnDedupe,
    ) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IngestError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let dataset = Self::read(file, version_column, warnings)?;
        info!(
            path = %path.display(),
            columns = dataset.headers.len(),
            rows = dataset.rows.len(),
            "read dataset"
        );
        Ok(dataset)
    }

    /// Read a tab-separated export: header line first, then data lines.
    /// Cells are trimmed and stripped of one layer of surrounding quotes.
    /// Input that is not valid UTF-8 is decoded as Latin-1, the encoding
    /// older registry exports were written in.
    pub fn read(
        mut input: impl Read,
        version_column: &str,
        warnings: &WarnDedupe,
    ) -> Result<Self, IngestError> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let content = decode_export(bytes);
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .has_headers(false)
            .from_reader(content.as_bytes());

        let mut records = reader.records();
        let headers: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(|cell| cell.trim().to_string()).collect(),
            None => return Err(IngestError::EmptyInput),
        };
        let version_index = headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(version_column))
            .ok_or_else(|| IngestError::MissingVersionColumn(version_column.to_string()))?;

        let mut dataset = Self {
            base_names: headers.iter().map(|name| name.to_lowercase()).collect(),
            markers: vec![String::new(); headers.len()],
            max_versions: vec![NO_DATA; headers.len()],
            version_index,
            rows: Vec::new(),
            headers,
        };
        for record in records {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(clean_cell).collect();
            row.resize(dataset.headers.len(), String::new());
            dataset.track_versions(&row, warnings);
            dataset.rows.push(row);
        }
        Ok(dataset)
    }

    /// Update per-column max versions from one line. Lines whose version
    /// cell is not an integer cannot contribute.
    fn track_versions(&mut self, row: &[String], warnings: &WarnDedupe) {
        let cell = &row[self.version_index];
        let Ok(version) = cell.parse::<i64>() else {
            warnings.warn_once(&format!(
                "protocol version \"{cell}\" is not a number; lines with this version \
                 will not count toward column version tracking"
            ));
            return;
        };
        for (index, value) in row.iter().enumerate() {
            if !value.is_empty() && self.max_versions[index] < version {
                self.max_versions[index] = version;
            }
        }
    }

    /// Split repeat markers off the column names.
    ///
    /// For every column with data that is not a housekeeping column, the
    /// candidate Roman suffixes are tried longest first; the first prefix
    /// the protocol knows under the column's max version wins. Columns
    /// without a resolvable marker keep their full name as base name.
    pub fn resolve_columns(
        &mut self,
        housekeeping: &HousekeepingRegistry,
        protocol: &ProtocolRegistry,
    ) {
        for index in 0..self.headers.len() {
            if self.max_versions[index] == NO_DATA
                || housekeeping.contains_header(&self.headers[index])
            {
                continue;
            }
            let original = self.headers[index].clone();
            let version = self.max_versions[index].to_string();
            for roman in romans::suffix_matches(&original) {
                let prefix = &original[..original.len() - roman.len()];
                if protocol.contains_header(prefix, &version) {
                    self.base_names[index] = prefix.to_lowercase();
                    self.markers[index] = roman.to_string();
                    break;
                }
            }
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn base_name(&self, index: usize) -> &str {
        &self.base_names[index]
    }

    pub fn marker(&self, index: usize) -> &str {
        &self.markers[index]
    }

    pub fn has_data(&self, index: usize) -> bool {
        self.max_versions[index] != NO_DATA
    }

    pub fn max_version(&self, index: usize) -> String {
        self.max_versions[index].to_string()
    }

    pub fn version_index(&self) -> usize {
        self.version_index
    }

    /// The protocol version a single line was recorded under.
    pub fn row_version<'a>(&self, row: &'a [String]) -> &'a str {
        &row[self.version_index]
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

fn decode_export(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(error) => error.into_bytes().iter().map(|&byte| byte as char).collect(),
    }
}

fn clean_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}
