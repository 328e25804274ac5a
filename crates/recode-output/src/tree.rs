//! Tree-sheet output for the warehouse import.
//!
//! One line per output column, naming the file, the column number and
//! the path segments that place the column in the warehouse tree. Each
//! level is followed by two metadata cells; the header is sized by the
//! deepest path. The subject identifier column maps to the single
//! segment `SUBJ_ID`.

use std::path::Path;

use recode_model::OutputHeaderItem;
use recode_transform::{PathMap, substitute_repeat};
use tracing::{info, warn};

use crate::error::OutputError;
use crate::tsv;

const DATA_TYPE: &str = "Low-dimensional";
const SUBJECT_SEGMENT: &str = "SUBJ_ID";

pub fn write_tree_sheet(
    header: &[OutputHeaderItem],
    paths: &PathMap,
    study_name: &str,
    data_file_name: &str,
    subject_column: &str,
    path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    let width = 3 + 3 * paths.max_depth();
    let mut writer = tsv::open(path)?;
    writer.write_record(sheet_header(paths.max_depth()))?;

    for (index, item) in header.iter().enumerate() {
        let mut row = vec![
            DATA_TYPE.to_string(),
            data_file_name.to_string(),
            (index + 1).to_string(),
            study_name.to_string(),
            String::new(),
            String::new(),
        ];
        if item.original().eq_ignore_ascii_case(subject_column) {
            push_segment(&mut row, SUBJECT_SEGMENT);
        } else {
            match paths.path_for(item.original()) {
                Some(tree_path) => {
                    let tree_path = substitute_repeat(tree_path, item.repeat());
                    for segment in tree_path.split('/') {
                        push_segment(&mut row, segment);
                    }
                }
                None => warn!(column = item.original(), "column has no resolved path"),
            }
        }
        row.resize(width, String::new());
        writer.write_record(&row)?;
    }
    writer.flush().map_err(|source| OutputError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), columns = header.len(), "wrote tree sheet");
    Ok(())
}

fn sheet_header(max_depth: usize) -> Vec<String> {
    let mut cells = vec![
        "Data type".to_string(),
        "File name".to_string(),
        "Column number".to_string(),
    ];
    for level in 1..=max_depth {
        cells.push(format!("Level {level}"));
        cells.push(format!("Level {level} metadata tag"));
        cells.push(format!("Level {level} metadata value"));
    }
    cells
}

fn push_segment(row: &mut Vec<String>, segment: &str) {
    row.push(segment.to_string());
    row.push(String::new());
    row.push(String::new());
}
