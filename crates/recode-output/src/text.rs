//! Flat text output: translated header, then translated lines.

use std::path::Path;

use recode_transform::TranslatedTable;
use tracing::info;

use crate::error::OutputError;
use crate::tsv;

pub fn write_text(table: &TranslatedTable, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let path = path.as_ref();
    let mut writer = tsv::open(path)?;
    writer.write_record(table.header.iter().map(|item| item.translated()))?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(|source| OutputError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), rows = table.rows.len(), "wrote text output");
    Ok(())
}
