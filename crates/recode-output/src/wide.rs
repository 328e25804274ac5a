//! Wide output: one line per subject, header cells prefixed with their
//! repeat number.

use std::path::Path;

use recode_transform::WideTable;
use tracing::info;

use crate::error::OutputError;
use crate::tsv;

pub fn write_wide(table: &WideTable, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let path = path.as_ref();
    let mut writer = tsv::open(path)?;
    writer.write_record(
        table
            .header
            .iter()
            .map(|item| format!("{}_{}", item.repeat(), item.translated())),
    )?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(|source| OutputError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), subjects = table.rows.len(), "wrote wide output");
    Ok(())
}
