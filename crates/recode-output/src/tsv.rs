//! Shared tab-separated writing.

use std::fs::File;
use std::path::Path;

use csv::{QuoteStyle, Writer, WriterBuilder};

use crate::error::OutputError;

pub(crate) fn open(path: &Path) -> Result<Writer<File>, OutputError> {
    let file = File::create(path).map_err(|source| OutputError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .from_writer(file))
}
