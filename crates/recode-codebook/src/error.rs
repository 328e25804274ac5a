use thiserror::Error;

use crate::source::SourceError;
use crate::xml::XmlError;

#[derive(Debug, Error)]
pub enum CodebookError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Xml(#[from] XmlError),
}
