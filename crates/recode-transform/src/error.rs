use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to read tree template {path}: {source}")]
    TemplateRead {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("the subject identifier column {0} does not appear in the translated output")]
    MissingSubjectColumn(String),
}
