use thiserror::Error;

/// Recoverable translation failures.
///
/// These never abort a run: the caller substitutes the untranslated
/// input and logs the message once.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("value \"{value}\" ({column}) doesn't seem to exist")]
    UnknownValue { column: String, value: String },
    #[error("concept {column} has no terminology association")]
    MissingTerminology { column: String },
}
