use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised by a search call.
///
/// All of them describe a caller mistake in the field configuration or a
/// failure to build the internal pattern. A failed call never yields a
/// partial result list.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("at least one field is required to search")]
    NoFields,

    #[error("field names must not be empty")]
    EmptyFieldName,

    #[error("field {0:?} is configured more than once")]
    DuplicateField(String),

    #[error("field {field:?} has invalid weight {weight}, expected a finite value > 0")]
    InvalidWeight { field: String, weight: f64 },

    #[error("failed to build search pattern: {0}")]
    Pattern(#[from] regex::Error),
}
