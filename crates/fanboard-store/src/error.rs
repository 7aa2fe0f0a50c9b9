use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("parent document not found for {0}")]
    ParentNotFound(String),

    #[error("field '{field}' is not numeric")]
    NonNumericField { field: String },

    #[error("field '{field}' is not an array")]
    NotAnArray { field: String },
}
