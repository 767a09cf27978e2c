//! Error types for sheetconf.
//!
//! Only schema problems abort a decode call. Per-field and per-row problems are
//! recovered locally and surface as [`Diagnostic`](crate::sheet::Diagnostic)s instead.
use thiserror::Error;

/// Reserved name of the identifier column.
pub const ID_FIELD: &str = "id";

/// Main error type for sheetconf operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The document header is malformed
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// No decoder is registered under the requested type name
    #[error("Unknown config type: {0}")]
    UnknownType(String),

    /// The dedicated decode pool could not be started
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Decode options could not be loaded
    #[error("Config error: {0}")]
    Config(String),
}

/// Fatal problems with the three header rows of a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Fewer lines than three header rows plus one data row
    #[error("expected at least 4 lines (3 header rows and data), found {found}")]
    TooFewLines { found: usize },

    /// The first field-name column is not the identifier column
    #[error("first column of the field-name row must be `id`, found `{found}`")]
    MissingIdentifier { found: String },
}

/// A decoded value did not fit the record member it was routed to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected} value, found {found}")]
pub struct ValueMismatch {
    pub expected: &'static str,
    pub found: &'static str,
}

/// Result type for sheetconf operations.
pub type Result<T> = std::result::Result<T, Error>;
