//! Unified error types for sheetconf.

pub mod types;

pub use types::{Error, ID_FIELD, Result, SchemaError, ValueMismatch};
