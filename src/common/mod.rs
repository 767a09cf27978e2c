//! Common types and utilities shared across modules.

pub mod bom;
pub mod error;

pub use bom::{strip_bom, write_bom};
pub use error::{Error, ID_FIELD, Result, SchemaError, ValueMismatch};
