//! Delimited-text layer of the export format.
//!
//! Rows are single lines of comma-separated cells. A cell holding a delimiter,
//! a quote or a space is wrapped in double quotes, with inner quotes doubled.
//! Line breaks never appear inside a cell; the exporter flattens them to spaces.
//!
//! # Example
//!
//! ```rust
//! use sheetconf::sheet::text::{tokenize, write_row};
//!
//! let line = write_row(["1001", "Knight Errant", "1,2,3"]);
//! assert_eq!(line, "1001,\"Knight Errant\",\"1,2,3\"");
//! assert_eq!(tokenize(&line), vec!["1001", "Knight Errant", "1,2,3"]);
//! ```

pub mod parser;
pub mod writer;

pub use parser::{DELIMITER, QUOTE, tokenize, tokenize_into};
pub use writer::{DocumentWriter, encode_field, write_row};

#[cfg(test)]
mod tests;
