//! Typed decoding of tabular configuration documents.
//!
//! A document is comma-separated text exported from a spreadsheet. Its first
//! three rows form the header:
//!
//! 1. human-readable comments (ignored by decoding)
//! 2. field names, the first of which must be `id`
//! 3. type tags: `int`, `long`, `float`, `double`, `bool`, `string`,
//!    `vector2`, `vector3`, or any of these followed by `[]`
//!
//! Every following non-blank row becomes one record. Cells that do not parse
//! become zero values and are reported, never fatal.
//!
//! # Quick Start
//!
//! ```rust
//! use sheetconf::impl_record;
//! use sheetconf::sheet::{TableBuilder, Vector3};
//!
//! #[derive(Debug, Default, Clone)]
//! pub struct RoleConfig {
//!     pub id: String,
//!     pub name: String,
//!     pub hp: i32,
//!     pub pos: Vector3,
//!     pub team: Vec<String>,
//! }
//!
//! impl_record!(RoleConfig { name, hp, pos, team });
//!
//! let text = "编号,名字,生命,位置,队友\n\
//!             id,name,hp,pos,team\n\
//!             string,string,int,vector3,string[]\n\
//!             1001,Knight,100,\"1,2,3\",\"1002,1003\"\n";
//!
//! let decoded = TableBuilder::new().decode::<RoleConfig>(text)?;
//! let knight = decoded.table.get("1001").unwrap();
//! assert_eq!(knight.hp, 100);
//! assert_eq!(knight.pos, Vector3::new(1.0, 2.0, 3.0));
//! assert_eq!(knight.team, vec!["1002", "1003"]);
//! assert!(decoded.report.is_clean());
//! # Ok::<(), sheetconf::Error>(())
//! ```
//!
//! # Architecture
//!
//! - [`text`]: line tokenizer and writer for the delimited format
//! - [`Schema`]: the parsed header
//! - [`coerce`]: cell text to [`Value`] for each type tag
//! - [`Record`]: static member table of a record type
//! - [`RowDecoder`]: one row to one record
//! - [`TableBuilder`]: whole document to a [`RecordTable`] and a [`DecodeReport`]

pub mod builder;
pub mod coerce;
pub mod decoder;
pub mod diagnostics;
pub mod options;
pub mod record;
pub mod schema;
pub mod table;
pub mod text;
pub mod types;

pub use builder::{Decoded, TableBuilder};
pub use coerce::{Coerced, clean_cell, coerce, coerce_value};
pub use decoder::{RowDecoder, RowOutcome, decode_row};
pub use diagnostics::{DecodeReport, Diagnostic, DiagnosticKind, NO_ROW};
pub use options::DecodeOptions;
pub use record::{FieldBinding, FieldSetter, FromValue, Record};
pub use schema::{Column, Schema, parse_schema};
pub use table::RecordTable;
pub use types::{ScalarKind, TypeTag, Value, Vector2, Vector3};
