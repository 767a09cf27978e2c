//! Sheetconf - A Rust library for decoding spreadsheet configuration exports
//!
//! Game and application designers keep configuration in spreadsheets and export
//! each sheet to comma-separated text with a three-row header describing the
//! columns. This library turns such a document into a table of typed records
//! indexed by their `id`.
//!
//! # Features
//!
//! - **Self-describing documents**: column names and type tags come from the header
//! - **Lenient decoding**: unparsable cells become zero values and are reported
//! - **Parallel rows**: rows decode on a rayon pool with deterministic output
//! - **Re-encoding**: write documents back in the exporter's quoting style
//! - **Registry**: load many tables by type name and look records up by id
//!
//! # Example - Decoding a table
//!
//! ```rust
//! use sheetconf::{TableBuilder, impl_record};
//!
//! #[derive(Debug, Default, Clone)]
//! pub struct ItemConfig {
//!     pub id: String,
//!     pub price: i32,
//!     pub tags: Vec<String>,
//! }
//!
//! impl_record!(ItemConfig { price, tags });
//!
//! let text = "名字,价格,标签\n\
//!             id,price,tags\n\
//!             string,int,string[]\n\
//!             potion,10,\"heal,consumable\"\n\
//!             sword,abc,weapon\n";
//!
//! let decoded = TableBuilder::new().decode::<ItemConfig>(text)?;
//! assert_eq!(decoded.table.get("potion").unwrap().tags, vec!["heal", "consumable"]);
//!
//! // `abc` is not an int: the price falls back to 0 and the cell is reported
//! assert_eq!(decoded.table.get("sword").unwrap().price, 0);
//! assert_eq!(decoded.report.diagnostics().len(), 1);
//! # Ok::<(), sheetconf::Error>(())
//! ```
//!
//! # Example - Registry
//!
//! ```rust
//! use sheetconf::{TableRegistry, impl_record};
//!
//! #[derive(Debug, Default, Clone)]
//! pub struct ShopConfig {
//!     pub id: String,
//!     pub items: Vec<String>,
//! }
//!
//! impl_record!(ShopConfig { items });
//!
//! let mut registry = TableRegistry::new();
//! registry.register::<ShopConfig>();
//! registry.load("ShopConfig", "\nid,items\nstring,string[]\nsmith,\"sword,shield\"\n")?;
//!
//! let smith = registry.get::<ShopConfig>("smith").unwrap();
//! assert_eq!(smith.items, vec!["sword", "shield"]);
//! # Ok::<(), sheetconf::Error>(())
//! ```

/// Shared utilities: errors and byte order marks
pub mod common;

/// Type-name registry of decoded tables
pub mod registry;

/// Document schema, coercion, row decoding and table building
pub mod sheet;

// Re-export commonly used types for convenience
pub use common::{Error, Result, SchemaError, ValueMismatch};
pub use registry::{LoadSummary, TableRegistry};
pub use sheet::{
    DecodeOptions, DecodeReport, Decoded, Diagnostic, DiagnosticKind, Record, RecordTable, Schema, TableBuilder,
    Value, Vector2, Vector3,
};
