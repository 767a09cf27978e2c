//! Type-name registry of decoded tables.
//!
//! Record types are registered up front; documents are then loaded by type
//! name and looked up by record type. A registry can be used standalone or
//! installed as the process-wide instance with [`init`].

use crate::common::{Error, Result};
use crate::sheet::{DecodeReport, Record, RecordTable, TableBuilder};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

type ErasedTable = Arc<dyn Any + Send + Sync>;
type DecodeFn = fn(&TableBuilder, &str) -> Result<(ErasedTable, DecodeReport)>;

/// Type-erased entry points for one record type.
#[derive(Clone, Copy)]
struct Registration {
    decode: DecodeFn,
    empty: fn() -> ErasedTable,
}

impl Registration {
    fn of<R: Record>() -> Self {
        Registration {
            decode: decode_erased::<R>,
            empty: empty_table::<R>,
        }
    }
}

fn decode_erased<R: Record>(builder: &TableBuilder, text: &str) -> Result<(ErasedTable, DecodeReport)> {
    let decoded = builder.decode::<R>(text)?;
    Ok((Arc::new(decoded.table), decoded.report))
}

fn empty_table<R: Record>() -> ErasedTable {
    Arc::new(RecordTable::<R>::new())
}

/// Outcome of [`TableRegistry::load_all`].
#[derive(Debug, Default)]
pub struct LoadSummary {
    /// Type names that loaded, with their reports
    pub loaded: Vec<(String, DecodeReport)>,
    /// Type names that failed; each has an empty table installed
    pub failed: Vec<(String, Error)>,
}

impl LoadSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Decoded tables keyed by record type name.
pub struct TableRegistry {
    builder: TableBuilder,
    decoders: HashMap<&'static str, Registration>,
    tables: RwLock<HashMap<&'static str, ErasedTable>>,
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRegistry {
    /// Empty registry decoding with default options.
    pub fn new() -> Self {
        Self::with_builder(TableBuilder::new())
    }

    pub fn with_builder(builder: TableBuilder) -> Self {
        TableRegistry {
            builder,
            decoders: HashMap::new(),
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Makes `R` loadable under [`Record::TYPE_NAME`].
    pub fn register<R: Record>(&mut self) -> &mut Self {
        self.decoders.insert(R::TYPE_NAME, Registration::of::<R>());
        self
    }

    pub fn is_registered(&self, type_name: &str) -> bool {
        self.decoders.contains_key(type_name)
    }

    /// Names of all registered record types.
    pub fn registered(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decoders.keys().copied()
    }

    /// Decodes `text` as the table of `type_name`, replacing any loaded table.
    ///
    /// A document that fails schema validation leaves an empty table in place,
    /// so later lookups see no records rather than stale ones.
    pub fn load(&self, type_name: &str, text: &str) -> Result<DecodeReport> {
        let Some((&name, registration)) = self.decoders.get_key_value(type_name) else {
            return Err(Error::UnknownType(type_name.to_owned()));
        };

        match (registration.decode)(&self.builder, text) {
            Ok((table, report)) => {
                tracing::info!(
                    config = name,
                    records = report.records(),
                    diagnostics = report.diagnostics().len(),
                    "loaded table"
                );
                self.tables.write().insert(name, table);
                Ok(report)
            },
            Err(err) => {
                tracing::error!(config = name, error = %err, "failed to load table");
                self.tables.write().insert(name, (registration.empty)());
                Err(err)
            },
        }
    }

    /// Loads several `(type_name, text)` documents, continuing past failures.
    pub fn load_all<'a, I>(&self, sources: I) -> LoadSummary
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut summary = LoadSummary::default();
        for (type_name, text) in sources {
            match self.load(type_name, text) {
                Ok(report) => summary.loaded.push((type_name.to_owned(), report)),
                Err(err) => summary.failed.push((type_name.to_owned(), err)),
            }
        }
        summary
    }

    /// The loaded table of `R`.
    pub fn table<R: Record>(&self) -> Option<Arc<RecordTable<R>>> {
        let erased = self.tables.read().get(R::TYPE_NAME).cloned()?;
        erased.downcast::<RecordTable<R>>().ok()
    }

    /// A copy of the record of `R` with identifier `id`.
    pub fn get<R: Record + Clone>(&self, id: &str) -> Option<R> {
        let Some(table) = self.table::<R>() else {
            tracing::warn!(config = R::TYPE_NAME, %id, "table not loaded");
            return None;
        };
        let record = table.get(id).cloned();
        if record.is_none() {
            tracing::warn!(config = R::TYPE_NAME, %id, "no record with this id");
        }
        record
    }

    /// Copies of every record of `R`, in first-appearance order.
    pub fn get_all<R: Record + Clone>(&self) -> Vec<R> {
        match self.table::<R>() {
            Some(table) => table.records().to_vec(),
            None => {
                tracing::warn!(config = R::TYPE_NAME, "table not loaded");
                Vec::new()
            },
        }
    }

    /// Whether a table is loaded for `type_name`.
    pub fn contains(&self, type_name: &str) -> bool {
        self.tables.read().contains_key(type_name)
    }

    /// Number of loaded tables.
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    /// Drops every loaded table. Registrations are kept.
    pub fn clear(&self) {
        self.tables.write().clear();
    }
}

impl std::fmt::Debug for TableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut registered: Vec<_> = self.decoders.keys().collect();
        registered.sort();
        let mut loaded: Vec<_> = self.tables.read().keys().copied().collect();
        loaded.sort();
        f.debug_struct("TableRegistry")
            .field("registered", &registered)
            .field("loaded", &loaded)
            .finish()
    }
}

/// Process-wide registry
static GLOBAL: Lazy<RwLock<Option<Arc<TableRegistry>>>> = Lazy::new(|| RwLock::new(None));

/// Installs `registry` as the process-wide instance, replacing any previous one.
pub fn init(registry: TableRegistry) -> Arc<TableRegistry> {
    let registry = Arc::new(registry);
    *GLOBAL.write() = Some(Arc::clone(&registry));
    registry
}

/// The process-wide registry, if one is installed.
pub fn global() -> Option<Arc<TableRegistry>> {
    GLOBAL.read().clone()
}

/// Uninstalls the process-wide registry and returns it.
pub fn clear() -> Option<Arc<TableRegistry>> {
    GLOBAL.write().take()
}
