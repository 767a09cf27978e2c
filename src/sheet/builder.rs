//! Whole-document decoding: header, rows, identifier table and report.

use super::decoder::{RowDecoder, RowOutcome};
use super::diagnostics::{DecodeReport, Diagnostic, DiagnosticKind};
use super::options::DecodeOptions;
use super::record::Record;
use super::schema::{Schema, document_lines};
use super::table::RecordTable;
use crate::common::{Error, Result, SchemaError, strip_bom};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Header rows before the first data row.
const HEADER_LINES: usize = 3;

/// Output of one decode call.
#[derive(Debug, Clone)]
pub struct Decoded<R> {
    pub schema: Schema,
    pub table: RecordTable<R>,
    pub report: DecodeReport,
}

/// Decodes documents into [`RecordTable`]s.
///
/// A builder configured with `worker_threads` owns a dedicated rayon pool that
/// is reused across calls; otherwise rows run on the global pool.
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    options: DecodeOptions,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl TableBuilder {
    /// Builder with default options on the global pool.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Result<Self> {
        options.validate()?;
        let pool = match options.worker_threads {
            Some(threads) if options.parallel && threads > 1 => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("sheetconf-decode-{i}"))
                    .build()
                    .map_err(|e| Error::ThreadPool(e.to_string()))?;
                Some(Arc::new(pool))
            },
            _ => None,
        };
        Ok(TableBuilder { options, pool })
    }

    #[inline]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decodes `text` with `R::default` as the record factory.
    pub fn decode<R: Record>(&self, text: &str) -> Result<Decoded<R>> {
        self.build(text, R::default)
    }

    /// Decodes `text`, creating each record with `factory`.
    ///
    /// Header errors abort the call. Every row-level problem is recovered from
    /// and recorded in the report; the surviving rows form the table, with the
    /// last row winning for a repeated id.
    pub fn build<R, F>(&self, text: &str, factory: F) -> Result<Decoded<R>>
    where
        R: Record,
        F: Fn() -> R + Sync,
    {
        let text = if self.options.strip_bom { strip_bom(text).0 } else { text };
        let lines = document_lines(text);
        if lines.len() <= HEADER_LINES {
            return Err(SchemaError::TooFewLines { found: lines.len() }.into());
        }

        let schema = Schema::from_header_lines(lines[0], lines[1], lines[2])?;
        let decoder = RowDecoder::<R>::new(&schema);

        let rows: Vec<(usize, &str)> = lines
            .iter()
            .enumerate()
            .skip(HEADER_LINES)
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| (idx + 1, *line))
            .collect();

        let outcomes = self.decode_rows(&decoder, &rows, &factory);

        let mut report = DecodeReport::new();
        report.set_rows(rows.len());
        report.extend(decoder.header_diagnostics());

        let mut table = RecordTable::with_capacity(rows.len());
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (&(row, _), outcome) in rows.iter().zip(outcomes) {
            report.extend(outcome.diagnostics);
            let Some(record) = outcome.record else {
                continue;
            };
            if record.id().is_empty() {
                report.push(Diagnostic::MissingIdentifier { row });
                continue;
            }
            let previous = seen.insert(record.id().to_owned(), row);
            if let Some(previous_row) = previous.filter(|_| self.options.warn_on_duplicate_ids) {
                report.push(Diagnostic::DuplicateIdentifier {
                    id: record.id().to_owned(),
                    row,
                    previous_row,
                });
            }
            table.insert(record);
        }
        report.set_records(table.len());

        for diagnostic in report.diagnostics() {
            diagnostic.log(R::TYPE_NAME);
        }
        tracing::debug!(
            config = R::TYPE_NAME,
            rows = report.rows(),
            records = report.records(),
            coercions = report.count(DiagnosticKind::Coercion),
            faults = report.count(DiagnosticKind::RowFault),
            "decoded table"
        );

        Ok(Decoded { schema, table, report })
    }

    /// Decodes every row, returning outcomes in row order.
    fn decode_rows<R, F>(&self, decoder: &RowDecoder<'_, R>, rows: &[(usize, &str)], factory: &F) -> Vec<RowOutcome<R>>
    where
        R: Record,
        F: Fn() -> R + Sync,
    {
        let decode_one = |&(row, line): &(usize, &str)| decoder.decode_row(line, row, factory);

        if !self.options.runs_parallel(rows.len()) {
            return rows.iter().map(decode_one).collect();
        }

        // Indexed collect keeps row order regardless of scheduling
        match &self.pool {
            Some(pool) => pool.install(|| rows.par_iter().map(decode_one).collect()),
            None => rows.par_iter().map(decode_one).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Skill {
        id: String,
        cost: i32,
    }

    crate::impl_record!(Skill { cost });

    #[test]
    fn test_decode_skips_blank_rows() {
        let text = "名字,消耗\nid,cost\nstring,int\n\ns1,3\n   \ns2,5\n";
        let decoded = TableBuilder::new().decode::<Skill>(text).unwrap();

        assert_eq!(decoded.report.rows(), 2);
        assert_eq!(decoded.report.records(), 2);
        assert!(decoded.report.is_clean());
        assert_eq!(decoded.table.get("s2").map(|s| s.cost), Some(5));
    }

    #[test]
    fn test_header_only_document() {
        let decoded = TableBuilder::new()
            .decode::<Skill>("a,b\nid,cost\nstring,int\n")
            .unwrap();
        assert!(decoded.table.is_empty());
        assert_eq!(decoded.report.rows(), 0);
    }

    #[test]
    fn test_too_few_lines() {
        let err = TableBuilder::new()
            .decode::<Skill>("a,b\nid,cost\nstring,int")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::TooFewLines { found: 3 })
        ));
    }

    #[test]
    fn test_custom_factory() {
        let text = "\nid,cost\nstring,int\ns1,\ns2,4\n";
        let decoded = TableBuilder::new()
            .build(text, || Skill {
                id: String::new(),
                cost: -1,
            })
            .unwrap();
        assert_eq!(decoded.table.get("s1").map(|s| s.cost), Some(0));

        let short = "\nid,cost\nstring,int\ns1\n";
        let decoded = TableBuilder::new()
            .build(short, || Skill {
                id: String::new(),
                cost: -1,
            })
            .unwrap();
        assert_eq!(decoded.table.get("s1").map(|s| s.cost), Some(-1));
    }

    #[test]
    fn test_dedicated_pool() {
        let options = DecodeOptions::new()
            .with_parallel_threshold(1)
            .with_worker_threads(Some(3));
        let builder = TableBuilder::with_options(options).unwrap();
        assert!(builder.pool.is_some());

        let text = "\nid,cost\nstring,int\na,1\nb,2\nc,3\nd,4\n";
        let decoded = builder.decode::<Skill>(text).unwrap();
        assert_eq!(decoded.table.ids().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let options = DecodeOptions::new().with_worker_threads(Some(0));
        assert!(matches!(TableBuilder::with_options(options), Err(Error::Config(_))));
    }

    #[test]
    fn test_single_worker_has_no_pool() {
        let options = DecodeOptions::new().with_worker_threads(Some(1));
        let builder = TableBuilder::with_options(options).unwrap();
        assert!(builder.pool.is_none());
    }
}
