//! Row decoder: one data line to one typed record.

use super::coerce::{clean_cell, coerce_value};
use super::diagnostics::{Diagnostic, NO_ROW};
use super::record::{FieldBinding, Record};
use super::schema::Schema;
use super::text::tokenize;

/// Where the cells of one column go.
enum ColumnTarget<R: 'static> {
    Identifier,
    Member(&'static FieldBinding<R>),
    Unbound,
}

/// Result of decoding one row.
///
/// `record` is `None` only when the row faulted; the fault is then the last
/// entry of `diagnostics`.
#[derive(Debug)]
pub struct RowOutcome<R> {
    pub record: Option<R>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Decodes rows of one document into records of type `R`.
///
/// Column names are matched against `R`'s member table once, when the decoder
/// is created. The decoder holds no mutable state and can be shared by workers.
pub struct RowDecoder<'s, R: Record> {
    schema: &'s Schema,
    targets: Vec<ColumnTarget<R>>,
}

impl<'s, R: Record> RowDecoder<'s, R> {
    pub fn new(schema: &'s Schema) -> Self {
        let targets = schema
            .columns()
            .iter()
            .enumerate()
            .map(|(position, column)| {
                if position == 0 {
                    ColumnTarget::Identifier
                } else {
                    R::binding(column.name()).map_or(ColumnTarget::Unbound, ColumnTarget::Member)
                }
            })
            .collect();
        RowDecoder { schema, targets }
    }

    #[inline]
    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Header problems: unknown type tags and columns without a record member.
    ///
    /// Columns with an empty name are spreadsheet padding and are skipped
    /// silently.
    pub fn header_diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (column, target) in self.schema.columns().iter().zip(&self.targets) {
            if column.name().is_empty() {
                continue;
            }
            if !column.has_known_type_tag() && !matches!(target, ColumnTarget::Identifier) {
                diagnostics.push(Diagnostic::UnknownTypeTag {
                    column: column.name().to_owned(),
                    tag: column.raw_type_tag().to_owned(),
                });
            }
            if matches!(target, ColumnTarget::Unbound) {
                diagnostics.push(Diagnostic::MissingMember {
                    column: column.name().to_owned(),
                });
            }
        }
        diagnostics
    }

    /// Decodes `line` (document row number `row`) into a record made by `factory`.
    ///
    /// Cells beyond the schema are ignored and columns beyond the row keep the
    /// record's default. The identifier cell is always read with the `string`
    /// rule.
    pub fn decode_row<F>(&self, line: &str, row: usize, factory: &F) -> RowOutcome<R>
    where
        F: Fn() -> R,
    {
        let cells = tokenize(line);
        let mut record = factory();
        let mut diagnostics = Vec::new();

        for ((column, target), raw) in self.schema.columns().iter().zip(&self.targets).zip(&cells) {
            let binding = match target {
                ColumnTarget::Identifier => {
                    record.set_id(clean_cell(raw).to_owned());
                    continue;
                },
                ColumnTarget::Unbound => continue,
                ColumnTarget::Member(binding) => binding,
            };

            let coerced = coerce_value(raw, column.type_tag());
            if !coerced.is_clean() {
                diagnostics.push(Diagnostic::Coercion {
                    row,
                    column: column.name().to_owned(),
                    type_tag: column.raw_type_tag().to_owned(),
                    raw: raw.clone(),
                });
            }

            if let Err(err) = binding.apply(&mut record, coerced.value) {
                diagnostics.push(Diagnostic::RowFault {
                    row,
                    reason: format!("column `{}` ({}): {err}", column.name(), column.type_tag()),
                });
                return RowOutcome {
                    record: None,
                    diagnostics,
                };
            }
        }

        RowOutcome {
            record: Some(record),
            diagnostics,
        }
    }
}

/// Decodes a single line against `schema` with `R::default` as the factory.
///
/// The line has no document position, so its diagnostics carry [`NO_ROW`].
/// They are logged rather than returned; use [`RowDecoder`] to keep them.
pub fn decode_row<R: Record>(line: &str, schema: &Schema) -> Option<R> {
    let outcome = RowDecoder::<R>::new(schema).decode_row(line, NO_ROW, &R::default);
    for diagnostic in &outcome.diagnostics {
        diagnostic.log(R::TYPE_NAME);
    }
    outcome.record
}
