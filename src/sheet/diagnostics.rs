//! Recoverable decode problems and the per-call report that collects them.
//!
//! Row numbers are 1-based line numbers in the document, so the first data row
//! is row 4. A line decoded on its own, outside any document, is row
//! [`NO_ROW`].

use serde::Serialize;
use std::fmt;

/// Row number of a line decoded outside a document.
pub const NO_ROW: usize = 0;

/// Category of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    UnknownTypeTag,
    MissingMember,
    Coercion,
    MissingIdentifier,
    DuplicateIdentifier,
    RowFault,
}

/// A problem that was recovered from during decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Diagnostic {
    /// A header tag is not one of the known tags; the column decodes as `string`
    UnknownTypeTag { column: String, tag: String },
    /// No record member matches the column; the column is skipped
    MissingMember { column: String },
    /// A cell (or part of it) was unparsable and replaced by a zero value
    Coercion {
        row: usize,
        column: String,
        type_tag: String,
        raw: String,
    },
    /// The row has an empty identifier and was left out of the table
    MissingIdentifier { row: usize },
    /// The row replaced an earlier row with the same identifier
    DuplicateIdentifier {
        id: String,
        row: usize,
        previous_row: usize,
    },
    /// The row could not be decoded at all and was left out of the table
    RowFault { row: usize, reason: String },
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::UnknownTypeTag { .. } => DiagnosticKind::UnknownTypeTag,
            Diagnostic::MissingMember { .. } => DiagnosticKind::MissingMember,
            Diagnostic::Coercion { .. } => DiagnosticKind::Coercion,
            Diagnostic::MissingIdentifier { .. } => DiagnosticKind::MissingIdentifier,
            Diagnostic::DuplicateIdentifier { .. } => DiagnosticKind::DuplicateIdentifier,
            Diagnostic::RowFault { .. } => DiagnosticKind::RowFault,
        }
    }

    /// Document row the problem belongs to; `None` for header problems and
    /// for lines decoded outside a document.
    pub fn row(&self) -> Option<usize> {
        match self {
            Diagnostic::Coercion { row, .. }
            | Diagnostic::MissingIdentifier { row }
            | Diagnostic::DuplicateIdentifier { row, .. }
            | Diagnostic::RowFault { row, .. } => Some(*row).filter(|&row| row != NO_ROW),
            Diagnostic::UnknownTypeTag { .. } | Diagnostic::MissingMember { .. } => None,
        }
    }

    /// Emits the diagnostic as a structured log event.
    pub(crate) fn log(&self, type_name: &str) {
        match self {
            Diagnostic::UnknownTypeTag { column, tag } => {
                tracing::warn!(config = type_name, %column, %tag, "unknown type tag, decoding as string");
            },
            Diagnostic::MissingMember { column } => {
                tracing::warn!(config = type_name, %column, "no record member for column, skipping");
            },
            Diagnostic::Coercion {
                row,
                column,
                type_tag,
                raw,
            } => {
                tracing::warn!(
                    config = type_name,
                    row,
                    %column,
                    %type_tag,
                    %raw,
                    "unparsable cell, using zero value"
                );
            },
            Diagnostic::MissingIdentifier { row } => {
                tracing::warn!(config = type_name, row, "row has an empty id, skipping");
            },
            Diagnostic::DuplicateIdentifier {
                id,
                row,
                previous_row,
            } => {
                tracing::warn!(config = type_name, %id, row, previous_row, "duplicate id, later row wins");
            },
            Diagnostic::RowFault { row, reason } => {
                tracing::error!(config = type_name, row, %reason, "failed to decode row");
            },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownTypeTag { column, tag } => {
                write!(f, "column `{column}`: unknown type tag `{tag}`, decoding as string")
            },
            Diagnostic::MissingMember { column } => {
                write!(f, "column `{column}`: no matching record member")
            },
            Diagnostic::Coercion {
                row,
                column,
                type_tag,
                raw,
            } => write!(f, "row {row}, column `{column}`: cannot read `{raw}` as {type_tag}"),
            Diagnostic::MissingIdentifier { row } => write!(f, "row {row}: empty id"),
            Diagnostic::DuplicateIdentifier {
                id,
                row,
                previous_row,
            } => write!(f, "row {row}: id `{id}` replaces row {previous_row}"),
            Diagnostic::RowFault { row, reason } => write!(f, "row {row}: {reason}"),
        }
    }
}

/// Everything one decode call recovered from, in document order.
///
/// Header diagnostics come first, then row diagnostics by row number. The order
/// does not depend on how rows were scheduled across workers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodeReport {
    rows: usize,
    records: usize,
    diagnostics: Vec<Diagnostic>,
}

impl DecodeReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-blank data rows in the document.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of records in the resulting table.
    #[inline]
    pub fn records(&self) -> usize {
        self.records
    }

    #[inline]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of diagnostics of `kind`.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind() == kind).count()
    }

    /// Diagnostics attached to document row `row`.
    pub fn for_row(&self, row: usize) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.row() == Some(row))
    }

    /// Whether the document decoded without any recovery.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub(crate) fn set_rows(&mut self, rows: usize) {
        self.rows = rows;
    }

    pub(crate) fn set_records(&mut self, records: usize) {
        self.records = records;
    }

    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = DecodeReport::new();
        report.push(Diagnostic::MissingMember {
            column: "mp".to_string(),
        });
        report.push(Diagnostic::Coercion {
            row: 5,
            column: "hp".to_string(),
            type_tag: "int".to_string(),
            raw: "abc".to_string(),
        });
        report.push(Diagnostic::MissingIdentifier { row: 6 });

        assert!(!report.is_clean());
        assert_eq!(report.count(DiagnosticKind::Coercion), 1);
        assert_eq!(report.count(DiagnosticKind::RowFault), 0);
        assert_eq!(report.for_row(5).count(), 1);
        assert_eq!(report.for_row(4).count(), 0);
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::Coercion {
            row: 5,
            column: "hp".to_string(),
            type_tag: "int".to_string(),
            raw: "abc".to_string(),
        };
        assert_eq!(diagnostic.to_string(), "row 5, column `hp`: cannot read `abc` as int");
        assert_eq!(diagnostic.row(), Some(5));
    }
}
