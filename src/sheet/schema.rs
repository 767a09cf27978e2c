//! Three-row document header: comments, field names and type tags.

use super::text::{tokenize, write_row};
use super::types::{ScalarKind, TypeTag};
use crate::common::{ID_FIELD, SchemaError};

/// One column of the document header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    raw_type_tag: String,
    type_tag: Option<TypeTag>,
    comment: String,
}

impl Column {
    /// Field name, trimmed.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type tag as written in the header, trimmed.
    #[inline]
    pub fn raw_type_tag(&self) -> &str {
        &self.raw_type_tag
    }

    /// Effective type tag; unknown or missing tags read as `string`.
    #[inline]
    pub fn type_tag(&self) -> TypeTag {
        self.type_tag.unwrap_or(TypeTag::Scalar(ScalarKind::String))
    }

    /// Whether the header tag was one of the known tags.
    #[inline]
    pub fn has_known_type_tag(&self) -> bool {
        self.type_tag.is_some()
    }

    /// Human-readable comment, empty when the comment row omits it.
    #[inline]
    pub fn comment(&self) -> &str {
        &self.comment
    }
}

/// Ordered column list of a document.
///
/// The schema is positional: column `i` describes cell `i` of every data row.
/// Column 0 is always the identifier column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Builds a schema from the three header lines.
    ///
    /// The column count comes from the field-name row. Shorter comment or
    /// type-tag rows are tolerated; missing comments are empty and missing tags
    /// read as `string`.
    pub fn from_header_lines(
        comments: &str,
        names: &str,
        type_tags: &str,
    ) -> Result<Self, SchemaError> {
        let names = tokenize(names);
        let mut comments = tokenize(comments).into_iter();
        let mut type_tags = tokenize(type_tags).into_iter();

        let first = names.first().map(|name| name.trim()).unwrap_or_default();
        if first != ID_FIELD {
            return Err(SchemaError::MissingIdentifier {
                found: first.to_owned(),
            });
        }

        let columns = names
            .iter()
            .map(|name| {
                let comment = comments.next().unwrap_or_default();
                let raw_type_tag = type_tags.next().unwrap_or_default().trim().to_owned();
                Column {
                    name: name.trim().to_owned(),
                    type_tag: TypeTag::parse(&raw_type_tag),
                    raw_type_tag,
                    comment: comment.trim().to_owned(),
                }
            })
            .collect();

        Ok(Schema { columns })
    }

    /// All columns in header order.
    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column at `index`.
    #[inline]
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Position of the column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Re-encodes the comment, field-name and type-tag rows.
    pub fn header_lines(&self) -> [String; 3] {
        [
            write_row(self.columns.iter().map(|c| c.comment.as_str())),
            write_row(self.columns.iter().map(|c| c.name.as_str())),
            write_row(self.columns.iter().map(|c| c.raw_type_tag.as_str())),
        ]
    }
}

/// Splits a document into lines, dropping the carriage return of CRLF endings.
pub(crate) fn document_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Parses the header of a whole document.
///
/// Needs all three header rows; data rows are not inspected.
pub fn parse_schema(text: &str) -> Result<Schema, SchemaError> {
    let lines = document_lines(text);
    match lines.as_slice() {
        [comments, names, type_tags, ..] => Schema::from_header_lines(comments, names, type_tags),
        _ => Err(SchemaError::TooFewLines { found: lines.len() }),
    }
}
