//! Field and row encoding for the delimited-text export format.

use super::parser::{DELIMITER, QUOTE};
use crate::common::write_bom;
use crate::sheet::{Schema, Value};
use std::borrow::Cow;

/// Encodes one cell for a row.
///
/// Line breaks become spaces, quotes are doubled, and the result is wrapped in
/// quotes when it holds a space, a delimiter or a quote. Cells that need none
/// of this are borrowed unchanged.
pub fn encode_field(value: &str) -> Cow<'_, str> {
    let needs_quote = value
        .bytes()
        .any(|b| b == b' ' || b == DELIMITER || b == QUOTE);
    let has_newline = value.bytes().any(|b| b == b'\n' || b == b'\r');
    if !needs_quote && !has_newline {
        return Cow::Borrowed(value);
    }

    let flattened = if has_newline {
        Cow::Owned(
            value
                .replace("\r\n", " ")
                .replace('\n', " ")
                .replace('\r', " "),
        )
    } else {
        Cow::Borrowed(value)
    };

    // Flattening may have introduced spaces
    if !needs_quote && !flattened.contains(' ') {
        return flattened;
    }

    let quote = char::from(QUOTE);
    let mut quoted = String::with_capacity(flattened.len() + 2);
    quoted.push(quote);
    for ch in flattened.chars() {
        if ch == quote {
            quoted.push(quote);
        }
        quoted.push(ch);
    }
    quoted.push(quote);
    Cow::Owned(quoted)
}

/// Encodes and joins a row of cells.
pub fn write_row<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::new();
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            line.push(char::from(DELIMITER));
        }
        line.push_str(&encode_field(field.as_ref()));
    }
    line
}

/// Builds a complete document: the three header rows followed by data rows.
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    out: String,
    rows: usize,
}

impl DocumentWriter {
    /// Starts a document with the header rows of `schema`.
    pub fn new(schema: &Schema) -> Self {
        Self::start(schema, false)
    }

    /// Starts a document prefixed with a UTF-8 BOM, as spreadsheet exporters write it.
    pub fn with_bom(schema: &Schema) -> Self {
        Self::start(schema, true)
    }

    fn start(schema: &Schema, bom: bool) -> Self {
        let mut out = String::new();
        if bom {
            write_bom(&mut out);
        }
        for line in schema.header_lines() {
            out.push_str(&line);
            out.push('\n');
        }
        DocumentWriter { out, rows: 0 }
    }

    /// Appends a data row of raw cell strings.
    pub fn push_row<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.out.push_str(&write_row(fields));
        self.out.push('\n');
        self.rows += 1;
        self
    }

    /// Appends a data row of typed values, identifier first.
    pub fn push_values(&mut self, id: &str, values: &[Value]) -> &mut Self {
        let cells = std::iter::once(id.to_owned()).chain(values.iter().map(Value::to_field_text));
        self.push_row(cells)
    }

    /// Number of data rows written so far.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Returns the document text.
    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::text::tokenize;

    #[test]
    fn test_plain_field_is_borrowed() {
        assert!(matches!(encode_field("1001"), Cow::Borrowed("1001")));
        assert_eq!(encode_field(""), "");
    }

    #[test]
    fn test_quoting_rules() {
        assert_eq!(encode_field("a b"), "\"a b\"");
        assert_eq!(encode_field("1,2,3"), "\"1,2,3\"");
        assert_eq!(encode_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(encode_field("line\r\nbreak"), "\"line break\"");
        assert_eq!(encode_field("a\nb\rc"), "\"a b c\"");
    }

    #[test]
    fn test_comma_and_quote_round_trip() {
        let original = "x, \"y\"";
        let line = write_row(["1001", original]);
        assert_eq!(tokenize(&line), vec!["1001", original]);
    }

    #[test]
    fn test_document_writer() {
        let schema = Schema::from_header_lines("名字,生命", "id,hp", "string,int").unwrap();
        let mut writer = DocumentWriter::new(&schema);
        writer.push_row(["1001", "100"]);
        writer.push_values("1002", &[Value::Int(50)]);
        assert_eq!(writer.row_count(), 2);
        assert_eq!(
            writer.finish(),
            "名字,生命\nid,hp\nstring,int\n1001,100\n1002,50\n"
        );
    }

    #[test]
    fn test_document_writer_bom() {
        let schema = Schema::from_header_lines("", "id", "string").unwrap();
        let text = DocumentWriter::with_bom(&schema).finish();
        assert!(text.starts_with('\u{FEFF}'));
    }
}
