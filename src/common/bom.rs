//! Byte Order Mark (BOM) utilities.
//!
//! Spreadsheet exporters commonly prefix UTF-8 text with a BOM, which would
//! otherwise end up in the first comment cell.

/// UTF-8 BOM bytes.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// The BOM as it appears in decoded text.
pub const BOM_CHAR: char = '\u{FEFF}';

/// Strips a leading UTF-8 BOM from `text`.
///
/// Returns the remaining text and whether a BOM was removed.
#[inline]
pub fn strip_bom(text: &str) -> (&str, bool) {
    match text.strip_prefix(BOM_CHAR) {
        Some(rest) => (rest, true),
        None => (text, false),
    }
}

/// Writes the UTF-8 BOM to the start of `out`.
#[inline]
pub fn write_bom(out: &mut String) {
    out.push(BOM_CHAR);
}
