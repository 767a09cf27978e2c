//! Line tokenizer for the delimited-text export format.

use memchr::memchr;

/// Field separator.
pub const DELIMITER: u8 = b',';
/// Quote character for quoted fields.
pub const QUOTE: u8 = b'"';

/// Splits one line into raw field strings.
///
/// A quote toggles a quoted region, inside which the delimiter is literal and a
/// doubled quote stands for one literal quote. The quotes themselves are not
/// part of the field. An unterminated quote runs to the end of the line.
///
/// Never fails, and always returns at least one field.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    tokenize_into(line, &mut fields);
    fields
}

/// Like [`tokenize`], but appends into an existing buffer.
pub fn tokenize_into(line: &str, fields: &mut Vec<String>) {
    let bytes = line.as_bytes();

    // Most cells are unquoted
    if memchr(QUOTE, bytes).is_none() {
        fields.extend(line.split(char::from(DELIMITER)).map(str::to_owned));
        return;
    }

    let mut current = String::new();
    let mut in_quotes = false;
    // Start of the pending run of ordinary characters. Both special bytes are
    // ASCII, so every run boundary is a char boundary.
    let mut run_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            QUOTE => {
                current.push_str(&line[run_start..pos]);
                if in_quotes && bytes.get(pos + 1) == Some(&QUOTE) {
                    // Escaped quote (doubled quote) - keep one, skip the other
                    current.push(char::from(QUOTE));
                    pos += 1;
                } else {
                    in_quotes = !in_quotes;
                }
                run_start = pos + 1;
            },
            DELIMITER if !in_quotes => {
                current.push_str(&line[run_start..pos]);
                fields.push(std::mem::take(&mut current));
                run_start = pos + 1;
            },
            _ => {},
        }
        pos += 1;
    }

    current.push_str(&line[run_start..]);
    fields.push(current);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_line() {
        assert_eq!(tokenize("1001,Alice,100"), vec!["1001", "Alice", "100"]);
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(tokenize(""), vec![""]);
        assert_eq!(tokenize(",,"), vec!["", "", ""]);
    }

    #[test]
    fn test_quoted_fields() {
        let row = tokenize("\"Hello, World\",\"Value with \"\"quotes\"\"\",Normal");
        assert_eq!(row, vec!["Hello, World", "Value with \"quotes\"", "Normal"]);
    }

    #[test]
    fn test_quoted_composite_value() {
        assert_eq!(tokenize("1001,\"1,2,3\",\"a,b\""), vec!["1001", "1,2,3", "a,b"]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(tokenize("a,\"b,c"), vec!["a", "b,c"]);
        assert_eq!(tokenize("\""), vec![""]);
    }

    #[test]
    fn test_quote_inside_unquoted_field() {
        // A quote anywhere toggles quoting
        assert_eq!(tokenize("ab\"c,d\"e,f"), vec!["abc,de", "f"]);
        assert_eq!(tokenize("\"\",x"), vec!["", "x"]);
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(tokenize("名字,\"队友，甲\",生命"), vec!["名字", "队友，甲", "生命"]);
    }

    #[test]
    fn test_tokenize_into_appends() {
        let mut fields = vec!["kept".to_string()];
        tokenize_into("a,b", &mut fields);
        assert_eq!(fields, vec!["kept", "a", "b"]);
    }
}
