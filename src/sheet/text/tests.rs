//! Property tests for the tokenizer and field encoder

use super::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn encoded_field_tokenizes_back(value in "[^\r\n]*") {
        let encoded = encode_field(&value);
        prop_assert_eq!(tokenize(&encoded), vec![value]);
    }

    #[test]
    fn encoded_row_tokenizes_back(row in prop::collection::vec("[^\r\n]*", 1..8)) {
        let line = write_row(&row);
        prop_assert_eq!(tokenize(&line), row);
    }

    #[test]
    fn tokenize_is_total(line in ".*") {
        let fields = tokenize(&line);
        prop_assert!(!fields.is_empty());
    }

    #[test]
    fn unquoted_fields_split_on_every_delimiter(row in prop::collection::vec("[a-z0-9.]*", 1..8)) {
        let line = row.join(",");
        prop_assert_eq!(tokenize(&line), row);
    }
}
