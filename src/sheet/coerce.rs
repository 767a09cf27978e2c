//! Type coercion table: raw cell text to typed [`Value`]s.
//!
//! Coercion never fails. Unparsable input becomes the zero value of the target
//! type, and the number of substitutions is returned alongside the value so the
//! caller can report it.
//!
//! Vector components and array elements are separated by `,`. The full-width
//! comma `，` (U+FF0C) is always normalized to `,` before splitting, whichever
//! path the cell takes.

use super::types::{ScalarKind, TypeTag, Value, Vector2, Vector3};
use smallvec::SmallVec;
use std::borrow::Cow;

/// Full-width comma accepted as a component/element separator.
pub const FULLWIDTH_COMMA: char = '\u{FF0C}';

/// Separator between vector components and array elements.
pub const ELEMENT_SEPARATOR: char = ',';

/// A coerced value plus the number of parts that fell back to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub value: Value,
    pub failures: usize,
}

impl Coerced {
    #[inline]
    fn clean(value: Value) -> Self {
        Coerced { value, failures: 0 }
    }

    /// Whether every part of the cell parsed.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }
}

/// Coerces `raw` according to a header type tag string.
///
/// Unknown tags use the `string` rule.
pub fn coerce(raw: &str, type_tag: &str) -> Value {
    coerce_value(raw, TypeTag::parse_or_string(type_tag)).value
}

/// Coerces `raw` according to a parsed type tag.
pub fn coerce_value(raw: &str, tag: TypeTag) -> Coerced {
    let cell = clean_cell(raw);
    match tag {
        TypeTag::Scalar(kind) => coerce_scalar(cell, kind),
        TypeTag::Array(kind) => coerce_array(cell, kind),
    }
}

/// Trims whitespace and one pair of wrapping double quotes.
pub fn clean_cell(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed)
}

fn coerce_scalar(cell: &str, kind: ScalarKind) -> Coerced {
    if cell.is_empty() {
        return Coerced::clean(Value::zero(kind));
    }
    match kind {
        ScalarKind::Vector2 | ScalarKind::Vector3 => {
            let normalized = normalize_separators(cell);
            let components: SmallVec<[&str; 4]> = normalized.split(ELEMENT_SEPARATOR).collect();
            coerce_vector(&components, kind)
        },
        _ => match parse_scalar(cell, kind) {
            Some(value) => Coerced::clean(value),
            None => Coerced {
                value: Value::zero(kind),
                failures: 1,
            },
        },
    }
}

fn coerce_array(cell: &str, kind: ScalarKind) -> Coerced {
    if cell.is_empty() {
        return Coerced::clean(Value::Array(Vec::new()));
    }

    let normalized = normalize_separators(cell);
    let parts = normalized.split(ELEMENT_SEPARATOR);

    if let Some(arity) = kind.arity() {
        // Vector elements are flattened: every `arity` parts form one vector
        let components: Vec<&str> = parts.collect();
        let mut failures = 0;
        let items = components
            .chunks(arity)
            .map(|chunk| {
                let coerced = coerce_vector(chunk, kind);
                failures += coerced.failures;
                coerced.value
            })
            .collect();
        return Coerced {
            value: Value::Array(items),
            failures,
        };
    }

    let mut failures = 0;
    let items = parts
        .map(|part| {
            let part = part.trim();
            if kind == ScalarKind::String {
                return Value::String(part.to_owned());
            }
            parse_scalar(part, kind).unwrap_or_else(|| {
                failures += 1;
                Value::zero(kind)
            })
        })
        .collect();
    Coerced {
        value: Value::Array(items),
        failures,
    }
}

fn coerce_vector(components: &[&str], kind: ScalarKind) -> Coerced {
    let zero = Coerced {
        value: Value::zero(kind),
        failures: 1,
    };
    if Some(components.len()) != kind.arity() {
        return zero;
    }

    let mut parsed: SmallVec<[f32; 3]> = SmallVec::new();
    for component in components {
        match parse_f32(component.trim()) {
            Some(v) => parsed.push(v),
            None => return zero,
        }
    }

    let value = match parsed.as_slice() {
        [x, y] => Value::Vector2(Vector2::new(*x, *y)),
        [x, y, z] => Value::Vector3(Vector3::new(*x, *y, *z)),
        _ => return zero,
    };
    Coerced::clean(value)
}

/// Parses one trimmed, non-vector scalar. `None` means the text is unparsable.
fn parse_scalar(text: &str, kind: ScalarKind) -> Option<Value> {
    match kind {
        ScalarKind::Int => {
            let parsed = atoi_simd::parse::<i32, false, false>(strip_plus(text)?.as_bytes()).ok();
            parsed.map(Value::Int)
        },
        ScalarKind::Long => {
            let parsed = atoi_simd::parse::<i64, false, false>(strip_plus(text)?.as_bytes()).ok();
            parsed.map(Value::Long)
        },
        ScalarKind::Float => parse_f32(text).map(Value::Float),
        ScalarKind::Double => {
            let parsed: Option<f64> = fast_float2::parse(text).ok();
            parsed.map(Value::Double)
        },
        ScalarKind::Bool => parse_bool(text).map(Value::Bool),
        ScalarKind::String => Some(Value::String(text.to_owned())),
        ScalarKind::Vector2 | ScalarKind::Vector3 => None,
    }
}

/// Drops an explicit plus sign; a doubled sign is rejected.
fn strip_plus(text: &str) -> Option<&str> {
    match text.strip_prefix('+') {
        Some(rest) if rest.starts_with(['+', '-']) => None,
        Some(rest) => Some(rest),
        None => Some(text),
    }
}

#[inline]
fn parse_f32(text: &str) -> Option<f32> {
    fast_float2::parse(text).ok()
}

#[inline]
fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn normalize_separators(cell: &str) -> Cow<'_, str> {
    if cell.contains(FULLWIDTH_COMMA) {
        Cow::Owned(cell.replace(FULLWIDTH_COMMA, ","))
    } else {
        Cow::Borrowed(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Value {
        Value::Array(items.iter().map(|s| Value::String(s.to_string())).collect())
    }

    #[test]
    fn test_scalars() {
        assert_eq!(coerce("100", "int"), Value::Int(100));
        assert_eq!(coerce(" -42 ", "INT"), Value::Int(-42));
        assert_eq!(coerce("+7", "int"), Value::Int(7));
        assert_eq!(coerce("9000000000", "long"), Value::Long(9_000_000_000));
        assert_eq!(coerce("1.5", "float"), Value::Float(1.5));
        assert_eq!(coerce("-2.25e2", "double"), Value::Double(-225.0));
        assert_eq!(coerce("True", "bool"), Value::Bool(true));
        assert_eq!(coerce("FALSE", "bool"), Value::Bool(false));
        assert_eq!(coerce("  Knight  ", "string"), Value::String("Knight".into()));
    }

    #[test]
    fn test_wrapping_quotes_are_removed_once() {
        assert_eq!(coerce("\"12\"", "int"), Value::Int(12));
        assert_eq!(
            coerce("\"\"quoted\"\"", "string"),
            Value::String("\"quoted\"".into())
        );
        assert_eq!(coerce("\"open", "string"), Value::String("\"open".into()));
    }

    #[test]
    fn test_scalar_failures_default_to_zero() {
        let coerced = coerce_value("abc", TypeTag::Scalar(ScalarKind::Int));
        assert_eq!(coerced.value, Value::Int(0));
        assert_eq!(coerced.failures, 1);

        assert_eq!(coerce("2147483648", "int"), Value::Int(0));
        assert_eq!(coerce("+-1", "int"), Value::Int(0));
        assert_eq!(coerce("1.5", "int"), Value::Int(0));
        assert_eq!(coerce("1,5", "float"), Value::Float(0.0));
        assert_eq!(coerce("yes", "bool"), Value::Bool(false));
        assert_eq!(coerce("1", "bool"), Value::Bool(false));
    }

    #[test]
    fn test_integer_bounds_and_signs() {
        assert_eq!(coerce("2147483647", "int"), Value::Int(i32::MAX));
        assert_eq!(coerce("-2147483648", "int"), Value::Int(i32::MIN));
        assert_eq!(coerce("+9223372036854775807", "long"), Value::Long(i64::MAX));
        assert_eq!(coerce("-9223372036854775808", "long"), Value::Long(i64::MIN));

        for raw in ["+-1", "++1", "-+1", "1_0", "9223372036854775808"] {
            let coerced = coerce_value(raw, TypeTag::Scalar(ScalarKind::Long));
            assert_eq!(coerced.value, Value::Long(0), "{raw}");
            assert_eq!(coerced.failures, 1, "{raw}");
        }
    }

    #[test]
    fn test_empty_cells_are_clean_zeroes() {
        for tag in ["int", "long", "float", "double", "bool", "string", "vector2", "vector3"] {
            let tag = TypeTag::parse(tag).unwrap();
            let coerced = coerce_value("  ", tag);
            assert!(coerced.is_clean(), "{tag}");
            assert_eq!(coerced.value, Value::zero(tag.kind()));

            let array = TypeTag::Array(tag.kind());
            let coerced = coerce_value("", array);
            assert!(coerced.is_clean(), "{array}");
            assert_eq!(coerced.value, Value::Array(Vec::new()));
        }
    }

    #[test]
    fn test_vectors() {
        assert_eq!(
            coerce("1,2,3", "vector3"),
            Value::Vector3(Vector3::new(1.0, 2.0, 3.0))
        );
        assert_eq!(
            coerce(" 0.5 , -1 ", "vector2"),
            Value::Vector2(Vector2::new(0.5, -1.0))
        );
        assert_eq!(
            coerce("1，2，3", "vector3"),
            Value::Vector3(Vector3::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn test_vector_failures_give_zero_vector() {
        let coerced = coerce_value("1,2", TypeTag::Scalar(ScalarKind::Vector3));
        assert_eq!(coerced.value, Value::Vector3(Vector3::ZERO));
        assert_eq!(coerced.failures, 1);

        assert_eq!(coerce("1,2,3", "vector2"), Value::Vector2(Vector2::ZERO));
        assert_eq!(coerce("1,x,3", "vector3"), Value::Vector3(Vector3::ZERO));
    }

    #[test]
    fn test_arrays() {
        assert_eq!(coerce("a,b,c", "string[]"), strings(&["a", "b", "c"]));
        assert_eq!(coerce("\"a, b ,c\"", "string[]"), strings(&["a", "b", "c"]));
        assert_eq!(
            coerce("1，2,3", "int[]"),
            Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        assert_eq!(
            coerce("1.5,2", "float[]"),
            Value::Array(vec![Value::Float(1.5), Value::Float(2.0)])
        );
        assert_eq!(coerce("solo", "string[]"), strings(&["solo"]));
        assert_eq!(coerce("a,,b", "string[]"), strings(&["a", "", "b"]));
    }

    #[test]
    fn test_array_element_failures() {
        let coerced = coerce_value("1,x,3,", TypeTag::Array(ScalarKind::Int));
        assert_eq!(
            coerced.value,
            Value::Array(vec![Value::Int(1), Value::Int(0), Value::Int(3), Value::Int(0)])
        );
        assert_eq!(coerced.failures, 2);
    }

    #[test]
    fn test_vector_arrays() {
        assert_eq!(
            coerce("1,2,3,4", "vector2[]"),
            Value::Array(vec![
                Value::Vector2(Vector2::new(1.0, 2.0)),
                Value::Vector2(Vector2::new(3.0, 4.0)),
            ])
        );

        let coerced = coerce_value("1,2,3,4", TypeTag::Array(ScalarKind::Vector3));
        assert_eq!(
            coerced.value,
            Value::Array(vec![
                Value::Vector3(Vector3::new(1.0, 2.0, 3.0)),
                Value::Vector3(Vector3::ZERO),
            ])
        );
        assert_eq!(coerced.failures, 1);
    }

    #[test]
    fn test_unknown_tag_uses_string_rule() {
        assert_eq!(coerce(" #ff0000 ", "color"), Value::String("#ff0000".into()));
        assert_eq!(coerce("1,2", "map[]"), Value::String("1,2".into()));
    }

    #[test]
    fn test_deterministic() {
        let tag = TypeTag::Array(ScalarKind::Double);
        assert_eq!(coerce_value("1.1,x,3", tag), coerce_value("1.1,x,3", tag));
    }
}
