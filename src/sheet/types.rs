//! Value types produced by the coercion table.

use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type named by a type tag, without the array suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Int,
    Long,
    Float,
    Double,
    Bool,
    String,
    Vector2,
    Vector3,
}

static SCALAR_KINDS: Map<&'static str, ScalarKind> = phf_map! {
    "int" => ScalarKind::Int,
    "long" => ScalarKind::Long,
    "float" => ScalarKind::Float,
    "double" => ScalarKind::Double,
    "bool" => ScalarKind::Bool,
    "string" => ScalarKind::String,
    "vector2" => ScalarKind::Vector2,
    "vector3" => ScalarKind::Vector3,
};

impl ScalarKind {
    /// Looks up a lowercase, trimmed element tag.
    #[inline]
    pub fn lookup(tag: &str) -> Option<Self> {
        SCALAR_KINDS.get(tag).copied()
    }

    /// Canonical tag spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Long => "long",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
            ScalarKind::Vector2 => "vector2",
            ScalarKind::Vector3 => "vector3",
        }
    }

    /// Number of float components for vector kinds.
    #[inline]
    pub const fn arity(&self) -> Option<usize> {
        match self {
            ScalarKind::Vector2 => Some(2),
            ScalarKind::Vector3 => Some(3),
            _ => None,
        }
    }
}

/// Parsed column type tag.
///
/// Tags are resolved once per schema so that per-cell coercion dispatches on an
/// enum instead of comparing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Scalar(ScalarKind),
    Array(ScalarKind),
}

impl TypeTag {
    /// Parses a raw tag such as `"Int"`, `" float[] "` or `"vector3"`.
    ///
    /// Matching ignores ASCII case and surrounding whitespace. Returns `None`
    /// for tags outside the known set.
    pub fn parse(raw: &str) -> Option<Self> {
        let tag = raw.trim().to_ascii_lowercase();
        match tag.strip_suffix("[]") {
            Some(element) => ScalarKind::lookup(element.trim()).map(TypeTag::Array),
            None => ScalarKind::lookup(&tag).map(TypeTag::Scalar),
        }
    }

    /// Parses a raw tag, falling back to `string` for unknown tags.
    #[inline]
    pub fn parse_or_string(raw: &str) -> Self {
        Self::parse(raw).unwrap_or(TypeTag::Scalar(ScalarKind::String))
    }

    /// The element kind, ignoring any array suffix.
    #[inline]
    pub const fn kind(&self) -> ScalarKind {
        match self {
            TypeTag::Scalar(kind) | TypeTag::Array(kind) => *kind,
        }
    }

    #[inline]
    pub const fn is_array(&self) -> bool {
        matches!(self, TypeTag::Array(_))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Scalar(kind) => f.write_str(kind.as_str()),
            TypeTag::Array(kind) => write!(f, "{}[]", kind.as_str()),
        }
    }
}

/// Two-component float vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Three-component float vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// A decoded cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 32-bit signed integer (`int`)
    Int(i32),
    /// 64-bit signed integer (`long`)
    Long(i64),
    /// 32-bit float (`float`)
    Float(f32),
    /// 64-bit float (`double`)
    Double(f64),
    /// Boolean (`bool`)
    Bool(bool),
    /// Text (`string` and unknown tags)
    String(String),
    /// `vector2`
    Vector2(Vector2),
    /// `vector3`
    Vector3(Vector3),
    /// Any `T[]` tag; elements all share `T`'s variant
    Array(Vec<Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::String(String::new())
    }
}

impl Value {
    /// The zero value of `kind`: 0, 0.0, false, empty string, or the zero vector.
    pub fn zero(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Int => Value::Int(0),
            ScalarKind::Long => Value::Long(0),
            ScalarKind::Float => Value::Float(0.0),
            ScalarKind::Double => Value::Double(0.0),
            ScalarKind::Bool => Value::Bool(false),
            ScalarKind::String => Value::String(String::new()),
            ScalarKind::Vector2 => Value::Vector2(Vector2::ZERO),
            ScalarKind::Vector3 => Value::Vector3(Vector3::ZERO),
        }
    }

    /// Short name of the variant, used in mismatch reports.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Vector2(_) => "vector2",
            Value::Vector3(_) => "vector3",
            Value::Array(_) => "array",
        }
    }

    /// Renders the value in the cell sub-format the coercion table reads back.
    ///
    /// Vectors and arrays are comma-joined; the result still needs
    /// [`encode_field`](crate::sheet::text::encode_field) before it goes into a row.
    pub fn to_field_text(&self) -> String {
        let mut out = String::new();
        self.write_field_text(&mut out);
        out
    }

    fn write_field_text(&self, out: &mut String) {
        match self {
            Value::Int(v) => out.push_str(itoa::Buffer::new().format(*v)),
            Value::Long(v) => out.push_str(itoa::Buffer::new().format(*v)),
            Value::Float(v) => out.push_str(ryu::Buffer::new().format(*v)),
            Value::Double(v) => out.push_str(ryu::Buffer::new().format(*v)),
            Value::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            Value::String(s) => out.push_str(s),
            Value::Vector2(v) => write_components(out, &[v.x, v.y]),
            Value::Vector3(v) => write_components(out, &[v.x, v.y, v.z]),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_field_text(out);
                }
            },
        }
    }
}

fn write_components(out: &mut String, components: &[f32]) {
    let mut buffer = ryu::Buffer::new();
    for (i, component) in components.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(buffer.format(*component));
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_field_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_parse() {
        assert_eq!(TypeTag::parse("int"), Some(TypeTag::Scalar(ScalarKind::Int)));
        assert_eq!(TypeTag::parse(" Float "), Some(TypeTag::Scalar(ScalarKind::Float)));
        assert_eq!(TypeTag::parse("STRING[]"), Some(TypeTag::Array(ScalarKind::String)));
        assert_eq!(TypeTag::parse("int []"), Some(TypeTag::Array(ScalarKind::Int)));
        assert_eq!(TypeTag::parse("Vector3"), Some(TypeTag::Scalar(ScalarKind::Vector3)));
        assert_eq!(TypeTag::parse("decimal"), None);
        assert_eq!(TypeTag::parse("[]"), None);
        assert_eq!(
            TypeTag::parse_or_string("color"),
            TypeTag::Scalar(ScalarKind::String)
        );
    }

    #[test]
    fn test_type_tag_display() {
        assert_eq!(TypeTag::Array(ScalarKind::Long).to_string(), "long[]");
        assert_eq!(TypeTag::Scalar(ScalarKind::Bool).to_string(), "bool");
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(Value::zero(ScalarKind::Int), Value::Int(0));
        assert_eq!(Value::zero(ScalarKind::String), Value::String(String::new()));
        assert_eq!(Value::zero(ScalarKind::Vector3), Value::Vector3(Vector3::ZERO));
    }

    #[test]
    fn test_field_text() {
        assert_eq!(Value::Int(-7).to_field_text(), "-7");
        assert_eq!(Value::Float(1.5).to_field_text(), "1.5");
        assert_eq!(Value::Bool(true).to_field_text(), "true");
        assert_eq!(Value::Vector2(Vector2::new(1.0, -2.5)).to_field_text(), "1.0,-2.5");
        assert_eq!(
            Value::Array(vec![Value::Long(1), Value::Long(2)]).to_field_text(),
            "1,2"
        );
        assert_eq!(Value::Array(Vec::new()).to_field_text(), "");
    }
}
