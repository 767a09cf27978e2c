//! Binding between schema columns and typed record members.
//!
//! Every record type publishes a static table of [`FieldBinding`]s, one per
//! member that can be filled from a column. The decoder matches column names
//! against this table once per document and then calls the setters directly.
//! [`impl_record!`](crate::impl_record) writes the table for plain structs.

use super::types::{Value, Vector2, Vector3};
use crate::common::ValueMismatch;

/// Conversion from a decoded [`Value`] into a record member type.
pub trait FromValue: Sized {
    /// Name of the value kind this type accepts, for mismatch reports.
    const EXPECTED: &'static str;

    fn from_value(value: Value) -> Result<Self, ValueMismatch>;
}

#[inline]
fn mismatch<T: FromValue>(found: &Value) -> ValueMismatch {
    ValueMismatch {
        expected: T::EXPECTED,
        found: found.kind_name(),
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident, $name:literal;)+) => {
        $(
            impl FromValue for $ty {
                const EXPECTED: &'static str = $name;

                #[inline]
                fn from_value(value: Value) -> Result<Self, ValueMismatch> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(mismatch::<Self>(&other)),
                    }
                }
            }
        )+
    };
}

impl_from_value! {
    i32 => Int, "int";
    i64 => Long, "long";
    f32 => Float, "float";
    f64 => Double, "double";
    bool => Bool, "bool";
    String => String, "string";
    Vector2 => Vector2, "vector2";
    Vector3 => Vector3, "vector3";
}

impl<T: FromValue> FromValue for Vec<T> {
    const EXPECTED: &'static str = "array";

    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Array(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    #[inline]
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        Ok(value)
    }
}

/// Setter routing one decoded value into a record member.
pub type FieldSetter<R> = fn(&mut R, Value) -> Result<(), ValueMismatch>;

/// One entry of a record type's member table.
pub struct FieldBinding<R: 'static> {
    name: &'static str,
    set: FieldSetter<R>,
}

impl<R: 'static> FieldBinding<R> {
    pub const fn new(name: &'static str, set: FieldSetter<R>) -> Self {
        FieldBinding { name, set }
    }

    /// Column name this member is filled from.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn apply(&self, record: &mut R, value: Value) -> Result<(), ValueMismatch> {
        (self.set)(record, value)
    }
}

impl<R: 'static> std::fmt::Debug for FieldBinding<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinding").field("name", &self.name).finish()
    }
}

/// A record type that can be decoded from a document.
///
/// The identifier member is handled separately from the binding table: column 0
/// always feeds [`set_id`](Record::set_id).
pub trait Record: Default + Send + Sync + 'static {
    /// Name the type is registered under, usually the struct name.
    const TYPE_NAME: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Member table, excluding the identifier.
    fn bindings() -> &'static [FieldBinding<Self>];

    /// Finds the binding for a column name.
    fn binding(name: &str) -> Option<&'static FieldBinding<Self>> {
        Self::bindings().iter().find(|binding| binding.name == name)
    }
}

/// Implements [`Record`](crate::sheet::Record) for a struct with an `id: String`
/// member.
///
/// List the members that are filled from columns; each member name is also its
/// column name. The type name defaults to the struct name.
///
/// ```rust
/// use sheetconf::impl_record;
///
/// #[derive(Debug, Default)]
/// pub struct RoleConfig {
///     pub id: String,
///     pub name: String,
///     pub hp: i32,
///     pub team: Vec<String>,
/// }
///
/// impl_record!(RoleConfig { name, hp, team });
/// ```
#[macro_export]
macro_rules! impl_record {
    (@impl $ty:ident, $type_name:expr, { $($field:ident),* }) => {
        impl $crate::sheet::Record for $ty {
            const TYPE_NAME: &'static str = $type_name;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn bindings() -> &'static [$crate::sheet::FieldBinding<Self>] {
                const BINDINGS: &[$crate::sheet::FieldBinding<$ty>] = &[
                    $(
                        $crate::sheet::FieldBinding::new(
                            stringify!($field),
                            |record: &mut $ty,
                             value: $crate::sheet::Value|
                             -> ::core::result::Result<(), $crate::ValueMismatch> {
                                record.$field = $crate::sheet::FromValue::from_value(value)?;
                                Ok(())
                            },
                        ),
                    )*
                ];
                BINDINGS
            }
        }
    };
    ($ty:ident { $($field:ident),* $(,)? }) => {
        $crate::impl_record!(@impl $ty, stringify!($ty), { $($field),* });
    };
    ($ty:ident as $type_name:literal { $($field:ident),* $(,)? }) => {
        $crate::impl_record!(@impl $ty, $type_name, { $($field),* });
    };
}
