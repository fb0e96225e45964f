//! Static field bindings declared by record types.

use std::fmt;

use crate::error::CoerceError;
use crate::method::MethodTable;
use crate::value::{Coerce, Value, ValueKind, coerce};

pub(crate) type AssignFn<T> = Box<dyn Fn(&mut T, &str) -> Result<(), CoerceError> + Send + Sync>;

/// A record type that rows can be decoded into.
///
/// Implementors declare, once per type, which column feeds which field and
/// which named transforms they expose.
///
/// ```
/// use rowbind_map::{FieldBinding, Record};
///
/// #[derive(Debug, Default)]
/// struct Person {
///     name: String,
///     age: u8,
///     city: Option<String>,
/// }
///
/// impl Record for Person {
///     fn bindings() -> Vec<FieldBinding<Self>> {
///         vec![
///             FieldBinding::coerce("name", "name", |p: &mut Self| &mut p.name),
///             FieldBinding::coerce("age", "age", |p: &mut Self| &mut p.age),
///             FieldBinding::coerce("city", "city", |p: &mut Self| &mut p.city),
///         ]
///     }
/// }
/// ```
pub trait Record: Default + Sized + 'static {
    /// Field bindings in declaration order.
    fn bindings() -> Vec<FieldBinding<Self>>;

    /// Methods callable by transform-bound fields.
    fn methods() -> MethodTable<Self> {
        MethodTable::new()
    }
}

/// How a bound field receives its value.
pub(crate) enum BindingTarget<T> {
    Coerce { kind: ValueKind, assign: AssignFn<T> },
    Transform { name: &'static str },
}

/// Association of one record field with a source column.
pub struct FieldBinding<T> {
    pub(crate) field: &'static str,
    pub(crate) column: &'static str,
    pub(crate) target: BindingTarget<T>,
}

impl<T: 'static> FieldBinding<T> {
    /// Binds a field whose type knows how to parse itself.
    pub fn coerce<V>(
        field: &'static str,
        column: &'static str,
        accessor: fn(&mut T) -> &mut V,
    ) -> Self
    where
        V: Coerce + 'static,
    {
        Self {
            field,
            column,
            target: BindingTarget::Coerce {
                kind: V::KIND,
                assign: Box::new(move |record: &mut T, raw: &str| {
                    V::assign(accessor(record), raw)
                }),
            },
        }
    }

    /// Binds a field that a named transform populates.
    ///
    /// The field's own type plays no part; the transform owns the write.
    pub fn transform(field: &'static str, column: &'static str, name: &'static str) -> Self {
        Self {
            field,
            column,
            target: BindingTarget::Transform { name },
        }
    }

    /// Binds a field whose kind is only known at runtime.
    ///
    /// The raw cell is coerced to `kind` and handed to `setter`. An absent
    /// optional value never reaches the setter.
    pub fn dynamic(
        field: &'static str,
        column: &'static str,
        kind: ValueKind,
        setter: fn(&mut T, Value),
    ) -> Self {
        Self {
            field,
            column,
            target: BindingTarget::Coerce {
                kind,
                assign: Box::new(
                    move |record: &mut T, raw: &str| -> Result<(), CoerceError> {
                        let value = coerce(raw, kind)?;
                        if !value.is_absent() {
                            setter(record, value);
                        }
                        Ok(())
                    },
                ),
            },
        }
    }
}

impl<T> FieldBinding<T> {
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    /// Name of the bound transform, if any.
    pub fn transform_name(&self) -> Option<&'static str> {
        match &self.target {
            BindingTarget::Transform { name } => Some(*name),
            BindingTarget::Coerce { .. } => None,
        }
    }

    /// Static kind of a coerced binding.
    pub fn kind(&self) -> Option<ValueKind> {
        match &self.target {
            BindingTarget::Coerce { kind, .. } => Some(*kind),
            BindingTarget::Transform { .. } => None,
        }
    }
}

impl<T> fmt::Debug for FieldBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("field", &self.field)
            .field("column", &self.column)
            .field("kind", &self.kind())
            .field("transform", &self.transform_name())
            .finish()
    }
}
