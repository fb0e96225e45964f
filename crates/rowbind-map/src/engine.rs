//! Mapping engine: resolves a record type's bindings against a header once,
//! then decodes rows into records.

use std::fmt;

use crate::binding::{AssignFn, BindingTarget, FieldBinding, Record};
use crate::error::{ConfigError, DecodeError, FieldError};
use crate::header::HeaderIndex;
use crate::method::TransformFn;
use crate::value::ValueKind;

enum Action<T> {
    Coerce { kind: ValueKind, assign: AssignFn<T> },
    Transform { name: &'static str, body: TransformFn<T> },
}

/// A binding whose column was found in the header.
struct ResolvedBinding<T> {
    field: &'static str,
    column: &'static str,
    position: usize,
    action: Action<T>,
}

/// Decodes rows into `T` using bindings resolved against one header.
///
/// Construction performs all lookups and validation: column positions,
/// unsupported field kinds and transform shapes. Bindings whose column is
/// absent from the header are skipped and never reported as errors.
pub struct MappingEngine<T> {
    headers: HeaderIndex,
    resolved: Vec<ResolvedBinding<T>>,
    unbound: Vec<&'static str>,
}

impl<T: Record> MappingEngine<T> {
    /// Resolves `T`'s bindings against `headers`.
    pub fn new(headers: HeaderIndex) -> Result<Self, ConfigError> {
        let methods = T::methods();
        let mut resolved = Vec::new();
        let mut unbound = Vec::new();

        for binding in T::bindings() {
            let FieldBinding {
                field,
                column,
                target,
            } = binding;

            let Some(position) = headers.position(column) else {
                tracing::trace!(field, column, "Column not in header, binding skipped");
                unbound.push(field);
                continue;
            };

            let action = match target {
                BindingTarget::Coerce { kind, assign } => {
                    if let ValueKind::Unsupported(type_name) = kind {
                        return Err(ConfigError::UnsupportedType { field, type_name });
                    }
                    Action::Coerce { kind, assign }
                }
                BindingTarget::Transform { name } => Action::Transform {
                    name,
                    body: methods.resolve(name)?,
                },
            };

            resolved.push(ResolvedBinding {
                field,
                column,
                position,
                action,
            });
        }

        tracing::debug!(
            record = std::any::type_name::<T>(),
            bound = resolved.len(),
            skipped = unbound.len(),
            "Built mapping engine"
        );

        Ok(Self {
            headers,
            resolved,
            unbound,
        })
    }

    /// Builds the header index and the engine in one step.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self, ConfigError> {
        Self::new(HeaderIndex::build(headers)?)
    }

    /// Decodes one row into `record`.
    ///
    /// Fields are written in declaration order. On the first failure the
    /// error is returned and fields already written keep their new values.
    /// Cells beyond the row's end leave their fields untouched.
    pub fn decode<S: AsRef<str>>(&self, row: &[S], record: &mut T) -> Result<(), DecodeError> {
        for binding in &self.resolved {
            let Some(raw) = row.get(binding.position) else {
                tracing::trace!(
                    field = binding.field,
                    column = binding.column,
                    position = binding.position,
                    width = row.len(),
                    "Row too short, field left untouched"
                );
                continue;
            };
            let raw = raw.as_ref();

            let outcome = match &binding.action {
                Action::Coerce { assign, .. } => assign(record, raw).map_err(FieldError::from),
                Action::Transform { body, .. } => body(record, raw).map_err(FieldError::Transform),
            };

            outcome.map_err(|source| DecodeError::Field {
                field: binding.field,
                column: binding.column.to_string(),
                value: raw.to_string(),
                source,
            })?;
        }
        Ok(())
    }

    /// Decodes one row into a freshly defaulted record.
    pub fn decode_new<S: AsRef<str>>(&self, row: &[S]) -> Result<T, DecodeError> {
        let mut record = T::default();
        self.decode(row, &mut record)?;
        Ok(record)
    }
}

impl<T> MappingEngine<T> {
    #[must_use]
    pub fn headers(&self) -> &HeaderIndex {
        &self.headers
    }

    /// Fields that will be populated, in declaration order.
    pub fn bound_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resolved.iter().map(|binding| binding.field)
    }

    /// Fields whose column is missing from the header.
    #[must_use]
    pub fn unbound_fields(&self) -> &[&'static str] {
        &self.unbound
    }
}

impl<T> fmt::Debug for MappingEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound: Vec<String> = self
            .resolved
            .iter()
            .map(|binding| {
                let how = match &binding.action {
                    Action::Coerce { kind, .. } => kind.to_string(),
                    Action::Transform { name, .. } => format!("transform {name}"),
                };
                format!(
                    "{} <- {}[{}] ({how})",
                    binding.field, binding.column, binding.position
                )
            })
            .collect();
        f.debug_struct("MappingEngine")
            .field("headers", &self.headers)
            .field("bound", &bound)
            .field("unbound", &self.unbound)
            .finish()
    }
}
