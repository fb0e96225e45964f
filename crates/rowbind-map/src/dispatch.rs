//! One-shot transform dispatch.
//!
//! The mapping engine resolves transforms once at construction and calls
//! the resolved bodies per row. These helpers do lookup, shape validation
//! and invocation in a single step for callers that work field by field.

use crate::binding::Record;
use crate::error::FieldError;
use crate::method::MethodTable;

/// Invokes the transform `name` declared by `T` on `record` with `raw`.
///
/// The transform alone mutates the record; nothing is written on its
/// behalf. Its error, if any, comes back as [`FieldError::Transform`]
/// without modification.
pub fn dispatch<T: Record>(record: &mut T, name: &str, raw: &str) -> Result<(), FieldError> {
    dispatch_in(&T::methods(), record, name, raw)
}

/// Like [`dispatch`], against an explicit method table.
pub fn dispatch_in<T>(
    methods: &MethodTable<T>,
    record: &mut T,
    name: &str,
    raw: &str,
) -> Result<(), FieldError> {
    let transform = methods.resolve(name)?;
    transform(record, raw).map_err(FieldError::Transform)
}
