//! Error types for mapping and coercion.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::value::PrimitiveKind;

/// Construction-time errors. These are fatal to the engine being built and
/// never produced while decoding rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The header row had no columns.
    #[error("no headers")]
    NoHeaders,

    /// A coerced binding targets a kind the coercer cannot produce.
    #[error("unsupported field type {type_name} for field '{field}'")]
    UnsupportedType {
        field: &'static str,
        type_name: &'static str,
    },

    /// No public, invocable method with this name exists on the record type.
    #[error("cannot find \"{name}\" method")]
    TransformNotFound { name: String },

    /// The method does not take exactly one argument.
    #[error("method \"{name}\" should accept only one argument, found {arity}")]
    WrongArity { name: String, arity: usize },

    /// The method's single argument is not a string.
    #[error("method \"{name}\" should accept only string type argument, found {found}")]
    WrongArgType { name: String, found: String },

    /// The method does not return exactly one value.
    #[error("method \"{name}\" should return only one value, found {count}")]
    WrongReturnCount { name: String, count: usize },

    /// The method's single result is not error-capable.
    #[error("method \"{name}\" should return only error type, found {found}")]
    WrongReturnType { name: String, found: String },
}

impl ConfigError {
    /// True for errors describing a transform with the wrong shape.
    pub fn is_transform_shape(&self) -> bool {
        matches!(
            self,
            Self::WrongArity { .. }
                | Self::WrongArgType { .. }
                | Self::WrongReturnCount { .. }
                | Self::WrongReturnType { .. }
        )
    }
}

/// Failure to convert one raw value into a primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("invalid {kind} value: {source}")]
    Int {
        kind: PrimitiveKind,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid {kind} value: {source}")]
    Float {
        kind: PrimitiveKind,
        #[source]
        source: ParseFloatError,
    },

    /// A finite literal too large for the target float type.
    #[error("invalid {kind} value: value out of range")]
    FloatRange { kind: PrimitiveKind },

    #[error("unsupported field type: {type_name}")]
    Unsupported { type_name: &'static str },
}

/// Why a single field could not be populated.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error(transparent)]
    Coerce(#[from] CoerceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The error returned by a user transform, untouched.
    #[error(transparent)]
    Transform(anyhow::Error),
}

/// A per-row decode failure, carrying the offending value and column.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot parse \"{value}\" in \"{column}\" column: {source}")]
    Field {
        field: &'static str,
        column: String,
        value: String,
        #[source]
        source: FieldError,
    },
}

impl DecodeError {
    /// Name of the record field that failed.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Field { field, .. } => field,
        }
    }

    /// Source column of the failing value.
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::Field { column, .. } => column,
        }
    }

    /// Raw cell text that failed to decode.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Field { value, .. } => value,
        }
    }

    /// The underlying field failure.
    #[must_use]
    pub fn kind(&self) -> &FieldError {
        match self {
            Self::Field { source, .. } => source,
        }
    }

    /// The transform's own error, when the failure came from a transform.
    #[must_use]
    pub fn transform_error(&self) -> Option<&anyhow::Error> {
        match self.kind() {
            FieldError::Transform(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, DecodeError>;
