//! Column-to-field mapping for tabular text records.
//!
//! This crate turns rows of string cells into strongly-typed records using
//! per-field bindings declared on the record type.
//!
//! # Features
//!
//! - **Header Index**: column name to position lookup built from a header row
//! - **Field Bindings**: each field names its source column and, optionally,
//!   a transform that owns the write
//! - **Coercion**: integers of every width, floats, strings and `Option` of
//!   each, with width checks and empty-cell handling for optionals
//! - **Transforms**: named record methods validated by shape before any row
//!   is decoded
//!
//! # Example
//!
//! ```
//! use rowbind_map::{FieldBinding, MappingEngine, Method, MethodTable, Record};
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//!     age: i32,
//!     id: u32,
//! }
//!
//! impl Person {
//!     fn parse_id(&mut self, raw: &str) -> anyhow::Result<()> {
//!         let id: u32 = raw.parse()?;
//!         anyhow::ensure!((10000..=99999).contains(&id), "ID is not valid");
//!         self.id = id;
//!         Ok(())
//!     }
//! }
//!
//! impl Record for Person {
//!     fn bindings() -> Vec<FieldBinding<Self>> {
//!         vec![
//!             FieldBinding::coerce("name", "name", |p: &mut Self| &mut p.name),
//!             FieldBinding::coerce("age", "age", |p: &mut Self| &mut p.age),
//!             FieldBinding::transform("id", "passport", "ParseID"),
//!         ]
//!     }
//!
//!     fn methods() -> MethodTable<Self> {
//!         MethodTable::new().with(Method::transform("ParseID", Self::parse_id))
//!     }
//! }
//!
//! let engine = MappingEngine::<Person>::from_headers(&["name", "age", "city", "passport"])?;
//! let person = engine.decode_new(&["Vitaly", "25", "Bonn", "10000"])?;
//! assert_eq!(person.id, 10000);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod binding;
mod dispatch;
mod engine;
mod error;
mod header;
mod method;
mod value;

// === Error Types ===
pub use error::{CoerceError, ConfigError, DecodeError, FieldError, Result};

// === Header Index ===
pub use header::HeaderIndex;

// === Declarations ===
pub use binding::{FieldBinding, Record};
pub use method::{Method, MethodTable, Signature, TransformFn, TypeTag, Visibility};

// === Coercion ===
pub use value::{Coerce, PrimitiveKind, Scalar, Value, ValueKind, coerce};

// === Dispatch and Decoding ===
pub use dispatch::{dispatch, dispatch_in};
pub use engine::MappingEngine;
