//! Named methods a record type exposes to transform-bound fields.
//!
//! A record publishes a [`MethodTable`]: each entry has a name, a
//! visibility and a [`Signature`] describing its parameters and results.
//! Only public entries shaped `(&str) -> error` and carrying a body can be
//! dispatched; every other shape is rejected with a specific
//! [`ConfigError`] before any row is touched.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;

/// A callable transform: receives the raw cell and mutates the record.
pub type TransformFn<T> = Arc<dyn Fn(&mut T, &str) -> anyhow::Result<()> + Send + Sync>;

/// Type of a method parameter or result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Str,
    Int,
    UInt,
    Float,
    Bool,
    /// A fallible result (`Result<(), E>`).
    Error,
    Named(&'static str),
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => f.write_str("&str"),
            Self::Int => f.write_str("int"),
            Self::UInt => f.write_str("uint"),
            Self::Float => f.write_str("float"),
            Self::Bool => f.write_str("bool"),
            Self::Error => f.write_str("error"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Parameter and result types of a method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    params: Vec<TypeTag>,
    returns: Vec<TypeTag>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// The only dispatchable shape: `(&str) -> error`.
    pub fn transform() -> Self {
        Self::new().param(TypeTag::Str).returns(TypeTag::Error)
    }

    pub fn param(mut self, tag: TypeTag) -> Self {
        self.params.push(tag);
        self
    }

    pub fn returns(mut self, tag: TypeTag) -> Self {
        self.returns.push(tag);
        self
    }

    pub fn params(&self) -> &[TypeTag] {
        &self.params
    }

    pub fn results(&self) -> &[TypeTag] {
        &self.returns
    }

    /// Checks that this signature can back a transform named `name`.
    ///
    /// Arity is checked first, then the argument type, then the results.
    pub fn check(&self, name: &str) -> Result<(), ConfigError> {
        let [param] = self.params.as_slice() else {
            return Err(ConfigError::WrongArity {
                name: name.to_string(),
                arity: self.params.len(),
            });
        };
        if *param != TypeTag::Str {
            return Err(ConfigError::WrongArgType {
                name: name.to_string(),
                found: param.to_string(),
            });
        }
        let [result] = self.returns.as_slice() else {
            return Err(ConfigError::WrongReturnCount {
                name: name.to_string(),
                count: self.returns.len(),
            });
        };
        if *result != TypeTag::Error {
            return Err(ConfigError::WrongReturnType {
                name: name.to_string(),
                found: result.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |tags: &[TypeTag]| {
            tags.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "({})", join(&self.params))?;
        match self.returns.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " -> {single}"),
            many => write!(f, " -> ({})", join(many)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// One entry of a [`MethodTable`].
pub struct Method<T> {
    name: &'static str,
    visibility: Visibility,
    signature: Signature,
    body: Option<TransformFn<T>>,
}

impl<T: 'static> Method<T> {
    /// A dispatchable transform.
    pub fn transform<E>(name: &'static str, f: fn(&mut T, &str) -> Result<(), E>) -> Self
    where
        E: Into<anyhow::Error> + 'static,
    {
        let body: TransformFn<T> =
            Arc::new(move |record: &mut T, raw: &str| -> anyhow::Result<()> {
                f(record, raw).map_err(Into::into)
            });
        Self {
            name,
            visibility: Visibility::Public,
            signature: Signature::transform(),
            body: Some(body),
        }
    }
}

impl<T> Method<T> {
    /// A method known only by its signature, with no callable body.
    pub fn declare(name: &'static str, signature: Signature) -> Self {
        Self {
            name,
            visibility: Visibility::Public,
            signature,
            body: None,
        }
    }

    /// Hides the method from dispatch.
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn is_callable(&self) -> bool {
        self.body.is_some()
    }
}

impl<T> fmt::Debug for Method<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("signature", &self.signature.to_string())
            .field("callable", &self.is_callable())
            .finish()
    }
}

/// Methods of a record type, keyed by name.
pub struct MethodTable<T> {
    methods: BTreeMap<&'static str, Method<T>>,
}

impl<T> MethodTable<T> {
    pub fn new() -> Self {
        Self {
            methods: BTreeMap::new(),
        }
    }

    /// Adds a method, replacing any previous entry with the same name.
    pub fn with(mut self, method: Method<T>) -> Self {
        self.insert(method);
        self
    }

    pub fn insert(&mut self, method: Method<T>) {
        self.methods.insert(method.name, method);
    }

    pub fn get(&self, name: &str) -> Option<&Method<T>> {
        self.methods.get(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Looks up and validates a transform, returning its callable body.
    pub fn resolve(&self, name: &str) -> Result<TransformFn<T>, ConfigError> {
        let not_found = || ConfigError::TransformNotFound {
            name: name.to_string(),
        };
        let method = self
            .get(name)
            .filter(|method| method.visibility == Visibility::Public)
            .ok_or_else(not_found)?;
        method.signature.check(name)?;
        method.body.clone().ok_or_else(not_found)
    }
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MethodTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.methods.values()).finish()
    }
}
