//! Column name to position lookup built from a header row.

use std::collections::BTreeMap;

use crate::error::ConfigError;

/// Immutable mapping from header name to zero-based column position.
///
/// Duplicate names collapse to the position of their last occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderIndex {
    positions: BTreeMap<String, usize>,
    width: usize,
}

impl HeaderIndex {
    /// Builds the index from a header row.
    ///
    /// Fails with [`ConfigError::NoHeaders`] when the row is empty.
    pub fn build<S: AsRef<str>>(headers: &[S]) -> Result<Self, ConfigError> {
        if headers.is_empty() {
            return Err(ConfigError::NoHeaders);
        }

        let mut positions = BTreeMap::new();
        for (idx, header) in headers.iter().enumerate() {
            let header = header.as_ref();
            if let Some(previous) = positions.insert(header.to_string(), idx) {
                tracing::warn!(
                    column = header,
                    previous,
                    position = idx,
                    "Duplicate header name, later column wins"
                );
            }
        }

        tracing::debug!(
            columns = headers.len(),
            distinct = positions.len(),
            "Built header index"
        );

        Ok(Self {
            positions,
            width: headers.len(),
        })
    }

    /// Returns the position of a column, if present.
    #[must_use]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    /// Number of distinct column names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true when no columns are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of cells in the header row the index was built from.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Iterates `(name, position)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.positions.iter().map(|(name, idx)| (name.as_str(), *idx))
    }
}
