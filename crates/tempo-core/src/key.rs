//! Dimension tuple keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered tuple of dimension values identifying one aggregation group.
///
/// The tuple order matches the order in which dimensions were requested and
/// affects only presentation; all three period aggregations of an analysis use
/// the same order, so tuple equality is key equality. `Ord` gives the lexical
/// ordering used to break ties when sorting growth rows.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DimensionKey(Vec<String>);

impl DimensionKey {
    /// Create a key from dimension values in request order.
    pub const fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    /// The dimension values in request order.
    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// Number of dimension values in the tuple.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tuple is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for DimensionKey {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[&str; N]> for DimensionKey {
    fn from(values: [&str; N]) -> Self {
        Self(values.iter().map(|v| (*v).to_string()).collect())
    }
}

impl fmt::Display for DimensionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" / "))
    }
}
