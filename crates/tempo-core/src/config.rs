//! Analysis configuration.

use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregation;

/// One requested analysis: a named grouping of dimensions over a measure.
///
/// Configs are independent and order-insensitive; the engine evaluates each
/// one as a pure function of the aligned period subsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Name identifying the analysis in results, summaries, and error reports
    pub name: String,
    /// Dimension columns to group by, in presentation order
    pub dimensions: Vec<String>,
    /// Numeric column to reduce
    pub measure: String,
    /// Reduction applied within each dimension group
    pub aggregation: Aggregation,
}

impl AnalysisConfig {
    /// Create a config.
    pub fn new(
        name: impl Into<String>,
        dimensions: Vec<String>,
        measure: impl Into<String>,
        aggregation: Aggregation,
    ) -> Self {
        Self {
            name: name.into(),
            dimensions,
            measure: measure.into(),
            aggregation,
        }
    }

    /// The dimension list with duplicates removed, first occurrence wins.
    pub fn normalized_dimensions(&self) -> Vec<String> {
        let mut seen = Vec::with_capacity(self.dimensions.len());
        for dimension in &self.dimensions {
            if !seen.contains(dimension) {
                seen.push(dimension.clone());
            }
        }
        seen
    }
}
