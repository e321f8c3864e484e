//! Similarity configuration
//!
//! Declares how case-level similarity is assembled: whether attributes are
//! weighted, the per-attribute weight table, and what to do with numeric
//! attributes whose normalization constant is degenerate.

use casebase_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight of every attribute the table does not mention
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Per-attribute weights, keyed by attribute name
///
/// Weights need not sum to 1.0; the aggregator divides by their total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable {
    weights: BTreeMap<String, f64>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(attribute.into(), weight);
        self
    }

    pub fn insert(&mut self, attribute: impl Into<String>, weight: f64) -> Option<f64> {
        self.weights.insert(attribute.into(), weight)
    }

    pub fn get(&self, attribute: &str) -> Option<f64> {
        self.weights.get(attribute).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Check that every weight is finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for (name, &weight) in &self.weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::configuration(
                    name.clone(),
                    format!("weight must be a non-negative number, got {}", weight),
                ));
            }
        }
        Ok(())
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for WeightTable {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().map(|(k, w)| (k.into(), w)).collect(),
        }
    }
}

/// Handling of numeric attributes whose maximum observed value is not positive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegenerateNumericPolicy {
    /// Compare the attribute by equality instead
    #[default]
    Equality,
    /// Fail aggregator construction
    Reject,
}

impl std::str::FromStr for DegenerateNumericPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "equality" => Ok(DegenerateNumericPolicy::Equality),
            "reject" => Ok(DegenerateNumericPolicy::Reject),
            other => Err(format!("unknown degenerate numeric policy '{}'", other)),
        }
    }
}

/// Configuration of a case-level similarity aggregator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Apply `weights`; when false every attribute weighs 1.0
    #[serde(default)]
    pub use_weights: bool,

    #[serde(default)]
    pub weights: WeightTable,

    #[serde(default)]
    pub degenerate_numeric: DegenerateNumericPolicy,
}

impl SimilarityConfig {
    /// Uniform weights, plain mean
    pub fn unweighted() -> Self {
        Self::default()
    }

    pub fn weighted(weights: WeightTable) -> Self {
        Self {
            use_weights: true,
            weights,
            degenerate_numeric: DegenerateNumericPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_degenerate_numeric(mut self, policy: DegenerateNumericPolicy) -> Self {
        self.degenerate_numeric = policy;
        self
    }

    /// Weight applied to `attribute` under this configuration
    pub fn weight_of(&self, attribute: &str) -> f64 {
        if self.use_weights {
            self.weights.get(attribute).unwrap_or(DEFAULT_WEIGHT)
        } else {
            DEFAULT_WEIGHT
        }
    }
}
