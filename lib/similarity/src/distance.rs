//! Local similarity functions
//!
//! Scores two values of the same attribute. All functions return a
//! similarity in range [0.0, 1.0] where 1.0 means identical.

use casebase_core::{AttributeValue, Error, Result};
use serde::Serialize;

/// Linear numeric similarity: `1 - |a - b| / max`, clamped to [0.0, 1.0]
///
/// `max` is the attribute's normalization constant and must be positive.
#[inline]
pub fn linear_similarity(a: f64, b: f64, max: f64) -> f64 {
    (1.0 - (a - b).abs() / max).clamp(0.0, 1.0)
}

/// Equality similarity: 1.0 if both values are equal, 0.0 otherwise
///
/// Matching is exact and case-sensitive. There is no partial credit for
/// near matches: "Masters" and "Doctorate" are as dissimilar as "Masters"
/// and "Preschool".
#[inline]
pub fn equality_similarity(a: &AttributeValue, b: &AttributeValue) -> f64 {
    if a == b { 1.0 } else { 0.0 }
}

/// The local similarity function bound to one attribute
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LocalSimilarity {
    /// Numeric distance normalized by the attribute's maximum value
    Linear { max: f64 },
    /// Exact match
    Equality,
}

impl LocalSimilarity {
    /// Linear similarity for `attribute`, normalized by `max`
    pub fn linear(attribute: &str, max: f64) -> Result<Self> {
        if !max.is_finite() || max <= 0.0 {
            return Err(Error::configuration(
                attribute,
                format!("normalization constant must be positive, got {}", max),
            ));
        }
        Ok(LocalSimilarity::Linear { max })
    }

    /// Compare two values
    ///
    /// Returns `None` when a linear function is given a non-numeric value.
    #[inline]
    pub fn compare(&self, a: &AttributeValue, b: &AttributeValue) -> Option<f64> {
        match self {
            LocalSimilarity::Linear { max } => {
                Some(linear_similarity(a.as_number()?, b.as_number()?, *max))
            }
            LocalSimilarity::Equality => Some(equality_similarity(a, b)),
        }
    }
}
