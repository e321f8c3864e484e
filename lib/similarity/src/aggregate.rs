//! Case-level similarity
//!
//! Combines per-attribute similarities into one score with a weighted
//! arithmetic mean: `Σ(w_i · s_i) / Σ(w_i)`.

use crate::distance::LocalSimilarity;
use crate::schema::{DegenerateNumericPolicy, SimilarityConfig};
use casebase_core::{AttributeValue, Case, CaseBase, Error, Result, ValueKind};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// One attribute's local similarity function and weight
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSimilarity {
    pub name: String,
    pub kind: ValueKind,
    pub local: LocalSimilarity,
    pub weight: f64,
}

impl AttributeSimilarity {
    pub fn linear(name: impl Into<String>, max: f64, weight: f64) -> Result<Self> {
        let name = name.into();
        let local = LocalSimilarity::linear(&name, max)?;
        Ok(Self {
            name,
            kind: ValueKind::Numeric,
            local,
            weight,
        })
    }

    pub fn equality(name: impl Into<String>, kind: ValueKind, weight: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            local: LocalSimilarity::Equality,
            weight,
        }
    }
}

/// A case score together with its per-attribute breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scored {
    pub score: f64,
    /// Unweighted local similarity per attribute
    pub breakdown: BTreeMap<String, f64>,
}

/// Weighted aggregator over a fixed attribute schema
///
/// Built once per collection and shared read-only by every query.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseSimilarity {
    label: String,
    attributes: Vec<AttributeSimilarity>,
    total_weight: f64,
}

impl CaseSimilarity {
    /// Create an aggregator from explicit attribute functions
    pub fn new(label: impl Into<String>, mut attributes: Vec<AttributeSimilarity>) -> Result<Self> {
        let label = label.into();
        attributes.sort_by(|a, b| a.name.cmp(&b.name));

        for pair in attributes.windows(2) {
            if pair[0].name == pair[1].name {
                return Err(Error::configuration(
                    pair[0].name.clone(),
                    "attribute configured more than once",
                ));
            }
        }
        for attr in &attributes {
            if attr.name == label {
                return Err(Error::configuration(
                    attr.name.clone(),
                    "the label attribute cannot take part in similarity",
                ));
            }
            if !attr.weight.is_finite() || attr.weight < 0.0 {
                return Err(Error::configuration(
                    attr.name.clone(),
                    format!("weight must be a non-negative number, got {}", attr.weight),
                ));
            }
        }

        if attributes.is_empty() {
            return Err(Error::invalid_argument("attributes", "no attributes besides the label to compare"));
        }

        let total_weight: f64 = attributes.iter().map(|a| a.weight).sum();
        if total_weight <= 0.0 {
            return Err(Error::configuration(label, "total attribute weight cannot be zero"));
        }

        Ok(Self {
            label,
            attributes,
            total_weight,
        })
    }

    /// Build an aggregator for `casebase` in one pass over its cases
    ///
    /// Each non-label attribute is classified by value type: numeric
    /// attributes get linear similarity normalized by their maximum observed
    /// value, categorical attributes get equality.
    pub fn from_casebase(casebase: &CaseBase, config: &SimilarityConfig) -> Result<Self> {
        if casebase.is_empty() {
            return Err(Error::EmptyCaseBase);
        }
        let label = casebase.label();
        if config.use_weights {
            config.weights.validate()?;
            for (name, _) in config.weights.iter() {
                if name == label {
                    return Err(Error::configuration(name, "the label attribute cannot be weighted"));
                }
                if !casebase.attributes().iter().any(|a| a == name) {
                    return Err(Error::configuration(name, "weight given for an unknown attribute"));
                }
            }
        }

        let mut observed: BTreeMap<&str, (ValueKind, f64)> = BTreeMap::new();
        for (id, case) in casebase.iter() {
            for name in casebase.attributes() {
                let value = case
                    .get(name)
                    .ok_or_else(|| Error::schema_mismatch(name.clone(), format!("missing from case {}", id)))?;
                let kind = value.kind();
                let number = value.as_number().unwrap_or(f64::NEG_INFINITY);

                match observed.get_mut(name.as_str()) {
                    None => {
                        observed.insert(name, (kind, number));
                    }
                    Some((seen, _)) if *seen != kind => {
                        return Err(Error::configuration(
                            name.clone(),
                            format!("mixed {} and {} values (case {})", seen, kind, id),
                        ));
                    }
                    Some((_, highest)) => *highest = highest.max(number),
                }
            }
        }

        let mut attributes = Vec::with_capacity(observed.len());
        for (name, (kind, max)) in observed {
            let weight = config.weight_of(name);
            let attr = match kind {
                ValueKind::Categorical => AttributeSimilarity::equality(name, kind, weight),
                ValueKind::Numeric if max.is_finite() && max > 0.0 => {
                    AttributeSimilarity::linear(name, max, weight)?
                }
                ValueKind::Numeric => match config.degenerate_numeric {
                    DegenerateNumericPolicy::Equality => {
                        warn!(attribute = name, max, "degenerate normalization constant, comparing by equality");
                        AttributeSimilarity::equality(name, kind, weight)
                    }
                    DegenerateNumericPolicy::Reject => AttributeSimilarity::linear(name, max, weight)?,
                },
            };
            debug!(attribute = name, kind = %attr.kind, local = ?attr.local, weight, "bound attribute similarity");
            attributes.push(attr);
        }

        Self::new(label, attributes)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Attribute functions, sorted by name
    pub fn attributes(&self) -> &[AttributeSimilarity] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSimilarity> {
        self.attributes
            .binary_search_by(|a| a.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.attributes[i])
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Weighted mean of per-attribute scores given in attribute order
    pub fn aggregate(&self, scores: &[f64]) -> f64 {
        let weighted: f64 = self
            .attributes
            .iter()
            .zip(scores)
            .map(|(attr, s)| attr.weight * s)
            .sum();
        weighted / self.total_weight
    }

    /// Case-level similarity of `case` to `query`
    pub fn similarity(&self, query: &Case, case: &Case) -> Result<f64> {
        let mut weighted = 0.0;
        for attr in &self.attributes {
            weighted += attr.weight * self.local_score(attr, query, case)?;
        }
        self.check_extra(query, "query")?;
        self.check_extra(case, "case")?;
        Ok(weighted / self.total_weight)
    }

    /// Case-level similarity plus the per-attribute breakdown
    pub fn score(&self, query: &Case, case: &Case) -> Result<Scored> {
        let mut scores = Vec::with_capacity(self.attributes.len());
        for attr in &self.attributes {
            scores.push(self.local_score(attr, query, case)?);
        }
        self.check_extra(query, "query")?;
        self.check_extra(case, "case")?;

        let score = self.aggregate(&scores);
        let breakdown = self
            .attributes
            .iter()
            .map(|a| a.name.clone())
            .zip(scores)
            .collect();
        Ok(Scored { score, breakdown })
    }

    /// Fail if `query` has an attribute the schema lacks or lacks one it has
    pub fn check_query(&self, query: &Case) -> Result<()> {
        for attr in &self.attributes {
            if !query.contains(&attr.name) {
                return Err(Error::schema_mismatch(attr.name.clone(), "missing from query"));
            }
        }
        self.check_extra(query, "query")
    }

    fn local_score(&self, attr: &AttributeSimilarity, query: &Case, case: &Case) -> Result<f64> {
        let q = query
            .get(&attr.name)
            .ok_or_else(|| Error::schema_mismatch(attr.name.clone(), "missing from query"))?;
        let c = case
            .get(&attr.name)
            .ok_or_else(|| Error::schema_mismatch(attr.name.clone(), "missing from case"))?;
        attr.local
            .compare(q, c)
            .ok_or_else(|| type_mismatch(attr, q, c))
    }

    // Called after every schema attribute was found, so any surplus
    // beyond the schema and the label is an unknown attribute.
    fn check_extra(&self, case: &Case, role: &str) -> Result<()> {
        let expected = self.attributes.len() + usize::from(case.contains(&self.label));
        if case.len() == expected {
            return Ok(());
        }
        let known: BTreeSet<&str> = self.attributes.iter().map(|a| a.name.as_str()).collect();
        let extra = case
            .names()
            .find(|n| *n != self.label && !known.contains(n))
            .unwrap_or_default();
        Err(Error::schema_mismatch(
            extra,
            format!("{} attribute is not part of the reference schema", role),
        ))
    }
}

fn type_mismatch(attr: &AttributeSimilarity, q: &AttributeValue, c: &AttributeValue) -> Error {
    let offending = if q.kind() != attr.kind { q } else { c };
    Error::schema_mismatch(
        attr.name.clone(),
        format!("expected a {} value, got {:?}", attr.kind, offending),
    )
}
