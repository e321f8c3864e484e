//! Single-query classification
//!
//! Synchronous retrieve-and-reuse: rank the collection against a query and
//! transfer the label of the retrieved neighborhood.

use crate::vote::majority_vote;
use casebase_core::{AttributeValue, Case, CaseId, CaseView, Error, Result};
use casebase_similarity::{CaseSimilarity, Retrieval, Retriever};
use serde::Serialize;
use std::collections::BTreeMap;

/// Result of classifying one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// Best-matching case
    pub case_id: CaseId,
    /// Predicted label: the majority label of the retrieved neighbors
    pub prediction: AttributeValue,
    /// Case-level similarity of the best match
    pub score: f64,
    /// Per-attribute similarity of the best match
    pub breakdown: BTreeMap<String, f64>,
    /// Number of neighbors that voted
    pub neighbors: usize,
}

/// Predict a label from a retrieval by majority vote
///
/// Returns `Ok(None)` for an empty retrieval.
pub fn predict(retrieval: &Retrieval<'_>, label: &str) -> Result<Option<AttributeValue>> {
    let mut labels = Vec::with_capacity(retrieval.len());
    for m in retrieval.iter() {
        let value = m.label(label).ok_or_else(|| Error::MissingLabel {
            case: m.id.to_string(),
            label: label.to_string(),
        })?;
        labels.push(value);
    }
    Ok(majority_vote(labels).cloned())
}

/// Classifies queries against a collection
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'s> {
    retriever: Retriever<'s>,
}

impl<'s> Classifier<'s> {
    /// `limit` neighbors vote on each prediction; 1 copies the best match's label
    pub fn new(similarity: &'s CaseSimilarity, limit: usize) -> Result<Self> {
        Ok(Self {
            retriever: Retriever::new(similarity, limit)?,
        })
    }

    pub fn retriever(&self) -> &Retriever<'s> {
        &self.retriever
    }

    /// Classify `query`; `Ok(None)` means no similar case was found
    pub fn classify(&self, cases: CaseView<'_>, query: &Case) -> Result<Option<Classification>> {
        let retrieval = self.retriever.retrieve(cases, query)?;
        let Some(prediction) = predict(&retrieval, cases.label())? else {
            return Ok(None);
        };
        let Some(best) = retrieval.best() else {
            return Ok(None);
        };

        Ok(Some(Classification {
            case_id: best.id.clone(),
            prediction,
            score: best.score,
            breakdown: best.breakdown.clone(),
            neighbors: retrieval.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebase_core::CaseBase;
    use casebase_similarity::SimilarityConfig;

    fn cases() -> CaseBase {
        CaseBase::from_cases(
            "income",
            vec![
                ("a", Case::new().with("age", 25).with("education", "HS-grad").with("income", "<=50K")),
                ("b", Case::new().with("age", 45).with("education", "Masters").with("income", ">50K")),
                ("c", Case::new().with("age", 50).with("education", "Masters").with("income", "<=50K")),
                ("d", Case::new().with("age", 47).with("education", "Masters").with("income", "<=50K")),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_best_match_label() {
        let casebase = cases();
        let sim = CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::unweighted()).unwrap();
        let classifier = Classifier::new(&sim, 1).unwrap();

        let query = Case::new().with("age", 45).with("education", "Masters");
        let result = classifier.classify(casebase.view(), &query).unwrap().unwrap();

        assert_eq!(result.case_id, CaseId::from("b"));
        assert_eq!(result.prediction, AttributeValue::from(">50K"));
        assert_eq!(result.score, 1.0);
        assert_eq!(result.breakdown["education"], 1.0);
        assert_eq!(result.neighbors, 1);
    }

    #[test]
    fn test_neighborhood_vote() {
        let casebase = cases();
        let sim = CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::unweighted()).unwrap();
        let classifier = Classifier::new(&sim, 3).unwrap();

        let query = Case::new().with("age", 45).with("education", "Masters");
        let result = classifier.classify(casebase.view(), &query).unwrap().unwrap();

        // b is still the best match, but d and c outvote it
        assert_eq!(result.case_id, CaseId::from("b"));
        assert_eq!(result.prediction, AttributeValue::from("<=50K"));
        assert_eq!(result.neighbors, 3);
    }

    #[test]
    fn test_no_match() {
        let casebase = cases();
        let sim = CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::unweighted()).unwrap();
        let empty = CaseBase::new("income");

        let query = Case::new().with("age", 45).with("education", "Masters");
        let result = Classifier::new(&sim, 1).unwrap().classify(empty.view(), &query).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_limit() {
        let casebase = cases();
        let sim = CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::unweighted()).unwrap();
        assert!(Classifier::new(&sim, 0).is_err());
    }
}
