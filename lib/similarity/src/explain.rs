//! Explainability for retrieval results
//!
//! Output structures showing how each case score was assembled from its
//! per-attribute similarities and weights.

use crate::aggregate::CaseSimilarity;
use crate::retrieve::{Match, Retrieval};
use casebase_core::{Case, CaseId};
use serde::Serialize;
use std::collections::BTreeMap;

/// How one attribute contributed to a case score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeContribution {
    /// Local similarity in [0.0, 1.0]
    pub similarity: f64,
    pub weight: f64,
    /// Share of the case score: `weight * similarity / total_weight`
    pub contribution: f64,
}

/// A retrieved case with its score breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub id: CaseId,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<Case>,
    pub attributes: BTreeMap<String, AttributeContribution>,
}

impl Explanation {
    pub fn from_match(m: &Match<'_>, similarity: &CaseSimilarity, include_case: bool) -> Self {
        let total = similarity.total_weight();
        let attributes = m
            .breakdown
            .iter()
            .map(|(name, &sim)| {
                let weight = similarity.attribute(name).map_or(0.0, |a| a.weight);
                let contribution = AttributeContribution {
                    similarity: sim,
                    weight,
                    contribution: weight * sim / total,
                };
                (name.clone(), contribution)
            })
            .collect();

        Self {
            id: m.id.clone(),
            score: m.score,
            case: include_case.then(|| m.case.clone()),
            attributes,
        }
    }

    pub fn from_retrieval(retrieval: &Retrieval<'_>, similarity: &CaseSimilarity, include_case: bool) -> Vec<Self> {
        retrieval
            .iter()
            .map(|m| Self::from_match(m, similarity, include_case))
            .collect()
    }

    /// Attribute with the largest contribution; ties go to the first by name
    pub fn top_attribute(&self) -> Option<&str> {
        let mut top: Option<(&str, f64)> = None;
        for (name, c) in &self.attributes {
            if top.map_or(true, |(_, best)| c.contribution > best) {
                top = Some((name, c.contribution));
            }
        }
        top.map(|(name, _)| name)
    }
}

/// Summary statistics for one retrieval
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalStats {
    /// Number of cases scored
    pub candidates_count: usize,
    /// Number of matches returned
    pub results_count: usize,
    pub mean_score: f64,
    pub best_score: f64,
    /// Attribute that contributed most to the best match
    pub top_contributing_attribute: Option<String>,
}

impl RetrievalStats {
    pub fn compute(retrieval: &Retrieval<'_>, similarity: &CaseSimilarity) -> Self {
        let Some(best) = retrieval.best() else {
            return Self {
                candidates_count: retrieval.candidates(),
                results_count: 0,
                mean_score: 0.0,
                best_score: 0.0,
                top_contributing_attribute: None,
            };
        };

        let mean_score = retrieval.iter().map(|m| m.score).sum::<f64>() / retrieval.len() as f64;
        let top_contributing_attribute = Explanation::from_match(best, similarity, false)
            .top_attribute()
            .map(str::to_string);

        Self {
            candidates_count: retrieval.candidates(),
            results_count: retrieval.len(),
            mean_score,
            best_score: best.score,
            top_contributing_attribute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieve::Retriever;
    use crate::schema::{SimilarityConfig, WeightTable};
    use casebase_core::CaseBase;

    fn cases() -> CaseBase {
        CaseBase::from_cases(
            "income",
            vec![
                (
                    "1",
                    Case::new().with("age", 40).with("education", "Masters").with("sex", "Male").with("income", ">50K"),
                ),
                (
                    "2",
                    Case::new().with("age", 80).with("education", "HS-grad").with("sex", "Male").with("income", "<=50K"),
                ),
            ],
        )
        .unwrap()
    }

    fn similarity(casebase: &CaseBase) -> CaseSimilarity {
        let weights = WeightTable::new().with("education", 2.0).with("sex", 0.5);
        CaseSimilarity::from_casebase(casebase, &SimilarityConfig::weighted(weights)).unwrap()
    }

    #[test]
    fn test_contributions_sum_to_score() {
        let casebase = cases();
        let sim = similarity(&casebase);
        let query = Case::new().with("age", 60).with("education", "Masters").with("sex", "Female");
        let retrieval = Retriever::new(&sim, 2).unwrap().retrieve(casebase.view(), &query).unwrap();

        for explained in Explanation::from_retrieval(&retrieval, &sim, false) {
            let sum: f64 = explained.attributes.values().map(|c| c.contribution).sum();
            assert!((sum - explained.score).abs() < 1e-12);
            assert!(explained.case.is_none());
        }
    }

    #[test]
    fn test_explanation_serialization() {
        let casebase = cases();
        let sim = similarity(&casebase);
        let query = Case::new().with("age", 40).with("education", "Masters").with("sex", "Male");
        let retrieval = Retriever::new(&sim, 1).unwrap().retrieve(casebase.view(), &query).unwrap();

        let explained = Explanation::from_match(retrieval.best().unwrap(), &sim, true);
        assert_eq!(explained.top_attribute(), Some("education"));

        let json = serde_json::to_value(&explained).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["score"], 1.0);
        assert_eq!(json["case"]["income"], ">50K");
        assert_eq!(json["attributes"]["education"]["weight"], 2.0);
    }

    #[test]
    fn test_retrieval_stats() {
        let casebase = cases();
        let sim = similarity(&casebase);
        let query = Case::new().with("age", 40).with("education", "HS-grad").with("sex", "Male");
        let retrieval = Retriever::new(&sim, 2).unwrap().retrieve(casebase.view(), &query).unwrap();

        let stats = RetrievalStats::compute(&retrieval, &sim);
        assert_eq!(stats.candidates_count, 2);
        assert_eq!(stats.results_count, 2);
        assert_eq!(stats.best_score, retrieval.best().unwrap().score);
        assert_eq!(stats.top_contributing_attribute, Some("education".to_string()));
        let mean = (retrieval.matches()[0].score + retrieval.matches()[1].score) / 2.0;
        assert!((stats.mean_score - mean).abs() < 1e-12);
    }

    #[test]
    fn test_empty_stats() {
        let casebase = cases();
        let sim = similarity(&casebase);
        let empty = CaseBase::new("income");
        let query = Case::new().with("age", 40).with("education", "HS-grad").with("sex", "Male");
        let retrieval = Retriever::new(&sim, 2).unwrap().retrieve(empty.view(), &query).unwrap();

        let stats = RetrievalStats::compute(&retrieval, &sim);
        assert_eq!(stats.results_count, 0);
        assert_eq!(stats.best_score, 0.0);
        assert!(stats.top_contributing_attribute.is_none());
    }
}
