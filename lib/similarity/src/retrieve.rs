//! Retriever
//!
//! Scores a query against every case of a collection, ranks by descending
//! similarity and keeps the top `limit` matches with their per-attribute
//! breakdown.

use crate::aggregate::CaseSimilarity;
use casebase_core::{AttributeValue, Case, CaseId, CaseView, Error, Result};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One retrieved case
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub id: &'a CaseId,
    pub case: &'a Case,
    /// Case-level similarity to the query
    pub score: f64,
    /// Unweighted local similarity per attribute
    pub breakdown: BTreeMap<String, f64>,
}

impl<'a> Match<'a> {
    pub fn label(&self, label: &str) -> Option<&'a AttributeValue> {
        self.case.get(label)
    }
}

/// Ranked matches for one query, best first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Retrieval<'a> {
    matches: Vec<Match<'a>>,
    candidates: usize,
}

impl<'a> Retrieval<'a> {
    pub fn matches(&self) -> &[Match<'a>] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<Match<'a>> {
        self.matches
    }

    pub fn best(&self) -> Option<&Match<'a>> {
        self.matches.first()
    }

    /// An empty retrieval means no similar case was found
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Number of cases the query was scored against
    pub fn candidates(&self) -> usize {
        self.candidates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match<'a>> {
        self.matches.iter()
    }
}

/// Top-k retriever over a shared aggregator
#[derive(Debug, Clone, Copy)]
pub struct Retriever<'s> {
    similarity: &'s CaseSimilarity,
    limit: usize,
}

impl<'s> Retriever<'s> {
    /// `limit = 1` returns the single best match, `limit = k` a k-NN neighborhood
    pub fn new(similarity: &'s CaseSimilarity, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(Error::invalid_argument("limit", "must be at least 1"));
        }
        Ok(Self { similarity, limit })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn similarity(&self) -> &'s CaseSimilarity {
        self.similarity
    }

    /// Retrieve the cases of `cases` most similar to `query`
    ///
    /// Ties are broken by the collection's iteration order, earlier cases
    /// first. An empty collection yields an empty retrieval.
    pub fn retrieve<'c>(&self, cases: CaseView<'c>, query: &Case) -> Result<Retrieval<'c>> {
        if cases.is_empty() {
            return Ok(Retrieval::default());
        }

        let entries: Vec<(&'c CaseId, &'c Case)> = cases.iter().collect();
        let mut ranked = Vec::with_capacity(entries.len());
        for (position, (_, case)) in entries.iter().enumerate() {
            ranked.push((position, self.similarity.similarity(query, case)?));
        }

        if self.limit < ranked.len() {
            ranked.select_nth_unstable_by(self.limit - 1, by_rank);
            ranked.truncate(self.limit);
        }
        ranked.sort_unstable_by(by_rank);

        let mut matches = Vec::with_capacity(ranked.len());
        for (position, score) in ranked {
            let (id, case) = entries[position];
            let scored = self.similarity.score(query, case)?;
            matches.push(Match {
                id,
                case,
                score,
                breakdown: scored.breakdown,
            });
        }

        Ok(Retrieval {
            matches,
            candidates: entries.len(),
        })
    }
}

// Descending score, then ascending position.
fn by_rank(a: &(usize, f64), b: &(usize, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}
