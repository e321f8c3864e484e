//! Parallel leave-one-out evaluation
//!
//! Each sampled case is held out in turn, classified against the rest of the
//! collection and compared with its true label. Hold-outs are independent and
//! run on a dedicated rayon pool; every iteration borrows the shared
//! collection read-only through a [`CaseView`](casebase_core::CaseView).

use crate::classify::predict;
use casebase_core::{AttributeValue, CaseBase, CaseId, Error, Result};
use casebase_similarity::{CaseSimilarity, Retriever};
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

/// Default number of completed hold-outs between progress reports
pub const DEFAULT_PROGRESS_EVERY: usize = 20;

/// Running progress of an evaluation, in completion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub correct: usize,
    pub total: usize,
}

impl Progress {
    /// Accuracy over the hold-outs completed so far
    pub fn accuracy(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.correct as f64 / self.completed as f64
        }
    }
}

/// Outcome of one hold-out iteration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldOut {
    pub id: CaseId,
    pub expected: AttributeValue,
    /// `None` when the reduced collection produced no neighbors
    pub predicted: Option<AttributeValue>,
    /// Cases scored against the held-out query
    pub candidates: usize,
}

impl HoldOut {
    pub fn is_correct(&self) -> bool {
        self.predicted.as_ref() == Some(&self.expected)
    }
}

/// Final result of a leave-one-out run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Fraction of held-out cases classified correctly
    pub accuracy: f64,
    pub correct: usize,
    pub tested: usize,
    pub k: usize,
    pub collection_size: usize,
    pub threads: usize,
    pub elapsed_ms: u128,
    /// Per-case outcomes in sample order
    #[serde(skip)]
    pub outcomes: Vec<HoldOut>,
}

/// Leave-one-out evaluator
///
/// The first `sample_size` cases of the collection, in insertion order, are
/// held out one at a time and predicted by a k-NN majority vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOneOut {
    sample_size: usize,
    k: usize,
    threads: Option<usize>,
    progress_every: usize,
}

impl LeaveOneOut {
    pub fn new(sample_size: usize, k: usize) -> Result<Self> {
        if sample_size == 0 {
            return Err(Error::invalid_argument("sample_size", "must be at least 1"));
        }
        if k == 0 {
            return Err(Error::invalid_argument("k", "must be at least 1"));
        }
        Ok(Self {
            sample_size,
            k,
            threads: None,
            progress_every: DEFAULT_PROGRESS_EVERY,
        })
    }

    /// Fix the worker pool size; the default is the host's available parallelism
    pub fn with_threads(mut self, threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(Error::invalid_argument("threads", "must be at least 1"));
        }
        self.threads = Some(threads);
        Ok(self)
    }

    pub fn with_progress_every(mut self, every: usize) -> Result<Self> {
        if every == 0 {
            return Err(Error::invalid_argument("progress_every", "must be at least 1"));
        }
        self.progress_every = every;
        Ok(self)
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    pub fn evaluate(&self, casebase: &CaseBase, similarity: &CaseSimilarity) -> Result<EvaluationReport> {
        self.evaluate_with_progress(casebase, similarity, |_| {})
    }

    /// Run the evaluation, calling `on_progress` every `progress_every`
    /// completed hold-outs
    ///
    /// Any failing hold-out aborts the whole run; no partial accuracy is
    /// reported.
    pub fn evaluate_with_progress<F>(
        &self,
        casebase: &CaseBase,
        similarity: &CaseSimilarity,
        on_progress: F,
    ) -> Result<EvaluationReport>
    where
        F: Fn(Progress) + Sync,
    {
        if self.sample_size > casebase.len() {
            return Err(Error::invalid_argument(
                "sample_size",
                format!("{} exceeds collection size {}", self.sample_size, casebase.len()),
            ));
        }
        if similarity.label() != casebase.label() {
            return Err(Error::configuration(
                similarity.label(),
                format!("aggregator label differs from collection label '{}'", casebase.label()),
            ));
        }

        let retriever = Retriever::new(similarity, self.k)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads.unwrap_or(0))
            .thread_name(|i| format!("loo-worker-{}", i))
            .build()
            .map_err(|e| Error::WorkerPool(e.to_string()))?;

        let ids = &casebase.ids()[..self.sample_size];
        let total = ids.len();
        let running = Mutex::new(Progress {
            completed: 0,
            correct: 0,
            total,
        });

        info!(
            "Leave-one-out: {} of {} cases, k={}, {} threads",
            total,
            casebase.len(),
            self.k,
            pool.current_num_threads()
        );
        let start = Instant::now();

        let outcomes = pool.install(|| -> Result<Vec<HoldOut>> {
            ids.par_iter()
                .map(|id| {
                    let outcome = hold_out(casebase, &retriever, id)?;

                    let snapshot = {
                        let mut progress = running.lock();
                        progress.completed += 1;
                        progress.correct += usize::from(outcome.is_correct());
                        *progress
                    };
                    if snapshot.completed % self.progress_every == 0 {
                        info!(
                            "{} of {} cases processed, running accuracy {:.4}",
                            snapshot.completed,
                            snapshot.total,
                            snapshot.accuracy()
                        );
                        on_progress(snapshot);
                    }

                    Ok(outcome)
                })
                .collect()
        })?;

        let correct = outcomes.iter().filter(|o| o.is_correct()).count();
        let report = EvaluationReport {
            accuracy: correct as f64 / total as f64,
            correct,
            tested: total,
            k: self.k,
            collection_size: casebase.len(),
            threads: pool.current_num_threads(),
            elapsed_ms: start.elapsed().as_millis(),
            outcomes,
        };

        info!(
            "Leave-one-out finished: accuracy {:.4} ({}/{}) in {}ms",
            report.accuracy, report.correct, report.tested, report.elapsed_ms
        );
        Ok(report)
    }
}

/// Hold out `id`, classify it against the rest of the collection and
/// compare with its true label
pub fn hold_out(casebase: &CaseBase, retriever: &Retriever<'_>, id: &CaseId) -> Result<HoldOut> {
    let label = casebase.label();
    let case = casebase
        .get(id)
        .ok_or_else(|| Error::CaseNotFound(id.to_string()))?;
    let (query, expected) = case.split_label(label).ok_or_else(|| Error::MissingLabel {
        case: id.to_string(),
        label: label.to_string(),
    })?;

    let reduced = casebase.without(id)?;
    let retrieval = retriever.retrieve(reduced, &query)?;
    let predicted = predict(&retrieval, label)?;

    debug!(
        "Held out {}: expected {}, predicted {}",
        id,
        expected,
        predicted.as_ref().map_or_else(|| "nothing".to_string(), |p| p.to_string())
    );

    Ok(HoldOut {
        id: id.clone(),
        expected,
        predicted,
        candidates: retrieval.candidates(),
    })
}
