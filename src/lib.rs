//! # casebase
//!
//! A case-based reasoning classifier for tabular records.
//!
//! casebase predicts the label of a new record by retrieving the most similar
//! labeled records from a reference collection and reusing their labels.
//! Similarity is a weighted mean of per-attribute similarities: linear
//! distance for numeric attributes and exact equality for categorical ones.
//!
//! ## Quick Start
//!
//! ### From the Command Line
//!
//! ```bash
//! casebase classify --data ./datasets/adult.csv --use-weights
//! casebase evaluate --data ./datasets/adult.csv --k 10 --sample-size 500
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use casebase::prelude::*;
//!
//! let cases = casebase::dataset::load_path("./datasets/adult.csv", &DatasetOptions::default()).unwrap();
//! let config = SimilarityConfig::weighted(casebase::presets::income_weights());
//! let similarity = CaseSimilarity::from_casebase(&cases, &config).unwrap();
//!
//! // Classify one record
//! let query = casebase::presets::income_sample_query();
//! let classifier = Classifier::new(&similarity, 1).unwrap();
//! if let Some(result) = classifier.classify(cases.view(), &query).unwrap() {
//!     println!("{} ({:.2}%)", result.prediction, result.score * 100.0);
//! }
//!
//! // Estimate accuracy by leave-one-out
//! let report = LeaveOneOut::new(500, 10).unwrap().evaluate(&cases, &similarity).unwrap();
//! println!("accuracy: {:.2}%", report.accuracy * 100.0);
//! ```
//!
//! ## Crate Structure
//!
//! - [`casebase-core`](casebase_core) - Attribute values, cases, collections and reduced views
//! - [`casebase-similarity`](casebase_similarity) - Attribute and case similarity, top-k retrieval, explanations
//! - [`casebase-eval`](casebase_eval) - k-NN classification and parallel leave-one-out evaluation

pub mod dataset;
pub mod presets;

// Re-export core types
pub use casebase_core::{
    AttributeValue, Case, CaseBase, CaseId, CaseView, Error, Result, Table, ValueKind,
};

// Re-export similarity
pub use casebase_similarity::{
    AttributeSimilarity, CaseSimilarity, DegenerateNumericPolicy, Explanation, Match, Retrieval,
    RetrievalStats, Retriever, SimilarityConfig, WeightTable,
};

// Re-export evaluation
pub use casebase_eval::{Classification, Classifier, EvaluationReport, LeaveOneOut, Progress};

pub use dataset::{DatasetError, DatasetOptions};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AttributeValue, Case, CaseBase, CaseId, CaseView, Error, Result,
        AttributeSimilarity, CaseSimilarity, DegenerateNumericPolicy, Retriever,
        SimilarityConfig, WeightTable,
        Classifier, LeaveOneOut,
        DatasetOptions,
    };
}
