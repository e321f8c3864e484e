//! # casebase Similarity
//!
//! Similarity scoring and retrieval for case-based reasoning over tabular
//! records.
//!
//! ## Features
//!
//! - **Local similarity**: linear distance for numeric attributes, equality for categorical ones
//! - **Weighted aggregation**: per-attribute weights combined with a weighted arithmetic mean
//! - **Top-k retrieval**: deterministic ranking of a collection against a query
//! - **Explainability**: per-attribute contribution breakdown for every match
//!
//! ## Example
//!
//! ```rust
//! use casebase_core::{Case, CaseBase};
//! use casebase_similarity::{CaseSimilarity, Retriever, SimilarityConfig, WeightTable};
//!
//! let casebase = CaseBase::from_cases(
//!     "income",
//!     vec![
//!         ("a", Case::new().with("age", 39).with("education", "Bachelors").with("income", "<=50K")),
//!         ("b", Case::new().with("age", 52).with("education", "Masters").with("income", ">50K")),
//!     ],
//! )
//! .unwrap();
//!
//! // Build the aggregator once per collection
//! let weights = WeightTable::new().with("education", 1.8).with("age", 1.4);
//! let similarity = CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::weighted(weights)).unwrap();
//!
//! let query = Case::new().with("age", 50).with("education", "Masters");
//! let retrieval = Retriever::new(&similarity, 1).unwrap().retrieve(casebase.view(), &query).unwrap();
//! assert_eq!(retrieval.best().unwrap().id.to_string(), "b");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌─────────────┐
//! │  CaseBase   │────>│ CaseSimilarity  │<────│   Config    │
//! │ (reference) │     │ (built once)    │     │  (weights)  │
//! └─────────────┘     └─────────────────┘     └─────────────┘
//!       │                      │
//!       │              ┌───────┴───────┐
//!       └─────────────>│   Retriever   │<──── query
//!                      │   (top-k)     │
//!                      └───────────────┘
//!                              │
//!                      ┌───────────────┐
//!                      │    Explain    │
//!                      │   (results)   │
//!                      └───────────────┘
//! ```

pub mod aggregate;
pub mod distance;
pub mod explain;
pub mod retrieve;
pub mod schema;

// Re-export main types for convenience
pub use aggregate::{AttributeSimilarity, CaseSimilarity, Scored};
pub use distance::{equality_similarity, linear_similarity, LocalSimilarity};
pub use explain::{AttributeContribution, Explanation, RetrievalStats};
pub use retrieve::{Match, Retrieval, Retriever};
pub use schema::{DegenerateNumericPolicy, SimilarityConfig, WeightTable, DEFAULT_WEIGHT};
