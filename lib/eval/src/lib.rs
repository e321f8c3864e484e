//! # casebase Eval
//!
//! Classification on top of case retrieval.
//!
//! - [`Classifier`]: synchronous single-query classification by k-NN vote
//! - [`LeaveOneOut`]: parallel hold-out accuracy over a sample of the collection
//!
//! ## Example
//!
//! ```rust
//! use casebase_core::{Case, CaseBase};
//! use casebase_eval::LeaveOneOut;
//! use casebase_similarity::{CaseSimilarity, SimilarityConfig};
//!
//! let casebase = CaseBase::from_cases(
//!     "income",
//!     vec![
//!         ("id1", Case::new().with("education", "Masters").with("income", ">50K")),
//!         ("id2", Case::new().with("education", "Masters").with("income", ">50K")),
//!         ("id3", Case::new().with("education", "HS-grad").with("income", "<=50K")),
//!     ],
//! )
//! .unwrap();
//! let similarity = CaseSimilarity::from_casebase(&casebase, &SimilarityConfig::unweighted()).unwrap();
//!
//! let report = LeaveOneOut::new(3, 1).unwrap().evaluate(&casebase, &similarity).unwrap();
//! assert_eq!(report.correct, 2);
//! ```

pub mod classify;
pub mod loo;
pub mod vote;

pub use classify::{predict, Classification, Classifier};
pub use loo::{hold_out, EvaluationReport, HoldOut, LeaveOneOut, Progress, DEFAULT_PROGRESS_EVERY};
pub use vote::{majority_vote, Ballot};
