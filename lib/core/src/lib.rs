//! # casebase Core
//!
//! Core data model for the casebase classifier.
//!
//! This crate provides the fundamental data structures:
//!
//! - [`AttributeValue`] - A numeric or categorical attribute value
//! - [`Case`] - A record of named attribute values
//! - [`CaseBase`] - An ordered collection of labeled reference cases
//! - [`CaseView`] - A borrowed view of a collection, optionally minus one case
//! - [`Table`] - Tabular rows convertible into a collection
//!
//! ## Example
//!
//! ```rust
//! use casebase_core::{Case, CaseBase, CaseId};
//!
//! let mut casebase = CaseBase::new("income");
//! casebase
//!     .insert("id1", Case::new().with("education", "Masters").with("income", ">50K"))
//!     .unwrap();
//! casebase
//!     .insert("id2", Case::new().with("education", "HS-grad").with("income", "<=50K"))
//!     .unwrap();
//!
//! let reduced = casebase.without(&CaseId::from("id1")).unwrap();
//! assert_eq!(reduced.len(), 1);
//! ```

pub mod case;
pub mod casebase;
pub mod error;
pub mod table;
pub mod value;

pub use case::{Case, CaseId};
pub use casebase::{CaseBase, CaseView};
pub use error::{Error, Result};
pub use table::{Row, Table};
pub use value::{AttributeValue, ValueKind};
