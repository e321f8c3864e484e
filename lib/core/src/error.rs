use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The similarity aggregator cannot be built for this attribute.
    #[error("Invalid configuration for attribute '{attribute}': {reason}")]
    Configuration { attribute: String, reason: String },

    /// Query and case attribute sets (or value types) disagree.
    #[error("Schema mismatch on attribute '{attribute}': {reason}")]
    SchemaMismatch { attribute: String, reason: String },

    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("Case not found: {0}")]
    CaseNotFound(String),

    #[error("Case already exists: {0}")]
    CaseExists(String),

    #[error("Case {case} has no value for label attribute '{label}'")]
    MissingLabel { case: String, label: String },

    #[error("Case collection is empty")]
    EmptyCaseBase,

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl Error {
    pub fn configuration(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Configuration {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    pub fn schema_mismatch(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::SchemaMismatch {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Name of the attribute this error is about, when there is one.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Error::Configuration { attribute, .. } | Error::SchemaMismatch { attribute, .. } => {
                Some(attribute)
            }
            Error::MissingLabel { label, .. } => Some(label),
            _ => None,
        }
    }
}
