use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::value::AttributeValue;

/// Opaque identifier of a case within one collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaseId {
    Integer(u64),
    String(String),
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseId::String(s) => write!(f, "{}", s),
            CaseId::Integer(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for CaseId {
    fn from(s: String) -> Self {
        CaseId::String(s)
    }
}

impl From<&str> for CaseId {
    fn from(s: &str) -> Self {
        CaseId::String(s.to_string())
    }
}

impl From<u64> for CaseId {
    fn from(i: u64) -> Self {
        CaseId::Integer(i)
    }
}

/// A record described by named attributes
///
/// Reference cases carry the label attribute, queries omit it.
/// Attributes are kept sorted by name so iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Case {
    attributes: BTreeMap<String, AttributeValue>,
}

impl Case {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Option<AttributeValue> {
        self.attributes.insert(name.into(), value.into())
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.attributes.remove(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Split a reference case into a label-free query and its label
    pub fn split_label(&self, label: &str) -> Option<(Case, AttributeValue)> {
        let mut query = self.clone();
        let value = query.remove(label)?;
        Some((query, value))
    }
}

impl<K, V> FromIterator<(K, V)> for Case
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
