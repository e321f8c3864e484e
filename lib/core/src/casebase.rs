use crate::{Case, CaseId, Error, Result};
use ahash::AHashMap;

/// An in-memory collection of labeled reference cases
///
/// Cases keep their insertion order, which is the stable iteration order
/// used for deterministic tie-breaking. Every case must carry the label
/// attribute and the same set of non-label attributes.
#[derive(Debug, Clone)]
pub struct CaseBase {
    label: String,
    attributes: Vec<String>,
    ids: Vec<CaseId>,
    cases: Vec<Case>,
    index: AHashMap<CaseId, usize>,
}

impl CaseBase {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            attributes: Vec::new(),
            ids: Vec::new(),
            cases: Vec::new(),
            index: AHashMap::new(),
        }
    }

    /// Build a collection from `(id, case)` pairs, in iteration order
    pub fn from_cases<I, K>(label: impl Into<String>, cases: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Case)>,
        K: Into<CaseId>,
    {
        let mut casebase = Self::new(label);
        for (id, case) in cases {
            casebase.insert(id, case)?;
        }
        Ok(casebase)
    }

    /// Name of the label attribute
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Non-label attribute names shared by every case, sorted
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Append a case
    pub fn insert(&mut self, id: impl Into<CaseId>, case: Case) -> Result<()> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(Error::CaseExists(id.to_string()));
        }
        if !case.contains(&self.label) {
            return Err(Error::MissingLabel {
                case: id.to_string(),
                label: self.label.clone(),
            });
        }

        let mut names: Vec<String> = case
            .names()
            .filter(|name| *name != self.label)
            .map(str::to_string)
            .collect();
        names.sort();

        if self.cases.is_empty() {
            self.attributes = names;
        } else if names != self.attributes {
            return Err(self.schema_difference(&id, &names));
        }

        self.index.insert(id.clone(), self.cases.len());
        self.ids.push(id);
        self.cases.push(case);
        Ok(())
    }

    fn schema_difference(&self, id: &CaseId, names: &[String]) -> Error {
        if let Some(extra) = names.iter().find(|n| !self.attributes.contains(n)) {
            return Error::schema_mismatch(
                extra.clone(),
                format!("case {} has an attribute the other cases lack", id),
            );
        }
        let missing = self
            .attributes
            .iter()
            .find(|n| !names.contains(n))
            .cloned()
            .unwrap_or_default();
        Error::schema_mismatch(missing, format!("missing from case {}", id))
    }

    pub fn get(&self, id: &CaseId) -> Option<&Case> {
        self.index.get(id).map(|&i| &self.cases[i])
    }

    pub fn contains(&self, id: &CaseId) -> bool {
        self.index.contains_key(id)
    }

    /// Identifiers in iteration order
    pub fn ids(&self) -> &[CaseId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CaseId, &Case)> {
        self.ids.iter().zip(self.cases.iter())
    }

    /// A read-only view over every case
    pub fn view(&self) -> CaseView<'_> {
        CaseView {
            base: self,
            excluded: None,
        }
    }

    /// A read-only view over every case except `id`
    ///
    /// This is the reduced collection used for hold-out evaluation;
    /// nothing is copied.
    pub fn without(&self, id: &CaseId) -> Result<CaseView<'_>> {
        let position = self
            .index
            .get(id)
            .copied()
            .ok_or_else(|| Error::CaseNotFound(id.to_string()))?;
        Ok(CaseView {
            base: self,
            excluded: Some(position),
        })
    }
}

/// Borrowed, possibly reduced, view of a [`CaseBase`]
#[derive(Debug, Clone, Copy)]
pub struct CaseView<'a> {
    base: &'a CaseBase,
    excluded: Option<usize>,
}

impl<'a> CaseView<'a> {
    pub fn label(&self) -> &'a str {
        self.base.label()
    }

    pub fn len(&self) -> usize {
        self.base.len() - usize::from(self.excluded.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &CaseId) -> bool {
        match self.base.index.get(id) {
            Some(&i) => Some(i) != self.excluded,
            None => false,
        }
    }

    /// Cases in the collection's stable iteration order
    pub fn iter(&self) -> impl Iterator<Item = (&'a CaseId, &'a Case)> + 'a {
        let excluded = self.excluded;
        self.base
            .iter()
            .enumerate()
            .filter(move |(i, _)| Some(*i) != excluded)
            .map(|(_, entry)| entry)
    }
}

impl<'a> From<&'a CaseBase> for CaseView<'a> {
    fn from(base: &'a CaseBase) -> Self {
        base.view()
    }
}
