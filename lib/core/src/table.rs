//! Tabular adapter
//!
//! Converts rows of named columns into a [`CaseBase`]. Cleaning (missing
//! values, irrelevant columns, sampling) happens before rows reach a table.

use crate::{AttributeValue, Case, CaseBase, CaseId, Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: CaseId,
    pub values: Vec<AttributeValue>,
}

/// Rows of values under a fixed header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, id: impl Into<CaseId>, values: Vec<AttributeValue>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::invalid_argument(
                "row",
                format!("expected {} values, got {}", self.columns.len(), values.len()),
            ));
        }
        self.rows.push(Row {
            id: id.into(),
            values,
        });
        Ok(())
    }

    /// Remove the named columns; unknown names are ignored
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|c| !names.contains(&c.as_str()))
            .collect();

        let mut i = 0;
        self.columns.retain(|_| {
            i += 1;
            keep[i - 1]
        });
        for row in &mut self.rows {
            let mut j = 0;
            row.values.retain(|_| {
                j += 1;
                keep[j - 1]
            });
        }
    }

    /// Keep only the rows at the given positions, in the given order
    pub fn select_rows(&mut self, positions: &[usize]) {
        let mut rows: Vec<Option<Row>> = std::mem::take(&mut self.rows)
            .into_iter()
            .map(Some)
            .collect();
        self.rows = positions
            .iter()
            .filter_map(|&p| rows.get_mut(p).and_then(Option::take))
            .collect();
    }

    /// Convert every row into a case, `label` naming the label column
    pub fn into_casebase(self, label: &str) -> Result<CaseBase> {
        if !self.columns.iter().any(|c| c == label) {
            return Err(Error::configuration(label, "label column not present in table"));
        }

        let columns = self.columns;
        let mut casebase = CaseBase::new(label);
        for row in self.rows {
            let case: Case = columns.iter().cloned().zip(row.values).collect();
            casebase.insert(row.id, case)?;
        }
        Ok(casebase)
    }
}
