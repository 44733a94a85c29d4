use crate::core::models::ids::LabelId;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum InternError {
    #[error("Label id space exhausted: cannot intern '{label}' after {capacity} distinct labels")]
    Exhausted { label: String, capacity: u64 },
}

/// Append-only mapping from labels to dense, sequential [`LabelId`]s.
#[derive(Debug, Clone)]
pub struct Interner {
    ids: HashMap<String, LabelId>,
    labels: Vec<String>,
    limit: u64,
}

impl Default for Interner {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            labels: Vec::new(),
            limit: LabelId::CAPACITY,
        }
    }
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: HashMap::with_capacity(capacity),
            labels: Vec::with_capacity(capacity),
            limit: LabelId::CAPACITY,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_limit(limit: u64) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Returns the id of `label`, allocating the next sequential id on first sight.
    pub fn intern(&mut self, label: &str) -> Result<LabelId, InternError> {
        if let Some(&id) = self.ids.get(label) {
            return Ok(id);
        }

        let exhausted = || InternError::Exhausted {
            label: label.to_string(),
            capacity: self.limit,
        };
        if self.labels.len() as u64 >= self.limit {
            return Err(exhausted());
        }
        let id = LabelId::from_index(self.labels.len()).ok_or_else(exhausted)?;

        self.ids.insert(label.to_string(), id);
        self.labels.push(label.to_string());
        Ok(id)
    }

    pub fn lookup(&self, label: &str) -> Option<LabelId> {
        self.ids.get(label).copied()
    }

    pub fn label(&self, id: LabelId) -> Option<&str> {
        self.labels.get(id.index()).map(String::as_str)
    }

    /// All interned labels, indexed by id.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
