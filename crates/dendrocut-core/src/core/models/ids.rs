use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense identifier assigned to a label the first time it is interned.
///
/// Ids are handed out sequentially from zero, so they double as row indices into the
/// distance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(u32);

impl LabelId {
    /// Number of distinct ids the id type can represent.
    pub const CAPACITY: u64 = u32::MAX as u64 + 1;

    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
