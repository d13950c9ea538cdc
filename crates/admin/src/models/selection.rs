//! Row selection for batch-capable panels

use std::collections::BTreeSet;

/// Ids of the rows ticked on a panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<i64>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick or untick a row. Returns whether the row is now selected.
    pub fn toggle(&mut self, id: i64) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected ids in ascending order
    pub fn ids(&self) -> Vec<i64> {
        self.ids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
