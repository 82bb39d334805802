//! Bulk selection state machine.
//!
//! Rows are paged and the full universe lives on the server, so "select all"
//! cannot enumerate keys. The selection instead records a global flag plus
//! the exceptions to it:
//!
//! - `all == false`: exactly the rows in `only` are selected.
//! - `all == true`: every row except those in `except` is selected.
//!
//! Only the set matching the current mode is ever populated.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;
use tracing::trace;

// ===== Selection =====

/// Raw selection state, serializable for bulk action payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize + Eq + Hash",
    deserialize = "K: Deserialize<'de> + Eq + Hash"
))]
pub struct Selection<K> {
    /// Whether every row is selected by default.
    pub all: bool,
    /// Selected rows while `all` is false.
    pub only: HashSet<K>,
    /// Deselected rows while `all` is true.
    pub except: HashSet<K>,
}

impl<K> Default for Selection<K> {
    fn default() -> Self {
        Self {
            all: false,
            only: HashSet::new(),
            except: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash> PartialEq for Selection<K> {
    fn eq(&self, other: &Self) -> bool {
        self.all == other.all && self.only == other.only && self.except == other.except
    }
}

impl<K: Eq + Hash> Eq for Selection<K> {}

// ===== BulkSelectionSet =====

/// All/only/except selection over an unbounded row universe.
///
/// # Invariants
/// - `only` is empty whenever `all` is true.
/// - `except` is empty whenever `all` is false.
#[derive(Debug, Clone)]
pub struct BulkSelectionSet<K> {
    selection: Selection<K>,
}

impl<K> Default for BulkSelectionSet<K> {
    fn default() -> Self {
        Self {
            selection: Selection::default(),
        }
    }
}

impl<K: Eq + Hash + Clone> BulkSelectionSet<K> {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self {
            selection: Selection::default(),
        }
    }

    /// Current raw state.
    pub fn selection(&self) -> &Selection<K> {
        &self.selection
    }

    /// Select every row.
    pub fn select_all(&mut self) {
        trace!("select all rows");
        self.selection.all = true;
        self.selection.only.clear();
        self.selection.except.clear();
    }

    /// Deselect every row.
    pub fn deselect_all(&mut self) {
        trace!("deselect all rows");
        self.selection.all = false;
        self.selection.only.clear();
        self.selection.except.clear();
    }

    /// Select the given rows.
    pub fn select<'a, I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        for row in rows {
            self.selection.except.remove(row);
            if !self.selection.all {
                self.selection.only.insert(row.clone());
            }
        }
    }

    /// Deselect the given rows.
    pub fn deselect<'a, I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        for row in rows {
            self.selection.only.remove(row);
            if self.selection.all {
                self.selection.except.insert(row.clone());
            }
        }
    }

    /// Whether `row` is selected.
    pub fn selected(&self, row: &K) -> bool {
        if self.selection.all {
            !self.selection.except.contains(row)
        } else {
            self.selection.only.contains(row)
        }
    }

    /// Flip each row independently.
    pub fn toggle<'a, I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        for row in rows {
            if self.selected(row) {
                self.deselect([row]);
            } else {
                self.select([row]);
            }
        }
    }

    /// Whether every row is selected with no exceptions.
    pub fn all_selected(&self) -> bool {
        self.selection.all && self.selection.except.is_empty()
    }

    /// Whether nothing is selected.
    ///
    /// With `all` set this is false even when every visible row is excepted,
    /// since rows beyond the current page remain selected.
    pub fn is_empty(&self) -> bool {
        !self.selection.all && self.selection.only.is_empty()
    }
}

#[cfg(test)]
#[path = "bulk_tests.rs"]
mod tests;
