//! Row selection state.

use crate::model::{Record, Scalar};

/// Tracks selected rows by the value of their key field.
///
/// Keys are unique and kept in selection order. Select-all only ever touches
/// the keys passed in, i.e. the rows currently fetched, never the whole
/// remote dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    /// Name of the row field used as identity.
    pub key: String,
    /// Selected keys.
    pub selected: Vec<Scalar>,
}

impl SelectionState {
    /// Creates an empty selection keyed by `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            selected: Vec::new(),
        }
    }

    /// Creates a selection with keys already selected. Duplicates are dropped.
    pub fn with_selected(key: impl Into<String>, selected: impl IntoIterator<Item = Scalar>) -> Self {
        let mut state = Self::new(key);
        for item in selected {
            if !state.is_selected(&item) {
                state.selected.push(item);
            }
        }
        state
    }

    /// Adds `item` if absent, removes it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, item: Scalar) -> bool {
        if let Some(pos) = self.selected.iter().position(|k| *k == item) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(item);
            true
        }
    }

    /// Selects every visible key, or deselects them all when they already are.
    ///
    /// `is_all_selected` is the state the host displayed when the user clicked.
    pub fn select_all(&mut self, visible: &[Scalar], is_all_selected: bool) {
        if is_all_selected {
            self.selected.retain(|k| !visible.contains(k));
        } else {
            for key in visible {
                if !self.is_selected(key) {
                    self.selected.push(key.clone());
                }
            }
        }
    }

    /// Checks if a key is selected.
    pub fn is_selected(&self, item: &Scalar) -> bool {
        self.selected.contains(item)
    }

    /// Returns `true` if there are visible keys and all of them are selected.
    pub fn is_all_selected(&self, visible: &[Scalar]) -> bool {
        !visible.is_empty() && visible.iter().all(|k| self.is_selected(k))
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Returns the identity of `row`, if its key field holds a scalar.
    pub fn key_of<R: Record + ?Sized>(&self, row: &R) -> Option<Scalar> {
        row.key_value(&self.key)
    }

    /// Returns the identities of `rows`, skipping rows without one.
    pub fn keys_of<R: Record>(&self, rows: &[R]) -> Vec<Scalar> {
        rows.iter().filter_map(|row| self.key_of(row)).collect()
    }
}
