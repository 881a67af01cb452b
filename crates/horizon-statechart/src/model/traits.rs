//! Core traits for the Model/View architecture.
//!
//! This module defines the read contract a model exposes to views and
//! walkers, the read contract the model itself needs from the external
//! object tree, and the signals a model emits around structural changes.

use horizon_statechart_core::{ObjectId, SharedObjectRegistry, Signal};

use super::index::ModelIndex;
use super::role::{ItemData, ItemRole};

/// Read access to an externally owned parent/child tree.
///
/// The model never writes through this trait. Whoever mutates the tree
/// keeps `parent` and `children` consistent with each other, and wraps each
/// structural change in the matching mutation guard.
pub trait ObjectTree: Send + Sync {
    /// Returns the parent of `object`, or `None` for parentless or unknown objects.
    fn parent(&self, object: ObjectId) -> Option<ObjectId>;

    /// Returns the ordered children of `object` (empty for unknown objects).
    fn children(&self, object: ObjectId) -> Vec<ObjectId>;

    /// Returns a human-readable name for `object`, if it has one.
    fn object_name(&self, _object: ObjectId) -> Option<String> {
        None
    }
}

impl ObjectTree for SharedObjectRegistry {
    fn parent(&self, object: ObjectId) -> Option<ObjectId> {
        SharedObjectRegistry::parent(self, object).ok().flatten()
    }

    fn children(&self, object: ObjectId) -> Vec<ObjectId> {
        SharedObjectRegistry::children(self, object).unwrap_or_default()
    }

    fn object_name(&self, object: ObjectId) -> Option<String> {
        SharedObjectRegistry::object_name(self, object)
            .ok()
            .filter(|name| !name.is_empty())
    }
}

/// The core trait for item models.
///
/// `ItemModel` is the interface views, instantiators and layout walkers use
/// to query a hierarchical model without knowing the underlying structure.
///
/// Implementations must be safe to query whenever no mutation is pending,
/// including from inside handlers for the "done" half of a notification
/// (`rows_inserted`, `rows_removed`, `rows_moved`, `model_reset`).
pub trait ItemModel: Send + Sync {
    /// Returns the number of rows under the given parent.
    ///
    /// An invalid parent means the top level of the model.
    fn row_count(&self, parent: &ModelIndex) -> usize;

    /// Returns the number of columns for children of the given parent.
    fn column_count(&self, parent: &ModelIndex) -> usize;

    /// Returns the data stored under the given role for the item at index.
    ///
    /// Returns `ItemData::None` for invalid indices and unsupported roles.
    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData;

    /// Creates a model index for the given row and column under parent.
    ///
    /// Returns `ModelIndex::invalid()` if the position is out of bounds.
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex;

    /// Returns the parent of the given index.
    ///
    /// Returns `ModelIndex::invalid()` for top-level items and invalid indices.
    fn parent(&self, index: &ModelIndex) -> ModelIndex;

    /// Returns the signals for this model.
    fn signals(&self) -> &ModelSignals;

    /// Returns `true` if the item at parent has any children.
    fn has_children(&self, parent: &ModelIndex) -> bool {
        self.row_count(parent) > 0
    }

    /// Returns the display text for an item (convenience for `data(index, Display)`).
    fn display_text(&self, index: &ModelIndex) -> Option<String> {
        self.data(index, ItemRole::Display).into_string()
    }

    /// Creates a sibling index at the given row and column.
    ///
    /// This validates against the model, unlike `ModelIndex::sibling_at_row`.
    fn sibling(&self, index: &ModelIndex, row: usize, column: usize) -> ModelIndex {
        if !index.is_valid() {
            return ModelIndex::invalid();
        }
        self.index(row, column, &self.parent(index))
    }
}

/// Collection of signals emitted by item models.
///
/// Projectors connect to all four pairs to stay synchronized with the model;
/// ignoring any one of them leads to silent divergence.
///
/// # Signal Usage
///
/// - **Before modifications**: `rows_about_to_be_*` / `model_about_to_reset`.
///   The tree still has its old shape; indices carried by the signal are
///   computed against it.
/// - **After modifications**: `rows_*` / `model_reset`. The tree has its new
///   shape and the model may be queried again.
pub struct ModelSignals {
    /// Emitted just before rows are inserted.
    /// Args: (parent index, first row, last row)
    pub rows_about_to_be_inserted: Signal<(ModelIndex, usize, usize)>,

    /// Emitted after rows have been inserted.
    /// Args: (parent index, first row, last row)
    pub rows_inserted: Signal<(ModelIndex, usize, usize)>,

    /// Emitted just before rows are removed.
    /// Args: (parent index, first row, last row)
    pub rows_about_to_be_removed: Signal<(ModelIndex, usize, usize)>,

    /// Emitted after rows have been removed.
    /// Args: (parent index, first row, last row)
    pub rows_removed: Signal<(ModelIndex, usize, usize)>,

    /// Emitted just before rows are moved.
    /// Args: (source parent, source first, source last, dest parent, dest row)
    pub rows_about_to_be_moved: Signal<(ModelIndex, usize, usize, ModelIndex, usize)>,

    /// Emitted after rows have been moved.
    /// Args: (source parent, source first, source last, dest parent, dest row)
    pub rows_moved: Signal<(ModelIndex, usize, usize, ModelIndex, usize)>,

    /// Emitted before the model is reset.
    pub model_about_to_reset: Signal<()>,

    /// Emitted after the model has been reset.
    pub model_reset: Signal<()>,
}

impl Default for ModelSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSignals {
    /// Creates a new set of model signals.
    pub fn new() -> Self {
        Self {
            rows_about_to_be_inserted: Signal::new(),
            rows_inserted: Signal::new(),
            rows_about_to_be_removed: Signal::new(),
            rows_removed: Signal::new(),
            rows_about_to_be_moved: Signal::new(),
            rows_moved: Signal::new(),
            model_about_to_reset: Signal::new(),
            model_reset: Signal::new(),
        }
    }

    /// Emits signals for row insertion.
    ///
    /// Calls the provided function between the about_to_be_inserted and inserted signals.
    pub fn emit_rows_inserted<F>(&self, parent: ModelIndex, first: usize, last: usize, insert_fn: F)
    where
        F: FnOnce(),
    {
        self.rows_about_to_be_inserted.emit((parent, first, last));
        insert_fn();
        self.rows_inserted.emit((parent, first, last));
    }

    /// Emits signals for a model reset.
    ///
    /// Calls the provided function between the about_to_reset and reset signals.
    pub fn emit_reset<F>(&self, reset_fn: F)
    where
        F: FnOnce(),
    {
        self.model_about_to_reset.emit(());
        reset_fn();
        self.model_reset.emit(());
    }

    /// Blocks or unblocks every signal in the set.
    pub fn set_blocked(&self, blocked: bool) {
        self.rows_about_to_be_inserted.set_blocked(blocked);
        self.rows_inserted.set_blocked(blocked);
        self.rows_about_to_be_removed.set_blocked(blocked);
        self.rows_removed.set_blocked(blocked);
        self.rows_about_to_be_moved.set_blocked(blocked);
        self.rows_moved.set_blocked(blocked);
        self.model_about_to_reset.set_blocked(blocked);
        self.model_reset.set_blocked(blocked);
    }
}
