//! Scoped mutation guards for [`ObjectTreeModel`].
//!
//! The model does not own the tree, so it cannot notice structural changes
//! by itself. Whoever mutates the tree brackets the change with one of the
//! guards below:
//!
//! | Guard                | Mutation it announces                         |
//! |----------------------|-----------------------------------------------|
//! | [`AppendOperation`]  | `count` new children under a parent           |
//! | [`RemoveOperation`]  | one object leaves its parent                  |
//! | [`ResetOperation`]   | anything (views rebuild from scratch)         |
//! | [`ReparentOperation`]| one object moves to the end of another parent |
//!
//! Constructing a guard emits the "about to" notification while the tree
//! still has its old shape. Dropping it emits the matching "done"
//! notification, also when the scope is left early by `?` or a panic.
//!
//! ```
//! use std::sync::Arc;
//! use horizon_statechart::model::{ObjectTreeModel, RemoveOperation};
//! use horizon_statechart_core::SharedObjectRegistry;
//!
//! let registry = Arc::new(SharedObjectRegistry::new());
//! let machine = registry.create("machine");
//! let idle = registry.create_child(machine, "idle").unwrap();
//!
//! let model = ObjectTreeModel::new(registry.clone());
//! model.set_root_object(machine);
//!
//! {
//!     let _op = RemoveOperation::new(&model, idle);
//!     registry.destroy(idle).unwrap();
//! }
//! assert_eq!(model.child_count(Some(machine)), 0);
//! ```
//!
//! Guards do not nest: opening a second guard on the same model before the
//! first one is dropped is a programming error and panics.

use horizon_statechart_core::ObjectId;
use horizon_statechart_core::logging::targets;

use super::index::ModelIndex;
use super::object_tree_model::ObjectTreeModel;
use super::traits::ItemModel;

/// Logs a broken caller contract and panics.
#[track_caller]
pub(super) fn contract_violation(message: &str) -> ! {
    tracing::error!(target: targets::MODEL, "{message}");
    panic!("{message}");
}

/// The mutation a model is currently bracketing.
///
/// Carries everything needed to emit the "done" notification with the same
/// arguments as the "about to" one, plus what the verification pass checks.
#[derive(Debug, Clone)]
pub(crate) enum PendingOperation {
    Insert {
        parent: ModelIndex,
        parent_object: Option<ObjectId>,
        first: usize,
        last: usize,
        count_before: usize,
    },
    Remove {
        parent: ModelIndex,
        parent_object: ObjectId,
        object: ObjectId,
        row: usize,
        count_before: usize,
    },
    Move {
        source_parent: ModelIndex,
        source_row: usize,
        destination_parent: ModelIndex,
        destination_row: usize,
        object: ObjectId,
        new_parent: ObjectId,
    },
    Reset,
}

impl PendingOperation {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            PendingOperation::Insert { .. } => "an append",
            PendingOperation::Remove { .. } => "a removal",
            PendingOperation::Move { .. } => "a reparent",
            PendingOperation::Reset => "a reset",
        }
    }

    /// Checks that the tree now has the shape the operation announced.
    pub(crate) fn verify(&self, model: &ObjectTreeModel) -> Result<(), String> {
        match *self {
            PendingOperation::Insert {
                parent_object,
                first,
                last,
                count_before,
                ..
            } => {
                let expected = count_before + (last - first + 1);
                let actual = model.child_count(parent_object);
                if actual != expected {
                    return Err(format!(
                        "append under {parent_object:?} announced rows {first}..={last}, \
                         but the child count went from {count_before} to {actual}"
                    ));
                }
            }
            PendingOperation::Remove {
                parent_object,
                object,
                count_before,
                ..
            } => {
                if model.tree().parent(object) == Some(parent_object) {
                    return Err(format!(
                        "removal of {object:?} closed while it is still a child of {parent_object:?}"
                    ));
                }
                let actual = model.child_count(Some(parent_object));
                if actual + 1 != count_before {
                    return Err(format!(
                        "removal of {object:?} changed the child count of {parent_object:?} \
                         from {count_before} to {actual}"
                    ));
                }
            }
            PendingOperation::Move {
                object, new_parent, ..
            } => {
                let children = model.tree().children(new_parent);
                if children.last() != Some(&object) {
                    return Err(format!(
                        "reparent of {object:?} closed without it being the last child of {new_parent:?}"
                    ));
                }
            }
            PendingOperation::Reset => {}
        }
        Ok(())
    }
}

/// Brackets the insertion of children under an object of the model.
///
/// The new children occupy rows `first..first + count`, where `first`
/// defaults to the current child count (an append).
#[must_use = "the mutation must happen while the guard is alive"]
pub struct AppendOperation<'a> {
    model: &'a ObjectTreeModel,
}

impl<'a> AppendOperation<'a> {
    /// Announces `count` new children of `parent`, starting at `at_row`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not part of the model, if `count` is zero, if
    /// `at_row` is past the end of the child list, or if another guard is
    /// open on `model`.
    #[track_caller]
    #[tracing::instrument(skip(model), target = "horizon_statechart::model", level = "trace")]
    pub fn new(
        model: &'a ObjectTreeModel,
        parent: ObjectId,
        count: usize,
        at_row: Option<usize>,
    ) -> Self {
        let parent_index = model.index_for_object(parent);
        if !parent_index.is_valid() {
            contract_violation(&format!(
                "cannot append under {parent:?}: it is not part of the model"
            ));
        }
        if count == 0 {
            contract_violation("cannot append zero children");
        }
        let current = model.child_count(Some(parent));
        let first = at_row.unwrap_or(current);
        if first > current {
            contract_violation(&format!(
                "cannot insert at row {first} of {parent:?}, which has {current} children"
            ));
        }

        model.begin_operation(PendingOperation::Insert {
            parent: parent_index,
            parent_object: Some(parent),
            first,
            last: first + count - 1,
            count_before: current,
        });
        Self { model }
    }

    /// Announces one new child appended to `parent`.
    #[track_caller]
    pub fn single(model: &'a ObjectTreeModel, parent: ObjectId) -> Self {
        Self::new(model, parent, 1, None)
    }
}

impl Drop for AppendOperation<'_> {
    fn drop(&mut self) {
        self.model.end_operation();
    }
}

/// Brackets the removal of one object from its parent.
///
/// Destroying the object and detaching it both count as removal.
#[must_use = "the mutation must happen while the guard is alive"]
pub struct RemoveOperation<'a> {
    model: &'a ObjectTreeModel,
}

impl<'a> RemoveOperation<'a> {
    /// Announces that `object` is about to leave its parent.
    ///
    /// # Panics
    ///
    /// Panics if `object` has no parent, is a top-level object, is not part
    /// of the model, or if another guard is open on `model`. Top-level
    /// objects are replaced through
    /// [`ObjectTreeModel::set_root_objects`] instead.
    #[track_caller]
    #[tracing::instrument(skip(model), target = "horizon_statechart::model", level = "trace")]
    pub fn new(model: &'a ObjectTreeModel, object: ObjectId) -> Self {
        if model.is_root_object(object) {
            contract_violation(&format!(
                "cannot remove top-level object {object:?} through a removal guard"
            ));
        }
        let Some(parent_object) = model.tree().parent(object) else {
            contract_violation(&format!("cannot remove {object:?}: it has no parent"));
        };
        let index = model.index_for_object(object);
        if !index.is_valid() {
            contract_violation(&format!(
                "cannot remove {object:?}: it is not part of the model"
            ));
        }

        model.begin_operation(PendingOperation::Remove {
            parent: model.index_for_object(parent_object),
            parent_object,
            object,
            row: index.row(),
            count_before: model.child_count(Some(parent_object)),
        });
        Self { model }
    }
}

impl Drop for RemoveOperation<'_> {
    fn drop(&mut self) {
        self.model.end_operation();
    }
}

/// Brackets an arbitrary change; views discard everything and rebuild.
#[must_use = "the mutation must happen while the guard is alive"]
pub struct ResetOperation<'a> {
    model: &'a ObjectTreeModel,
}

impl<'a> ResetOperation<'a> {
    /// Announces a reset of `model`.
    ///
    /// # Panics
    ///
    /// Panics if another guard is open on `model`.
    #[track_caller]
    pub fn new(model: &'a ObjectTreeModel) -> Self {
        model.begin_operation(PendingOperation::Reset);
        Self { model }
    }
}

impl Drop for ResetOperation<'_> {
    fn drop(&mut self) {
        self.model.end_operation();
    }
}

/// Brackets moving one object to the end of a new parent's children.
///
/// If the object is `None`, is `new_parent` itself, or is already a child of
/// `new_parent`, the guard is inactive: it emits nothing on construction or drop, and the caller's
/// mutation is expected to be a no-op as well.
#[must_use = "the mutation must happen while the guard is alive"]
pub struct ReparentOperation<'a> {
    model: Option<&'a ObjectTreeModel>,
}

impl<'a> ReparentOperation<'a> {
    /// Announces that `object` is about to become the last child of `new_parent`.
    ///
    /// # Panics
    ///
    /// Panics, unless the move is a no-op, if `object` or `new_parent` is not
    /// part of the model, if `object` is a top-level object, or if another
    /// guard is open on `model`.
    #[track_caller]
    pub fn new(
        model: &'a ObjectTreeModel,
        object: impl Into<Option<ObjectId>>,
        new_parent: impl Into<Option<ObjectId>>,
    ) -> Self {
        let object = object.into();
        let new_parent = new_parent.into();
        tracing::trace!(target: targets::MODEL, ?object, ?new_parent, "reparent");

        let Some(object) = object else {
            return Self { model: None };
        };
        if model.tree().parent(object) == new_parent || new_parent == Some(object) {
            return Self { model: None };
        }

        if model.is_root_object(object) {
            contract_violation(&format!(
                "cannot reparent top-level object {object:?} through a reparent guard"
            ));
        }
        let source = model.index_for_object(object);
        if !source.is_valid() {
            contract_violation(&format!(
                "cannot reparent {object:?}: it is not part of the model"
            ));
        }
        let destination_parent = model.index_for_object(new_parent);
        let Some(new_parent) = new_parent.filter(|_| destination_parent.is_valid()) else {
            contract_violation(&format!(
                "cannot reparent {object:?} to {new_parent:?}: destination is not part of the model"
            ));
        };

        model.begin_operation(PendingOperation::Move {
            source_parent: model.parent(&source),
            source_row: source.row(),
            destination_parent,
            destination_row: model.child_count(Some(new_parent)),
            object,
            new_parent,
        });
        Self { model: Some(model) }
    }

    /// Returns `false` if the guard recognized a no-op and emits nothing.
    pub fn is_active(&self) -> bool {
        self.model.is_some()
    }
}

impl Drop for ReparentOperation<'_> {
    fn drop(&mut self) {
        if let Some(model) = self.model {
            model.end_operation();
        }
    }
}
