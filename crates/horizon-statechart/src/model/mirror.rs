//! A projector that keeps its own copy of a model's structure.
//!
//! [`ModelMirror`] is the smallest complete consumer of the notification
//! contract: it never re-reads structure except to learn about newly
//! inserted subtrees and to rebuild after a reset. Everything else (removals,
//! moves) it applies to its copy purely from the notification arguments.
//! If the model's brackets are wrong the copy drifts, which
//! [`ModelMirror::matches_model`] detects.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use horizon_statechart_core::logging::targets;
use horizon_statechart_core::{ConnectionId, ObjectId, PerfSpan};
use parking_lot::Mutex;

use super::index::ModelIndex;
use super::object_tree_model::ObjectTreeModel;
use super::traits::ItemModel;

/// Ordered children per parent; `None` keys the top-level rows.
type Structure = HashMap<Option<ObjectId>, Vec<ObjectId>>;

/// What the "about to" half of a notification resolved, for the "done" half.
#[derive(Debug, Clone, Copy)]
enum PendingChange {
    Insert {
        parent: Option<ObjectId>,
    },
    Remove {
        parent: Option<ObjectId>,
        row: usize,
    },
    Move {
        source_parent: Option<ObjectId>,
        source_row: usize,
        destination_parent: Option<ObjectId>,
        destination_row: usize,
    },
}

#[derive(Default)]
struct MirrorState {
    structure: Structure,
    pending: Option<PendingChange>,
    desynced: bool,
}

impl MirrorState {
    fn insert_subtree(&mut self, model: &ObjectTreeModel, object: ObjectId) {
        let children = model.children(Some(object));
        for &child in &children {
            self.insert_subtree(model, child);
        }
        self.structure.insert(Some(object), children);
    }

    fn forget_subtree(&mut self, object: ObjectId) {
        if let Some(children) = self.structure.remove(&Some(object)) {
            for child in children {
                self.forget_subtree(child);
            }
        }
    }

    fn rebuild(&mut self, model: &ObjectTreeModel) {
        let _span = PerfSpan::new("mirror_rebuild");
        self.structure.clear();
        self.pending = None;
        self.desynced = false;
        let roots = model.children(None);
        for &root in &roots {
            self.insert_subtree(model, root);
        }
        self.structure.insert(None, roots);
    }

    fn list_mut(&mut self, parent: Option<ObjectId>) -> &mut Vec<ObjectId> {
        self.structure.entry(parent).or_default()
    }
}

/// Resolves the parent index of a notification to an identity.
///
/// `None` when the index does not resolve; `Some(None)` for the top level.
fn resolve_parent(model: &ObjectTreeModel, parent: &ModelIndex) -> Option<Option<ObjectId>> {
    if !parent.is_valid() {
        return Some(None);
    }
    model.object_for_index(parent).map(Some)
}

/// An independent copy of an [`ObjectTreeModel`]'s structure, kept in sync
/// through the model's notifications only.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_statechart::model::{AppendOperation, ModelMirror, ObjectTreeModel};
/// use horizon_statechart_core::SharedObjectRegistry;
///
/// let registry = Arc::new(SharedObjectRegistry::new());
/// let machine = registry.create("machine");
/// let model = Arc::new(ObjectTreeModel::new(registry.clone()));
/// let mirror = ModelMirror::attach(&model);
///
/// model.append_root_object(machine);
/// {
///     let _op = AppendOperation::single(&model, machine);
///     registry.create_child(machine, "idle").unwrap();
/// }
///
/// assert_eq!(mirror.children(Some(machine)).len(), 1);
/// assert!(mirror.matches_model());
/// ```
pub struct ModelMirror {
    model: Weak<ObjectTreeModel>,
    state: Arc<Mutex<MirrorState>>,
    connections: [ConnectionId; 8],
}

impl ModelMirror {
    /// Copies the current structure of `model` and follows its notifications.
    pub fn attach(model: &Arc<ObjectTreeModel>) -> Self {
        let state = Arc::new(Mutex::new(MirrorState::default()));
        state.lock().rebuild(model);

        let weak = Arc::downgrade(model);
        let signals = model.signals();

        let connections = [
            signals.rows_about_to_be_inserted.connect({
                let (state, weak) = (state.clone(), weak.clone());
                move |(parent, _, _)| {
                    let Some(model) = weak.upgrade() else { return };
                    let mut state = state.lock();
                    match resolve_parent(&model, parent) {
                        Some(parent) => state.pending = Some(PendingChange::Insert { parent }),
                        None => state.desynced = true,
                    }
                }
            }),
            signals.rows_inserted.connect({
                let (state, weak) = (state.clone(), weak.clone());
                move |&(_, first, last)| {
                    let Some(model) = weak.upgrade() else { return };
                    let mut state = state.lock();
                    let Some(PendingChange::Insert { parent }) = state.pending.take() else {
                        state.desynced = true;
                        return;
                    };
                    let live = model.children(parent);
                    for row in first..=last {
                        let Some(&child) = live.get(row) else {
                            state.desynced = true;
                            return;
                        };
                        let list = state.list_mut(parent);
                        let at = row.min(list.len());
                        list.insert(at, child);
                        state.insert_subtree(&model, child);
                    }
                }
            }),
            signals.rows_about_to_be_removed.connect({
                let (state, weak) = (state.clone(), weak.clone());
                move |(parent, first, _)| {
                    let Some(model) = weak.upgrade() else { return };
                    let mut state = state.lock();
                    match resolve_parent(&model, parent) {
                        Some(parent) => {
                            state.pending = Some(PendingChange::Remove { parent, row: *first })
                        }
                        None => state.desynced = true,
                    }
                }
            }),
            signals.rows_removed.connect({
                let state = state.clone();
                move |_| {
                    let mut state = state.lock();
                    let Some(PendingChange::Remove { parent, row }) = state.pending.take() else {
                        state.desynced = true;
                        return;
                    };
                    let list = state.list_mut(parent);
                    if row >= list.len() {
                        state.desynced = true;
                        return;
                    }
                    let removed = list.remove(row);
                    state.forget_subtree(removed);
                }
            }),
            signals.rows_about_to_be_moved.connect({
                let (state, weak) = (state.clone(), weak.clone());
                move |(source, source_row, _, destination, destination_row)| {
                    let Some(model) = weak.upgrade() else { return };
                    let mut state = state.lock();
                    match (
                        resolve_parent(&model, source),
                        resolve_parent(&model, destination),
                    ) {
                        (Some(source_parent), Some(destination_parent)) => {
                            state.pending = Some(PendingChange::Move {
                                source_parent,
                                source_row: *source_row,
                                destination_parent,
                                destination_row: *destination_row,
                            })
                        }
                        _ => state.desynced = true,
                    }
                }
            }),
            signals.rows_moved.connect({
                let state = state.clone();
                move |_| {
                    let mut state = state.lock();
                    let Some(PendingChange::Move {
                        source_parent,
                        source_row,
                        destination_parent,
                        destination_row,
                    }) = state.pending.take()
                    else {
                        state.desynced = true;
                        return;
                    };
                    let source = state.list_mut(source_parent);
                    if source_row >= source.len() {
                        state.desynced = true;
                        return;
                    }
                    let object = source.remove(source_row);
                    let destination = state.list_mut(destination_parent);
                    let at = destination_row.min(destination.len());
                    destination.insert(at, object);
                }
            }),
            signals.model_about_to_reset.connect({
                let state = state.clone();
                move |_| state.lock().pending = None
            }),
            signals.model_reset.connect({
                let (state, weak) = (state.clone(), weak.clone());
                move |_| {
                    if let Some(model) = weak.upgrade() {
                        state.lock().rebuild(&model);
                    }
                }
            }),
        ];

        Self {
            model: weak,
            state,
            connections,
        }
    }

    /// Returns the mirrored children of `parent` (`None` for the top level).
    pub fn children(&self, parent: Option<ObjectId>) -> Vec<ObjectId> {
        self.state
            .lock()
            .structure
            .get(&parent)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the number of mirrored objects.
    pub fn object_count(&self) -> usize {
        self.state.lock().structure.len().saturating_sub(1)
    }

    /// Returns `true` if a notification arrived that the mirror could not apply.
    pub fn is_desynced(&self) -> bool {
        self.state.lock().desynced
    }

    /// Compares the mirrored structure with a fresh walk of the model.
    ///
    /// Returns `false` once the model has been dropped.
    pub fn matches_model(&self) -> bool {
        let Some(model) = self.model.upgrade() else {
            return false;
        };
        let mut fresh = MirrorState::default();
        fresh.rebuild(&model);

        let state = self.state.lock();
        let matches = !state.desynced && state.structure == fresh.structure;
        if !matches {
            tracing::debug!(
                target: targets::MODEL,
                desynced = state.desynced,
                mirrored = state.structure.len(),
                live = fresh.structure.len(),
                "mirror diverged from model"
            );
        }
        matches
    }
}

impl Drop for ModelMirror {
    fn drop(&mut self) {
        let Some(model) = self.model.upgrade() else {
            return;
        };
        let signals = model.signals();
        let [a, b, c, d, e, f, g, h] = self.connections;
        signals.rows_about_to_be_inserted.disconnect(a);
        signals.rows_inserted.disconnect(b);
        signals.rows_about_to_be_removed.disconnect(c);
        signals.rows_removed.disconnect(d);
        signals.rows_about_to_be_moved.disconnect(e);
        signals.rows_moved.disconnect(f);
        signals.model_about_to_reset.disconnect(g);
        signals.model_reset.disconnect(h);
    }
}
