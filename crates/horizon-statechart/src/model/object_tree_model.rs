//! Item model over an externally owned object tree.
//!
//! `ObjectTreeModel` does not store structure. It owns a list of root
//! objects and answers every question ("which object is at this index",
//! "which index addresses this object", "how many children") by reading the
//! live tree through [`ObjectTree`]. The only thing it remembers between
//! calls is object identity, never a row number.
//!
//! Structural changes to the tree are announced through the guards in
//! [`operations`](super::operations); the model turns them into the
//! insert/remove/move/reset notifications of [`ModelSignals`].

use std::sync::Arc;

use horizon_statechart_core::ObjectId;
use horizon_statechart_core::logging::targets;
use parking_lot::{Mutex, RwLock};

use super::config::ModelConfig;
use super::index::ModelIndex;
use super::operations::PendingOperation;
use super::role::{ItemData, ItemRole};
use super::traits::{ItemModel, ModelSignals, ObjectTree};

/// A hierarchical model exposing an object tree to views.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_statechart::model::{AppendOperation, ItemModel, ModelIndex, ObjectTreeModel};
/// use horizon_statechart_core::SharedObjectRegistry;
///
/// let registry = Arc::new(SharedObjectRegistry::new());
/// let machine = registry.create("machine");
///
/// let model = ObjectTreeModel::new(registry.clone());
/// model.append_root_object(machine);
///
/// model.signals().rows_inserted.connect(|(parent, first, last)| {
///     println!("rows {first}..={last} inserted under {parent:?}");
/// });
///
/// {
///     let _op = AppendOperation::single(&model, machine);
///     registry.create_child(machine, "idle").unwrap();
/// }
///
/// let machine_index = model.index_for_object(machine);
/// assert_eq!(model.row_count(&machine_index), 1);
/// ```
pub struct ObjectTreeModel {
    tree: Arc<dyn ObjectTree>,
    root_objects: RwLock<Vec<ObjectId>>,
    pending: Mutex<Option<PendingOperation>>,
    config: ModelConfig,
    signals: ModelSignals,
}

impl ObjectTreeModel {
    /// Creates an empty model over `tree` with the default configuration.
    pub fn new(tree: Arc<dyn ObjectTree>) -> Self {
        Self::with_config(tree, ModelConfig::default())
    }

    /// Creates an empty model over `tree`.
    pub fn with_config(tree: Arc<dyn ObjectTree>, config: ModelConfig) -> Self {
        Self {
            tree,
            root_objects: RwLock::new(Vec::new()),
            pending: Mutex::new(None),
            config,
            signals: ModelSignals::new(),
        }
    }

    /// Returns the tree this model reads from.
    pub fn tree(&self) -> &Arc<dyn ObjectTree> {
        &self.tree
    }

    /// Returns the model's configuration.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Root list
    // -------------------------------------------------------------------------

    /// Returns the top-level objects, in row order.
    pub fn root_objects(&self) -> Vec<ObjectId> {
        self.root_objects.read().clone()
    }

    /// Returns `true` if `object` is one of the top-level objects.
    pub fn is_root_object(&self, object: ObjectId) -> bool {
        self.root_objects.read().contains(&object)
    }

    /// Appends `object` as a new top-level row.
    ///
    /// Does nothing (and emits nothing) if `object` is `None` or already a
    /// top-level object.
    pub fn append_root_object(&self, object: impl Into<Option<ObjectId>>) {
        let Some(object) = object.into() else {
            return;
        };
        let row = {
            let roots = self.root_objects.read();
            if roots.contains(&object) {
                tracing::trace!(target: targets::MODEL, ?object, "already a root object");
                return;
            }
            roots.len()
        };

        self.begin_operation(PendingOperation::Insert {
            parent: ModelIndex::invalid(),
            parent_object: None,
            first: row,
            last: row,
            count_before: row,
        });
        self.root_objects.write().push(object);
        self.end_operation();
    }

    /// Replaces the top-level objects with a single object.
    pub fn set_root_object(&self, object: impl Into<Option<ObjectId>>) {
        self.set_root_objects([object.into()]);
    }

    /// Replaces all top-level objects, resetting the model.
    ///
    /// `None` entries and repeated objects are dropped; the first occurrence
    /// of each object determines its row.
    pub fn set_root_objects<I, T>(&self, objects: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<ObjectId>>,
    {
        let mut roots: Vec<ObjectId> = Vec::new();
        for object in objects.into_iter().filter_map(Into::into) {
            if !roots.contains(&object) {
                roots.push(object);
            }
        }

        self.begin_operation(PendingOperation::Reset);
        *self.root_objects.write() = roots;
        self.end_operation();
    }

    /// Removes all top-level objects, resetting the model.
    pub fn clear(&self) {
        self.begin_operation(PendingOperation::Reset);
        self.root_objects.write().clear();
        self.end_operation();
    }

    // -------------------------------------------------------------------------
    // Addressing
    // -------------------------------------------------------------------------

    /// Returns the ordered children of `parent`, or the top-level objects for `None`.
    pub fn children(&self, parent: Option<ObjectId>) -> Vec<ObjectId> {
        match parent {
            None => self.root_objects.read().clone(),
            Some(object) => self.tree.children(object),
        }
    }

    /// Returns the number of children of `parent`, or of top-level objects for `None`.
    pub fn child_count(&self, parent: Option<ObjectId>) -> usize {
        match parent {
            None => self.root_objects.read().len(),
            Some(object) => self.tree.children(object).len(),
        }
    }

    /// Returns the object addressed by `index`.
    ///
    /// Returns `None` for invalid indices, columns other than 0, and rows
    /// past the end of the live child list.
    pub fn object_for_index(&self, index: &ModelIndex) -> Option<ObjectId> {
        if !index.is_valid() || index.column() != 0 {
            return None;
        }
        match index.parent_object() {
            None => self.root_objects.read().get(index.row()).copied(),
            Some(parent) => self.tree.children(parent).get(index.row()).copied(),
        }
    }

    /// Returns the index addressing `object`.
    ///
    /// Top-level objects are addressed by their position in the root list.
    /// Any other object is addressed by its position among its parent's
    /// children. Returns an invalid index if `object` is not part of the
    /// model.
    pub fn index_for_object(&self, object: impl Into<Option<ObjectId>>) -> ModelIndex {
        let Some(object) = object.into() else {
            return ModelIndex::invalid();
        };
        if let Some(row) = self.root_row(object) {
            return ModelIndex::new(row, 0, None);
        }
        if !self.is_reachable(object) {
            return ModelIndex::invalid();
        }
        self.index_under_parent(object)
    }

    /// Returns `true` if `object` is a top-level object or a descendant of one.
    pub fn contains(&self, object: ObjectId) -> bool {
        self.is_reachable(object)
    }

    fn root_row(&self, object: ObjectId) -> Option<usize> {
        self.root_objects.read().iter().position(|&o| o == object)
    }

    fn is_reachable(&self, object: ObjectId) -> bool {
        let roots = self.root_objects.read();
        let mut current = object;
        loop {
            if roots.contains(&current) {
                return true;
            }
            match self.tree.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Index of a non-top-level object from its parent's live child list.
    fn index_under_parent(&self, object: ObjectId) -> ModelIndex {
        let Some(parent) = self.tree.parent(object) else {
            return ModelIndex::invalid();
        };
        match self.tree.children(parent).iter().position(|&o| o == object) {
            Some(row) => ModelIndex::new(row, 0, Some(parent)),
            None => ModelIndex::invalid(),
        }
    }

    /// Names of the roles this model answers in [`ItemModel::data`].
    pub fn role_names(&self) -> Vec<(ItemRole, &'static str)> {
        vec![
            (ItemRole::Display, "display"),
            (ItemRole::ToolTip, "toolTip"),
            (ItemRole::Object, "object"),
            (ItemRole::ObjectId, "objectid"),
        ]
    }

    // -------------------------------------------------------------------------
    // Mutation brackets
    // -------------------------------------------------------------------------

    /// Returns `true` while a mutation guard is open.
    pub fn is_mutating(&self) -> bool {
        self.pending.lock().is_some()
    }

    pub(super) fn begin_operation(&self, operation: PendingOperation) {
        {
            let mut pending = self.pending.lock();
            if let Some(open) = pending.as_ref().map(PendingOperation::name) {
                let message = format!(
                    "cannot begin {} while {} is still open",
                    operation.name(),
                    open
                );
                drop(pending);
                super::operations::contract_violation(&message);
            }
            *pending = Some(operation.clone());
        }

        if self.config.trace_notifications {
            tracing::debug!(target: targets::MODEL, ?operation, "about to change");
        }
        match operation {
            PendingOperation::Insert {
                parent,
                first,
                last,
                ..
            } => self.signals.rows_about_to_be_inserted.emit((parent, first, last)),
            PendingOperation::Remove { parent, row, .. } => {
                self.signals.rows_about_to_be_removed.emit((parent, row, row))
            }
            PendingOperation::Move {
                source_parent,
                source_row,
                destination_parent,
                destination_row,
                ..
            } => self.signals.rows_about_to_be_moved.emit((
                source_parent,
                source_row,
                source_row,
                destination_parent,
                destination_row,
            )),
            PendingOperation::Reset => self.signals.model_about_to_reset.emit(()),
        }
    }

    pub(super) fn end_operation(&self) {
        let Some(operation) = self.pending.lock().take() else {
            tracing::warn!(target: targets::MODEL, "end of mutation without a matching begin");
            return;
        };

        if self.config.trace_notifications {
            tracing::debug!(target: targets::MODEL, ?operation, "changed");
        }
        match &operation {
            PendingOperation::Insert {
                parent,
                first,
                last,
                ..
            } => self.signals.rows_inserted.emit((*parent, *first, *last)),
            PendingOperation::Remove { parent, row, .. } => {
                self.signals.rows_removed.emit((*parent, *row, *row))
            }
            PendingOperation::Move {
                source_parent,
                source_row,
                destination_parent,
                destination_row,
                ..
            } => self.signals.rows_moved.emit((
                *source_parent,
                *source_row,
                *source_row,
                *destination_parent,
                *destination_row,
            )),
            PendingOperation::Reset => self.signals.model_reset.emit(()),
        }

        // Checked after "done" so observers always see a closed bracket.
        if self.config.verify_mutations && !std::thread::panicking() {
            if let Err(message) = operation.verify(self) {
                super::operations::contract_violation(&message);
            }
        }
    }
}

impl ItemModel for ObjectTreeModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        if !parent.is_valid() {
            return self.child_count(None);
        }
        self.object_for_index(parent)
            .map_or(0, |object| self.child_count(Some(object)))
    }

    fn column_count(&self, _parent: &ModelIndex) -> usize {
        1
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        let Some(object) = self.object_for_index(index) else {
            return ItemData::None;
        };
        match role {
            ItemRole::Display => ItemData::String(format!("0x{:x}", object.as_raw())),
            ItemRole::ToolTip => self.tree.object_name(object).map_or(ItemData::None, ItemData::String),
            ItemRole::Object => ItemData::Object(object),
            ItemRole::ObjectId => ItemData::Int(object.as_raw()),
            ItemRole::User(_) => ItemData::None,
        }
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if column != 0 {
            return ModelIndex::invalid();
        }
        let parent_object = if parent.is_valid() {
            match self.object_for_index(parent) {
                Some(object) => Some(object),
                None => return ModelIndex::invalid(),
            }
        } else {
            None
        };
        if row >= self.child_count(parent_object) {
            return ModelIndex::invalid();
        }
        ModelIndex::new(row, 0, parent_object)
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        if self.object_for_index(index).is_none() || index.is_top_level() {
            return ModelIndex::invalid();
        }
        let Some(parent) = index.parent_object() else {
            return ModelIndex::invalid();
        };
        // One generation up: the parent's row lives in the grandparent's
        // children, or in the root list.
        if let Some(row) = self.root_row(parent) {
            return ModelIndex::new(row, 0, None);
        }
        self.index_under_parent(parent)
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }
}

static_assertions::assert_impl_all!(ObjectTreeModel: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_statechart_core::SharedObjectRegistry;

    struct Fixture {
        registry: Arc<SharedObjectRegistry>,
        model: ObjectTreeModel,
        root: ObjectId,
        a: ObjectId,
        b: ObjectId,
        a1: ObjectId,
    }

    fn fixture() -> Fixture {
        let registry = Arc::new(SharedObjectRegistry::new());
        let root = registry.create("root");
        let a = registry.create_child(root, "a").unwrap();
        let b = registry.create_child(root, "b").unwrap();
        let a1 = registry.create_child(a, "a1").unwrap();

        let model = ObjectTreeModel::new(registry.clone());
        model.append_root_object(root);
        Fixture {
            registry,
            model,
            root,
            a,
            b,
            a1,
        }
    }

    #[test]
    fn test_child_count() {
        let f = fixture();
        assert_eq!(f.model.child_count(None), 1);
        assert_eq!(f.model.child_count(Some(f.root)), 2);
        assert_eq!(f.model.child_count(Some(f.a)), 1);
        assert_eq!(f.model.child_count(Some(f.b)), 0);
    }

    #[test]
    fn test_index_for_object() {
        let f = fixture();
        assert_eq!(f.model.index_for_object(f.root), ModelIndex::new(0, 0, None));
        assert_eq!(f.model.index_for_object(f.b), ModelIndex::new(1, 0, Some(f.root)));
        assert_eq!(f.model.index_for_object(f.a1), ModelIndex::new(0, 0, Some(f.a)));
        assert!(!f.model.index_for_object(None::<ObjectId>).is_valid());
    }

    #[test]
    fn test_unreachable_object_has_no_index() {
        let f = fixture();
        let stray = f.registry.create("stray");
        let stray_child = f.registry.create_child(stray, "stray_child").unwrap();
        assert!(!f.model.index_for_object(stray).is_valid());
        assert!(!f.model.index_for_object(stray_child).is_valid());
        assert!(!f.model.contains(stray_child));
    }

    #[test]
    fn test_object_for_index() {
        let f = fixture();
        assert_eq!(f.model.object_for_index(&ModelIndex::new(0, 0, None)), Some(f.root));
        assert_eq!(f.model.object_for_index(&ModelIndex::new(1, 0, Some(f.root))), Some(f.b));
        assert_eq!(f.model.object_for_index(&ModelIndex::new(2, 0, Some(f.root))), None);
        assert_eq!(f.model.object_for_index(&ModelIndex::new(0, 1, Some(f.root))), None);
        assert_eq!(f.model.object_for_index(&ModelIndex::invalid()), None);
    }

    #[test]
    fn test_item_model_navigation() {
        let f = fixture();
        let top = ModelIndex::invalid();
        assert_eq!(f.model.row_count(&top), 1);

        let root_index = f.model.index(0, 0, &top);
        assert_eq!(f.model.row_count(&root_index), 2);
        assert!(!f.model.index(0, 1, &top).is_valid());
        assert!(!f.model.index(1, 0, &top).is_valid());

        let a_index = f.model.index(0, 0, &root_index);
        let a1_index = f.model.index(0, 0, &a_index);
        assert_eq!(f.model.object_for_index(&a1_index), Some(f.a1));

        assert_eq!(f.model.parent(&a1_index), a_index);
        assert_eq!(f.model.parent(&a_index), root_index);
        assert!(!f.model.parent(&root_index).is_valid());
        assert!(f.model.has_children(&a_index));
        assert!(!f.model.has_children(&f.model.index_for_object(f.b)));
        assert_eq!(f.model.sibling(&a_index, 1, 0), f.model.index_for_object(f.b));
    }

    #[test]
    fn test_stale_index_resolves_to_nothing() {
        let f = fixture();
        let b_index = f.model.index_for_object(f.b);
        f.registry.destroy(f.b).unwrap();
        assert_eq!(f.model.object_for_index(&b_index), None);
        assert!(!f.model.parent(&b_index).is_valid());
        assert_eq!(f.model.row_count(&b_index), 0);
    }

    #[test]
    fn test_data_roles() {
        let f = fixture();
        let index = f.model.index_for_object(f.a);
        assert_eq!(
            f.model.display_text(&index),
            Some(format!("0x{:x}", f.a.as_raw()))
        );
        assert_eq!(f.model.data(&index, ItemRole::ToolTip).as_string(), Some("a"));
        assert_eq!(f.model.data(&index, ItemRole::Object).as_object(), Some(f.a));
        assert_eq!(f.model.data(&index, ItemRole::ObjectId).as_int(), Some(f.a.as_raw()));
        assert!(f.model.data(&index, ItemRole::User(1)).is_none());
        assert!(f.model.data(&ModelIndex::invalid(), ItemRole::Display).is_none());
        assert_eq!(f.model.role_names().len(), 4);
    }

    #[test]
    fn test_root_object_that_has_a_tree_parent() {
        let f = fixture();
        // A root-list entry with a tree parent is addressed through the root list.
        f.model.append_root_object(f.a);
        assert_eq!(f.model.index_for_object(f.a), ModelIndex::new(1, 0, None));
        assert!(!f.model.parent(&ModelIndex::new(1, 0, None)).is_valid());

        let a1_index = f.model.index_for_object(f.a1);
        assert_eq!(f.model.parent(&a1_index), ModelIndex::new(1, 0, None));
    }

    #[test]
    fn test_set_root_objects_drops_none_and_duplicates() {
        let f = fixture();
        f.model
            .set_root_objects([Some(f.b), None, Some(f.root), Some(f.b)]);
        assert_eq!(f.model.root_objects(), vec![f.b, f.root]);

        f.model.set_root_object(f.a);
        assert_eq!(f.model.root_objects(), vec![f.a]);

        f.model.set_root_object(None::<ObjectId>);
        assert!(f.model.root_objects().is_empty());
    }

    #[test]
    fn test_append_root_object_ignores_none_and_duplicates() {
        let f = fixture();
        f.model.append_root_object(None::<ObjectId>);
        f.model.append_root_object(f.root);
        assert_eq!(f.model.root_objects(), vec![f.root]);
        assert!(f.model.is_root_object(f.root));
        assert!(!f.model.is_root_object(f.a));
    }

    #[test]
    fn test_clear() {
        let f = fixture();
        f.model.clear();
        assert_eq!(f.model.child_count(None), 0);
        assert!(!f.model.index_for_object(f.a).is_valid());
        assert!(!f.model.is_mutating());
    }
}
