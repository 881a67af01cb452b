//! Depth-first traversal over any [`ItemModel`].

use super::index::ModelIndex;
use super::traits::ItemModel;

/// What a visitor wants the walk to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitResult {
    /// Skip the children of this item and continue with its next sibling.
    ///
    /// In a post-order walk the children have already been visited, so this
    /// behaves like [`VisitResult::Recursive`].
    Continue,
    /// Visit the children of this item.
    Recursive,
    /// End the walk.
    Stop,
}

/// Whether an item is visited before or after its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalType {
    /// Visit an item before its children.
    #[default]
    PreOrder,
    /// Visit an item after its children.
    PostOrder,
}

/// Walks a model depth-first by querying it through [`ItemModel`].
///
/// The walker holds no state between walks; the model must not be mutated
/// while a walk is in progress.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_statechart::model::{ObjectTreeModel, TreeWalker, VisitResult};
/// use horizon_statechart_core::SharedObjectRegistry;
///
/// let registry = Arc::new(SharedObjectRegistry::new());
/// let machine = registry.create("machine");
/// registry.create_child(machine, "idle").unwrap();
///
/// let model = ObjectTreeModel::new(registry.clone());
/// model.set_root_object(machine);
///
/// let mut count = 0;
/// TreeWalker::default().walk_model(&model, |_| {
///     count += 1;
///     VisitResult::Recursive
/// });
/// assert_eq!(count, 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeWalker {
    traversal: TraversalType,
}

impl TreeWalker {
    /// Creates a walker with the given traversal order.
    pub fn new(traversal: TraversalType) -> Self {
        Self { traversal }
    }

    /// Returns the traversal order.
    pub fn traversal(&self) -> TraversalType {
        self.traversal
    }

    /// Walks `index` and its descendants.
    ///
    /// Returns `false` if a visitor returned [`VisitResult::Stop`].
    pub fn walk_items<M, F>(&self, model: &M, index: &ModelIndex, mut visit: F) -> bool
    where
        M: ItemModel + ?Sized,
        F: FnMut(&ModelIndex) -> VisitResult,
    {
        self.walk_item(model, index, &mut visit)
    }

    /// Walks the descendants of `parent`, but not `parent` itself.
    ///
    /// An invalid `parent` walks the whole model.
    pub fn walk_children<M, F>(&self, model: &M, parent: &ModelIndex, mut visit: F) -> bool
    where
        M: ItemModel + ?Sized,
        F: FnMut(&ModelIndex) -> VisitResult,
    {
        self.walk_below(model, parent, &mut visit)
    }

    /// Walks every item of the model.
    pub fn walk_model<M, F>(&self, model: &M, visit: F) -> bool
    where
        M: ItemModel + ?Sized,
        F: FnMut(&ModelIndex) -> VisitResult,
    {
        self.walk_children(model, &ModelIndex::invalid(), visit)
    }

    fn walk_item<M, F>(&self, model: &M, index: &ModelIndex, visit: &mut F) -> bool
    where
        M: ItemModel + ?Sized,
        F: FnMut(&ModelIndex) -> VisitResult,
    {
        match self.traversal {
            TraversalType::PreOrder => match visit(index) {
                VisitResult::Stop => false,
                VisitResult::Continue => true,
                VisitResult::Recursive => self.walk_below(model, index, visit),
            },
            TraversalType::PostOrder => {
                self.walk_below(model, index, visit) && visit(index) != VisitResult::Stop
            }
        }
    }

    fn walk_below<M, F>(&self, model: &M, parent: &ModelIndex, visit: &mut F) -> bool
    where
        M: ItemModel + ?Sized,
        F: FnMut(&ModelIndex) -> VisitResult,
    {
        (0..model.row_count(parent)).all(|row| {
            let child = model.index(row, 0, parent);
            self.walk_item(model, &child, visit)
        })
    }
}
