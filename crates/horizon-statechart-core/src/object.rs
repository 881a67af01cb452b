//! Object tree for Horizon Statechart.
//!
//! Provides the externally owned node tree that state-chart elements live in:
//! - Unique object identifiers via arena-based storage
//! - Parent-child relationships with an ordered child list per object
//! - Cascading destruction of subtrees
//! - Object naming and lookup
//!
//! Views never write to this tree. The application (or an editor command)
//! mutates it, and wraps every structural change in one of the model's
//! mutation guards so that observers stay synchronized.
//!
//! # Key Types
//!
//! - [`ObjectId`] - Unique stable identifier for each object
//! - [`ObjectRegistry`] - Arena holding all objects and their relationships
//! - [`SharedObjectRegistry`] - Thread-safe wrapper around [`ObjectRegistry`]

use std::fmt;

use parking_lot::RwLock;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for an object in the registry.
    ///
    /// `ObjectId`s are stable handles that remain valid even as the object tree changes.
    /// They become invalid when the object is destroyed.
    pub struct ObjectId;
}

impl ObjectId {
    /// Convert the ObjectId to a raw u64 value.
    ///
    /// This is useful for interop with external systems that need a numeric ID.
    /// The raw value can be converted back using [`ObjectId::from_raw`].
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create an ObjectId from a raw u64 value.
    ///
    /// Note: This does not check if the ObjectId exists in the registry.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// Errors that can occur during object operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// The object ID is invalid or has been destroyed.
    InvalidObjectId,
    /// Attempted to set an object as its own parent/ancestor.
    CircularParentage,
    /// A positional insert named a row past the end of the child list.
    RowOutOfRange {
        /// The requested row.
        row: usize,
        /// The current number of children.
        count: usize,
    },
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidObjectId => write!(f, "Invalid or destroyed object ID"),
            Self::CircularParentage => {
                write!(f, "Cannot set an object as its own parent or ancestor")
            }
            Self::RowOutOfRange { row, count } => {
                write!(f, "Row {row} is out of range for {count} children")
            }
        }
    }
}

impl std::error::Error for ObjectError {}

/// Result type for object operations.
pub type ObjectResult<T> = std::result::Result<T, ObjectError>;

/// Internal data stored in the registry for each object.
struct ObjectData {
    /// Human-readable name for debugging and lookup.
    name: String,
    /// Parent object (if any).
    parent: Option<ObjectId>,
    /// Child objects, in order.
    children: Vec<ObjectId>,
}

impl ObjectData {
    fn new(name: String) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// The central registry that manages all objects and their relationships.
///
/// Uses arena-based storage via SlotMap for stable object IDs and efficient
/// parent-child relationship management.
pub struct ObjectRegistry {
    objects: SlotMap<ObjectId, ObjectData>,
}

impl ObjectRegistry {
    /// Create a new empty object registry.
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
        }
    }

    /// Create a new parentless object and return its ID.
    pub fn create(&mut self, name: impl Into<String>) -> ObjectId {
        let name = name.into();
        let id = self.objects.insert(ObjectData::new(name));
        tracing::trace!(target: targets::OBJECT, ?id, "created object");
        id
    }

    /// Create a new object appended to `parent`'s children.
    pub fn create_child(
        &mut self,
        parent: ObjectId,
        name: impl Into<String>,
    ) -> ObjectResult<ObjectId> {
        if !self.objects.contains_key(parent) {
            return Err(ObjectError::InvalidObjectId);
        }
        let id = self.create(name);
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Remove an object and all its children from the registry.
    ///
    /// Destroying a parent also destroys all of its descendants.
    #[tracing::instrument(skip(self), target = "horizon_statechart_core::object", level = "trace")]
    pub fn destroy(&mut self, id: ObjectId) -> ObjectResult<()> {
        let descendants = self.collect_descendants(id)?;
        tracing::trace!(target: targets::OBJECT, ?id, descendant_count = descendants.len(), "destroying object tree");

        self.detach(id);
        for child_id in descendants {
            self.objects.remove(child_id);
        }
        self.objects.remove(id);

        Ok(())
    }

    /// Collect all descendant IDs in depth-first order (children before parents).
    fn collect_descendants(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        let mut result = Vec::new();
        self.collect_descendants_recursive(id, &mut result)?;
        Ok(result)
    }

    fn collect_descendants_recursive(
        &self,
        id: ObjectId,
        result: &mut Vec<ObjectId>,
    ) -> ObjectResult<()> {
        let data = self.objects.get(id).ok_or(ObjectError::InvalidObjectId)?;
        for &child_id in &data.children {
            self.collect_descendants_recursive(child_id, result)?;
            result.push(child_id);
        }
        Ok(())
    }

    /// Remove `id` from its parent's child list and clear its parent link.
    fn detach(&mut self, id: ObjectId) {
        let old_parent = self.objects.get_mut(id).and_then(|d| d.parent.take());
        if let Some(parent_data) = old_parent.and_then(|p| self.objects.get_mut(p)) {
            parent_data.children.retain(|&child| child != id);
        }
    }

    /// Check if an object exists in the registry.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Set the parent of an object.
    ///
    /// This handles removing from the old parent and appending to the end of
    /// the new parent's children. Passing `None` makes the object parentless.
    pub fn set_parent(&mut self, id: ObjectId, new_parent: Option<ObjectId>) -> ObjectResult<()> {
        self.validate_new_parent(id, new_parent)?;

        self.detach(id);
        if let Some(data) = self.objects.get_mut(id) {
            data.parent = new_parent;
        }
        if let Some(parent_data) = new_parent.and_then(|p| self.objects.get_mut(p)) {
            parent_data.children.push(id);
        }

        tracing::trace!(target: targets::OBJECT, ?id, ?new_parent, "reparented object");
        Ok(())
    }

    /// Insert `child` into `parent`'s children at `row`, detaching it from
    /// any previous parent first.
    ///
    /// `row` may equal the current child count, which appends.
    pub fn insert_child(&mut self, parent: ObjectId, row: usize, child: ObjectId) -> ObjectResult<()> {
        self.validate_new_parent(child, Some(parent))?;

        // Row is checked against the child list as it will be once `child`
        // has left its current position.
        let siblings = self.children(parent)?;
        let count = siblings.len() - usize::from(siblings.contains(&child));
        if row > count {
            return Err(ObjectError::RowOutOfRange { row, count });
        }

        self.detach(child);
        if let Some(parent_data) = self.objects.get_mut(parent) {
            parent_data.children.insert(row, child);
        }
        if let Some(data) = self.objects.get_mut(child) {
            data.parent = Some(parent);
        }

        tracing::trace!(target: targets::OBJECT, ?child, ?parent, row, "inserted child");
        Ok(())
    }

    fn validate_new_parent(&self, id: ObjectId, new_parent: Option<ObjectId>) -> ObjectResult<()> {
        if !self.objects.contains_key(id) {
            return Err(ObjectError::InvalidObjectId);
        }
        if let Some(parent_id) = new_parent {
            if !self.objects.contains_key(parent_id) {
                return Err(ObjectError::InvalidObjectId);
            }
            if self.is_ancestor_of(id, parent_id) {
                return Err(ObjectError::CircularParentage);
            }
        }
        Ok(())
    }

    /// Check if `potential_ancestor` is `id` or one of its ancestors.
    fn is_ancestor_of(&self, potential_ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.objects.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// Get the parent of an object.
    pub fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.objects
            .get(id)
            .map(|d| d.parent)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the children of an object.
    pub fn children(&self, id: ObjectId) -> ObjectResult<&[ObjectId]> {
        self.objects
            .get(id)
            .map(|d| d.children.as_slice())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the object's name.
    pub fn object_name(&self, id: ObjectId) -> ObjectResult<&str> {
        self.objects
            .get(id)
            .map(|d| d.name.as_str())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Set the object's name.
    pub fn set_object_name(&mut self, id: ObjectId, name: impl Into<String>) -> ObjectResult<()> {
        let name = name.into();
        self.objects
            .get_mut(id)
            .map(|d| d.name = name)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the number of registered objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Iterate over all root objects (objects with no parent).
    pub fn root_objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects
            .iter()
            .filter(|(_, data)| data.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Get all ancestors of an object from immediate parent to root.
    pub fn ancestors(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        if !self.objects.contains_key(id) {
            return Err(ObjectError::InvalidObjectId);
        }

        let mut result = Vec::new();
        let mut current = self.objects.get(id).and_then(|d| d.parent);

        while let Some(current_id) = current {
            result.push(current_id);
            current = self.objects.get(current_id).and_then(|d| d.parent);
        }

        Ok(result)
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A thread-safe wrapper around [`ObjectRegistry`].
///
/// Provides concurrent read access with exclusive write access via `RwLock`.
/// Each call takes the lock for its own duration only, so model code reading
/// the tree from a signal handler never contends with a finished mutation.
pub struct SharedObjectRegistry {
    inner: RwLock<ObjectRegistry>,
}

impl SharedObjectRegistry {
    /// Create a new shared registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ObjectRegistry::new()),
        }
    }

    /// Create a new parentless object.
    pub fn create(&self, name: impl Into<String>) -> ObjectId {
        self.inner.write().create(name)
    }

    /// Create a new object appended to `parent`'s children.
    pub fn create_child(&self, parent: ObjectId, name: impl Into<String>) -> ObjectResult<ObjectId> {
        self.inner.write().create_child(parent, name)
    }

    /// Destroy an object and its descendants.
    pub fn destroy(&self, id: ObjectId) -> ObjectResult<()> {
        self.inner.write().destroy(id)
    }

    /// Check if an object exists.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.inner.read().contains(id)
    }

    /// Set the parent of an object.
    pub fn set_parent(&self, id: ObjectId, parent: Option<ObjectId>) -> ObjectResult<()> {
        self.inner.write().set_parent(id, parent)
    }

    /// Insert `child` into `parent`'s children at `row`.
    pub fn insert_child(&self, parent: ObjectId, row: usize, child: ObjectId) -> ObjectResult<()> {
        self.inner.write().insert_child(parent, row, child)
    }

    /// Get the parent of an object.
    pub fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.inner.read().parent(id)
    }

    /// Get the children of an object (cloned).
    pub fn children(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        self.inner.read().children(id).map(|c| c.to_vec())
    }

    /// Get the object's name (cloned).
    pub fn object_name(&self, id: ObjectId) -> ObjectResult<String> {
        self.inner.read().object_name(id).map(|s| s.to_string())
    }

    /// Set the object's name.
    pub fn set_object_name(&self, id: ObjectId, name: impl Into<String>) -> ObjectResult<()> {
        self.inner.write().set_object_name(id, name)
    }

    /// Get the number of objects.
    pub fn object_count(&self) -> usize {
        self.inner.read().object_count()
    }

    /// Get all root objects.
    pub fn root_objects(&self) -> Vec<ObjectId> {
        self.inner.read().root_objects().collect()
    }

    /// Get all ancestors of an object.
    pub fn ancestors(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        self.inner.read().ancestors(id)
    }

    /// Execute a function with read access to the registry.
    pub fn with_read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ObjectRegistry) -> R,
    {
        f(&self.inner.read())
    }
}

impl Default for SharedObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(SharedObjectRegistry: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_name() {
        let mut registry = ObjectRegistry::new();
        let id = registry.create("machine");
        assert!(registry.contains(id));
        assert_eq!(registry.object_name(id).unwrap(), "machine");
        assert_eq!(registry.parent(id).unwrap(), None);

        registry.set_object_name(id, "renamed").unwrap();
        assert_eq!(registry.object_name(id).unwrap(), "renamed");
    }

    #[test]
    fn test_parent_child_relationship() {
        let mut registry = ObjectRegistry::new();
        let parent = registry.create("parent");
        let child1 = registry.create_child(parent, "child1").unwrap();
        let child2 = registry.create_child(parent, "child2").unwrap();

        assert_eq!(registry.children(parent).unwrap(), &[child1, child2]);
        assert_eq!(registry.parent(child1).unwrap(), Some(parent));
        assert_eq!(registry.parent(parent).unwrap(), None);
    }

    #[test]
    fn test_set_parent_moves_to_end() {
        let mut registry = ObjectRegistry::new();
        let a = registry.create("a");
        let b = registry.create("b");
        let x = registry.create_child(a, "x").unwrap();
        let y = registry.create_child(b, "y").unwrap();

        registry.set_parent(x, Some(b)).unwrap();
        assert!(registry.children(a).unwrap().is_empty());
        assert_eq!(registry.children(b).unwrap(), &[y, x]);

        registry.set_parent(x, None).unwrap();
        assert_eq!(registry.parent(x).unwrap(), None);
        assert_eq!(registry.children(b).unwrap(), &[y]);
    }

    #[test]
    fn test_insert_child_at_row() {
        let mut registry = ObjectRegistry::new();
        let parent = registry.create("parent");
        let first = registry.create_child(parent, "first").unwrap();
        let last = registry.create_child(parent, "last").unwrap();
        let middle = registry.create("middle");

        registry.insert_child(parent, 1, middle).unwrap();
        assert_eq!(registry.children(parent).unwrap(), &[first, middle, last]);

        let stray = registry.create("stray");
        assert_eq!(
            registry.insert_child(parent, 9, stray),
            Err(ObjectError::RowOutOfRange { row: 9, count: 3 })
        );
        assert_eq!(registry.parent(stray).unwrap(), None);
    }

    #[test]
    fn test_failed_insert_leaves_tree_untouched() {
        let mut registry = ObjectRegistry::new();
        let p = registry.create("p");
        let q = registry.create("q");
        let c = registry.create_child(p, "c").unwrap();

        assert_eq!(
            registry.insert_child(q, 5, c),
            Err(ObjectError::RowOutOfRange { row: 5, count: 0 })
        );
        assert_eq!(registry.parent(c).unwrap(), Some(p));
        assert_eq!(registry.children(p).unwrap(), &[c]);
        assert!(registry.children(q).unwrap().is_empty());
    }

    #[test]
    fn test_insert_child_within_same_parent() {
        let mut registry = ObjectRegistry::new();
        let p = registry.create("p");
        let a = registry.create_child(p, "a").unwrap();
        let b = registry.create_child(p, "b").unwrap();

        // Moving `a` to the end: two children remain besides it, so row 2 is the last slot.
        registry.insert_child(p, 2, a).unwrap();
        assert_eq!(registry.children(p).unwrap(), &[b, a]);
        assert_eq!(
            registry.insert_child(p, 3, a),
            Err(ObjectError::RowOutOfRange { row: 3, count: 1 })
        );
        assert_eq!(registry.children(p).unwrap(), &[b, a]);
    }

    #[test]
    fn test_circular_parentage_rejected() {
        let mut registry = ObjectRegistry::new();
        let root = registry.create("root");
        let child = registry.create_child(root, "child").unwrap();
        let grandchild = registry.create_child(child, "grandchild").unwrap();

        assert_eq!(registry.set_parent(root, Some(grandchild)), Err(ObjectError::CircularParentage));
        assert_eq!(registry.set_parent(root, Some(root)), Err(ObjectError::CircularParentage));
    }

    #[test]
    fn test_destroy_cascades() {
        let mut registry = ObjectRegistry::new();
        let root = registry.create("root");
        let child = registry.create_child(root, "child").unwrap();
        let grandchild = registry.create_child(child, "grandchild").unwrap();
        let sibling = registry.create_child(root, "sibling").unwrap();

        registry.destroy(child).unwrap();
        assert!(!registry.contains(child));
        assert!(!registry.contains(grandchild));
        assert_eq!(registry.children(root).unwrap(), &[sibling]);
        assert_eq!(registry.object_count(), 2);
        assert_eq!(registry.destroy(child), Err(ObjectError::InvalidObjectId));
    }

    #[test]
    fn test_ancestors_and_roots() {
        let mut registry = ObjectRegistry::new();
        let root = registry.create("root");
        let a = registry.create_child(root, "a").unwrap();
        let b = registry.create_child(root, "b").unwrap();
        let a1 = registry.create_child(a, "a1").unwrap();

        assert_eq!(registry.ancestors(a1).unwrap(), vec![a, root]);
        assert_eq!(registry.ancestors(b).unwrap(), vec![root]);
        assert_eq!(registry.root_objects().collect::<Vec<_>>(), vec![root]);
    }

    #[test]
    fn test_raw_id_roundtrip() {
        let mut registry = ObjectRegistry::new();
        let id = registry.create("x");
        assert_eq!(ObjectId::from_raw(id.as_raw()), id);
    }

    #[test]
    fn test_shared_registry() {
        let registry = SharedObjectRegistry::new();
        let root = registry.create("root");
        let child = registry.create_child(root, "child").unwrap();

        assert_eq!(registry.children(root).unwrap(), vec![child]);
        assert_eq!(registry.object_name(child).unwrap(), "child");
        assert_eq!(registry.with_read(|r| r.object_count()), 2);

        registry.destroy(child).unwrap();
        assert!(!registry.contains(child));
    }
}
