//! Model index for addressing items in hierarchical models.
//!
//! A `ModelIndex` names a row under a parent. The parent is not a chain of
//! indices but the identity of the object whose child list contains the
//! addressed item, or the root-list sentinel for top-level rows. Resolving an
//! index therefore takes one lookup in the live tree, and resolving its
//! parent walks exactly one generation further up.

use horizon_statechart_core::ObjectId;

/// Represents a position within an `ItemModel`.
///
/// Each valid index contains:
/// - Row and column within the parent
/// - The identity of the parent object (`None` for root-list rows)
///
/// # Index Validity
///
/// Model indices are short-lived. They must be used immediately and not
/// stored: after any structural change (insertion, removal, move, reset) a
/// previously obtained index may address a different item or nothing.
///
/// # Example
///
/// ```
/// use horizon_statechart::model::ModelIndex;
///
/// let root = ModelIndex::invalid();
/// assert!(!root.is_valid());
///
/// let top = ModelIndex::new(2, 0, None);
/// assert!(top.is_valid());
/// assert!(top.is_top_level());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModelIndex {
    position: Option<Position>,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct Position {
    row: usize,
    column: usize,
    parent: Option<ObjectId>,
}

impl ModelIndex {
    /// Creates an invalid (null) model index.
    ///
    /// An invalid index is used to represent:
    /// - The root of the model (as a parent reference)
    /// - A non-existent or out-of-bounds item
    #[inline]
    pub const fn invalid() -> Self {
        Self { position: None }
    }

    /// Creates a new valid model index.
    ///
    /// This is typically called by model implementations rather than
    /// directly. `parent` is the object whose children contain the row, or
    /// `None` for a row of the root list.
    #[inline]
    pub const fn new(row: usize, column: usize, parent: Option<ObjectId>) -> Self {
        Self {
            position: Some(Position {
                row,
                column,
                parent,
            }),
        }
    }

    /// Returns `true` if this is a valid index.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.position.is_some()
    }

    /// Returns the row of this index within its parent.
    ///
    /// Returns 0 for invalid indices.
    #[inline]
    pub fn row(&self) -> usize {
        self.position.map_or(0, |p| p.row)
    }

    /// Returns the column of this index within its parent.
    ///
    /// Returns 0 for invalid indices.
    #[inline]
    pub fn column(&self) -> usize {
        self.position.map_or(0, |p| p.column)
    }

    /// Returns the identity of the object whose children contain this row.
    ///
    /// `None` for root-list rows and for invalid indices.
    #[inline]
    pub fn parent_object(&self) -> Option<ObjectId> {
        self.position.and_then(|p| p.parent)
    }

    /// Returns `true` if this is a valid index addressing a root-list row.
    #[inline]
    pub fn is_top_level(&self) -> bool {
        matches!(self.position, Some(Position { parent: None, .. }))
    }

    /// Creates an index for another row under the same parent.
    ///
    /// This only builds the address; it does not check the row against a
    /// model. Returns an invalid index if this index is invalid.
    #[inline]
    pub fn sibling_at_row(&self, row: usize) -> ModelIndex {
        match self.position {
            Some(p) => ModelIndex::new(row, p.column, p.parent),
            None => ModelIndex::invalid(),
        }
    }
}

impl std::fmt::Debug for ModelIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(p) => f
                .debug_struct("ModelIndex")
                .field("row", &p.row)
                .field("column", &p.column)
                .field("parent", &p.parent)
                .finish(),
            None => write!(f, "ModelIndex(invalid)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_statechart_core::ObjectRegistry;

    #[test]
    fn test_invalid_index() {
        let index = ModelIndex::invalid();
        assert!(!index.is_valid());
        assert_eq!(index.row(), 0);
        assert_eq!(index.column(), 0);
        assert_eq!(index.parent_object(), None);
        assert!(!index.is_top_level());
        assert_eq!(index, ModelIndex::default());
    }

    #[test]
    fn test_top_level_index() {
        let index = ModelIndex::new(3, 0, None);
        assert!(index.is_valid());
        assert!(index.is_top_level());
        assert_eq!(index.row(), 3);
    }

    #[test]
    fn test_child_index_and_equality() {
        let mut registry = ObjectRegistry::new();
        let a = registry.create("a");
        let b = registry.create("b");

        let under_a = ModelIndex::new(1, 0, Some(a));
        assert!(!under_a.is_top_level());
        assert_eq!(under_a.parent_object(), Some(a));

        assert_eq!(under_a, ModelIndex::new(1, 0, Some(a)));
        assert_ne!(under_a, ModelIndex::new(1, 0, Some(b)));
        assert_ne!(under_a, ModelIndex::new(1, 0, None));
        assert_ne!(ModelIndex::new(0, 0, None), ModelIndex::invalid());
    }

    #[test]
    fn test_sibling_at_row() {
        let index = ModelIndex::new(1, 0, None);
        assert_eq!(index.sibling_at_row(4), ModelIndex::new(4, 0, None));
        assert!(!ModelIndex::invalid().sibling_at_row(1).is_valid());
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", ModelIndex::invalid()), "ModelIndex(invalid)");
        assert!(format!("{:?}", ModelIndex::new(2, 0, None)).contains("row: 2"));
    }
}
