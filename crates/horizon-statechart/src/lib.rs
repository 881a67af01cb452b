//! Horizon Statechart - hierarchical view models for state-chart editors.
//!
//! This is the main crate; it re-exports the core object tree, signal and
//! error types and adds the [`model`] module.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_statechart::SharedObjectRegistry;
//! use horizon_statechart::model::{ItemModel, ModelIndex, ObjectTreeModel};
//!
//! let registry = Arc::new(SharedObjectRegistry::new());
//! let machine = registry.create("machine");
//! registry.create_child(machine, "idle").unwrap();
//!
//! let model = ObjectTreeModel::new(registry.clone());
//! model.append_root_object(machine);
//!
//! let top = model.index(0, 0, &ModelIndex::invalid());
//! assert_eq!(model.row_count(&top), 1);
//! ```

pub use horizon_statechart_core::*;

pub mod model;
