//! Model/View adapter for Horizon Statechart.
//!
//! This module exposes an externally owned object tree (states, regions and
//! transitions of a state chart) as a hierarchical item model that scene
//! builders, item instantiators and layout walkers can follow:
//!
//! - Addressing by object identity, recomputed from the live tree on every
//!   lookup
//! - Scoped mutation guards that bracket each structural change with a pair
//!   of notifications
//! - A root list of independent trees shown side by side
//!
//! # Core Types
//!
//! - `ModelIndex`: Identifies a row by position and parent identity
//! - `ItemRole` / `ItemData`: What data is requested and what comes back
//! - `ItemModel`: The read contract views use
//! - `ObjectTree`: The read contract the model needs from the tree
//! - `ModelSignals`: Insert/remove/move/reset notifications
//!
//! # Model Implementation
//!
//! - `ObjectTreeModel`: The adapter itself
//! - `AppendOperation`, `RemoveOperation`, `ResetOperation`,
//!   `ReparentOperation`: Mutation guards
//!
//! # Consumers
//!
//! - `TreeWalker`: Depth-first traversal over any `ItemModel`
//! - `ModelSpy`: Records notifications
//! - `ModelMirror`: Keeps a copy of the structure from notifications alone
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐  guards   ┌─────────────────┐  signals  ┌─────────────┐
//! │   Mutator   │──────────>│ ObjectTreeModel │──────────>│  Projector  │
//! └─────────────┘           └─────────────────┘           └─────────────┘
//!       │                          │ reads                       │
//!       │ writes            ┌─────────────┐                      │
//!       └──────────────────>│ ObjectTree  │      ModelIndex <────┘
//!                           └─────────────┘
//! ```
//!
//! The mutator changes the tree inside a guard; the model turns the guard
//! into notifications; projectors apply them and query the model through
//! `ModelIndex` once each change is complete.

mod config;
mod index;
mod mirror;
mod object_tree_model;
mod operations;
mod role;
mod spy;
mod traits;
mod walker;

pub use config::ModelConfig;
pub use index::ModelIndex;
pub use mirror::ModelMirror;
pub use object_tree_model::ObjectTreeModel;
pub use operations::{AppendOperation, RemoveOperation, ReparentOperation, ResetOperation};
pub use role::{ItemData, ItemRole};
pub use spy::{ModelEvent, ModelSpy};
pub use traits::{ItemModel, ModelSignals, ObjectTree};
pub use walker::{TraversalType, TreeWalker, VisitResult};
