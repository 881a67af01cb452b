//! Core systems for Horizon Statechart.
//!
//! This crate provides the foundational components the state-chart models
//! are built on:
//!
//! - **Object Tree**: Arena-backed parent/child hierarchy with stable IDs
//! - **Signal/Slot System**: Type-safe, synchronous change notification
//! - **Errors**: Shared error and result types
//! - **Logging**: Tracing targets and object-tree debug output
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_statechart_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Object Tree Example
//!
//! ```
//! use horizon_statechart_core::SharedObjectRegistry;
//!
//! let registry = SharedObjectRegistry::new();
//! let machine = registry.create("machine");
//! let idle = registry.create_child(machine, "idle").unwrap();
//! let running = registry.create_child(machine, "running").unwrap();
//!
//! assert_eq!(registry.children(machine).unwrap(), vec![idle, running]);
//! assert_eq!(registry.parent(running).unwrap(), Some(machine));
//! ```

mod error;
pub mod logging;
pub mod object;
pub mod signal;

pub use error::{Result, StatechartError};
pub use logging::{ObjectTreeDebug, PerfSpan, TreeFormatOptions, TreeStyle};
pub use object::{ObjectError, ObjectId, ObjectRegistry, ObjectResult, SharedObjectRegistry};
pub use signal::{ConnectionId, Signal};
