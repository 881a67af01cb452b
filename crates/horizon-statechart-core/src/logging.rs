//! Logging and debugging facilities for Horizon Statechart.
//!
//! This module provides:
//! - Target names for filtering `tracing` output by subsystem
//! - Debug visualization for object trees
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! Horizon Statechart uses the `tracing` crate for instrumentation. To see
//! logs, install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_statechart=debug")
//!         .init();
//! }
//! ```
//!
//! # Debug Visualization
//!
//! Use [`ObjectTreeDebug`] to get a textual view of an object hierarchy:
//!
//! ```
//! use horizon_statechart_core::{ObjectRegistry, ObjectTreeDebug};
//!
//! let mut registry = ObjectRegistry::new();
//! let machine = registry.create("machine");
//! registry.create_child(machine, "idle").unwrap();
//!
//! let output = ObjectTreeDebug::new().format_subtree(&registry, machine).unwrap();
//! assert!(output.contains("idle"));
//! ```

use std::fmt::Write as FmtWrite;

use crate::object::{ObjectId, ObjectRegistry, ObjectResult};

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_statechart_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_statechart_core::signal";
    /// Object tree target.
    pub const OBJECT: &str = "horizon_statechart_core::object";
    /// Item model target (adapter and mutation guards).
    pub const MODEL: &str = "horizon_statechart::model";
    /// Performance spans.
    pub const PERF: &str = "horizon_statechart::perf";
}

/// Style options for object tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for object tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show object IDs.
    pub show_ids: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing object trees.
#[derive(Debug, Clone, Default)]
pub struct ObjectTreeDebug {
    options: TreeFormatOptions,
}

impl ObjectTreeDebug {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format every parentless object in the registry and its subtree.
    pub fn format_all(&self, registry: &ObjectRegistry) -> ObjectResult<String> {
        let roots: Vec<ObjectId> = registry.root_objects().collect();

        let mut output = String::new();
        let _ = writeln!(output, "Object Tree ({} total objects):", registry.object_count());

        if roots.is_empty() {
            output.push_str("  (empty)\n");
        } else {
            for root_id in roots {
                self.format_subtree_into(registry, root_id, 0, true, &mut output)?;
            }
        }

        Ok(output)
    }

    /// Format a subtree starting from a specific object.
    pub fn format_subtree(&self, registry: &ObjectRegistry, root: ObjectId) -> ObjectResult<String> {
        let mut output = String::new();
        self.format_subtree_into(registry, root, 0, true, &mut output)?;
        Ok(output)
    }

    fn format_subtree_into(
        &self,
        registry: &ObjectRegistry,
        id: ObjectId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) -> ObjectResult<()> {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }

        let name = registry.object_name(id)?;
        let children = registry.children(id)?;

        output.push_str(&self.build_prefix(depth, is_last));
        output.push_str(if name.is_empty() { "(unnamed)" } else { name });
        if self.options.show_ids {
            let _ = write!(output, " [{:?}]", id);
        }
        output.push('\n');

        let child_count = children.len();
        for (i, &child_id) in children.iter().enumerate() {
            self.format_subtree_into(registry, child_id, depth + 1, i + 1 == child_count, output)?;
        }

        Ok(())
    }

    /// Build the prefix string for a tree node.
    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, corner, last) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { last } else { corner });
        prefix.push(' ');
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_statechart::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (ObjectRegistry, ObjectId) {
        let mut registry = ObjectRegistry::new();
        let machine = registry.create("machine");
        let idle = registry.create_child(machine, "idle").unwrap();
        registry.create_child(idle, "waiting").unwrap();
        registry.create_child(machine, "").unwrap();
        (registry, machine)
    }

    #[test]
    fn test_tree_format_empty() {
        let registry = ObjectRegistry::new();
        let output = ObjectTreeDebug::new().format_all(&registry).unwrap();
        assert!(output.contains("Object Tree (0 total objects)"));
        assert!(output.contains("(empty)"));
    }

    #[test]
    fn test_tree_format_hierarchy() {
        let (registry, machine) = sample();
        let output = ObjectTreeDebug::new().format_subtree(&registry, machine).unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("machine"));
        assert!(lines[1].contains("idle"));
        assert!(lines[2].contains("waiting"));
        assert!(lines[3].contains("(unnamed)"));
    }

    #[test]
    fn test_tree_format_minimal_ascii() {
        let (registry, machine) = sample();
        let options = TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..TreeFormatOptions::minimal()
        };
        let output = ObjectTreeDebug::with_options(options)
            .format_subtree(&registry, machine)
            .unwrap();

        assert!(!output.contains('['));
        assert!(output.contains("+-- idle"));
        assert!(output.contains("`-- (unnamed)"));
    }

    #[test]
    fn test_tree_format_max_depth() {
        let (registry, machine) = sample();
        let options = TreeFormatOptions {
            max_depth: Some(1),
            ..Default::default()
        };
        let output = ObjectTreeDebug::with_options(options)
            .format_subtree(&registry, machine)
            .unwrap();
        assert!(!output.contains("waiting"));
    }

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new("test_operation");
    }
}
