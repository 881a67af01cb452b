//! Runtime configuration for object tree models.

use horizon_statechart_core::{Result, StatechartError};
use serde::Deserialize;

/// Behavior switches for an [`ObjectTreeModel`](super::ObjectTreeModel).
///
/// # Example
///
/// ```
/// use horizon_statechart::model::ModelConfig;
///
/// let config = ModelConfig::from_toml_str("verify_mutations = true").unwrap();
/// assert!(config.verify_mutations);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Check, when each mutation guard closes, that the caller performed the
    /// mutation the guard announced (row counts, final parent). A mismatch
    /// is logged and panics.
    ///
    /// Defaults to on in debug builds and off in release builds.
    pub verify_mutations: bool,

    /// Log every emitted model notification at debug level.
    pub trace_notifications: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            verify_mutations: cfg!(debug_assertions),
            trace_notifications: false,
        }
    }
}

impl ModelConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether mutations are verified when their guard closes.
    pub fn with_verify_mutations(mut self, verify: bool) -> Self {
        self.verify_mutations = verify;
        self
    }

    /// Sets whether notifications are logged.
    pub fn with_trace_notifications(mut self, trace: bool) -> Self {
        self.trace_notifications = trace;
        self
    }

    /// Parses a configuration from a TOML document.
    ///
    /// Missing keys take their default values; unknown keys are rejected.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| StatechartError::Config(e.to_string()))
    }
}
