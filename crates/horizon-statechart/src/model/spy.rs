//! Recording of model notifications.

use std::sync::Arc;

use parking_lot::Mutex;

use super::index::ModelIndex;
use super::traits::ModelSignals;

/// One notification emitted by a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    RowsAboutToBeInserted {
        parent: ModelIndex,
        first: usize,
        last: usize,
    },
    RowsInserted {
        parent: ModelIndex,
        first: usize,
        last: usize,
    },
    RowsAboutToBeRemoved {
        parent: ModelIndex,
        first: usize,
        last: usize,
    },
    RowsRemoved {
        parent: ModelIndex,
        first: usize,
        last: usize,
    },
    RowsAboutToBeMoved {
        source_parent: ModelIndex,
        source_first: usize,
        source_last: usize,
        destination_parent: ModelIndex,
        destination_row: usize,
    },
    RowsMoved {
        source_parent: ModelIndex,
        source_first: usize,
        source_last: usize,
        destination_parent: ModelIndex,
        destination_row: usize,
    },
    ModelAboutToReset,
    ModelReset,
}

impl ModelEvent {
    /// Returns `true` for the "about to" half of a notification pair.
    pub fn is_about_to(&self) -> bool {
        matches!(
            self,
            ModelEvent::RowsAboutToBeInserted { .. }
                | ModelEvent::RowsAboutToBeRemoved { .. }
                | ModelEvent::RowsAboutToBeMoved { .. }
                | ModelEvent::ModelAboutToReset
        )
    }
}

/// Records every notification of a [`ModelSignals`] set, in emission order.
///
/// The spy stays connected for the lifetime of the signals.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_statechart::model::{ItemModel, ModelEvent, ModelSpy, ObjectTreeModel};
/// use horizon_statechart_core::SharedObjectRegistry;
///
/// let registry = Arc::new(SharedObjectRegistry::new());
/// let model = ObjectTreeModel::new(registry.clone());
/// let spy = ModelSpy::attach(model.signals());
///
/// model.clear();
/// assert_eq!(spy.events(), [ModelEvent::ModelAboutToReset, ModelEvent::ModelReset]);
/// ```
#[derive(Clone, Default)]
pub struct ModelSpy {
    events: Arc<Mutex<Vec<ModelEvent>>>,
}

impl ModelSpy {
    /// Connects a new spy to all eight signals.
    pub fn attach(signals: &ModelSignals) -> Self {
        let spy = Self::default();

        let events = spy.events.clone();
        signals
            .rows_about_to_be_inserted
            .connect(move |&(parent, first, last)| {
                events
                    .lock()
                    .push(ModelEvent::RowsAboutToBeInserted { parent, first, last });
            });
        let events = spy.events.clone();
        signals.rows_inserted.connect(move |&(parent, first, last)| {
            events
                .lock()
                .push(ModelEvent::RowsInserted { parent, first, last });
        });
        let events = spy.events.clone();
        signals
            .rows_about_to_be_removed
            .connect(move |&(parent, first, last)| {
                events
                    .lock()
                    .push(ModelEvent::RowsAboutToBeRemoved { parent, first, last });
            });
        let events = spy.events.clone();
        signals.rows_removed.connect(move |&(parent, first, last)| {
            events
                .lock()
                .push(ModelEvent::RowsRemoved { parent, first, last });
        });
        let events = spy.events.clone();
        signals.rows_about_to_be_moved.connect(
            move |&(source_parent, source_first, source_last, destination_parent, destination_row)| {
                events.lock().push(ModelEvent::RowsAboutToBeMoved {
                    source_parent,
                    source_first,
                    source_last,
                    destination_parent,
                    destination_row,
                });
            },
        );
        let events = spy.events.clone();
        signals.rows_moved.connect(
            move |&(source_parent, source_first, source_last, destination_parent, destination_row)| {
                events.lock().push(ModelEvent::RowsMoved {
                    source_parent,
                    source_first,
                    source_last,
                    destination_parent,
                    destination_row,
                });
            },
        );
        let events = spy.events.clone();
        signals.model_about_to_reset.connect(move |_| {
            events.lock().push(ModelEvent::ModelAboutToReset);
        });
        let events = spy.events.clone();
        signals.model_reset.connect(move |_| {
            events.lock().push(ModelEvent::ModelReset);
        });

        spy
    }

    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<ModelEvent> {
        self.events.lock().clone()
    }

    /// Returns the recorded events and clears the record.
    pub fn take(&self) -> Vec<ModelEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let signals = ModelSignals::new();
        let spy = ModelSpy::attach(&signals);
        let top = ModelIndex::invalid();

        signals.emit_rows_inserted(top, 0, 1, || {});
        signals.rows_about_to_be_moved.emit((top, 1, 1, top, 3));
        signals.emit_reset(|| {});

        assert_eq!(
            spy.take(),
            [
                ModelEvent::RowsAboutToBeInserted {
                    parent: top,
                    first: 0,
                    last: 1
                },
                ModelEvent::RowsInserted {
                    parent: top,
                    first: 0,
                    last: 1
                },
                ModelEvent::RowsAboutToBeMoved {
                    source_parent: top,
                    source_first: 1,
                    source_last: 1,
                    destination_parent: top,
                    destination_row: 3
                },
                ModelEvent::ModelAboutToReset,
                ModelEvent::ModelReset,
            ]
        );
        assert!(spy.is_empty());
    }

    #[test]
    fn test_about_to_classification() {
        assert!(ModelEvent::ModelAboutToReset.is_about_to());
        assert!(!ModelEvent::ModelReset.is_about_to());
    }

    #[test]
    fn test_blocked_signals_are_not_recorded() {
        let signals = ModelSignals::new();
        let spy = ModelSpy::attach(&signals);
        signals.set_blocked(true);
        signals.emit_reset(|| {});
        assert_eq!(spy.len(), 0);
    }
}
