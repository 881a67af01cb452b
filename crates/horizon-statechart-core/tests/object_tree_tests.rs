//! Integration tests for the shared object tree and signals.

use std::sync::Arc;

use horizon_statechart_core::{
    ObjectError, ObjectTreeDebug, SharedObjectRegistry, Signal, StatechartError, TreeFormatOptions,
    TreeStyle,
};
use parking_lot::Mutex;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn shared_registry_from_many_threads() {
    init_logging();
    let registry = Arc::new(SharedObjectRegistry::new());
    let machine = registry.create("machine");

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                for i in 0..25 {
                    registry
                        .create_child(machine, format!("state_{t}_{i}"))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.children(machine).unwrap().len(), 100);
    assert_eq!(registry.object_count(), 101);
}

#[test]
fn reparenting_keeps_both_sides_consistent() {
    init_logging();
    let registry = SharedObjectRegistry::new();
    let root = registry.create("root");
    let a = registry.create_child(root, "a").unwrap();
    let b = registry.create_child(root, "b").unwrap();
    let c = registry.create_child(b, "c").unwrap();

    registry.set_parent(b, Some(a)).unwrap();
    assert_eq!(registry.children(root).unwrap(), vec![a]);
    assert_eq!(registry.children(a).unwrap(), vec![b]);
    assert_eq!(registry.ancestors(c).unwrap(), vec![b, a, root]);

    let err = registry.set_parent(a, Some(c)).unwrap_err();
    assert_eq!(err, ObjectError::CircularParentage);
    let err: StatechartError = err.into();
    assert!(err.to_string().contains("own parent or ancestor"));

    registry.destroy(a).unwrap();
    assert!(!registry.contains(c));
    assert_eq!(registry.object_count(), 1);
}

#[test]
fn tree_dump_reflects_structure() {
    let registry = SharedObjectRegistry::new();
    let machine = registry.create("machine");
    let idle = registry.create_child(machine, "idle").unwrap();
    registry.create_child(idle, "waiting").unwrap();
    registry.create_child(machine, "running").unwrap();

    let options = TreeFormatOptions {
        style: TreeStyle::Ascii,
        ..TreeFormatOptions::minimal()
    };
    let dump = registry.with_read(|r| {
        ObjectTreeDebug::with_options(options)
            .format_subtree(r, machine)
            .unwrap()
    });
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("machine"));
    assert!(lines[3].contains("running"));
}

#[test]
fn signal_slots_may_reenter_the_registry() {
    let registry = Arc::new(SharedObjectRegistry::new());
    let root = registry.create("root");
    let changed = Signal::<usize>::new();
    let counts = Arc::new(Mutex::new(Vec::new()));

    let r = registry.clone();
    let c = counts.clone();
    changed.connect(move |_| {
        c.lock().push(r.children(root).unwrap().len());
    });

    for i in 0..3 {
        registry.create_child(root, format!("s{i}")).unwrap();
        changed.emit(i);
    }
    assert_eq!(*counts.lock(), vec![1, 2, 3]);
}
