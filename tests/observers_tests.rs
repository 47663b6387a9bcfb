use std::cell::RefCell;
use std::rc::Rc;

use chart_lifecycle::LifecycleError;
use chart_lifecycle::api::{ChartLifecycleManager, LifecycleConfig};
use chart_lifecycle::backend::NullBackend;
use chart_lifecycle::core::ChartSpec;
use chart_lifecycle::extensions::{DisposeReason, LifecycleEvent, LifecycleObserver};
use chart_lifecycle::host::MemoryDocument;

#[derive(Clone)]
struct RecordingObserver {
    id: String,
    events: Rc<RefCell<Vec<LifecycleEvent>>>,
}

impl RecordingObserver {
    fn new(id: impl Into<String>, events: Rc<RefCell<Vec<LifecycleEvent>>>) -> Self {
        Self {
            id: id.into(),
            events,
        }
    }
}

impl LifecycleObserver for RecordingObserver {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: &LifecycleEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

fn event_kind(event: &LifecycleEvent) -> &'static str {
    match event {
        LifecycleEvent::Created { .. } => "created",
        LifecycleEvent::Updated { .. } => "updated",
        LifecycleEvent::Disposed {
            reason: DisposeReason::Explicit,
            ..
        } => "disposed_explicit",
        LifecycleEvent::Disposed {
            reason: DisposeReason::Replaced,
            ..
        } => "disposed_replaced",
        LifecycleEvent::Disposed {
            reason: DisposeReason::Detached,
            ..
        } => "disposed_detached",
        LifecycleEvent::Disposed {
            reason: DisposeReason::Teardown,
            ..
        } => "disposed_teardown",
        LifecycleEvent::CreationFailed { .. } => "creation_failed",
        LifecycleEvent::ResizePass { .. } => "resize_pass",
    }
}

fn build_manager() -> ChartLifecycleManager<NullBackend, MemoryDocument> {
    let mut document = MemoryDocument::new();
    let body = document.body();
    for id in ["a", "b", "c"] {
        document.mount_element(body, Some(id)).expect("mount");
    }
    ChartLifecycleManager::new(NullBackend::new(), document, LifecycleConfig::new())
        .expect("manager init")
}

#[test]
fn observer_receives_deterministic_event_sequence() {
    let mut manager = build_manager();
    let events = Rc::new(RefCell::new(Vec::<LifecycleEvent>::new()));
    manager
        .register_observer(Box::new(RecordingObserver::new("recorder", events.clone())))
        .expect("register observer");

    manager.init("a", ChartSpec::new(), false).expect("init a");
    manager.init("a", ChartSpec::new(), false).expect("in-place a");
    manager.init("a", ChartSpec::new(), true).expect("recreate a");
    manager.init("b", ChartSpec::new(), false).expect("init b");
    manager.init("c", ChartSpec::new(), false).expect("init c");
    assert!(manager.init("missing", ChartSpec::new(), false).is_none());
    manager.run_resize_pass();

    let node_b = manager.instance("b").expect("live b").node();
    manager.host_mut().remove(node_b);
    let batch = manager.host_mut().take_mutations();
    manager.handle_mutations(&batch);

    assert!(manager.destroy("a"));
    manager.destroy_all();

    let kinds: Vec<&'static str> = events.borrow().iter().map(event_kind).collect();
    assert_eq!(
        kinds,
        vec![
            "created",
            "updated",
            "disposed_replaced",
            "created",
            "created",
            "created",
            "creation_failed",
            "resize_pass",
            "disposed_detached",
            "disposed_explicit",
            "disposed_teardown",
        ]
    );
}

#[test]
fn resize_pass_event_reports_counts() {
    let mut manager = build_manager();
    let events = Rc::new(RefCell::new(Vec::<LifecycleEvent>::new()));
    manager.init("a", ChartSpec::new(), false).expect("init");
    manager.init("b", ChartSpec::new(), false).expect("init");
    manager
        .register_observer(Box::new(RecordingObserver::new("resize", events.clone())))
        .expect("register");

    manager.run_resize_pass();

    let last = events.borrow().last().cloned().expect("resize event");
    assert_eq!(
        last,
        LifecycleEvent::ResizePass {
            resized: 2,
            failed: 0
        }
    );
}

#[test]
fn duplicate_and_empty_observer_ids_are_rejected() {
    let mut manager = build_manager();
    let events = Rc::new(RefCell::new(Vec::<LifecycleEvent>::new()));

    manager
        .register_observer(Box::new(RecordingObserver::new("dupe", events.clone())))
        .expect("first observer");
    let err = manager
        .register_observer(Box::new(RecordingObserver::new("dupe", events.clone())))
        .expect_err("duplicate must fail");
    assert!(matches!(err, LifecycleError::InvalidData(_)));

    let err = manager
        .register_observer(Box::new(RecordingObserver::new("", events.clone())))
        .expect_err("empty id must fail");
    assert!(matches!(err, LifecycleError::InvalidData(_)));

    let err = manager
        .register_observer(Box::new(RecordingObserver::new("  ", events)))
        .expect_err("blank id must fail");
    assert!(matches!(err, LifecycleError::InvalidData(_)));
    assert_eq!(manager.observer_count(), 1);
}

#[test]
fn observers_keep_registration_order_after_removal() {
    let mut manager = build_manager();
    let events = Rc::new(RefCell::new(Vec::<LifecycleEvent>::new()));
    for id in ["audit", "metrics", "ui"] {
        manager
            .register_observer(Box::new(RecordingObserver::new(id, events.clone())))
            .expect("register");
    }

    assert!(manager.unregister_observer("metrics").is_some());
    assert_eq!(manager.observer_ids().collect::<Vec<_>>(), vec!["audit", "ui"]);

    manager
        .register_observer(Box::new(RecordingObserver::new("metrics", events)))
        .expect("re-register");
    assert_eq!(
        manager.observer_ids().collect::<Vec<_>>(),
        vec!["audit", "ui", "metrics"]
    );
}

#[test]
fn unregister_observer_stops_dispatch() {
    let mut manager = build_manager();
    let events = Rc::new(RefCell::new(Vec::<LifecycleEvent>::new()));
    manager
        .register_observer(Box::new(RecordingObserver::new("to-remove", events.clone())))
        .expect("register");
    assert_eq!(manager.observer_count(), 1);
    assert!(manager.has_observer("to-remove"));

    manager.init("a", ChartSpec::new(), false).expect("init");
    let removed = manager
        .unregister_observer("to-remove")
        .expect("observer handed back");
    assert_eq!(removed.id(), "to-remove");
    assert!(manager.unregister_observer("to-remove").is_none());
    assert_eq!(manager.observer_count(), 0);

    manager.init("b", ChartSpec::new(), false).expect("init");
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn dropping_manager_tears_down_live_charts() {
    let events = Rc::new(RefCell::new(Vec::<LifecycleEvent>::new()));
    {
        let mut manager = build_manager();
        manager
            .register_observer(Box::new(RecordingObserver::new("unload", events.clone())))
            .expect("register");
        manager.init("a", ChartSpec::new(), false).expect("init");
        manager.init("b", ChartSpec::new(), false).expect("init");
    }

    let teardowns = events
        .borrow()
        .iter()
        .filter(|event| event_kind(event) == "disposed_teardown")
        .count();
    assert_eq!(teardowns, 2);
}
