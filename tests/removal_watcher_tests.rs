use chart_lifecycle::api::{ChartLifecycleManager, LifecycleConfig};
use chart_lifecycle::backend::NullBackend;
use chart_lifecycle::core::{ChartSpec, ContainerKey, NodeId};
use chart_lifecycle::host::{ContainerHost, MemoryDocument, MutationBatch};
use serde_json::json;

type Manager = ChartLifecycleManager<NullBackend, MemoryDocument>;

fn build_manager() -> Manager {
    ChartLifecycleManager::new(NullBackend::new(), MemoryDocument::new(), LifecycleConfig::new())
        .expect("manager init")
}

fn mount_under(manager: &mut Manager, parent: NodeId, id: &str) -> NodeId {
    manager
        .host_mut()
        .mount_element(parent, Some(id))
        .expect("mount container")
}

fn mount(manager: &mut Manager, id: &str) -> NodeId {
    let body = manager.host().body();
    mount_under(manager, body, id)
}

fn flush_mutations(manager: &mut Manager) -> Vec<ContainerKey> {
    let batch = manager.host_mut().take_mutations();
    manager.handle_mutations(&batch)
}

#[test]
fn removing_container_disposes_its_chart() {
    let mut manager = build_manager();
    let node = mount(&mut manager, "chart-1");
    manager
        .init("chart-1", ChartSpec::new(), false)
        .expect("init");
    let chart = manager.instance("chart-1").expect("live").chart();

    assert!(manager.host_mut().remove(node));
    let cleaned = flush_mutations(&mut manager);

    assert_eq!(cleaned, vec![ContainerKey::new("chart-1")]);
    assert!(!manager.contains("chart-1"));
    assert!(manager.backend().is_chart_disposed(chart));
    assert_eq!(manager.stats().disposed_detached, 1);
}

#[test]
fn ancestor_removal_disposes_nested_charts_only() {
    let mut manager = build_manager();
    let body = manager.host().body();
    let panel = mount_under(&mut manager, body, "finance-panel");
    mount_under(&mut manager, panel, "revenue-trend");
    mount_under(&mut manager, panel, "revenue-mix");
    mount(&mut manager, "dept-workload");
    for key in ["revenue-trend", "revenue-mix", "dept-workload"] {
        manager.init(key, ChartSpec::new(), false).expect("init");
    }

    manager.host_mut().remove(panel);
    let cleaned = flush_mutations(&mut manager);

    assert_eq!(
        cleaned,
        vec![
            ContainerKey::new("revenue-trend"),
            ContainerKey::new("revenue-mix")
        ]
    );
    assert_eq!(manager.keys(), vec![ContainerKey::new("dept-workload")]);
    assert_eq!(manager.backend().disposed_count(), 2);
}

#[test]
fn reused_id_keeps_new_chart_alive() {
    let mut manager = build_manager();
    let old_node = mount(&mut manager, "chart-1");
    manager
        .init("chart-1", ChartSpec::from_value(json!({"title": "A"})).expect("spec"), false)
        .expect("chart A");
    let chart_a = manager.instance("chart-1").expect("live").chart();

    manager.host_mut().remove(old_node);
    let new_node = mount(&mut manager, "chart-1");
    let mounted = manager
        .init("chart-1", ChartSpec::from_value(json!({"title": "B"})).expect("spec"), false)
        .expect("chart B");
    let chart_b = manager.instance("chart-1").expect("live").chart();

    assert!(mounted.created);
    assert_eq!(mounted.node, new_node);
    assert!(manager.backend().is_chart_disposed(chart_a));

    let cleaned = flush_mutations(&mut manager);
    assert!(cleaned.is_empty());
    assert!(manager.contains("chart-1"));
    assert!(!manager.backend().is_chart_disposed(chart_b));
    assert_eq!(
        manager.spec("chart-1").and_then(|s| s.get("title")),
        Some(&json!("B"))
    );
}

#[test]
fn batch_without_removals_is_ignored() {
    let mut manager = build_manager();
    mount(&mut manager, "c");
    manager.init("c", ChartSpec::new(), false).expect("init");

    let added_only = MutationBatch {
        removed: Vec::new(),
        added: vec![manager.host().body()],
    };
    assert!(manager.handle_mutations(&added_only).is_empty());
    assert!(manager.handle_mutations(&MutationBatch::default()).is_empty());
    assert!(manager.contains("c"));
}

#[test]
fn node_moved_before_batch_keeps_chart() {
    let mut manager = build_manager();
    let body = manager.host().body();
    let sidebar = mount_under(&mut manager, body, "sidebar");
    let node = mount(&mut manager, "moving");
    manager.init("moving", ChartSpec::new(), false).expect("init");

    manager.host_mut().remove(node);
    manager
        .host_mut()
        .append_child(sidebar, node)
        .expect("reattach");

    assert!(flush_mutations(&mut manager).is_empty());
    assert!(manager.contains("moving"));
}

#[test]
fn sweep_catches_removals_without_a_batch() {
    let mut manager = build_manager();
    let node = mount(&mut manager, "c");
    manager.init("c", ChartSpec::new(), false).expect("init");

    manager.host_mut().remove(node);
    assert!(!manager.host().is_attached(node));

    assert_eq!(manager.sweep_detached(), vec![ContainerKey::new("c")]);
    assert!(manager.is_empty());
    assert!(manager.sweep_detached().is_empty());
}

#[test]
fn explicit_destroy_after_implicit_cleanup_is_noop() {
    let mut manager = build_manager();
    let node = mount(&mut manager, "c");
    manager.init("c", ChartSpec::new(), false).expect("init");

    manager.host_mut().remove(node);
    flush_mutations(&mut manager);

    assert!(!manager.destroy("c"));
    assert!(!manager.update("c", ChartSpec::new(), false));
    assert_eq!(manager.backend().disposed_count(), 1);
}

#[test]
fn stale_node_cannot_reach_chart_on_reused_id() {
    let mut manager = build_manager();
    let old_node = mount(&mut manager, "chart-1");
    manager
        .init(old_node, ChartSpec::new(), false)
        .expect("chart A");

    manager.host_mut().remove(old_node);
    assert_eq!(flush_mutations(&mut manager), vec![ContainerKey::new("chart-1")]);

    let new_node = mount(&mut manager, "chart-1");
    manager
        .init(new_node, ChartSpec::from_value(json!({"title": "B"})).expect("spec"), false)
        .expect("chart B");
    let chart_b = manager.instance("chart-1").expect("live").chart();

    let stale = ChartSpec::from_value(json!({"title": "stale"})).expect("spec");
    assert!(!manager.update(old_node, stale, false));
    assert!(!manager.destroy(old_node));

    assert!(manager.contains("chart-1"));
    assert!(!manager.backend().is_chart_disposed(chart_b));
    assert_eq!(
        manager.spec("chart-1").and_then(|s| s.get("title")),
        Some(&json!("B"))
    );
    assert!(manager.update(new_node, ChartSpec::new(), false));
}

#[test]
fn pruned_document_stays_bounded_across_dashboard_reloads() {
    let mut manager = build_manager();
    let body = manager.host().body();
    for _ in 0..10 {
        let panel = mount_under(&mut manager, body, "panel");
        mount_under(&mut manager, panel, "revenue");
        manager.init("revenue", ChartSpec::new(), false).expect("init");

        manager.host_mut().remove(panel);
        assert_eq!(flush_mutations(&mut manager), vec![ContainerKey::new("revenue")]);
        assert_eq!(manager.host_mut().prune_detached(), 2);
    }

    assert!(manager.is_empty());
    assert_eq!(manager.host().element_count(), 1);
    assert_eq!(manager.stats().disposed_detached, 10);
}
