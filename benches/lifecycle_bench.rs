use chart_lifecycle::api::{ChartLifecycleManager, LifecycleConfig};
use chart_lifecycle::backend::NullBackend;
use chart_lifecycle::core::ChartSpec;
use chart_lifecycle::host::MemoryDocument;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn dashboard(charts: usize) -> ChartLifecycleManager<NullBackend, MemoryDocument> {
    let mut document = MemoryDocument::new();
    let body = document.body();
    for i in 0..charts {
        document
            .mount_element(body, Some(format!("chart-{i}").as_str()))
            .expect("mount");
    }
    let mut manager =
        ChartLifecycleManager::new(NullBackend::new(), document, LifecycleConfig::new())
            .expect("manager");
    for i in 0..charts {
        manager
            .init(format!("chart-{i}"), ChartSpec::new(), false)
            .expect("init");
    }
    manager
}

fn bench_resize_pass_32(c: &mut Criterion) {
    let mut manager = dashboard(32);
    c.bench_function("resize_pass_32", |b| {
        b.iter(|| black_box(manager.run_resize_pass()))
    });
}

fn bench_detached_sweep_32(c: &mut Criterion) {
    let mut manager = dashboard(32);
    c.bench_function("detached_sweep_32_all_live", |b| {
        b.iter(|| black_box(manager.sweep_detached()))
    });
}

criterion_group!(benches, bench_resize_pass_32, bench_detached_sweep_32);
criterion_main!(benches);
