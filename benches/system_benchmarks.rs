use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use arka::{
    assistant,
    clock::system_clock,
    metrics::{MetricKind, MetricSimulator},
    AlertEvaluator, AppConfig, AppState, OperationSimulator, OperationType, Scheduler, Storage,
};
use serde_json::json;

/// Benchmark a single simulator tick
fn bench_simulator_tick(c: &mut Criterion) {
    let mut simulator = MetricSimulator::with_seed(1, system_clock());

    c.bench_function("simulator_tick", |b| b.iter(|| simulator.tick()));
}

/// Benchmark chart series generation at several lengths
fn bench_generate_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_series");
    let mut simulator = MetricSimulator::with_seed(2, system_clock());

    for count in [60usize, 300, 3_600] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| simulator.generate_series(count, 0.0, 100.0, MetricKind::Cpu))
        });
    }

    group.finish();
}

/// Benchmark intent classification and templated responses
fn bench_assistant(c: &mut Criterion) {
    let queries = [
        "my system is slow and I need to optimize",
        "is there a virus on this machine",
        "what temperature is my cpu running at",
        "hello there",
    ];

    c.bench_function("classify", |b| {
        b.iter(|| {
            for query in &queries {
                assistant::classify(query);
            }
        })
    });

    c.bench_function("respond", |b| b.iter(|| assistant::respond(queries[0])));
}

/// Benchmark envelope writes and reads, plain and encoded
fn bench_storage(c: &mut Criterion) {
    let storage = Storage::in_memory();
    let small = json!({ "a": 1, "b": [1, 2, 3] });
    let large: Vec<String> = (0..1_000).map(|i| format!("entry-{}", i)).collect();

    c.bench_function("storage_set_small", |b| {
        b.iter(|| storage.set("arka_bench_small", &small, None))
    });
    c.bench_function("storage_get_small", |b| {
        storage.set("arka_bench_small", &small, None);
        b.iter(|| storage.get::<serde_json::Value>("arka_bench_small"))
    });
    c.bench_function("storage_set_encoded", |b| {
        b.iter(|| storage.set("arka_bench_large", &large, None))
    });
    c.bench_function("storage_get_encoded", |b| {
        storage.set("arka_bench_large", &large, None);
        b.iter(|| storage.get::<Vec<String>>("arka_bench_large"))
    });
}

/// Benchmark threshold evaluation and a full scheduler tick
fn bench_tick_pipeline(c: &mut Criterion) {
    let evaluator = AlertEvaluator::default();
    let mut simulator = MetricSimulator::with_seed(3, system_clock());
    simulator.simulate_high_load(u32::MAX);
    let snapshot = simulator.tick();

    c.bench_function("alert_evaluate", |b| b.iter(|| evaluator.evaluate(&snapshot)));

    let config = AppConfig::default();
    let mut state = AppState::open(config.clone(), system_clock()).expect("Should open state");
    let mut scheduler = Scheduler::with_defaults(&config, system_clock());

    c.bench_function("scheduler_tick", |b| {
        b.iter(|| {
            let report = scheduler.tick_once(&mut state);
            state.drain_alerts();
            report
        })
    });
}

/// Benchmark an operation run with pauses disabled
fn bench_operation_run(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Should create tokio runtime");
    let simulator = OperationSimulator::new(0.0, 1.0);

    c.bench_function("operation_run", |b| {
        b.to_async(&rt)
            .iter(|| simulator.run(OperationType::MemoryOptimization))
    });
}

criterion_group!(
    benches,
    bench_simulator_tick,
    bench_generate_series,
    bench_assistant,
    bench_storage,
    bench_tick_pipeline,
    bench_operation_run
);
criterion_main!(benches);
