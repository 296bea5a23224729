use arka::{
    assistant::{self, ChatHistory, Intent},
    clock::{Clock, ManualClock, SharedClock},
    metrics::{data::*, filter_by_range, MetricKind, MetricSimulator, RangeTag},
    operations::{StepStatus, OperationSimulator, OperationType},
    storage::{FileBackend, MemoryBackend, Storage},
    AlertEvaluator, AppConfig, AppState, DebugConsole, ProfileRegistry, Scheduler, Severity,
};
use serde_json::json;
use std::sync::Arc;

fn manual_clock(start: u64) -> Arc<ManualClock> {
    Arc::new(ManualClock::new(start))
}

fn memory_storage(clock: Arc<ManualClock>) -> Storage {
    Storage::new(Arc::new(MemoryBackend::new()), clock)
}

fn snapshot_with(cpu_usage: f64, temperature: f64, ram_usage: f64) -> MetricSnapshot {
    MetricSnapshot {
        cpu: CpuMetrics {
            usage: cpu_usage,
            temperature,
            cores: 8,
            frequency: 3.2,
        },
        ram: RamMetrics {
            usage: ram_usage,
            total: 16.0,
            used: 16.0 * ram_usage / 100.0,
            free: 16.0 * (100.0 - ram_usage) / 100.0,
            cache: 1.5,
        },
        disk: DiskMetrics {
            usage: 62.0,
            total: 512.0,
            used: 317.4,
            free: 194.6,
        },
        network: NetworkMetrics {
            up: 12.0,
            down: 85.0,
            connections: 42,
            ping: 18.0,
        },
        taken_at: 1_000,
    }
}

/// Series stay inside their bounds with fixed one-second spacing
#[test]
fn test_generated_series_bounds_and_spacing() {
    let clock = manual_clock(10_000_000);
    let mut simulator = MetricSimulator::with_seed(42, clock.clone());

    for kind in MetricKind::ALL {
        for count in [1usize, 2, 60, 300] {
            let series = simulator.generate_series(count, 20.0, 80.0, kind);
            assert_eq!(series.len(), count);
            assert!(series.iter().all(|p| (20.0..=80.0).contains(&p.value)));
            for pair in series.windows(2) {
                assert_eq!(pair[1].timestamp - pair[0].timestamp, 1_000);
            }
            assert_eq!(series.last().unwrap().timestamp, clock.now_millis());
        }
    }
}

#[test]
fn test_series_range_filter_keeps_recent_points() {
    let clock = manual_clock(10_000_000);
    let mut simulator = MetricSimulator::with_seed(7, clock.clone());
    let series = simulator.generate_series(600, 0.0, 100.0, MetricKind::Network);

    let last_minute = filter_by_range(&series, RangeTag::OneMinute, clock.now_millis());
    assert_eq!(last_minute.len(), 61);
    let last_day = filter_by_range(&series, RangeTag::OneDay, clock.now_millis());
    assert_eq!(last_day.len(), 600);
}

/// A zero TTL expires as soon as any time has passed
#[test]
fn test_zero_ttl_reads_absent_after_elapsed_time() {
    let clock = manual_clock(5_000);
    let storage = memory_storage(clock.clone());

    assert!(storage.set("arka_ephemeral", "gone soon", Some(0)));
    assert_eq!(storage.get::<String>("arka_ephemeral").as_deref(), Some("gone soon"));

    clock.advance(1);
    assert_eq!(storage.get::<String>("arka_ephemeral"), None);
}

#[test]
fn test_storage_round_trip_deep_copy() {
    let storage = Storage::in_memory();
    let original = json!({ "a": 1, "b": [1, 2, 3] });

    assert!(storage.set("arka_round_trip", &original, None));
    let mut copy: serde_json::Value = storage.get("arka_round_trip").unwrap();
    assert_eq!(copy, original);

    copy["a"] = json!(2);
    let again: serde_json::Value = storage.get("arka_round_trip").unwrap();
    assert_eq!(again, original);
}

#[test]
fn test_large_payload_survives_file_backend() {
    let dir = tempfile::tempdir().unwrap();
    let clock: SharedClock = manual_clock(0);
    let storage = Storage::new(Arc::new(FileBackend::new(dir.path()).unwrap()), clock);

    let big: Vec<String> = (0..1_000).map(|i| format!("entry-{}", i)).collect();
    assert!(storage.set("arka_big", &big, None));

    let raw = std::fs::read_to_string(dir.path().join("arka_big.json")).unwrap();
    let envelope: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(envelope["encoded"], json!(true));
    assert!(envelope["value"].is_string());

    assert_eq!(storage.get::<Vec<String>>("arka_big"), Some(big));
}

/// The chat log is capped and newest-first
#[test]
fn test_chat_history_capped_newest_first() {
    let clock = manual_clock(0);
    let mut history = ChatHistory::load(memory_storage(clock.clone()), 100);

    for i in 0..250 {
        clock.advance(10);
        history.add_entry(format!("question {}", i), "answer", Intent::General);
        assert!(history.len() <= 100);
        assert_eq!(history.entries().next().unwrap().user_input, format!("question {}", i));
    }
    assert_eq!(history.len(), 100);
    assert_eq!(history.entries().last().unwrap().user_input, "question 150");
}

#[test]
fn test_classify_priority() {
    assert_eq!(
        assistant::classify("my system is slow and I need to optimize"),
        Intent::SystemOptimization
    );
    assert_eq!(assistant::classify("hello"), Intent::General);
    assert_eq!(assistant::classify("is there a VIRUS here"), Intent::SecurityScan);

    let (intent, response) = assistant::respond("check my wifi");
    assert_eq!(intent, Intent::NetworkDiagnostics);
    assert!(response.contains("check my wifi"));
}

#[test]
fn test_profile_activation() {
    let mut registry = ProfileRegistry::load(Storage::in_memory());
    assert_eq!(registry.active().unwrap().id.as_str(), "balanced");

    assert!(!registry.activate("turbo"));
    assert_eq!(registry.active().unwrap().id.as_str(), "balanced");

    assert!(registry.activate("silent"));
    let active: Vec<_> = registry.list().iter().filter(|p| p.active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id.as_str(), "silent");
}

#[tokio::test(start_paused = true)]
async fn test_memory_optimization_log() {
    let simulator = OperationSimulator::new(1.0, 1.0);
    let result = simulator.run_named("memory_optimization").await;

    assert_eq!(result.operation, OperationType::MemoryOptimization);
    assert_eq!(result.execution_log.len(), OperationType::MemoryOptimization.steps().len());
    let last = result.execution_log.last().unwrap();
    assert_eq!(last.status, StepStatus::Completed);
    assert_eq!(last.progress_percent, 100);
    assert!(result.metrics_affected.memory_freed_mb >= 512.0);
}

#[test]
fn test_cpu_only_warning() {
    let evaluator = AlertEvaluator::default();
    let alerts = evaluator.evaluate(&snapshot_with(90.0, 50.0, 50.0));

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Warning);
    assert!(alerts[0].title.to_lowercase().contains("cpu"));
}

#[tokio::test(start_paused = true)]
async fn test_console_end_to_end() {
    let clock = manual_clock(1_000_000);
    let config = AppConfig::default();
    let state = AppState::open(config.clone(), clock.clone()).unwrap().into_shared();
    let console = DebugConsole::new(state.clone(), OperationSimulator::new(0.0, 1.0));
    let mut scheduler = Scheduler::with_defaults(&config, clock.clone());

    console.simulate_high_load(2).await;
    for _ in 0..2 {
        clock.advance(config.tick_interval_ms);
        let mut guard = state.lock().await;
        let report = scheduler.tick_once(&mut guard);
        assert!(report.alerts.iter().any(|a| a.severity == Severity::Critical));
    }
    assert_eq!(console.drain_alerts().await.len(), 6);

    let before = console.snapshot().await.unwrap();
    let result = console.run_operation("disk_cleanup").await;
    assert!(result.success);
    let after = console.snapshot().await.unwrap();
    assert!(after.disk.used < before.disk.used);

    let entry = console.ask("scan for malware please").await;
    assert_eq!(entry.category, Intent::SecurityScan);
    assert!(console.activate_profile("performance").await);
}
