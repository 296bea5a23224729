//! Named debug operations for manual testing.
//!
//! This is the whole externally reachable surface: run an operation, switch
//! profiles, read the current snapshot, force a high-load condition, wipe
//! persisted state, and talk to the assistant.

use crate::alerts::{AlertEvent, Severity};
use crate::assistant::{self, ChatEntry, Intent};
use crate::metrics::MetricSnapshot;
use crate::operations::{OperationResult, OperationSimulator, OperationType};
use crate::state::{SharedState, SystemStatus};
use std::collections::BTreeSet;
use tracing::info;

/// Debug entry points over the shared state.
#[derive(Clone)]
pub struct DebugConsole {
    state: SharedState,
    operations: OperationSimulator,
}

impl DebugConsole {
    pub fn new(state: SharedState, operations: OperationSimulator) -> Self {
        Self { state, operations }
    }

    /// The state this console drives.
    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Run an operation by name and fold its result into the state.
    ///
    /// The state lock is not held while the operation runs, so several runs
    /// can overlap; whichever finishes last sets the status.
    pub async fn run_operation(&self, name: &str) -> OperationResult {
        let operation = OperationType::from_name(name);
        {
            let mut state = self.state.lock().await;
            state.set_status(SystemStatus::Busy(operation));
            state.analytics.record("run_operation", operation.as_str());
        }

        let result = self.operations.run(operation).await;

        let mut state = self.state.lock().await;
        let now = state.storage.clock().now_millis();
        if result.success {
            if let Some(current) = state.latest.take() {
                state.latest = Some(current.apply_delta(&result.metrics_affected, now));
            }
            state.set_status(SystemStatus::Optimal);
        } else {
            state.set_status(SystemStatus::Degraded);
            state.raise_alerts(vec![AlertEvent {
                title: "Operation failed".to_string(),
                message: format!("{} did not complete successfully", operation),
                severity: Severity::Info,
                raised_at: now,
            }]);
        }
        result
    }

    /// Activate a profile by id.
    pub async fn activate_profile(&self, id: &str) -> bool {
        let mut state = self.state.lock().await;
        state.analytics.record("activate_profile", id);
        state.profiles.activate(id)
    }

    /// The latest snapshot, if a tick has happened.
    pub async fn snapshot(&self) -> Option<MetricSnapshot> {
        let mut state = self.state.lock().await;
        state.analytics.record("snapshot", "");
        state.latest.clone()
    }

    /// Make the next `ticks` snapshots breach the alert thresholds.
    pub async fn simulate_high_load(&self, ticks: u32) {
        let mut state = self.state.lock().await;
        state.high_load_request = Some(ticks);
        state.analytics.record("simulate_high_load", ticks.to_string());
    }

    /// Wipe every persisted key and reload. The reset itself is the first
    /// event of the fresh analytics log.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.reset();
        state.analytics.record("reset", "");
    }

    /// Ask the assistant: classify, answer from the template, record it.
    pub async fn ask(&self, query: &str) -> ChatEntry {
        let (intent, response) = assistant::respond(query);
        let tags: BTreeSet<String> = assistant::matched_keywords(query)
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut state = self.state.lock().await;
        state.analytics.record("ask", intent.as_str());
        state.history.add_tagged_entry(query, response, intent, tags)
    }

    /// Record a templated message for a given intent tag without
    /// classifying. Unknown tags use the general template.
    pub async fn inject_message(&self, intent_tag: &str, text: &str) -> ChatEntry {
        let intent = Intent::from_tag(intent_tag);
        let response = assistant::render(intent, text);
        info!("Injecting {} message", intent);

        let mut state = self.state.lock().await;
        state.analytics.record("inject_message", intent.as_str());
        state.history.add_entry(text, response, intent)
    }

    pub async fn history_search(&self, keyword: &str) -> Vec<ChatEntry> {
        let mut state = self.state.lock().await;
        state.analytics.record("history_search", keyword);
        state.history.search(keyword)
    }

    pub async fn pin(&self, command: &str) -> bool {
        let mut state = self.state.lock().await;
        state.analytics.record("pin", command);
        state.pinned.pin(command)
    }

    pub async fn unpin(&self, command: &str) -> bool {
        let mut state = self.state.lock().await;
        state.analytics.record("unpin", command);
        state.pinned.unpin(command)
    }

    pub async fn drain_alerts(&self) -> Vec<AlertEvent> {
        self.state.lock().await.drain_alerts()
    }

    pub async fn status(&self) -> SystemStatus {
        self.state.lock().await.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::AppConfig;
    use crate::scheduler::Scheduler;
    use crate::state::AppState;
    use std::sync::Arc;

    fn console(success_rate: f64) -> DebugConsole {
        let state = AppState::open(AppConfig::default(), Arc::new(ManualClock::new(0)))
            .unwrap()
            .into_shared();
        DebugConsole::new(state, OperationSimulator::new(1.0, success_rate))
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_operation_applies_delta() {
        let console = console(1.0);
        let clock = console.state().lock().await.storage.clock().clone();
        let mut scheduler = Scheduler::with_defaults(&AppConfig::default(), clock);
        {
            let mut state = console.state().lock().await;
            scheduler.tick_once(&mut state);
        }
        let before = console.snapshot().await.unwrap();

        let result = console.run_operation("memory_optimization").await;
        assert!(result.success);
        let after = console.snapshot().await.unwrap();
        assert!(after.ram.used < before.ram.used);
        assert_eq!(console.status().await, SystemStatus::Optimal);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_operation_degrades_and_notifies() {
        let console = console(0.0);
        let result = console.run_operation("disk_cleanup").await;
        assert!(!result.success);
        assert_eq!(console.status().await, SystemStatus::Degraded);

        let alerts = console.drain_alerts().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Info);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_operations_last_write_wins() {
        let console = console(1.0);
        let slow = console.clone();
        let slow_run = tokio::spawn(async move { slow.run_operation("security_scan").await });

        tokio::task::yield_now().await;
        assert_eq!(
            console.status().await,
            SystemStatus::Busy(OperationType::SecurityScan)
        );

        // Network optimization (3 s) overlaps and finishes first.
        console.run_operation("network_optimization").await;
        assert_eq!(console.status().await, SystemStatus::Optimal);
        assert!(!slow_run.is_finished());

        slow_run.await.unwrap();
        assert_eq!(console.status().await, SystemStatus::Optimal);
    }

    #[tokio::test]
    async fn test_ask_records_tags_and_category() {
        let console = console(1.0);
        let entry = console.ask("Optimize my slow wifi").await;
        assert_eq!(entry.category, Intent::SystemOptimization);
        assert!(entry.tags.contains("wifi"));
        assert!(entry.ai_response.contains("Optimize my slow wifi"));

        assert_eq!(console.history_search("WIFI").await.len(), 1);
    }

    #[tokio::test]
    async fn test_inject_message_unknown_tag() {
        let console = console(1.0);
        let entry = console.inject_message("weather", "is it sunny").await;
        assert_eq!(entry.category, Intent::General);
        assert!(entry.ai_response.contains("is it sunny"));
    }

    #[tokio::test]
    async fn test_profiles_and_reset() {
        let console = console(1.0);
        assert!(console.activate_profile("gaming").await);
        assert!(!console.activate_profile("nope").await);
        assert!(console.pin("optimize").await);
        console.ask("hello").await;

        console.reset().await;
        let state = console.state().lock().await;
        assert!(state.history.is_empty());
        assert!(state.pinned.list().is_empty());
        assert_eq!(state.profiles.active().unwrap().name, "Balanced");
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_action_records_one_analytics_event() {
        async fn recorded(console: &DebugConsole) -> Vec<String> {
            let state = console.state().lock().await;
            state.analytics.events().map(|e| e.event.clone()).collect()
        }

        let console = console(1.0);

        console.run_operation("system_repair").await;
        console.activate_profile("silent").await;
        console.snapshot().await;
        console.simulate_high_load(2).await;
        console.inject_message("hardware_info", "what gpu").await;
        assert_eq!(
            recorded(&console).await,
            vec![
                "run_operation",
                "activate_profile",
                "snapshot",
                "simulate_high_load",
                "inject_message"
            ]
        );

        console.reset().await;
        assert_eq!(recorded(&console).await, vec!["reset"]);
    }

    #[tokio::test]
    async fn test_simulate_high_load_is_picked_up_next_tick() {
        let console = console(1.0);
        console.simulate_high_load(1).await;

        let clock = console.state().lock().await.storage.clock().clone();
        let mut scheduler = Scheduler::with_defaults(&AppConfig::default(), clock);
        let report = {
            let mut state = console.state().lock().await;
            scheduler.tick_once(&mut state)
        };
        assert_eq!(report.alerts.len(), 3);
        assert!(console.state().lock().await.high_load_request.is_none());
    }
}
