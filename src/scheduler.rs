//! A single ticking clock driving the simulated components.
//!
//! Subscribers run in registration order on every tick, each with exclusive
//! access to the [`AppState`]. The default pipeline is the metric simulator
//! followed by the alert evaluator, so alerts always judge the snapshot
//! produced in the same tick.

use crate::alerts::{AlertEvaluator, AlertEvent, Severity};
use crate::clock::SharedClock;
use crate::config::AppConfig;
use crate::metrics::{MetricSimulator, MetricSnapshot};
use crate::state::{AppState, SharedState};
use futures_util::stream::{self, BoxStream};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error, warn};

/// Capacity of the tick event channel.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// One beat of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// 1-based sequence number
    pub seq: u64,
    /// Unix timestamp in milliseconds
    pub at: u64,
}

/// What a tick produced, as published to UI subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: Tick,
    pub snapshot: Option<MetricSnapshot>,
    pub alerts: Vec<AlertEvent>,
}

/// A component driven by the scheduler.
pub trait TickSubscriber: Send {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Advance one tick.
    fn on_tick(&mut self, tick: &Tick, state: &mut AppState);
}

impl TickSubscriber for MetricSimulator {
    fn name(&self) -> &'static str {
        "metric_simulator"
    }

    fn on_tick(&mut self, _tick: &Tick, state: &mut AppState) {
        if let Some(ticks) = state.high_load_request.take() {
            self.simulate_high_load(ticks);
        }
        state.latest = Some(self.tick());
    }
}

impl TickSubscriber for AlertEvaluator {
    fn name(&self) -> &'static str {
        "alert_evaluator"
    }

    fn on_tick(&mut self, _tick: &Tick, state: &mut AppState) {
        let Some(snapshot) = &state.latest else {
            return;
        };
        let alerts = self.evaluate(snapshot);
        for alert in &alerts {
            match alert.severity {
                Severity::Critical => error!("{}: {}", alert.title, alert.message),
                Severity::Warning => warn!("{}: {}", alert.title, alert.message),
                Severity::Info => debug!("{}: {}", alert.title, alert.message),
            }
        }
        state.raise_alerts(alerts);
    }
}

/// Drives subscribers from one clock source.
pub struct Scheduler {
    subscribers: Vec<Box<dyn TickSubscriber>>,
    clock: SharedClock,
    seq: u64,
    events: broadcast::Sender<TickReport>,
}

impl Scheduler {
    /// An empty scheduler.
    pub fn new(clock: SharedClock) -> Self {
        let (events, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            subscribers: Vec::new(),
            clock,
            seq: 0,
            events,
        }
    }

    /// Simulator then alert evaluator.
    pub fn with_defaults(config: &AppConfig, clock: SharedClock) -> Self {
        let mut scheduler = Self::new(clock.clone());
        scheduler
            .subscribe(MetricSimulator::new(clock))
            .subscribe(AlertEvaluator::new(config.alert_thresholds.clone()));
        scheduler
    }

    /// Append a subscriber; it runs after those already registered.
    pub fn subscribe(&mut self, subscriber: impl TickSubscriber + 'static) -> &mut Self {
        debug!("Subscribed {}", subscriber.name());
        self.subscribers.push(Box::new(subscriber));
        self
    }

    /// Names of the subscribers in run order.
    pub fn subscriber_names(&self) -> Vec<&'static str> {
        self.subscribers.iter().map(|s| s.name()).collect()
    }

    /// Receive a [`TickReport`] after every tick.
    pub fn events(&self) -> broadcast::Receiver<TickReport> {
        self.events.subscribe()
    }

    /// Tick reports as a stream. A receiver that falls behind skips the
    /// reports it missed.
    pub fn event_stream(&self) -> BoxStream<'static, TickReport> {
        let reports = BroadcastStream::new(self.events.subscribe());
        Box::pin(tokio_stream::StreamExt::filter_map(reports, |report| report.ok()))
    }

    /// Run every subscriber once.
    pub fn tick_once(&mut self, state: &mut AppState) -> TickReport {
        self.seq += 1;
        let tick = Tick {
            seq: self.seq,
            at: self.clock.now_millis(),
        };
        state.tick_alerts.clear();

        for subscriber in &mut self.subscribers {
            subscriber.on_tick(&tick, state);
        }

        let report = TickReport {
            tick,
            snapshot: state.latest.clone(),
            alerts: std::mem::take(&mut state.tick_alerts),
        };
        // No receivers is fine; the UI may not be listening.
        let _ = self.events.send(report.clone());
        report
    }

    /// Tick at a fixed interval, yielding each report.
    pub fn into_stream(self, state: SharedState, interval_ms: u64) -> BoxStream<'static, TickReport> {
        let interval = time::interval(Duration::from_millis(interval_ms.max(1)));
        let stream = stream::unfold(
            (self, interval, state),
            |(mut scheduler, mut interval, state)| async move {
                interval.tick().await;
                let report = {
                    let mut guard = state.lock().await;
                    scheduler.tick_once(&mut guard)
                };
                Some((report, (scheduler, interval, state)))
            },
        );
        Box::pin(stream)
    }
}
