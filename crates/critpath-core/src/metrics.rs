//! Instrumentation sink for the analysis stages.
//!
//! Every stage of the chain takes a `&dyn Metrics` and reports counters and
//! a stage timer into it. The sink is purely observational: swapping
//! [`SimpleMetrics`] for [`NoopMetrics`] never changes a result.
//!
//! Counter names are dotted, stage first (`scc.dfs.visits`,
//! `condensation.edges.added`, `dag.relaxations.attempted`, …). Stage times
//! are stored as nanosecond counters under `<stage>.time.nanos`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Counter/timer collaborator.
///
/// Implementations must be safe to share across concurrently running
/// datasets; everything else in the pipeline is per-run and unshared.
pub trait Metrics: Send + Sync {
    /// Start (or restart) the timer.
    fn start_timer(&self);
    /// Stop the timer, latching the elapsed time since the last start.
    fn stop_timer(&self);
    /// Time latched by the last [`Metrics::stop_timer`].
    fn elapsed(&self) -> Duration;
    fn increment(&self, name: &str) {
        self.increment_by(name, 1);
    }
    fn increment_by(&self, name: &str, delta: i64);
    fn set(&self, name: &str, value: i64);
    /// Current value of a counter; unknown counters read as 0.
    fn get(&self, name: &str) -> i64;
    /// All counters, ordered by name.
    fn snapshot(&self) -> BTreeMap<String, i64>;

    /// Stop the timer and store its reading under `key` in nanoseconds.
    fn record_elapsed(&self, key: &str) {
        self.stop_timer();
        let nanos = i64::try_from(self.elapsed().as_nanos()).unwrap_or(i64::MAX);
        self.set(key, nanos);
    }
}

#[derive(Debug, Default)]
struct TimerState {
    started: Option<Instant>,
    last: Duration,
}

/// In-memory metrics: ordered counter map and a single latched timer.
#[derive(Debug, Default)]
pub struct SimpleMetrics {
    counters: Mutex<BTreeMap<String, i64>>,
    timer: Mutex<TimerState>,
}

impl SimpleMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means another thread panicked mid-increment; the
    // map itself is still a valid map.
    fn counters(&self) -> MutexGuard<'_, BTreeMap<String, i64>> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn timer(&self) -> MutexGuard<'_, TimerState> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Metrics for SimpleMetrics {
    fn start_timer(&self) {
        self.timer().started = Some(Instant::now());
    }

    fn stop_timer(&self) {
        let mut timer = self.timer();
        if let Some(started) = timer.started.take() {
            timer.last = started.elapsed();
        }
    }

    fn elapsed(&self) -> Duration {
        self.timer().last
    }

    fn increment_by(&self, name: &str, delta: i64) {
        let mut counters = self.counters();
        let slot = counters.entry(name.to_string()).or_insert(0);
        *slot = slot.saturating_add(delta);
    }

    fn set(&self, name: &str, value: i64) {
        self.counters().insert(name.to_string(), value);
    }

    fn get(&self, name: &str) -> i64 {
        self.counters().get(name).copied().unwrap_or(0)
    }

    fn snapshot(&self) -> BTreeMap<String, i64> {
        self.counters().clone()
    }
}

/// Sink that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn start_timer(&self) {}
    fn stop_timer(&self) {}
    fn elapsed(&self) -> Duration {
        Duration::ZERO
    }
    fn increment_by(&self, _name: &str, _delta: i64) {}
    fn set(&self, _name: &str, _value: i64) {}
    fn get(&self, _name: &str) -> i64 {
        0
    }
    fn snapshot(&self) -> BTreeMap<String, i64> {
        BTreeMap::new()
    }
}
