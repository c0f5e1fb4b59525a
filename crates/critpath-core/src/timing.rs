//! Opt-in wall-clock profile of pipeline stages across a batch.
//!
//! Unlike [`crate::metrics`], which belongs to one dataset run, samples here
//! accumulate over every dataset processed on the current thread so the CLI
//! can print a per-stage summary (`--timing` / `CRITPATH_TIMING=1`) at the
//! end of a batch.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde_json::json;

/// Summary of one stage over all recorded samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTiming {
    pub stage: String,
    pub samples: usize,
    pub total: Duration,
    pub p50: Duration,
    pub p95: Duration,
    pub max: Duration,
}

/// Per-stage timing summary, ordered by stage name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimingReport {
    pub stages: Vec<StageTiming>,
}

thread_local! {
    static SAMPLES: RefCell<BTreeMap<String, Vec<Duration>>> = const { RefCell::new(BTreeMap::new()) };
}

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Returns true when `CRITPATH_TIMING` asks for the timing report.
///
/// Accepted truthy values: `1`, `true`, `yes`, `on` (case-insensitive).
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("CRITPATH_TIMING")
        .ok()
        .is_some_and(|value| is_truthy(&value))
}

/// Turn sample collection on or off. Turning it off drops pending samples.
pub fn set_timing_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
    if !enabled {
        clear_timings();
    }
}

#[must_use]
pub fn is_timing_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Drop this thread's samples.
pub fn clear_timings() {
    SAMPLES.with(|samples| samples.borrow_mut().clear());
}

/// Run `f`, recording its duration under `stage` when timing is enabled.
pub fn timed<R>(stage: &str, f: impl FnOnce() -> R) -> R {
    if !is_timing_enabled() {
        return f();
    }

    let started = Instant::now();
    let result = f();
    record_sample(stage, started.elapsed());
    result
}

/// Drain this thread's samples into a report.
#[must_use]
pub fn collect_report() -> TimingReport {
    let grouped = SAMPLES.with(|samples| std::mem::take(&mut *samples.borrow_mut()));

    let stages = grouped
        .into_iter()
        .map(|(stage, mut values)| {
            values.sort_unstable();
            StageTiming {
                samples: values.len(),
                total: values.iter().sum(),
                p50: percentile(&values, 50),
                p95: percentile(&values, 95),
                max: values.last().copied().unwrap_or(Duration::ZERO),
                stage,
            }
        })
        .collect();

    TimingReport { stages }
}

impl TimingReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let stages: Vec<_> = self
            .stages
            .iter()
            .map(|s| {
                json!({
                    "stage": s.stage,
                    "samples": s.samples,
                    "total_us": s.total.as_micros(),
                    "p50_us": s.p50.as_micros(),
                    "p95_us": s.p95.as_micros(),
                    "max_us": s.max.as_micros(),
                })
            })
            .collect();

        json!({ "stages": stages })
    }

    /// Fixed-width table for stderr.
    #[must_use]
    pub fn display_table(&self) -> String {
        if self.stages.is_empty() {
            return "No timing samples recorded.".to_string();
        }

        let mut out = String::new();
        out.push_str("stage                    samples      total        p50        p95        max\n");
        out.push_str("---------------------------------------------------------------------------\n");
        for s in &self.stages {
            let _ = writeln!(
                out,
                "{:<24} {:>7} {:>10} {:>10} {:>10} {:>10}",
                s.stage,
                s.samples,
                format_duration(s.total),
                format_duration(s.p50),
                format_duration(s.p95),
                format_duration(s.max),
            );
        }
        out
    }
}

fn record_sample(stage: &str, elapsed: Duration) {
    SAMPLES.with(|samples| {
        samples
            .borrow_mut()
            .entry(stage.to_string())
            .or_default()
            .push(elapsed);
    });
}

/// Nearest-rank percentile over an ascending slice.
fn percentile(sorted: &[Duration], pct: usize) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let rank = pct.min(100).saturating_mul(sorted.len()).div_ceil(100);
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros >= 1_000_000 {
        format!("{}.{:03}s", micros / 1_000_000, (micros % 1_000_000) / 1_000)
    } else if micros >= 1_000 {
        format!("{}.{:03}ms", micros / 1_000, micros % 1_000)
    } else {
        format!("{micros}µs")
    }
}

fn is_truthy(value: &str) -> bool {
    ["1", "true", "yes", "on"]
        .iter()
        .any(|t| value.trim().eq_ignore_ascii_case(t))
}
