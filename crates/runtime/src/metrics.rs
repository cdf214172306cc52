use std::collections::BTreeMap;

use serde::Serialize;

/// Metric names recorded by the retrieval session.
pub mod names {
    pub const ANIMATION_SKIPPED_FRAMES: &str = "animation.skipped_frames";
    pub const CAMERA_SKIPPED_FRAMES: &str = "camera.skipped_frames";
    pub const CAMERA_COMMANDS: &str = "camera.commands";
    pub const PLAN_FALLBACK_DIRECT: &str = "plan.fallback_direct";
    pub const PLAN_CANDIDATES: &str = "plan.candidates";
    pub const PLAN_WAYPOINTS: &str = "plan.waypoints";
}

/// Deterministic metrics aggregation.
///
/// Sorted maps keep snapshots stable so traces can be diffed between runs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<String, u64>,
    histograms: BTreeMap<String, Histogram>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Histogram {
    pub count: u64,
    pub sum: i64,
    pub min: i64,
    pub max: i64,
}

impl Histogram {
    pub fn record(&mut self, value: i64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub counters: Vec<(String, u64)>,
    pub histograms: Vec<(String, Histogram)>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn inc_counter(&mut self, name: impl Into<String>, by: u64) {
        *self.counters.entry(name.into()).or_insert(0) += by;
    }

    pub fn record_histogram(&mut self, name: impl Into<String>, value: i64) {
        self.histograms.entry(name.into()).or_default().record(value);
    }

    pub fn histogram(&self, name: &str) -> Option<Histogram> {
        self.histograms.get(name).copied()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self.counters.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            histograms: self
                .histograms
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        }
    }
}
