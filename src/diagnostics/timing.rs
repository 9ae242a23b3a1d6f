use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Wall time of one labelled batch step.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
    /// Spines handled by the step (0 for bookkeeping steps).
    pub tasks: usize,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64, tasks: usize) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
            tasks,
        }
    }
}

/// Timing trace of one batch run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64, tasks: usize) {
        self.stages.push(StageTiming::new(label, elapsed_ms, tasks));
    }

    /// Run `f`, recording its wall time under `label`.
    pub fn measure<T>(&mut self, label: impl Into<String>, tasks: usize, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.push(label, elapsed_ms(start), tasks);
        out
    }

    /// Sum of all recorded steps.
    pub fn stage_sum_ms(&self) -> f64 {
        self.stages.iter().map(|s| s.elapsed_ms).sum()
    }
}

pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_records_label_and_result() {
        let mut t = TimingBreakdown::default();
        let v = t.measure("segment 3", 7, || 41 + 1);
        assert_eq!(v, 42);
        assert_eq!(t.stages.len(), 1);
        assert_eq!(t.stages[0].label, "segment 3");
        assert_eq!(t.stages[0].tasks, 7);
        assert!(t.stage_sum_ms() >= 0.0);
    }
}
