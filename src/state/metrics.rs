// Execution metrics: wall-clock bookkeeping for the whole run (all
// documents), not any single test's timing.

use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionMetrics {
    pub total_duration_ms: u64,
    pub start_time: i64,
    pub end_time: i64,
    pub concurrency: usize,
}

impl Default for ExecutionMetrics {
    fn default() -> Self {
        Self {
            total_duration_ms: 0,
            start_time: Utc::now().timestamp(),
            end_time: 0,
            concurrency: 1,
        }
    }
}

impl ExecutionMetrics {
    pub fn update_time(&mut self) {
        self.end_time = Utc::now().timestamp();
        self.total_duration_ms = (self.end_time - self.start_time).max(0) as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_time_computes_a_non_negative_duration() {
        let mut metrics = ExecutionMetrics::default();
        metrics.update_time();
        assert!(metrics.total_duration_ms < 1000);
    }
}
