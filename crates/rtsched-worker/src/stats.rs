use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by the scheduler loop.
#[derive(Debug, Default)]
pub struct SchedulerStats {
    executed: AtomicU64,
    panicked: AtomicU64,
    idle_polls: AtomicU64,
}

/// Point-in-time copy of [`SchedulerStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Tasks whose action ran, including ones that panicked
    pub executed: u64,
    /// Tasks whose action panicked
    pub panicked: u64,
    /// Polls that found the queue empty
    pub idle_polls: u64,
}

impl SchedulerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_executed(&self, panicked: bool) {
        self.executed.fetch_add(1, Ordering::Relaxed);
        if panicked {
            self.panicked.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_idle_poll(&self) {
        self.idle_polls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            executed: self.executed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            idle_polls: self.idle_polls.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = SchedulerStats::new();
        stats.record_executed(false);
        stats.record_executed(true);
        stats.record_idle_poll();

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                executed: 2,
                panicked: 1,
                idle_polls: 1,
            }
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = StatsSnapshot {
            executed: 3,
            panicked: 0,
            idle_polls: 12,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"executed":3,"panicked":0,"idle_polls":12}"#);
    }
}
