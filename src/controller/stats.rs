//! Counters for skipped ticks and connections.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct SamplerStats {
    ticks_ok: AtomicU64,
    ticks_failed: AtomicU64,
    connections_skipped: AtomicU64,
    last_error: Mutex<Option<String>>,
}

/// Point-in-time copy of [`SamplerStats`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub ticks_ok: u64,
    pub ticks_failed: u64,
    pub connections_skipped: u64,
    pub last_error: Option<String>,
}

impl SamplerStats {
    pub fn record_success(&self, skipped: u64) {
        self.ticks_ok.fetch_add(1, Ordering::Relaxed);
        self.connections_skipped.fetch_add(skipped, Ordering::Relaxed);
    }

    pub fn record_failure(&self, error: &str) {
        self.ticks_failed.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_error.lock() {
            *last = Some(error.to_string());
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            ticks_ok: self.ticks_ok.load(Ordering::Relaxed),
            ticks_failed: self.ticks_failed.load(Ordering::Relaxed),
            connections_skipped: self.connections_skipped.load(Ordering::Relaxed),
            last_error: self.last_error.lock().ok().and_then(|e| e.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_accumulate() {
        let stats = SamplerStats::default();
        stats.record_success(2);
        stats.record_success(1);
        stats.record_failure("read /proc/net/dev: gone");
        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                ticks_ok: 2,
                ticks_failed: 1,
                connections_skipped: 3,
                last_error: Some("read /proc/net/dev: gone".into()),
            }
        );
    }
}
