//! Network sampling: reads the metric source on a fixed interval, keeps the
//! bounded history and the top-talker ranking, and publishes snapshots.

mod publisher;
mod ranking;
mod series;
mod stats;

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::collectors::MetricSource;
use crate::config::Config;
use crate::error::{MonitorError, Result};
use crate::model::{CounterSample, Snapshot};

pub use publisher::SnapshotPublisher;
pub use ranking::{rank, resolve_connections, Resolved};
pub use series::TimeSeriesBuffer;
pub use stats::{SamplerStats, StatsSnapshot};

/// Everything read from the source in one tick.
struct Reading {
    counters: CounterSample,
    resolved: Resolved,
}

fn read_source(source: &dyn MetricSource) -> Result<Reading> {
    let counters = source.read_counters()?;
    let raw = source.read_connections()?;
    let resolved = resolve_connections(source, &raw);
    Ok(Reading { counters, resolved })
}

/// Owns the history buffer and is the only writer to its publisher.
pub struct Sampler {
    source: Arc<dyn MetricSource>,
    series: TimeSeriesBuffer,
    top_n: usize,
    interval: Duration,
    tick: u64,
    publisher: SnapshotPublisher,
    stats: Arc<SamplerStats>,
}

impl Sampler {
    pub fn new(
        source: Arc<dyn MetricSource>,
        config: &Config,
        publisher: SnapshotPublisher,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            series: TimeSeriesBuffer::new(config.buffer_capacity)?,
            top_n: config.top_n,
            interval: config.sample_interval(),
            tick: 0,
            publisher,
            stats: Arc::new(SamplerStats::default()),
        })
    }

    pub fn publisher(&self) -> &SnapshotPublisher {
        &self.publisher
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn buffer_len(&self) -> usize {
        self.series.len()
    }

    /// Run one tick on the calling thread.
    ///
    /// A read error skips the tick: the buffer and the published snapshot are
    /// left untouched and the error is recorded before being returned.
    pub fn sample_once(&mut self) -> Result<()> {
        let reading = read_source(self.source.as_ref());
        self.ingest(reading)
    }

    fn ingest(&mut self, reading: Result<Reading>) -> Result<()> {
        let reading = match reading {
            Ok(r) => r,
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "skipping tick");
                self.stats.record_failure(&e.to_string());
                return Err(e);
            }
        };

        self.series.append(reading.counters);
        let top_talkers = rank(&reading.resolved.records, self.top_n);
        self.tick += 1;

        self.publisher.publish(Snapshot {
            tick: self.tick,
            time: Local::now().format("%H:%M:%S").to_string(),
            series: self.series.snapshot(),
            top_talkers,
        });
        self.stats.record_success(reading.resolved.skipped);
        debug!(
            tick = self.tick,
            points = self.series.len(),
            skipped = reading.resolved.skipped,
            "published snapshot"
        );
        Ok(())
    }

    /// Spawn the sampling loop on `runtime`. The first tick runs immediately.
    pub fn start(self, runtime: &Handle) -> SamplerHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let publisher = self.publisher.clone();
        let stats = Arc::clone(&self.stats);
        let task = runtime.spawn(self.run(shutdown_rx));
        SamplerHandle {
            shutdown,
            task,
            publisher,
            stats,
        }
    }

    async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            source = self.source.name(),
            interval_ms = self.interval.as_millis() as u64,
            capacity = self.series.capacity(),
            top_n = self.top_n,
            "sampler started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                // Fires on stop() and when every handle is gone.
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {}
            }

            // Ticks are sequential: the next one is not awaited until this one is published.
            let source = Arc::clone(&self.source);
            let reading = match tokio::task::spawn_blocking(move || read_source(source.as_ref())).await {
                Ok(reading) => reading,
                Err(e) => Err(MonitorError::TransientRead(format!("collector task failed: {}", e))),
            };
            let _ = self.ingest(reading);
        }

        info!(ticks = self.tick, "sampler stopped");
    }
}

/// Control and read access to a running sampler.
///
/// Dropping the handle stops the loop after its current tick.
pub struct SamplerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
    publisher: SnapshotPublisher,
    stats: Arc<SamplerStats>,
}

impl SamplerHandle {
    /// Ask the loop to exit once any in-flight tick is published. Idempotent.
    pub fn stop(&self) {
        if !self.shutdown.send_replace(true) {
            info!("sampler stop requested");
        }
    }

    pub fn is_stopping(&self) -> bool {
        *self.shutdown.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.publisher.latest()
    }

    pub fn publisher(&self) -> SnapshotPublisher {
        self.publisher.clone()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Wait for the loop to exit. Call `stop()` first, or this waits forever.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            error!(error = %e, "sampler task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectionStatus, RawConnection};
    use std::sync::Mutex;

    /// Returns queued counter results in order; connections are fixed unless
    /// a connection failure is queued for the same call.
    struct Scripted {
        counters: Mutex<Vec<Result<CounterSample>>>,
        connection_failures: Mutex<Vec<bool>>,
    }

    impl Scripted {
        fn new(script: Vec<Result<CounterSample>>) -> Self {
            Self::with_connection_failures(script, vec![])
        }

        fn with_connection_failures(mut script: Vec<Result<CounterSample>>, mut failures: Vec<bool>) -> Self {
            script.reverse();
            failures.reverse();
            Self {
                counters: Mutex::new(script),
                connection_failures: Mutex::new(failures),
            }
        }
    }

    impl MetricSource for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }
        fn read_counters(&self) -> Result<CounterSample> {
            self.counters
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(MonitorError::TransientRead("script exhausted".into())))
        }
        fn read_connections(&self) -> Result<Vec<RawConnection>> {
            if self.connection_failures.lock().unwrap().pop().unwrap_or(false) {
                return Err(MonitorError::TransientRead("tcp table vanished".into()));
            }
            Ok(vec![
                RawConnection { pid: Some(1), status: ConnectionStatus::Established, has_remote_addr: true },
                RawConnection { pid: Some(2), status: ConnectionStatus::Established, has_remote_addr: true },
            ])
        }
        fn resolve_process_name(&self, pid: u32) -> Result<String> {
            if pid == 1 {
                Ok("nginx".into())
            } else {
                Err(MonitorError::ProcessResolution { pid, reason: "exited".into() })
            }
        }
    }

    fn counters(n: u64) -> CounterSample {
        CounterSample { bytes_sent: n, bytes_recv: n, packets_sent: n, packets_recv: n }
    }

    fn sampler(script: Vec<Result<CounterSample>>, capacity: usize) -> Sampler {
        let config = Config { buffer_capacity: capacity, ..Config::default() };
        Sampler::new(Arc::new(Scripted::new(script)), &config, SnapshotPublisher::new()).unwrap()
    }

    #[test]
    fn invalid_config_rejected() {
        let config = Config { top_n: 0, ..Config::default() };
        let result = Sampler::new(Arc::new(Scripted::new(vec![])), &config, SnapshotPublisher::new());
        assert!(matches!(result, Err(MonitorError::Configuration(_))));
    }

    #[test]
    fn successful_tick_publishes() {
        let mut s = sampler(vec![Ok(counters(10))], 4);
        assert!(s.publisher().latest().is_none());
        s.sample_once().unwrap();

        let snap = s.publisher().latest().unwrap();
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.series.bytes_sent, vec![10]);
        assert_eq!(snap.top_talkers.len(), 1);
        assert_eq!(snap.top_talkers[0].name, "nginx");
        assert_eq!(s.stats().connections_skipped, 1);
    }

    #[test]
    fn failed_tick_changes_nothing() {
        let mut s = sampler(
            vec![
                Ok(counters(1)),
                Err(MonitorError::TransientRead("boom".into())),
                Ok(counters(3)),
            ],
            4,
        );
        s.sample_once().unwrap();
        let before = s.publisher().latest().unwrap();

        assert!(s.sample_once().is_err());
        assert_eq!(s.buffer_len(), 1);
        assert_eq!(*s.publisher().latest().unwrap(), *before);

        s.sample_once().unwrap();
        let after = s.publisher().latest().unwrap();
        assert_eq!(after.tick, 2);
        assert_eq!(after.series.bytes_sent, vec![1, 3]);

        let stats = s.stats();
        assert_eq!(stats.ticks_ok, 2);
        assert_eq!(stats.ticks_failed, 1);
        assert_eq!(stats.last_error.as_deref(), Some("transient read error: boom"));
    }

    #[test]
    fn failed_connection_read_skips_tick() {
        let script = vec![Ok(counters(1)), Ok(counters(2)), Ok(counters(3))];
        let source = Scripted::with_connection_failures(script, vec![false, true, false]);
        let config = Config { buffer_capacity: 4, ..Config::default() };
        let mut s = Sampler::new(Arc::new(source), &config, SnapshotPublisher::new()).unwrap();

        s.sample_once().unwrap();
        let before = s.publisher().latest().unwrap();
        assert!(matches!(s.sample_once(), Err(MonitorError::TransientRead(_))));
        assert_eq!(s.buffer_len(), 1);
        assert_eq!(*s.publisher().latest().unwrap(), *before);

        s.sample_once().unwrap();
        let after = s.publisher().latest().unwrap();
        assert_eq!(after.tick, 2);
        assert_eq!(after.series.bytes_sent, vec![1, 3]);
        assert_eq!(s.stats().ticks_failed, 1);
    }
}
