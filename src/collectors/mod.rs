use crate::error::Result;
use crate::model::{CounterSample, RawConnection};

pub mod mac;
pub mod linux;

/// Trait for OS-specific network metric collection.
/// Implementations (ProcSource, MacSource) handle the low-level details.
///
/// All calls are expected to be bounded-time local queries. The sampler runs
/// them on a blocking thread, so implementations must be `Send + Sync`.
pub trait MetricSource: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &'static str;

    /// Host-wide byte and packet totals, summed over every interface.
    fn read_counters(&self) -> Result<CounterSample>;

    /// Every TCP connection currently known to the OS.
    fn read_connections(&self) -> Result<Vec<RawConnection>>;

    /// Name of the process with the given PID. Fails if the process is gone.
    fn resolve_process_name(&self, pid: u32) -> Result<String>;
}

/// Build the source for the current OS. This is the only place the source can
/// fail fatally (`MonitorError::SourceUnavailable`).
pub fn default_source() -> Result<Box<dyn MetricSource>> {
    let source: Box<dyn MetricSource> = if cfg!(target_os = "macos") {
        Box::new(mac::MacSource::new()?)
    } else {
        Box::new(linux::ProcSource::new()?)
    };
    Ok(source)
}
