//! Error kinds shared by the collectors, the sampler and configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// The metric source could not be set up at all. Fatal at startup.
    #[error("metric source unavailable: {0}")]
    SourceUnavailable(String),

    /// A single tick failed to read counters or connections. The tick is skipped.
    #[error("transient read error: {0}")]
    TransientRead(String),

    /// A connection's owning process could not be named (usually it exited).
    #[error("could not resolve process name for pid {pid}: {reason}")]
    ProcessResolution { pid: u32, reason: String },

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl MonitorError {
    /// Fatal errors abort construction; the rest are recorded and skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MonitorError::SourceUnavailable(_) | MonitorError::Configuration(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::MonitorError;

    #[test]
    fn fatal_kinds() {
        assert!(MonitorError::SourceUnavailable("no /proc".into()).is_fatal());
        assert!(MonitorError::Configuration("capacity".into()).is_fatal());
        assert!(!MonitorError::TransientRead("eof".into()).is_fatal());
        assert!(
            !MonitorError::ProcessResolution { pid: 7, reason: "gone".into() }.is_fatal()
        );
    }

    #[test]
    fn display_includes_pid() {
        let e = MonitorError::ProcessResolution { pid: 42, reason: "exited".into() };
        assert_eq!(e.to_string(), "could not resolve process name for pid 42: exited");
    }
}
