use super::MetricSource;
use crate::error::{MonitorError, Result};
use crate::model::{ConnectionStatus, CounterSample, RawConnection};
use std::process::Command;
use std::sync::Mutex;
use sysinfo::{Networks, Pid, ProcessesToUpdate, System};

/// macOS source: interface totals from sysinfo, connections from `lsof`.
pub struct MacSource {
    // sysinfo handles need &mut to refresh; the sampler only holds &self.
    networks: Mutex<Networks>,
    sys: Mutex<System>,
}

impl MacSource {
    pub fn new() -> Result<Self> {
        let networks = Networks::new_with_refreshed_list();
        if networks.list().is_empty() {
            return Err(MonitorError::SourceUnavailable(
                "no network interfaces reported".into(),
            ));
        }
        Ok(Self {
            networks: Mutex::new(networks),
            sys: Mutex::new(System::new()),
        })
    }
}

/// Parse `lsof -i TCP -n -P` output.
///
/// Columns: COMMAND PID USER FD TYPE DEVICE SIZE/OFF NODE NAME [(STATE)].
/// NAME is "local->remote" when there is a peer.
pub fn parse_lsof(output: &str) -> Vec<RawConnection> {
    let mut conns = Vec::new();
    // Skip header
    for line in output.lines().skip(1) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 9 {
            continue;
        }
        let pid = parts[1].parse::<u32>().ok();
        let (name_col, status) = match parts.last() {
            Some(last) if last.starts_with('(') => (parts[parts.len() - 2], ConnectionStatus::from_name(last)),
            _ => (parts[parts.len() - 1], ConnectionStatus::Unknown),
        };
        conns.push(RawConnection {
            pid,
            status,
            has_remote_addr: name_col.contains("->"),
        });
    }
    conns
}

impl MetricSource for MacSource {
    fn name(&self) -> &'static str {
        "sysinfo+lsof"
    }

    fn read_counters(&self) -> Result<CounterSample> {
        let mut networks = self
            .networks
            .lock()
            .map_err(|_| MonitorError::TransientRead("network handle poisoned".into()))?;
        networks.refresh(true);

        let mut sample = CounterSample::default();
        for (_name, data) in networks.list() {
            sample.bytes_recv = sample.bytes_recv.wrapping_add(data.total_received());
            sample.bytes_sent = sample.bytes_sent.wrapping_add(data.total_transmitted());
            sample.packets_recv = sample.packets_recv.wrapping_add(data.total_packets_received());
            sample.packets_sent = sample.packets_sent.wrapping_add(data.total_packets_transmitted());
        }
        Ok(sample)
    }

    fn read_connections(&self) -> Result<Vec<RawConnection>> {
        let output = Command::new("lsof")
            .args(["-i", "TCP", "-n", "-P"])
            .output()
            .map_err(|e| MonitorError::TransientRead(format!("lsof: {}", e)))?;
        // lsof exits 1 when nothing matched; that is an empty table, not a failure.
        if !output.status.success() && !output.stdout.is_empty() {
            return Err(MonitorError::TransientRead(format!(
                "lsof exited with {}",
                output.status
            )));
        }
        Ok(parse_lsof(&String::from_utf8_lossy(&output.stdout)))
    }

    fn resolve_process_name(&self, pid: u32) -> Result<String> {
        let mut sys = self.sys.lock().map_err(|_| MonitorError::ProcessResolution {
            pid,
            reason: "process table poisoned".into(),
        })?;
        let sys_pid = Pid::from_u32(pid);
        sys.refresh_processes(ProcessesToUpdate::Some(&[sys_pid]), true);
        sys.process(sys_pid)
            .map(|p| p.name().to_string_lossy().into_owned())
            .ok_or_else(|| MonitorError::ProcessResolution {
                pid,
                reason: "no such process".into(),
            })
    }
}
