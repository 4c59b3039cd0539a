use super::MetricSource;
use crate::error::{MonitorError, Result};
use crate::model::{ConnectionStatus, CounterSample, RawConnection};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// procfs-backed source for Linux.
pub struct ProcSource {
    root: PathBuf,
}

impl ProcSource {
    pub fn new() -> Result<Self> {
        Self::with_root("/proc")
    }

    /// Use an alternate procfs mount (containers with a host /proc bind-mount, tests).
    pub fn with_root(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let net_dev = root.join("net/dev");
        fs::read_to_string(&net_dev).map_err(|e| {
            MonitorError::SourceUnavailable(format!("{}: {}", net_dev.display(), e))
        })?;
        Ok(Self { root })
    }

    // ── helpers ──────────────────────────────────────────────────────────

    /// Scan <root>/[pid]/fd/ to build a mapping of socket inode → pid.
    fn build_socket_pid_map(&self) -> HashMap<u64, u32> {
        let mut map: HashMap<u64, u32> = HashMap::new();
        let entries = match fs::read_dir(&self.root) {
            Ok(e) => e,
            Err(_) => return map,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let pid: u32 = match path.file_name().and_then(|f| f.to_str()).map(str::parse::<u32>) {
                Some(Ok(p)) => p,
                _ => continue,
            };

            let fds = match fs::read_dir(path.join("fd")) {
                Ok(f) => f,
                Err(_) => continue, // permission denied or process gone
            };
            for fd in fds.flatten() {
                if let Ok(target) = fs::read_link(fd.path()) {
                    if let Some(inode) = parse_socket_link(&target.to_string_lossy()) {
                        map.insert(inode, pid);
                    }
                }
            }
        }
        map
    }
}

/// Sum every interface line of /proc/net/dev into one sample.
///
/// Columns after the `iface:` prefix: rx_bytes(0) rx_packets(1) … tx_bytes(8) tx_packets(9).
pub fn parse_net_dev(content: &str) -> Result<CounterSample> {
    let mut sample = CounterSample::default();
    let mut interfaces = 0usize;
    // First two lines are headers.
    for line in content.lines().skip(2) {
        let Some((_iface, rest)) = line.trim().split_once(':') else {
            continue;
        };
        let cols: Vec<&str> = rest.split_whitespace().collect();
        if cols.len() < 10 {
            continue;
        }
        let field = |i: usize| -> Result<u64> {
            cols[i].parse::<u64>().map_err(|e| {
                MonitorError::TransientRead(format!("bad /proc/net/dev field {:?}: {}", cols[i], e))
            })
        };
        sample.bytes_recv = sample.bytes_recv.wrapping_add(field(0)?);
        sample.packets_recv = sample.packets_recv.wrapping_add(field(1)?);
        sample.bytes_sent = sample.bytes_sent.wrapping_add(field(8)?);
        sample.packets_sent = sample.packets_sent.wrapping_add(field(9)?);
        interfaces += 1;
    }
    if interfaces == 0 {
        return Err(MonitorError::TransientRead("no interfaces in /proc/net/dev".into()));
    }
    Ok(sample)
}

/// One parsed row of /proc/net/tcp{,6}.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TcpEntry {
    pub inode: u64,
    pub status: ConnectionStatus,
    pub has_remote_addr: bool,
}

impl TcpEntry {
    pub fn is_rankable(&self) -> bool {
        self.status == ConnectionStatus::Established && self.has_remote_addr
    }
}

/// Parse /proc/net/tcp or /proc/net/tcp6.
/// col 2 = remote address (hex ip:port), col 3 = state (hex), col 9 = inode.
pub fn parse_tcp_table(content: &str) -> Vec<TcpEntry> {
    let mut entries = Vec::new();
    for line in content.lines().skip(1) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 10 {
            continue;
        }
        let state = u8::from_str_radix(parts[3], 16).unwrap_or(0);
        let inode = parts[9].parse::<u64>().unwrap_or(0);
        entries.push(TcpEntry {
            inode,
            status: ConnectionStatus::from_proc_state(state),
            has_remote_addr: has_remote(parts[2]),
        });
    }
    entries
}

/// A remote of all-zero address and port 0 means "no peer" (listening sockets).
fn has_remote(addr: &str) -> bool {
    match addr.split_once(':') {
        Some((ip, port)) => {
            let port_set = u16::from_str_radix(port, 16).map(|p| p != 0).unwrap_or(false);
            let ip_set = ip.chars().any(|c| c != '0');
            port_set || ip_set
        }
        None => false,
    }
}

/// "socket:[12345]" → 12345
fn parse_socket_link(target: &str) -> Option<u64> {
    target
        .strip_prefix("socket:[")
        .and_then(|s| s.strip_suffix(']'))
        .and_then(|s| s.parse().ok())
}

// ── trait implementation ────────────────────────────────────────────────

impl MetricSource for ProcSource {
    fn name(&self) -> &'static str {
        "procfs"
    }

    fn read_counters(&self) -> Result<CounterSample> {
        let path = self.root.join("net/dev");
        let content = fs::read_to_string(&path)
            .map_err(|e| MonitorError::TransientRead(format!("{}: {}", path.display(), e)))?;
        parse_net_dev(&content)
    }

    /// TCP connections from /proc/net/tcp{,6}, with owning PIDs derived by
    /// mapping socket inodes back through /proc/[pid]/fd.
    fn read_connections(&self) -> Result<Vec<RawConnection>> {
        let mut entries = Vec::new();
        let mut tables_read = 0;
        for table in ["net/tcp", "net/tcp6"] {
            // tcp6 is absent when IPv6 is disabled.
            if let Ok(content) = fs::read_to_string(self.root.join(table)) {
                entries.extend(parse_tcp_table(&content));
                tables_read += 1;
            }
        }
        if tables_read == 0 {
            return Err(MonitorError::TransientRead(format!(
                "{}: no readable tcp tables",
                self.root.join("net").display()
            )));
        }

        // Only established connections with a peer get ranked; without one the fd scan is wasted.
        let socket_pid_map = if entries.iter().any(TcpEntry::is_rankable) {
            self.build_socket_pid_map()
        } else {
            HashMap::new()
        };
        Ok(entries
            .into_iter()
            .map(|e| RawConnection {
                // Inode 0 belongs to sockets in TIME_WAIT and similar; no owner.
                pid: if e.inode > 0 { socket_pid_map.get(&e.inode).copied() } else { None },
                status: e.status,
                has_remote_addr: e.has_remote_addr,
            })
            .collect())
    }

    fn resolve_process_name(&self, pid: u32) -> Result<String> {
        let comm = self.root.join(pid.to_string()).join("comm");
        read_comm(&comm).map_err(|reason| MonitorError::ProcessResolution { pid, reason })
    }
}

fn read_comm(path: &Path) -> std::result::Result<String, String> {
    let name = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let name = name.trim();
    if name.is_empty() {
        return Err("empty comm".to_string());
    }
    Ok(name.to_string())
}
