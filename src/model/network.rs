use serde::Serialize;

/// Aggregate interface counters read in one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CounterSample {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
}

/// TCP connection state as reported by the OS.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ConnectionStatus {
    Established,
    SynSent,
    SynRecv,
    FinWait1,
    FinWait2,
    TimeWait,
    Close,
    CloseWait,
    LastAck,
    Listen,
    Closing,
    Unknown,
}

impl ConnectionStatus {
    /// Map the hex state column of /proc/net/tcp{,6}.
    pub fn from_proc_state(state: u8) -> Self {
        match state {
            0x01 => ConnectionStatus::Established,
            0x02 => ConnectionStatus::SynSent,
            0x03 => ConnectionStatus::SynRecv,
            0x04 => ConnectionStatus::FinWait1,
            0x05 => ConnectionStatus::FinWait2,
            0x06 => ConnectionStatus::TimeWait,
            0x07 => ConnectionStatus::Close,
            0x08 => ConnectionStatus::CloseWait,
            0x09 => ConnectionStatus::LastAck,
            0x0A => ConnectionStatus::Listen,
            0x0B => ConnectionStatus::Closing,
            _ => ConnectionStatus::Unknown,
        }
    }

    /// Map the state names printed by `lsof`/`netstat` (e.g. "ESTABLISHED").
    pub fn from_name(name: &str) -> Self {
        match name.trim_matches(|c| c == '(' || c == ')') {
            "ESTABLISHED" => ConnectionStatus::Established,
            "SYN_SENT" => ConnectionStatus::SynSent,
            "SYN_RECV" | "SYN_RECEIVED" => ConnectionStatus::SynRecv,
            "FIN_WAIT1" | "FIN_WAIT_1" => ConnectionStatus::FinWait1,
            "FIN_WAIT2" | "FIN_WAIT_2" => ConnectionStatus::FinWait2,
            "TIME_WAIT" => ConnectionStatus::TimeWait,
            "CLOSED" | "CLOSE" => ConnectionStatus::Close,
            "CLOSE_WAIT" => ConnectionStatus::CloseWait,
            "LAST_ACK" => ConnectionStatus::LastAck,
            "LISTEN" => ConnectionStatus::Listen,
            "CLOSING" => ConnectionStatus::Closing,
            _ => ConnectionStatus::Unknown,
        }
    }
}

/// A connection as enumerated by the source, before its owner is named.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawConnection {
    /// `None` when the owning process could not be determined (no permission, already gone).
    pub pid: Option<u32>,
    pub status: ConnectionStatus,
    pub has_remote_addr: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub process_name: String,
    pub status: ConnectionStatus,
    pub has_remote_addr: bool,
}

impl ConnectionRecord {
    pub fn new(process_name: impl Into<String>, status: ConnectionStatus, has_remote_addr: bool) -> Self {
        Self {
            process_name: process_name.into(),
            status,
            has_remote_addr,
        }
    }

    /// Only established connections with a peer count toward a top talker.
    pub fn is_active(&self) -> bool {
        self.status == ConnectionStatus::Established && self.has_remote_addr
    }
}

/// One entry of the ranking: an application and its active connection count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TopTalker {
    pub name: String,
    pub connections: u32,
}

pub type AppRanking = Vec<TopTalker>;
