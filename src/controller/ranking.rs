//! Top-talker ranking and per-connection process name resolution.

use std::collections::HashMap;

use tracing::debug;

use crate::collectors::MetricSource;
use crate::model::{AppRanking, ConnectionRecord, RawConnection, TopTalker};

/// Connections whose owner was named, plus how many were dropped.
#[derive(Debug, Default)]
pub struct Resolved {
    pub records: Vec<ConnectionRecord>,
    pub skipped: u64,
}

/// Name the owner of each rankable connection.
///
/// A connection whose PID is unknown or whose process vanished before lookup
/// is skipped; the rest of the list is unaffected. Each PID is looked up at
/// most once per call.
pub fn resolve_connections(source: &dyn MetricSource, raw: &[RawConnection]) -> Resolved {
    let mut names: HashMap<u32, Option<String>> = HashMap::new();
    let mut resolved = Resolved::default();

    for conn in raw {
        let record = ConnectionRecord::new(String::new(), conn.status, conn.has_remote_addr);
        if !record.is_active() {
            continue;
        }
        let Some(pid) = conn.pid else {
            debug!("skipping connection without an owning pid");
            resolved.skipped += 1;
            continue;
        };
        let name = names.entry(pid).or_insert_with(|| match source.resolve_process_name(pid) {
            Ok(name) => Some(name),
            Err(e) => {
                debug!(pid, error = %e, "skipping connection");
                None
            }
        });
        match name {
            Some(name) => resolved.records.push(ConnectionRecord {
                process_name: name.clone(),
                ..record
            }),
            None => resolved.skipped += 1,
        }
    }

    resolved
}

/// Rank applications by number of established connections with a remote peer.
///
/// Counts keep first-seen order and the sort is stable, so ties come out in
/// the order the apps first appear in `connections`.
pub fn rank(connections: &[ConnectionRecord], top_n: usize) -> AppRanking {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TopTalker> = Vec::new();

    for conn in connections.iter().filter(|c| c.is_active()) {
        match index.get(conn.process_name.as_str()) {
            Some(&i) => counts[i].connections += 1,
            None => {
                index.insert(conn.process_name.as_str(), counts.len());
                counts.push(TopTalker {
                    name: conn.process_name.clone(),
                    connections: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.connections.cmp(&a.connections));
    counts.truncate(top_n);
    counts
}
