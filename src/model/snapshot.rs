use serde::Serialize;

use super::network::AppRanking;

/// Copies of the four aligned series; index `i` is the same tick in every vector.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeriesSnapshot {
    pub bytes_sent: Vec<u64>,
    pub bytes_recv: Vec<u64>,
    pub packets_sent: Vec<u64>,
    pub packets_recv: Vec<u64>,
}

impl SeriesSnapshot {
    pub fn len(&self) -> usize {
        self.bytes_sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes_sent.is_empty()
    }
}

/// Immutable view handed to readers. Series and ranking always come from the same tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Sequence number of the successful tick that produced this snapshot, starting at 1.
    pub tick: u64,
    pub time: String,
    pub series: SeriesSnapshot,
    pub top_talkers: AppRanking,
}

/// Per-interval differences of a cumulative counter series.
///
/// The result has one entry per consecutive pair. A decrease means the
/// underlying counter was reset and is reported as `None`.
pub fn interval_deltas(values: &[u64]) -> Vec<Option<u64>> {
    values
        .windows(2)
        .map(|w| w[1].checked_sub(w[0]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{interval_deltas, SeriesSnapshot};

    #[test]
    fn series_length_follows_bytes_sent() {
        let empty = SeriesSnapshot::default();
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);

        let series = SeriesSnapshot {
            bytes_sent: vec![1, 2],
            bytes_recv: vec![3, 4],
            packets_sent: vec![5, 6],
            packets_recv: vec![7, 8],
        };
        assert!(!series.is_empty());
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn deltas_of_short_series_are_empty() {
        assert!(interval_deltas(&[]).is_empty());
        assert!(interval_deltas(&[10]).is_empty());
    }

    #[test]
    fn deltas_mark_resets() {
        assert_eq!(
            interval_deltas(&[100, 150, 150, 20, 70]),
            vec![Some(50), Some(0), None, Some(50)]
        );
    }
}
