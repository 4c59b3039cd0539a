// Re-export all model types from submodules.

pub use network::{
    AppRanking, ConnectionRecord, ConnectionStatus, CounterSample, RawConnection, TopTalker,
};
pub use snapshot::{interval_deltas, SeriesSnapshot, Snapshot};

mod network;
mod snapshot;
