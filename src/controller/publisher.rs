//! Single-writer / many-reader hand-off of the latest snapshot.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::model::Snapshot;

/// Cloning shares the same slot. Only the sampler publishes; any clone may read.
#[derive(Clone, Default)]
pub struct SnapshotPublisher {
    current: Arc<ArcSwapOption<Snapshot>>,
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replace the visible snapshot. Never waits for readers.
    pub fn publish(&self, snapshot: Snapshot) {
        self.current.store(Some(Arc::new(snapshot)));
    }

    /// Most recent snapshot, or `None` before the first successful tick.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }
}
