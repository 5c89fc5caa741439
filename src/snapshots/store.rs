//! Snapshot history storage.

use super::models::Snapshot;
use crate::error::StoreError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Read contract over the snapshot sequence an external collector appends to
#[async_trait]
pub trait SnapshotStore: Send + Sync + fmt::Debug {
    /// Up to `limit` snapshots for `delegate_id`, newest `captured_at` first
    ///
    /// A delegate without snapshots yields an empty vector, not an error.
    async fn latest_snapshots(
        &self,
        delegate_id: Uuid,
        limit: u32,
    ) -> Result<Vec<Snapshot>, StoreError>;
}

/// Per-delegate snapshot sequences kept in ascending capture order
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    sequences: RwLock<HashMap<Uuid, Vec<Snapshot>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot; it must be strictly newer than the delegate's latest
    pub fn append(&self, snapshot: Snapshot) -> Result<(), StoreError> {
        let mut sequences = self.sequences.write();
        let sequence = sequences.entry(snapshot.delegate_id).or_default();

        if let Some(last) = sequence.last() {
            if snapshot.captured_at <= last.captured_at {
                return Err(StoreError::CorruptRecord(format!(
                    "snapshot {} for delegate {} captured at {} is not after {}",
                    snapshot.id, snapshot.delegate_id, snapshot.captured_at, last.captured_at
                )));
            }
        }

        sequence.push(snapshot);
        Ok(())
    }

    pub fn count_for(&self, delegate_id: Uuid) -> usize {
        self.sequences
            .read()
            .get(&delegate_id)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn latest_snapshots(
        &self,
        delegate_id: Uuid,
        limit: u32,
    ) -> Result<Vec<Snapshot>, StoreError> {
        let latest = self
            .sequences
            .read()
            .get(&delegate_id)
            .map(|sequence| {
                sequence
                    .iter()
                    .rev()
                    .take(limit as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(latest)
    }
}
