use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Time-boxed snapshot of one resource's decoded rows.
///
/// This is the only place staleness is tolerated: reads within the TTL are
/// served from memory without touching the store. Writers invalidate before
/// computing and again after the store mutation settles, so a read never
/// observes pre-write data once a write has completed.
pub struct SnapshotCache<T> {
    ttl: Duration,
    state: RwLock<Option<Snapshot<T>>>,
}

struct Snapshot<T> {
    rows: Vec<T>,
    captured_at: Instant,
}

impl<T: Clone> SnapshotCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: RwLock::new(None),
        }
    }

    /// The snapshot, if one was captured within the TTL.
    pub async fn read(&self) -> Option<Vec<T>> {
        let state = self.state.read().await;
        state
            .as_ref()
            .filter(|snapshot| snapshot.captured_at.elapsed() < self.ttl)
            .map(|snapshot| snapshot.rows.clone())
    }

    pub async fn store(&self, rows: Vec<T>) {
        *self.state.write().await = Some(Snapshot {
            rows,
            captured_at: Instant::now(),
        });
    }

    /// Unconditional and idempotent; in-memory only.
    pub async fn invalidate(&self) {
        *self.state.write().await = None;
    }
}
