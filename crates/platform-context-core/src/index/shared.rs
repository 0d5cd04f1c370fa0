//! Lazily built, shared index state
//!
//! `Empty -> Building -> Ready`, guarded by one read/write lock. Readers take
//! the read lock only long enough to clone the ready snapshot's `Arc`; all
//! matching then runs lock-free on the snapshot. The first access (or the
//! first access after [`SharedIndex::reload`]) takes the write lock and
//! re-checks the state before building, so at most one build is in flight.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, warn};

use super::CatalogIndex;
use crate::catalog::CatalogSource;

/// Result of one build: the index plus the failure that emptied it, if any.
#[derive(Debug)]
pub struct IndexSnapshot {
    pub index: CatalogIndex,
    pub failure: Option<String>,
}

impl IndexSnapshot {
    /// Build from `source`, degrading to an empty index on source errors.
    pub fn from_source(source: &dyn CatalogSource) -> Self {
        match CatalogIndex::build(source) {
            Ok(index) => Self {
                index,
                failure: None,
            },
            Err(e) => {
                warn!(error = %e, "Catalog source failed, serving empty index");
                Self {
                    index: CatalogIndex::empty(),
                    failure: Some(e.to_string()),
                }
            }
        }
    }
}

#[derive(Debug, Default)]
pub enum IndexState {
    #[default]
    Empty,
    Building,
    Ready(Arc<IndexSnapshot>),
}

/// Observable phase of the shared index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexPhase {
    Empty,
    Building,
    Ready,
}

impl IndexState {
    pub fn phase(&self) -> IndexPhase {
        match self {
            IndexState::Empty => IndexPhase::Empty,
            IndexState::Building => IndexPhase::Building,
            IndexState::Ready(_) => IndexPhase::Ready,
        }
    }
}

#[derive(Default)]
struct Inner {
    state: IndexState,
    last_fingerprint: Option<String>,
}

/// Process-wide index over one catalog source.
pub struct SharedIndex {
    source: Arc<dyn CatalogSource>,
    inner: RwLock<Inner>,
    builds: AtomicU64,
}

impl SharedIndex {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            inner: RwLock::new(Inner::default()),
            builds: AtomicU64::new(0),
        }
    }

    /// Return the ready snapshot, building it first if needed.
    pub fn ensure_ready(&self) -> Arc<IndexSnapshot> {
        if let IndexState::Ready(snapshot) = &self.inner.read().state {
            return Arc::clone(snapshot);
        }

        let mut inner = self.inner.write();
        // Another caller may have finished the build while we waited.
        if let IndexState::Ready(snapshot) = &inner.state {
            return Arc::clone(snapshot);
        }

        // A panicking build leaves `Building` behind; the next caller retries.
        inner.state = IndexState::Building;
        let snapshot = Arc::new(IndexSnapshot::from_source(self.source.as_ref()));
        self.builds.fetch_add(1, Ordering::Relaxed);

        let fingerprint = snapshot.index.fingerprint().to_string();
        if let Some(previous) = inner.last_fingerprint.as_deref() {
            info!(
                changed = previous != fingerprint,
                fingerprint = %fingerprint,
                "Catalog index rebuilt"
            );
        }
        inner.last_fingerprint = Some(fingerprint);
        inner.state = IndexState::Ready(Arc::clone(&snapshot));
        snapshot
    }

    /// Drop the current snapshot; the next access rebuilds from the source.
    ///
    /// Snapshots already handed out stay valid for their holders.
    pub fn reload(&self) {
        let mut inner = self.inner.write();
        let previous = inner.state.phase();
        inner.state = IndexState::Empty;
        info!(previous = ?previous, "Catalog index reset for reload");
    }

    /// Current phase without blocking; a held write lock means a build is running.
    pub fn phase(&self) -> IndexPhase {
        match self.inner.try_read() {
            Some(inner) => inner.state.phase(),
            None => IndexPhase::Building,
        }
    }

    /// Snapshot if one is ready, without triggering a build.
    pub fn current(&self) -> Option<Arc<IndexSnapshot>> {
        match &self.inner.try_read()?.state {
            IndexState::Ready(snapshot) => Some(Arc::clone(snapshot)),
            _ => None,
        }
    }

    /// Number of completed builds since creation.
    pub fn build_count(&self) -> u64 {
        self.builds.load(Ordering::Relaxed)
    }
}
