//! Per-council exclusive sections.
//!
//! Each council has exactly one logical owner at a time: interactive
//! operations and the expiration sweep serialize on this lock. One lock per
//! council, never a global one, so councils stay independent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use votum_domain::CouncilId;

#[derive(Default)]
pub(crate) struct CouncilLocks {
    inner: Mutex<HashMap<CouncilId, Arc<AsyncMutex<()>>>>,
}

impl CouncilLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The lock guarding `id`'s critical section, created on first use.
    ///
    /// Locks are never evicted; the map grows with the number of councils
    /// ever touched, which is bounded by channel count.
    pub(crate) fn for_council(&self, id: CouncilId) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock().unwrap();
        Arc::clone(map.entry(id).or_default())
    }
}
