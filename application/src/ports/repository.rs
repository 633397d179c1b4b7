//! Council store port.
//!
//! Durable load/upsert/delete of the council aggregate. `put` is an atomic
//! full-aggregate upsert and must complete before the calling operation is
//! considered done (write-through, no batching). The store provides no
//! cross-council transactionality and no optimistic-concurrency token: safe
//! concurrent access to one council depends entirely on the engine's
//! per-council lock.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use votum_domain::{Council, CouncilId};

/// Errors from council storage operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Other(String),
}

/// Port for durable council persistence.
#[async_trait]
pub trait CouncilStore: Send + Sync {
    /// Load a council, or `None` if the channel has no council.
    async fn get(&self, id: CouncilId) -> Result<Option<Council>, StoreError>;

    /// Atomic full-aggregate upsert, durable before this returns.
    async fn put(&self, council: &Council) -> Result<(), StoreError>;

    /// Remove a council. Returns whether one existed.
    async fn delete(&self, id: CouncilId) -> Result<bool, StoreError>;

    /// Ids of every stored council, for the scheduler sweep.
    async fn list(&self) -> Result<Vec<CouncilId>, StoreError>;
}

/// Ephemeral in-memory store for tests and single-process embeddings.
#[derive(Default)]
pub struct InMemoryCouncilStore {
    councils: Mutex<HashMap<CouncilId, Council>>,
}

impl InMemoryCouncilStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CouncilStore for InMemoryCouncilStore {
    async fn get(&self, id: CouncilId) -> Result<Option<Council>, StoreError> {
        Ok(self.councils.lock().unwrap().get(&id).cloned())
    }

    async fn put(&self, council: &Council) -> Result<(), StoreError> {
        self.councils
            .lock()
            .unwrap()
            .insert(council.id, council.clone());
        Ok(())
    }

    async fn delete(&self, id: CouncilId) -> Result<bool, StoreError> {
        Ok(self.councils.lock().unwrap().remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<CouncilId>, StoreError> {
        let mut ids: Vec<_> = self.councils.lock().unwrap().keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}
