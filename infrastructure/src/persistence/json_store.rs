//! Single-file JSON council store.
//!
//! All councils live in one schema-versioned document:
//!
//! ```json
//! {"meta": {"schema_version": 4}, "councils": {"<guild>:<channel>": {...}}}
//! ```
//!
//! Every put rewrites the whole document atomically (temp file in the same
//! directory, then rename), so a crash mid-write leaves the previous
//! document intact. The store keeps a decoded copy in memory; the file is
//! read once at open and only written from then on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{info, warn};
use votum_application::ports::repository::{CouncilStore, StoreError};
use votum_domain::{Council, CouncilId, config::DEPRECATED_KEYS};

const SCHEMA_VERSION: u32 = 4;

#[derive(Debug, Serialize, Deserialize)]
struct Meta {
    schema_version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    meta: Meta,
    councils: HashMap<String, Council>,
}

impl Document {
    fn empty() -> Self {
        Self {
            meta: Meta {
                schema_version: SCHEMA_VERSION,
            },
            councils: HashMap::new(),
        }
    }
}

/// File-backed [`CouncilStore`] holding every council in one JSON document.
pub struct JsonCouncilStore {
    path: PathBuf,
    state: Mutex<HashMap<CouncilId, Council>>,
}

impl JsonCouncilStore {
    /// Open the store at `path`, reading the existing document if present.
    ///
    /// A missing file is an empty store; a document with an unexpected
    /// schema version is refused rather than silently migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let doc = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<Document>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Document::empty(),
            Err(e) => return Err(e.into()),
        };
        if doc.meta.schema_version != SCHEMA_VERSION {
            return Err(StoreError::Other(format!(
                "unsupported schema version {} in {} (expected {})",
                doc.meta.schema_version,
                path.display(),
                SCHEMA_VERSION
            )));
        }

        let mut state = HashMap::with_capacity(doc.councils.len());
        for (key, mut council) in doc.councils {
            let Some(id) = CouncilId::from_storage_key(&key) else {
                warn!(key, path = %path.display(), "skipping unparseable council key");
                continue;
            };
            // Old documents may still carry since-deprecated config keys.
            for (dep, _) in DEPRECATED_KEYS {
                if council.config.remove(*dep).is_some() {
                    info!(council = %id, key = dep, "dropped deprecated config key");
                }
            }
            state.insert(id, council);
        }
        info!(
            path = %path.display(),
            councils = state.len(),
            "council store opened"
        );
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the full document and atomically replace the file.
    fn write_out(&self, state: &HashMap<CouncilId, Council>) -> Result<(), StoreError> {
        let doc = Document {
            meta: Meta {
                schema_version: SCHEMA_VERSION,
            },
            councils: state
                .iter()
                .map(|(id, c)| {
                    let mut c = c.clone();
                    // Deprecated keys never reach the file, whatever path
                    // the aggregate arrived by.
                    for (dep, _) in DEPRECATED_KEYS {
                        c.config.remove(*dep);
                    }
                    (id.storage_key(), c)
                })
                .collect(),
        };
        let bytes = serde_json::to_vec_pretty(&doc)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        // Temp file in the same directory so the rename stays on one
        // filesystem and is atomic.
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl CouncilStore for JsonCouncilStore {
    async fn get(&self, id: CouncilId) -> Result<Option<Council>, StoreError> {
        Ok(self.state.lock().await.get(&id).cloned())
    }

    async fn put(&self, council: &Council) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.insert(council.id, council.clone());
        self.write_out(&state)
    }

    async fn delete(&self, id: CouncilId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        let removed = state.remove(&id).is_some();
        if removed {
            self.write_out(&state)?;
        }
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<CouncilId>, StoreError> {
        let mut ids: Vec<_> = self.state.lock().await.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn council(guild: u64, channel: u64, name: &str) -> Council {
        Council::new(CouncilId::new(guild, channel), name)
    }

    #[tokio::test]
    async fn test_put_then_reopen_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("councils.json");

        let store = JsonCouncilStore::open(&path).unwrap();
        store.put(&council(1, 2, "Senate")).await.unwrap();
        store.put(&council(1, 3, "Assembly")).await.unwrap();

        let reopened = JsonCouncilStore::open(&path).unwrap();
        let loaded = reopened.get(CouncilId::new(1, 2)).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Senate");
        assert_eq!(
            reopened.list().await.unwrap(),
            vec![CouncilId::new(1, 2), CouncilId::new(1, 3)]
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCouncilStore::open(dir.path().join("none.json")).unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_document_shape_and_schema_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("councils.json");
        let store = JsonCouncilStore::open(&path).unwrap();
        store.put(&council(7, 9, "Senate")).await.unwrap();

        let doc: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(doc["meta"]["schema_version"], 4);
        assert_eq!(doc["councils"]["7:9"]["name"], "Senate");
    }

    #[test]
    fn test_unsupported_schema_version_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("councils.json");
        fs::write(
            &path,
            serde_json::to_vec(&json!({
                "meta": {"schema_version": 3},
                "councils": {}
            }))
            .unwrap(),
        )
        .unwrap();

        assert!(JsonCouncilStore::open(&path).is_err());
    }

    #[tokio::test]
    async fn test_deprecated_keys_stripped_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("councils.json");

        let store = JsonCouncilStore::open(&path).unwrap();
        store.put(&council(1, 2, "Senate")).await.unwrap();
        drop(store);

        // Simulate an old document carrying the removed hours key.
        let mut doc: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        doc["councils"]["1:2"]["config"]["motion.expiration.hours"] = json!(24);
        fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

        let reopened = JsonCouncilStore::open(&path).unwrap();
        let loaded = reopened.get(CouncilId::new(1, 2)).await.unwrap().unwrap();
        assert!(!loaded.config.contains_key("motion.expiration.hours"));
    }

    #[tokio::test]
    async fn test_deprecated_keys_stripped_on_put() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("councils.json");
        let store = JsonCouncilStore::open(&path).unwrap();

        // An aggregate that somehow still carries the removed hours key
        // must not leak it into the file.
        let mut stale = council(1, 2, "Senate");
        stale.config.insert(
            "motion.expiration.hours".to_string(),
            votum_domain::ConfigValue::Int(24),
        );
        store.put(&stale).await.unwrap();

        let doc: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert!(
            doc["councils"]["1:2"]["config"]
                .as_object()
                .unwrap()
                .get("motion.expiration.hours")
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_removes_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("councils.json");
        let store = JsonCouncilStore::open(&path).unwrap();
        store.put(&council(1, 2, "Senate")).await.unwrap();

        assert!(store.delete(CouncilId::new(1, 2)).await.unwrap());
        assert!(!store.delete(CouncilId::new(1, 2)).await.unwrap());

        let reopened = JsonCouncilStore::open(&path).unwrap();
        assert!(reopened.list().await.unwrap().is_empty());
    }
}
