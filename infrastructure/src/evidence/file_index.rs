//! Durable file-backed evidence index
//!
//! A single JSON object file mapping request id to evidence reference.
//! Writes are whole-file: read, upsert, write to a temp sibling, rename.
//! The rename keeps concurrent readers (the presentation layer polls
//! this file) from ever observing a half-written document.

use async_trait::async_trait;
use oracle_application::ports::evidence_store::{ArchiveError, EvidenceIndex};
use oracle_domain::{EvidenceReference, RequestId};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// File-backed request-id to evidence-reference index
///
/// Upsert-by-key, last-write-wins, never deletes. Writes are serialized
/// through a `Mutex`; entries for different requests never contend on
/// anything finer because the table is tiny and rewritten whole.
pub struct FileEvidenceIndex {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileEvidenceIndex {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, ArchiveError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = std::fs::read_to_string(&self.path)
            .map_err(|e| ArchiveError::Index(format!("read {}: {e}", self.path.display())))?;
        serde_json::from_str(&data)
            .map_err(|e| ArchiveError::Index(format!("parse {}: {e}", self.path.display())))
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), ArchiveError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| ArchiveError::Index(format!("mkdir {}: {e}", parent.display())))?;
        }

        let data = serde_json::to_string_pretty(map)
            .map_err(|e| ArchiveError::Index(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, data)
            .map_err(|e| ArchiveError::Index(format!("write {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| ArchiveError::Index(format!("rename {}: {e}", tmp.display())))
    }
}

#[async_trait]
impl EvidenceIndex for FileEvidenceIndex {
    async fn record(
        &self,
        request_id: &RequestId,
        reference: &EvidenceReference,
    ) -> Result<(), ArchiveError> {
        let _guard = self.lock.lock().map_err(|_| {
            ArchiveError::Index("evidence index lock poisoned".to_string())
        })?;

        let mut map = self.read_map()?;
        map.insert(request_id.to_string(), reference.to_string());
        self.write_map(&map)?;

        debug!(request = %request_id, evidence = %reference, "evidence mapping stored");
        Ok(())
    }

    async fn lookup(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<EvidenceReference>, ArchiveError> {
        let _guard = self.lock.lock().map_err(|_| {
            ArchiveError::Index("evidence index lock poisoned".to_string())
        })?;

        Ok(self
            .read_map()?
            .get(request_id.as_str())
            .map(EvidenceReference::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(dir: &tempfile::TempDir) -> FileEvidenceIndex {
        FileEvidenceIndex::new(dir.path().join("evidence-map.json"))
    }

    #[tokio::test]
    async fn test_record_then_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let index = index(&dir);

        index
            .record(&RequestId::new("42"), &EvidenceReference::new("QmA"))
            .await
            .unwrap();

        let found = index.lookup(&RequestId::new("42")).await.unwrap();
        assert_eq!(found, Some(EvidenceReference::new("QmA")));
    }

    #[tokio::test]
    async fn test_lookup_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let index = index(&dir);
        assert_eq!(index.lookup(&RequestId::new("7")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_is_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let index = index(&dir);
        let id = RequestId::new("42");

        index
            .record(&id, &EvidenceReference::new("QmOld"))
            .await
            .unwrap();
        index
            .record(&id, &EvidenceReference::new("QmNew"))
            .await
            .unwrap();

        assert_eq!(
            index.lookup(&id).await.unwrap(),
            Some(EvidenceReference::new("QmNew"))
        );

        // No duplicate or orphaned entries on disk
        let data = std::fs::read_to_string(index.path()).unwrap();
        let map: BTreeMap<String, String> = serde_json::from_str(&data).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[tokio::test]
    async fn test_entries_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evidence-map.json");

        {
            let index = FileEvidenceIndex::new(&path);
            index
                .record(&RequestId::new("1"), &EvidenceReference::new("QmA"))
                .await
                .unwrap();
            index
                .record(&RequestId::new("2"), &EvidenceReference::new("QmB"))
                .await
                .unwrap();
        }

        let reopened = FileEvidenceIndex::new(&path);
        assert_eq!(
            reopened.lookup(&RequestId::new("1")).await.unwrap(),
            Some(EvidenceReference::new("QmA"))
        );
        assert_eq!(
            reopened.lookup(&RequestId::new("2")).await.unwrap(),
            Some(EvidenceReference::new("QmB"))
        );
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let index = index(&dir);

        for i in 0..10 {
            index
                .record(
                    &RequestId::new(i.to_string()),
                    &EvidenceReference::new(format!("Qm{i}")),
                )
                .await
                .unwrap();
        }

        for i in 0..10 {
            let found = index.lookup(&RequestId::new(i.to_string())).await.unwrap();
            assert_eq!(found, Some(EvidenceReference::new(format!("Qm{i}"))));
        }
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_index_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evidence-map.json");
        std::fs::write(&path, "{not json").unwrap();

        let index = FileEvidenceIndex::new(&path);
        let result = index.lookup(&RequestId::new("1")).await;
        assert!(matches!(result, Err(ArchiveError::Index(_))));
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state/evidence-map.json");

        let index = FileEvidenceIndex::new(&path);
        index
            .record(&RequestId::new("1"), &EvidenceReference::new("QmA"))
            .await
            .unwrap();
        assert!(path.exists());
    }
}
