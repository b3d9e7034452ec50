//! Async, cloneable access to an open [`NoteStore`].

use crate::{NewNote, Note, NoteId, NoteStore, NoteboxError, Result, StoreConfig};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};

/// A shared handle to the open store.
///
/// Each operation runs on tokio's blocking pool and resolves once the
/// underlying transaction or read has finished, so awaiting it is the
/// completion event. Clones refer to the same store; operations through any
/// clone are serialized by the store lock.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<Mutex<NoteStore>>,
}

impl StoreHandle {
    pub fn new(store: NoteStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Opens the store described by `config` off the async task.
    ///
    /// # Errors
    ///
    /// Any error from [`NoteStore::open`], or [`NoteboxError::Unavailable`] if
    /// the blocking task itself fails.
    pub async fn open(config: StoreConfig) -> Result<Self> {
        let store = tokio::task::spawn_blocking(move || NoteStore::open(&config))
            .await
            .map_err(worker_failed)??;
        Ok(Self::new(store))
    }

    pub async fn add(&self, note: NewNote) -> Result<NoteId> {
        self.begin_add(note).completed().await
    }

    /// Starts inserting `note` and returns immediately.
    ///
    /// The returned [`PendingAdd`] resolves twice: once when the INSERT has
    /// succeeded and again when the transaction has committed.
    pub fn begin_add(&self, note: NewNote) -> PendingAdd {
        let (inserted_tx, inserted_rx) = oneshot::channel();
        let inner = Arc::clone(&self.inner);
        let completed = tokio::task::spawn_blocking(move || {
            let mut store = inner.lock().map_err(|_| poisoned())?;
            store.add_with(&note, move |id| {
                // The receiver may already be gone; the commit still goes ahead.
                let _ = inserted_tx.send(id);
            })
        });
        PendingAdd {
            inserted: Some(inserted_rx),
            completed,
        }
    }

    pub async fn delete(&self, id: NoteId) -> Result<bool> {
        self.run(move |store| store.delete(id)).await
    }

    pub async fn get(&self, id: NoteId) -> Result<Option<Note>> {
        self.run(move |store| store.get(id)).await
    }

    pub async fn count(&self) -> Result<u64> {
        self.run(|store| store.count()).await
    }

    /// Walks a fresh cursor over the whole table.
    pub async fn list_all(&self) -> Result<Vec<Note>> {
        self.run(|store| store.list_all()).await
    }

    pub async fn find_by_title(&self, title: String) -> Result<Vec<Note>> {
        self.run(move |store| store.find_by_title(&title)).await
    }

    pub async fn find_by_body(&self, body: String) -> Result<Vec<Note>> {
        self.run(move |store| store.find_by_body(&body)).await
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut NoteStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut store = inner.lock().map_err(|_| poisoned())?;
            op(&mut *store)
        })
        .await
        .map_err(worker_failed)?
    }
}

/// An insert in flight, started by [`StoreHandle::begin_add`].
pub struct PendingAdd {
    inserted: Option<oneshot::Receiver<NoteId>>,
    completed: JoinHandle<Result<NoteId>>,
}

impl PendingAdd {
    /// Waits for the INSERT itself.
    ///
    /// Returns the assigned id once the row is written inside the open
    /// transaction, or `None` if the INSERT failed. Later calls return `None`.
    pub async fn inserted(&mut self) -> Option<NoteId> {
        self.inserted.take()?.await.ok()
    }

    /// Waits for the transaction to finish.
    ///
    /// # Errors
    ///
    /// Returns the INSERT or commit error; after a failed commit nothing is stored.
    pub async fn completed(self) -> Result<NoteId> {
        self.completed.await.map_err(worker_failed)?
    }
}

fn poisoned() -> NoteboxError {
    NoteboxError::Unavailable("store lock poisoned".to_string())
}

fn worker_failed(e: JoinError) -> NoteboxError {
    NoteboxError::Unavailable(format!("store worker failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_add_and_list() {
        let dir = tempdir().unwrap();
        let handle = StoreHandle::open(StoreConfig::in_directory(dir.path()))
            .await
            .unwrap();

        let id = handle
            .add(NewNote {
                title: "A".to_string(),
                body: "B".to_string(),
            })
            .await
            .unwrap();

        let notes = handle.list_all().await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, id);
        assert_eq!(handle.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_begin_add_reports_insert_then_commit() {
        let dir = tempdir().unwrap();
        let handle = StoreHandle::open(StoreConfig::in_directory(dir.path()))
            .await
            .unwrap();

        let mut pending = handle.begin_add(NewNote::default());
        let inserted = pending.inserted().await;
        assert!(pending.inserted().await.is_none());
        let committed = pending.completed().await.unwrap();

        assert_eq!(inserted, Some(committed));
        assert!(handle.get(committed).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_begin_add_commit_failure_after_insert() {
        let dir = tempdir().unwrap();
        let store = NoteStore::open(&StoreConfig::in_directory(dir.path())).unwrap();
        store.fail_commits_after_insert();
        let handle = StoreHandle::new(store);

        let mut pending = handle.begin_add(NewNote::default());
        assert!(pending.inserted().await.is_some());
        assert!(pending.completed().await.is_err());
        assert_eq!(handle.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_begin_add_insert_failure_reports_no_id() {
        let dir = tempdir().unwrap();
        let store = NoteStore::open(&StoreConfig::in_directory(dir.path())).unwrap();
        store.connection().execute("DROP TABLE notes", []).unwrap();
        let handle = StoreHandle::new(store);

        let mut pending = handle.begin_add(NewNote::default());
        assert!(pending.inserted().await.is_none());
        assert!(pending.completed().await.is_err());
    }

    #[tokio::test]
    async fn test_clones_share_one_store() {
        let dir = tempdir().unwrap();
        let handle = StoreHandle::open(StoreConfig::in_directory(dir.path()))
            .await
            .unwrap();
        let other = handle.clone();

        let id = other.add(NewNote::default()).await.unwrap();
        assert!(handle.get(id).await.unwrap().is_some());

        assert!(handle.delete(id).await.unwrap());
        assert!(other.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_failure_is_reported() {
        let dir = tempdir().unwrap();
        let mut config = StoreConfig::in_directory(dir.path());
        config.version = 2;
        StoreHandle::open(config.clone()).await.unwrap();

        config.version = 1;
        let result = StoreHandle::open(config).await;
        assert!(matches!(result, Err(NoteboxError::VersionMismatch { .. })));
    }

    #[tokio::test]
    async fn test_index_lookups() {
        let dir = tempdir().unwrap();
        let handle = StoreHandle::open(StoreConfig::in_directory(dir.path()))
            .await
            .unwrap();
        handle
            .add(NewNote {
                title: "shopping".to_string(),
                body: "milk".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(handle.find_by_title("shopping".to_string()).await.unwrap().len(), 1);
        assert_eq!(handle.find_by_body("milk".to_string()).await.unwrap().len(), 1);
        assert!(handle.find_by_title("milk".to_string()).await.unwrap().is_empty());
    }
}
