//! Async persistence service over the synchronous [`Database`].
//!
//! [`ProjectStore`] is an explicitly constructed handle with an
//! open/close lifecycle. SQLite work runs on the blocking pool; the
//! connection sits behind a mutex so concurrent callers are serialized per
//! statement and each record is last-writer-wins.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use rehab_shared::{ImageBlob, ImageId, Project};

use crate::database::Database;
use crate::error::{Result, StoreError};

/// Persistence seam used by the reconciler and the command layer.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Upsert the single project, stamping `updatedAt`. Returns the stamp.
    async fn save_project(&self, project: &Project) -> Result<DateTime<Utc>>;

    async fn load_project(&self) -> Result<Option<Project>>;

    /// Remove the project record only. Returns whether one existed.
    async fn delete_project(&self) -> Result<bool>;

    async fn save_image(&self, id: &ImageId, blob: &ImageBlob, file_name: Option<&str>) -> Result<()>;

    async fn get_image(&self, id: &ImageId) -> Result<Option<ImageBlob>>;

    /// Fetch several images; ids without a record are absent from the map.
    async fn get_images(&self, ids: &[ImageId]) -> Result<HashMap<ImageId, ImageBlob>>;

    async fn delete_image(&self, id: &ImageId) -> Result<bool>;

    async fn list_image_ids(&self) -> Result<Vec<ImageId>>;
}

struct Inner {
    db: Database,
    last_stamp: Option<DateTime<Utc>>,
}

impl Inner {
    /// Millisecond-precision stamp, strictly after both the previous stamp
    /// and `after`.
    fn next_stamp(&mut self, after: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let now = Utc::now().trunc_subsecs(3);
        let floor = match self.last_stamp {
            Some(last) if last > after => last,
            _ => after,
        };
        let stamp = if now > floor {
            now
        } else {
            floor
                .trunc_subsecs(3)
                .checked_add_signed(Duration::milliseconds(1))
                .ok_or(StoreError::StampOutOfRange(floor))?
        };
        self.last_stamp = Some(stamp);
        Ok(stamp)
    }
}

/// Handle to the local store. Cloning shares the same connection.
#[derive(Clone)]
pub struct ProjectStore {
    inner: Arc<Mutex<Option<Inner>>>,
}

impl ProjectStore {
    fn from_database(db: Database) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(Inner {
                db,
                last_stamp: None,
            }))),
        }
    }

    /// Open (or create) the store inside `data_dir`.
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let db = tokio::task::spawn_blocking(move || Database::open_in_dir(&data_dir))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))??;
        Ok(Self::from_database(db))
    }

    /// Open the store in the platform data directory.
    pub async fn open_default() -> Result<Self> {
        Self::open(Database::default_data_dir()?).await
    }

    /// Private in-memory store, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    /// Release the connection. Later operations fail with
    /// [`StoreError::Closed`]; closing twice is a no-op.
    pub async fn close(&self) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut guard = inner.lock().map_err(|_| StoreError::LockPoisoned)?;
            if guard.take().is_some() {
                tracing::info!("store closed");
            }
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    pub async fn is_closed(&self) -> bool {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.lock().map(|g| g.is_none()).unwrap_or(true))
            .await
            .unwrap_or(true)
    }

    async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Inner) -> Result<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut guard = inner.lock().map_err(|_| StoreError::LockPoisoned)?;
            let inner = guard.as_mut().ok_or(StoreError::Closed)?;
            f(inner)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[async_trait]
impl ProjectRepository for ProjectStore {
    async fn save_project(&self, project: &Project) -> Result<DateTime<Utc>> {
        let mut project = project.clone();
        let stamp = self
            .with_db(move |inner| {
                let stamp = inner.next_stamp(project.meta.updated_at)?;
                project.meta.updated_at = stamp;
                inner.db.upsert_project(&project)?;
                Ok(stamp)
            })
            .await?;
        tracing::info!(updated_at = %stamp, "project saved");
        Ok(stamp)
    }

    async fn load_project(&self) -> Result<Option<Project>> {
        self.with_db(|inner| match inner.db.get_project() {
            Ok(record) => Ok(Some(record.project)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e),
        })
        .await
    }

    async fn delete_project(&self) -> Result<bool> {
        let deleted = self.with_db(|inner| inner.db.delete_project()).await?;
        tracing::info!(deleted, "project record deleted");
        Ok(deleted)
    }

    async fn save_image(&self, id: &ImageId, blob: &ImageBlob, file_name: Option<&str>) -> Result<()> {
        let id = id.clone();
        let blob = blob.clone();
        let file_name = file_name.map(str::to_owned);
        self.with_db(move |inner| inner.db.insert_image(&id, &blob, file_name.as_deref()))
            .await
    }

    async fn get_image(&self, id: &ImageId) -> Result<Option<ImageBlob>> {
        let id = id.clone();
        self.with_db(move |inner| match inner.db.get_image(&id) {
            Ok(record) => Ok(Some(record.blob)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e),
        })
        .await
    }

    async fn get_images(&self, ids: &[ImageId]) -> Result<HashMap<ImageId, ImageBlob>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids = ids.to_vec();
        self.with_db(move |inner| {
            let mut found = HashMap::with_capacity(ids.len());
            for id in ids {
                match inner.db.get_image(&id) {
                    Ok(record) => {
                        found.insert(id, record.blob);
                    }
                    Err(StoreError::NotFound) => {
                        tracing::debug!(image_id = %id, "requested image not in store");
                    }
                    Err(e) => return Err(e),
                }
            }
            Ok(found)
        })
        .await
    }

    async fn delete_image(&self, id: &ImageId) -> Result<bool> {
        let id = id.clone();
        self.with_db(move |inner| inner.db.delete_image(&id)).await
    }

    async fn list_image_ids(&self) -> Result<Vec<ImageId>> {
        self.with_db(|inner| inner.db.list_image_ids()).await
    }
}
