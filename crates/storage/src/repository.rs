use async_trait::async_trait;
use course_core::model::ProgressRecord;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Namespaced key the serialized progress record lives under.
///
/// The whole record is one JSON blob behind this key; there is no per-lesson
/// row to keep in sync.
pub const PROGRESS_STORE_KEY: &str = "course-progress";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Serializes a progress record to its persisted JSON form.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_record(record: &ProgressRecord) -> Result<String, StorageError> {
    serde_json::to_string(record).map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Parses the persisted JSON form back into a progress record.
///
/// A malformed blob is a `Serialization` error here; deciding whether that
/// means "no prior progress" belongs to the layer above.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the blob does not parse.
pub fn decode_record(raw: &str) -> Result<ProgressRecord, StorageError> {
    serde_json::from_str(raw).map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Repository contract for the persisted progress record.
///
/// Read on startup, rewritten whole on every mutation.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the stored record, or `None` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for a corrupt blob, or other
    /// storage errors.
    async fn load_progress(&self) -> Result<Option<ProgressRecord>, StorageError>;

    /// Persist the record, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError>;
}

/// In-memory repository for testing and prototyping.
///
/// Stores the serialized blob rather than the domain value so reads and
/// writes exercise the same codec the durable backend uses.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    blob: Arc<Mutex<Option<String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            blob: Arc::new(Mutex::new(None)),
        }
    }

    /// Replaces the stored blob with an arbitrary raw string.
    ///
    /// Lets tests stage a corrupt or legacy payload without going through
    /// the codec.
    pub fn seed_raw(&self, raw: impl Into<String>) {
        if let Ok(mut guard) = self.blob.lock() {
            *guard = Some(raw.into());
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.as_deref() {
            Some(raw) => decode_record(raw).map(Some),
            None => Ok(None),
        }
    }

    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let encoded = encode_record(record)?;
        let mut guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(encoded);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            progress: Arc::new(InMemoryRepository::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::LessonId;
    use course_core::time::fixed_now;

    #[tokio::test]
    async fn round_trips_completed_set_and_current_lesson() {
        let repo = InMemoryRepository::new();
        let mut record = ProgressRecord::empty(fixed_now());
        record.mark_complete(LessonId::new("lesson-1"));
        record.set_current(LessonId::new("lesson-2"));

        repo.save_progress(&record).await.unwrap();
        let loaded = repo.load_progress().await.unwrap().unwrap();

        assert_eq!(loaded.completed_lessons(), record.completed_lessons());
        assert_eq!(loaded.current_lesson(), record.current_lesson());
    }

    #[tokio::test]
    async fn empty_store_loads_none() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_progress().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_blob_is_a_serialization_error() {
        let repo = InMemoryRepository::new();
        repo.seed_raw("{not valid json");

        let err = repo.load_progress().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn save_replaces_prior_value() {
        let repo = InMemoryRepository::new();
        let mut record = ProgressRecord::empty(fixed_now());
        record.mark_complete(LessonId::new("lesson-1"));
        repo.save_progress(&record).await.unwrap();

        record.mark_complete(LessonId::new("lesson-2"));
        repo.save_progress(&record).await.unwrap();

        let loaded = repo.load_progress().await.unwrap().unwrap();
        assert_eq!(loaded.completed_count(), 2);
    }
}
