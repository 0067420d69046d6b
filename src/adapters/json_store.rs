use crate::domain::model::{BookingRecord, Reference};
use crate::domain::ports::RecordStore;
use crate::utils::error::{BookingError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    bookings: Vec<BookingRecord>,
}

/// Booking records kept in a single JSON document on disk.
///
/// Each write replaces the whole file through a temp file and a rename.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // 序列化讀寫，避免並發覆蓋
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoreDocument> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(StoreDocument {
                    version: FORMAT_VERSION,
                    bookings: Vec::new(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(StoreDocument {
                version: FORMAT_VERSION,
                bookings: Vec::new(),
            });
        }

        let document: StoreDocument = serde_json::from_str(&content)?;
        if document.version != FORMAT_VERSION {
            return Err(BookingError::StoreError {
                message: format!(
                    "{} has format version {}, expected {}",
                    self.path.display(),
                    document.version,
                    FORMAT_VERSION
                ),
            });
        }
        Ok(document)
    }

    async fn save(&self, document: &StoreDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let data = serde_json::to_vec_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        tracing::debug!(
            "Wrote {} booking(s) to {}",
            document.bookings.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn find_by_reference(&self, reference: &Reference) -> Result<Option<BookingRecord>> {
        let _guard = self.lock.lock().await;
        let document = self.load().await?;
        Ok(document
            .bookings
            .into_iter()
            .find(|record| &record.reference == reference))
    }

    async fn insert(&self, record: BookingRecord) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        if document
            .bookings
            .iter()
            .any(|existing| existing.reference == record.reference)
        {
            return Err(BookingError::DuplicateReference {
                reference: record.reference.to_string(),
            });
        }
        document.bookings.push(record);
        self.save(&document).await
    }

    async fn delete(&self, reference: &Reference) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        let before = document.bookings.len();
        document.bookings.retain(|record| &record.reference != reference);
        if document.bookings.len() == before {
            return Ok(false);
        }
        self.save(&document).await?;
        Ok(true)
    }

    async fn all(&self) -> Result<Vec<BookingRecord>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.bookings)
    }
}
