use crate::domain::model::{BookingRecord, Reference};
use crate::domain::ports::RecordStore;
use crate::utils::error::{BookingError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Process-local store, used when persistence is switched off and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<Reference, BookingRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_by_reference(&self, reference: &Reference) -> Result<Option<BookingRecord>> {
        Ok(self.records.read().await.get(reference).cloned())
    }

    async fn insert(&self, record: BookingRecord) -> Result<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.reference) {
            return Err(BookingError::DuplicateReference {
                reference: record.reference.to_string(),
            });
        }
        records.insert(record.reference.clone(), record);
        Ok(())
    }

    async fn delete(&self, reference: &Reference) -> Result<bool> {
        Ok(self.records.write().await.remove(reference).is_some())
    }

    async fn all(&self) -> Result<Vec<BookingRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}
