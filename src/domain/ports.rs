use crate::domain::model::{BookingRecord, Reference};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Durable booking records keyed by booking reference.
///
/// The chart never talks to a store directly; `BookingDesk` sequences every
/// chart mutation with the matching store call.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_by_reference(&self, reference: &Reference) -> Result<Option<BookingRecord>>;

    /// Fails with `DuplicateReference` if a record with the same reference exists.
    async fn insert(&self, record: BookingRecord) -> Result<()>;

    /// Returns whether a record was removed.
    async fn delete(&self, reference: &Reference) -> Result<bool>;

    async fn all(&self) -> Result<Vec<BookingRecord>>;
}
