use anyhow::Result;
use async_trait::async_trait;
use seat_booking::{
    Availability, BookingDesk, BookingError, BookingRecord, JsonFileStore, MemoryStore, Passenger,
    RecordStore, Reference, RenderOptions, SeatChart, SeatId,
};
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempDir;

fn seat(s: &str) -> SeatId {
    s.parse().unwrap()
}

fn passenger(first: &str, last: &str, passport: &str) -> Passenger {
    Passenger {
        first_name: first.to_string(),
        last_name: last.to_string(),
        passport: passport.to_string(),
    }
}

/// Memory store whose reads and writes can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_inserts: AtomicBool,
    // 只讓下一次寫入失敗
    fail_next_insert: AtomicBool,
    fail_deletes: AtomicBool,
    fail_scans: AtomicBool,
}

impl FlakyStore {
    fn unavailable() -> BookingError {
        BookingError::StoreError {
            message: "store unavailable".to_string(),
        }
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn find_by_reference(
        &self,
        reference: &Reference,
    ) -> seat_booking::Result<Option<BookingRecord>> {
        self.inner.find_by_reference(reference).await
    }

    async fn insert(&self, record: BookingRecord) -> seat_booking::Result<()> {
        if self.fail_inserts.load(Ordering::SeqCst)
            || self.fail_next_insert.swap(false, Ordering::SeqCst)
        {
            return Err(Self::unavailable());
        }
        self.inner.insert(record).await
    }

    async fn delete(&self, reference: &Reference) -> seat_booking::Result<bool> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.delete(reference).await
    }

    async fn all(&self) -> seat_booking::Result<Vec<BookingRecord>> {
        if self.fail_scans.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.all().await
    }
}

#[tokio::test]
async fn test_bookings_survive_restart_with_json_store() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("bookings.json");

    let (kept, moved) = {
        let mut desk = BookingDesk::open(
            SeatChart::initialize(),
            JsonFileStore::new(&path),
            RenderOptions::default(),
        )
        .await?;
        let kept = desk
            .book(&seat("1A"), Some(passenger("Ada", "Lovelace", "AL181510")))
            .await?;
        desk.book(&seat("2B"), None).await?;
        desk.free(&seat("2B")).await?;
        desk.book(&seat("3C"), Some(passenger("Alan", "Turing", "AT191254")))
            .await?;
        let moved = desk.modify(&seat("3C"), &seat("4D")).await?;
        (kept, moved)
    };

    let desk = BookingDesk::open(
        SeatChart::initialize(),
        JsonFileStore::new(&path),
        RenderOptions::default(),
    )
    .await?;

    assert_eq!(desk.check(&seat("1A"))?, Availability::Booked);
    assert_eq!(desk.check(&seat("2B"))?, Availability::Available);
    assert_eq!(desk.check(&seat("3C"))?, Availability::Available);
    assert_eq!(desk.check(&seat("4D"))?, Availability::Booked);
    assert_eq!(desk.chart().booking_reference(&seat("1A"))?, Some(&kept.reference));
    assert_eq!(desk.chart().booking_reference(&seat("4D"))?, Some(&moved.reference));
    assert_eq!(desk.occupancy().booked, 2);

    let found = desk.find("alan turing").await?.expect("booking by name");
    assert_eq!(found.seat, seat("4D"));
    Ok(())
}

#[tokio::test]
async fn test_failed_insert_rolls_back_reservation() -> Result<()> {
    let store = FlakyStore::default();
    store.fail_inserts.store(true, Ordering::SeqCst);
    let mut desk =
        BookingDesk::open(SeatChart::initialize(), store, RenderOptions::default()).await?;

    let err = desk.book(&seat("8A"), None).await.unwrap_err();
    assert!(matches!(err, BookingError::StoreError { .. }));
    assert_eq!(desk.check(&seat("8A"))?, Availability::Available);
    assert!(desk.chart().active_references().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_failed_delete_rolls_back_release() -> Result<()> {
    let mut desk = BookingDesk::open(
        SeatChart::initialize(),
        FlakyStore::default(),
        RenderOptions::default(),
    )
    .await?;
    let confirmation = desk.book(&seat("9B"), None).await?;

    desk.store().fail_deletes.store(true, Ordering::SeqCst);
    assert!(desk.free(&seat("9B")).await.is_err());
    assert!(desk.cancel(&confirmation.reference).await.is_err());

    assert_eq!(
        desk.chart().booking_reference(&seat("9B"))?,
        Some(&confirmation.reference)
    );
    assert_eq!(desk.store().all().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_move_restores_both_seats() -> Result<()> {
    let mut desk = BookingDesk::open(
        SeatChart::initialize(),
        FlakyStore::default(),
        RenderOptions::default(),
    )
    .await?;
    let original = desk
        .book(&seat("10C"), Some(passenger("Grace", "Hopper", "GH190692")))
        .await?;

    desk.store().fail_deletes.store(true, Ordering::SeqCst);
    assert!(desk.modify(&seat("10C"), &seat("10D")).await.is_err());

    assert_eq!(
        desk.chart().booking_reference(&seat("10C"))?,
        Some(&original.reference)
    );
    assert_eq!(desk.check(&seat("10D"))?, Availability::Available);
    let records = desk.store().all().await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].reference, original.reference);
    Ok(())
}

#[tokio::test]
async fn test_failed_insert_during_move_restores_old_record() -> Result<()> {
    let mut desk = BookingDesk::open(
        SeatChart::initialize(),
        FlakyStore::default(),
        RenderOptions::default(),
    )
    .await?;
    let grace = passenger("Grace", "Hopper", "GH190692");
    let original = desk.book(&seat("10C"), Some(grace.clone())).await?;

    desk.store().fail_next_insert.store(true, Ordering::SeqCst);
    let err = desk.modify(&seat("10C"), &seat("10D")).await.unwrap_err();
    assert!(matches!(err, BookingError::StoreError { .. }));

    assert_eq!(
        desk.chart().booking_reference(&seat("10C"))?,
        Some(&original.reference)
    );
    assert_eq!(desk.check(&seat("10D"))?, Availability::Available);
    assert_eq!(desk.chart().active_references().len(), 1);

    let records = desk.store().all().await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].reference, original.reference);
    assert_eq!(records[0].seat, seat("10C"));
    assert_eq!(records[0].passenger, Some(grace));

    let found = desk.find("grace hopper").await?.expect("booking kept");
    assert_eq!(found.seat, seat("10C"));
    Ok(())
}

#[tokio::test]
async fn test_seat_errors_win_over_unreadable_store() -> Result<()> {
    let mut desk = BookingDesk::open(
        SeatChart::initialize(),
        FlakyStore::default(),
        RenderOptions::default(),
    )
    .await?;
    desk.book(&seat("15A"), None).await?;

    desk.store().fail_scans.store(true, Ordering::SeqCst);
    assert!(matches!(
        desk.book(&seat("15A"), None).await.unwrap_err(),
        BookingError::AlreadyBooked { .. }
    ));
    assert!(matches!(
        desk.book(&seat("80F"), None).await.unwrap_err(),
        BookingError::NotBookable { .. }
    ));
    assert!(matches!(
        desk.modify(&seat("16A"), &seat("17A")).await.unwrap_err(),
        BookingError::CurrentNotBooked { .. }
    ));
    assert!(matches!(
        desk.modify(&seat("15A"), &seat("15A")).await.unwrap_err(),
        BookingError::TargetNotFree { .. }
    ));
    assert!(matches!(
        desk.book(&seat("16A"), None).await.unwrap_err(),
        BookingError::StoreError { .. }
    ));
    assert_eq!(desk.check(&seat("16A"))?, Availability::Available);
    Ok(())
}

#[tokio::test]
async fn test_conflicts_do_not_touch_the_store() -> Result<()> {
    let mut desk = BookingDesk::open(
        SeatChart::initialize(),
        MemoryStore::new(),
        RenderOptions::default(),
    )
    .await?;
    desk.book(&seat("15A"), None).await?;

    assert!(matches!(
        desk.book(&seat("15A"), None).await.unwrap_err(),
        BookingError::AlreadyBooked { .. }
    ));
    assert!(matches!(
        desk.book(&seat("79E"), None).await.unwrap_err(),
        BookingError::NotBookable { .. }
    ));
    assert!(matches!(
        desk.free(&seat("16A")).await.unwrap_err(),
        BookingError::AlreadyFree { .. }
    ));
    assert!(matches!(
        desk.modify(&seat("16A"), &seat("17A")).await.unwrap_err(),
        BookingError::CurrentNotBooked { .. }
    ));
    assert_eq!(desk.store().all().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_export_csv_writes_redacted_chart() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut desk = BookingDesk::open(
        SeatChart::initialize(),
        MemoryStore::new(),
        RenderOptions::default(),
    )
    .await?;
    let confirmation = desk.book(&seat("5C"), None).await?;

    let path = temp_dir.path().join("out").join("chart.csv");
    desk.export_csv(&path).await?;

    let csv = tokio::fs::read_to_string(&path).await?;
    assert!(csv.starts_with("row,A,B,C,aisle,D,E,F"));
    assert!(csv.contains("5,F,F,R,X,F,F,F"));
    assert!(!csv.contains(confirmation.reference.as_str()));
    assert_eq!(csv.lines().count(), 81);
    Ok(())
}
