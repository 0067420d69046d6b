use crate::core::chart::{Occupancy, SeatChart};
use crate::core::render::{ChartView, RenderOptions};
use crate::domain::model::{
    Availability, BookingConfirmation, BookingRecord, Passenger, Reference, SeatId,
};
use crate::domain::ports::RecordStore;
use crate::utils::error::{BookingError, Result};
use chrono::Utc;
use std::collections::HashSet;
use std::path::Path;

/// Front desk over a seat chart and its record store.
///
/// Every mutation is write-through: the chart changes first, the store is
/// updated next, and a store failure puts the chart back before the error is
/// returned.
pub struct BookingDesk<S: RecordStore> {
    chart: SeatChart,
    store: S,
    render: RenderOptions,
}

impl<S: RecordStore> BookingDesk<S> {
    /// Overlays every stored booking onto `chart`.
    pub async fn open(chart: SeatChart, store: S, render: RenderOptions) -> Result<Self> {
        let mut desk = Self {
            chart,
            store,
            render,
        };
        let loaded = desk.hydrate().await?;
        tracing::info!("📂 Loaded {} booking(s) from the record store", loaded);
        Ok(desk)
    }

    async fn hydrate(&mut self) -> Result<usize> {
        let mut loaded = 0;
        for record in self.store.all().await? {
            match self.chart.restore(&record.seat, record.reference.clone()) {
                Ok(()) => loaded += 1,
                Err(e) => tracing::warn!(
                    "Skipping stored booking {} for seat {}: {}",
                    record.reference,
                    record.seat,
                    e
                ),
            }
        }
        Ok(loaded)
    }

    pub fn chart(&self) -> &SeatChart {
        &self.chart
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn check(&self, seat: &SeatId) -> Result<Availability> {
        self.chart.check(seat)
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render
    }

    pub fn render(&self) -> ChartView {
        self.chart.render_with(&self.render)
    }

    pub fn occupancy(&self) -> Occupancy {
        self.chart.occupancy()
    }

    async fn stored_references(&self) -> Result<HashSet<Reference>> {
        Ok(self
            .store
            .all()
            .await?
            .into_iter()
            .map(|record| record.reference)
            .collect())
    }

    pub async fn book(
        &mut self,
        seat: &SeatId,
        passenger: Option<Passenger>,
    ) -> Result<BookingConfirmation> {
        self.chart.ensure_bookable(seat)?;
        let stored = self.stored_references().await?;
        let reference = self.chart.reserve_avoiding(seat, &stored)?;

        let record = BookingRecord {
            reference: reference.clone(),
            seat: *seat,
            passenger,
            booked_at: Utc::now(),
        };
        if let Err(e) = self.store.insert(record).await {
            tracing::warn!("Persisting booking for {} failed, rolling back: {}", seat, e);
            log_rollback(self.chart.release(seat));
            return Err(e);
        }

        tracing::info!("✅ Seat {} booked", seat);
        Ok(BookingConfirmation {
            seat: *seat,
            reference,
        })
    }

    /// Frees a booked seat and drops its stored record.
    pub async fn free(&mut self, seat: &SeatId) -> Result<()> {
        let reference = self.chart.booking_reference(seat)?.cloned();
        self.chart.release(seat)?;

        if let Some(reference) = reference {
            match self.store.delete(&reference).await {
                Ok(true) => {}
                Ok(false) => tracing::warn!("No stored record for freed seat {}", seat),
                Err(e) => {
                    tracing::warn!("Deleting record for {} failed, rolling back: {}", seat, e);
                    log_rollback(self.chart.restore(seat, reference));
                    return Err(e);
                }
            }
        }

        tracing::info!("Seat {} freed", seat);
        Ok(())
    }

    /// Cancels a booking by reference and returns the seat it held.
    pub async fn cancel(&mut self, reference: &Reference) -> Result<SeatId> {
        let not_found = || BookingError::ReferenceNotFound {
            reference: reference.to_string(),
        };
        let record = self
            .store
            .find_by_reference(reference)
            .await?
            .ok_or_else(not_found)?;

        let seat = record.seat;
        if self.chart.booking_reference(&seat)? != Some(reference) {
            tracing::warn!("Stored booking {} does not match seat {}", reference, seat);
            return Err(not_found());
        }

        self.chart.release(&seat)?;
        if let Err(e) = self.store.delete(reference).await {
            tracing::warn!("Cancelling {} failed, rolling back: {}", reference, e);
            log_rollback(self.chart.restore(&seat, reference.clone()));
            return Err(e);
        }

        tracing::info!("Booking for seat {} cancelled", seat);
        Ok(seat)
    }

    /// Moves a booking to another seat under a new reference, keeping the
    /// passenger details of the original record.
    pub async fn modify(&mut self, current: &SeatId, target: &SeatId) -> Result<BookingConfirmation> {
        self.chart.ensure_movable(current, target)?;
        let previous = self.chart.booking_reference(current).ok().flatten().cloned();
        let stored = self.stored_references().await?;
        let reference = self.chart.reassign_avoiding(current, target, &stored)?;
        let previous = previous.ok_or_else(|| BookingError::CurrentNotBooked {
            seat: current.to_string(),
        })?;

        if let Err(e) = self.persist_move(&previous, &reference, target).await {
            tracing::warn!(
                "Persisting move {} -> {} failed, rolling back: {}",
                current,
                target,
                e
            );
            let undone = self
                .chart
                .release(target)
                .and_then(|()| self.chart.restore(current, previous));
            log_rollback(undone);
            return Err(e);
        }

        tracing::info!("Booking moved from {} to {}", current, target);
        Ok(BookingConfirmation {
            seat: *target,
            reference,
        })
    }

    async fn persist_move(
        &self,
        previous: &Reference,
        reference: &Reference,
        target: &SeatId,
    ) -> Result<()> {
        let old = self.store.find_by_reference(previous).await?;
        let record = BookingRecord {
            reference: reference.clone(),
            seat: *target,
            passenger: old.as_ref().and_then(|r| r.passenger.clone()),
            booked_at: Utc::now(),
        };

        self.store.delete(previous).await?;
        if let Err(e) = self.store.insert(record).await {
            // Put the old record back so the store matches the rolled-back chart.
            if let Some(old) = old {
                if let Err(undo) = self.store.insert(old).await {
                    tracing::error!("Could not restore record {}: {}", previous, undo);
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Finds a booking by reference, passport number or full name.
    ///
    /// Only records whose seat holds their reference on the chart count;
    /// records skipped at startup stay invisible.
    pub async fn find(&self, query: &str) -> Result<Option<BookingRecord>> {
        let needle = query.trim().to_uppercase();
        if needle.is_empty() {
            return Ok(None);
        }
        Ok(self.store.all().await?.into_iter().find(|record| {
            let matches = record.reference.as_str() == needle
                || record.passenger.as_ref().is_some_and(|p| {
                    p.passport.to_uppercase() == needle || p.full_name().to_uppercase() == needle
                });
            matches && self.holds(record)
        }))
    }

    fn holds(&self, record: &BookingRecord) -> bool {
        matches!(
            self.chart.booking_reference(&record.seat),
            Ok(Some(reference)) if reference == &record.reference
        )
    }

    /// Writes the rendered chart as CSV.
    pub async fn export_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let csv = self.render().to_csv()?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path.as_ref(), csv).await?;
        tracing::info!("📁 Seating chart exported to {}", path.as_ref().display());
        Ok(())
    }
}

fn log_rollback(outcome: Result<()>) {
    if let Err(e) = outcome {
        tracing::error!("Chart rollback failed: {}", e);
    }
}
