use crate::core::reference::ReferenceAllocator;
use crate::core::render::{ChartView, RedactionPolicy, RenderOptions, RowView};
use crate::domain::model::{Availability, Column, Reference, SeatId, SeatStatus, ROWS, STORAGE_ROWS};
use crate::utils::error::{BookingError, Result};
use std::collections::HashSet;

/// Seat counts across the whole cabin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    pub free: usize,
    pub booked: usize,
    pub storage: usize,
}

impl Occupancy {
    /// Share of bookable seats currently booked, 0.0..=1.0.
    pub fn utilization(&self) -> f64 {
        let bookable = self.free + self.booked;
        if bookable == 0 {
            0.0
        } else {
            self.booked as f64 / bookable as f64
        }
    }
}

/// Authoritative status of every cabin position.
///
/// The grid is row-major with one fixed slot per column (aisle included), so
/// positions are never inserted or removed, only their status replaced.
pub struct SeatChart {
    grid: Vec<[SeatStatus; 7]>,
    active: HashSet<Reference>,
    allocator: ReferenceAllocator,
}

fn initial_status(row: u8, column: Column) -> SeatStatus {
    if column == Column::Aisle {
        SeatStatus::Aisle
    } else if STORAGE_ROWS.contains(&row) && column.is_storage_side() {
        SeatStatus::Storage
    } else {
        SeatStatus::Free
    }
}

fn not_bookable(id: &SeatId, status: &SeatStatus) -> BookingError {
    BookingError::NotBookable {
        seat: id.to_string(),
        kind: status.structural_kind().unwrap_or("not a seat"),
    }
}

impl SeatChart {
    pub fn initialize() -> Self {
        Self::with_allocator(ReferenceAllocator::new())
    }

    pub fn with_allocator(allocator: ReferenceAllocator) -> Self {
        let grid = (1..=ROWS)
            .map(|row| std::array::from_fn(|slot| initial_status(row, Column::ALL[slot])))
            .collect();
        Self {
            grid,
            active: HashSet::new(),
            allocator,
        }
    }

    fn status(&self, id: &SeatId) -> Result<&SeatStatus> {
        if !id.is_in_grid() {
            return Err(BookingError::UnknownSeat {
                seat: id.to_string(),
            });
        }
        Ok(&self.grid[usize::from(id.row() - 1)][id.column().index()])
    }

    fn status_mut(&mut self, id: &SeatId) -> &mut SeatStatus {
        &mut self.grid[usize::from(id.row() - 1)][id.column().index()]
    }

    /// Availability of a seat. The booking reference is never exposed here.
    pub fn check(&self, id: &SeatId) -> Result<Availability> {
        self.status(id).map(Availability::from)
    }

    /// Fails with the error [`reserve`](Self::reserve) would give, without
    /// touching the seat.
    pub fn ensure_bookable(&self, id: &SeatId) -> Result<()> {
        let status = self.status(id)?;
        match status {
            SeatStatus::Free => Ok(()),
            SeatStatus::Aisle | SeatStatus::Storage => Err(not_bookable(id, status)),
            SeatStatus::Booked(_) => Err(BookingError::AlreadyBooked {
                seat: id.to_string(),
            }),
        }
    }

    /// Books a free seat under a freshly minted reference.
    pub fn reserve(&mut self, id: &SeatId) -> Result<Reference> {
        self.reserve_avoiding(id, &HashSet::new())
    }

    /// Like [`reserve`](Self::reserve), but the new reference also avoids `extra`,
    /// typically the references held by a durable store.
    pub fn reserve_avoiding(&mut self, id: &SeatId, extra: &HashSet<Reference>) -> Result<Reference> {
        self.ensure_bookable(id)?;

        let reference = self.mint(extra)?;
        self.book(id, reference.clone());
        tracing::debug!("Seat {} booked", id);
        Ok(reference)
    }

    /// Books a free seat under a known reference (hydration and rollback).
    pub fn restore(&mut self, id: &SeatId, reference: Reference) -> Result<()> {
        self.ensure_bookable(id)?;
        if self.active.contains(&reference) {
            return Err(BookingError::DuplicateReference {
                reference: reference.to_string(),
            });
        }
        self.book(id, reference);
        Ok(())
    }

    pub fn release(&mut self, id: &SeatId) -> Result<()> {
        let status = self.status(id)?;
        match status {
            SeatStatus::Booked(_) => {}
            SeatStatus::Aisle | SeatStatus::Storage => return Err(not_bookable(id, status)),
            SeatStatus::Free => {
                return Err(BookingError::AlreadyFree {
                    seat: id.to_string(),
                });
            }
        }
        self.unbook(id);
        tracing::debug!("Seat {} released", id);
        Ok(())
    }

    /// Moves a booking from `current` to `target` under a new reference.
    ///
    /// All checks and the reference allocation happen before either seat is
    /// touched, so a failure leaves both seats as they were.
    pub fn reassign(&mut self, current: &SeatId, target: &SeatId) -> Result<Reference> {
        self.reassign_avoiding(current, target, &HashSet::new())
    }

    pub fn reassign_avoiding(
        &mut self,
        current: &SeatId,
        target: &SeatId,
        extra: &HashSet<Reference>,
    ) -> Result<Reference> {
        self.ensure_movable(current, target)?;

        // The old reference is still active here, so the new one always differs.
        let reference = self.mint(extra)?;
        self.unbook(current);
        self.book(target, reference.clone());
        tracing::debug!("Booking moved from {} to {}", current, target);
        Ok(reference)
    }

    /// Fails with the error [`reassign`](Self::reassign) would give, without
    /// touching either seat.
    pub fn ensure_movable(&self, current: &SeatId, target: &SeatId) -> Result<()> {
        let (current_status, target_status) = match (self.status(current), self.status(target)) {
            (Ok(c), Ok(t)) => (c, t),
            _ => {
                return Err(BookingError::SeatsUnknown {
                    current: current.to_string(),
                    target: target.to_string(),
                })
            }
        };
        if !matches!(current_status, SeatStatus::Booked(_)) {
            return Err(BookingError::CurrentNotBooked {
                seat: current.to_string(),
            });
        }
        if current == target || !matches!(target_status, SeatStatus::Free) {
            return Err(BookingError::TargetNotFree {
                seat: target.to_string(),
            });
        }
        Ok(())
    }

    /// Reference held by a booked seat. For trusted callers only; availability
    /// queries go through [`check`](Self::check).
    pub fn booking_reference(&self, id: &SeatId) -> Result<Option<&Reference>> {
        Ok(match self.status(id)? {
            SeatStatus::Booked(reference) => Some(reference),
            SeatStatus::Free | SeatStatus::Aisle | SeatStatus::Storage => None,
        })
    }

    /// Seat currently holding `reference`, if any.
    pub fn seat_of(&self, reference: &Reference) -> Option<SeatId> {
        if !self.active.contains(reference) {
            return None;
        }
        self.seats()
            .find(|(_, status)| matches!(status, SeatStatus::Booked(r) if r == reference))
            .map(|(id, _)| id)
    }

    pub fn active_references(&self) -> &HashSet<Reference> {
        &self.active
    }

    pub fn occupancy(&self) -> Occupancy {
        let mut occupancy = Occupancy {
            free: 0,
            booked: 0,
            storage: 0,
        };
        for (_, status) in self.seats() {
            match status {
                SeatStatus::Free => occupancy.free += 1,
                SeatStatus::Booked(_) => occupancy.booked += 1,
                SeatStatus::Storage => occupancy.storage += 1,
                SeatStatus::Aisle => {}
            }
        }
        occupancy
    }

    /// Every position in display order: row ascending, then column slot.
    pub fn seats(&self) -> impl Iterator<Item = (SeatId, &SeatStatus)> + '_ {
        self.grid.iter().zip(1..=ROWS).flat_map(|(cells, row)| {
            Column::ALL
                .into_iter()
                .zip(cells.iter())
                .map(move |(column, status)| (SeatId::new(row, column), status))
        })
    }

    pub fn render(&self, policy: RedactionPolicy) -> ChartView {
        self.render_with(&RenderOptions {
            policy,
            ..RenderOptions::default()
        })
    }

    pub fn render_with(&self, options: &RenderOptions) -> ChartView {
        let rows = self
            .grid
            .iter()
            .zip(1..=ROWS)
            .map(|(cells, row)| RowView {
                row,
                cells: cells.iter().map(|status| options.marker(status)).collect(),
            })
            .collect();
        ChartView { rows }
    }

    fn mint(&mut self, extra: &HashSet<Reference>) -> Result<Reference> {
        if extra.is_empty() {
            return self.allocator.allocate(&self.active);
        }
        let existing: HashSet<Reference> = self.active.union(extra).cloned().collect();
        self.allocator.allocate(&existing)
    }

    fn book(&mut self, id: &SeatId, reference: Reference) {
        self.active.insert(reference.clone());
        *self.status_mut(id) = SeatStatus::Booked(reference);
    }

    fn unbook(&mut self, id: &SeatId) {
        if let SeatStatus::Booked(reference) = std::mem::replace(self.status_mut(id), SeatStatus::Free) {
            self.active.remove(&reference);
        }
    }
}

impl Default for SeatChart {
    fn default() -> Self {
        Self::initialize()
    }
}
