use seat_booking::{
    Availability, BookingError, Column, RedactionPolicy, ReferenceAllocator, SeatChart, SeatId,
    SeatStatus,
};
use std::collections::HashSet;

fn seat(s: &str) -> SeatId {
    s.parse().unwrap()
}

#[test]
fn test_initial_chart_layout() {
    let chart = SeatChart::initialize();
    for row in 1..=80u8 {
        for column in Column::ALL {
            let id = SeatId::new(row, column);
            let expected = if column == Column::Aisle {
                Availability::Aisle
            } else if (row == 79 || row == 80) && matches!(column, Column::D | Column::E | Column::F) {
                Availability::Storage
            } else {
                Availability::Available
            };
            assert_eq!(chart.check(&id).unwrap(), expected, "seat {}", id);
        }
    }
}

#[test]
fn test_reserve_reports_booked_with_well_formed_reference() {
    let mut chart = SeatChart::initialize();
    let reference = chart.reserve(&seat("12A")).unwrap();

    assert_eq!(chart.check(&seat("12A")).unwrap(), Availability::Booked);
    assert_eq!(reference.as_str().len(), 8);
    assert!(reference
        .as_str()
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
}

#[test]
fn test_second_reserve_fails_and_keeps_reference() {
    let mut chart = SeatChart::initialize();
    let first = chart.reserve(&seat("30C")).unwrap();

    let err = chart.reserve(&seat("30C")).unwrap_err();
    assert!(matches!(err, BookingError::AlreadyBooked { .. }));
    assert_eq!(chart.booking_reference(&seat("30C")).unwrap(), Some(&first));
}

#[test]
fn test_release_makes_seat_available_again() {
    let mut chart = SeatChart::initialize();
    chart.reserve(&seat("44E")).unwrap();
    chart.release(&seat("44E")).unwrap();
    assert_eq!(chart.check(&seat("44E")).unwrap(), Availability::Available);
}

#[test]
fn test_references_are_unique_across_a_full_cabin() {
    let mut chart = SeatChart::with_allocator(ReferenceAllocator::seeded(2024));
    let mut seen = HashSet::new();
    for row in 1..=78u8 {
        for column in [Column::A, Column::B, Column::C, Column::D, Column::E, Column::F] {
            let reference = chart.reserve(&SeatId::new(row, column)).unwrap();
            assert!(seen.insert(reference), "duplicate reference issued");
        }
    }
    assert_eq!(chart.active_references().len(), seen.len());
    assert_eq!(chart.occupancy().free, 6);
}

#[test]
fn test_reassign_frees_source_and_books_target() {
    let mut chart = SeatChart::initialize();
    let original = chart.reserve(&seat("10A")).unwrap();
    let moved = chart.reassign(&seat("10A"), &seat("11F")).unwrap();

    assert_eq!(chart.check(&seat("10A")).unwrap(), Availability::Available);
    assert_eq!(chart.check(&seat("11F")).unwrap(), Availability::Booked);
    assert_ne!(moved, original);
}

#[test]
fn test_structural_and_unknown_seats_are_rejected() {
    let mut chart = SeatChart::initialize();

    assert!(matches!(
        chart.reserve(&seat("80D")).unwrap_err(),
        BookingError::NotBookable { .. }
    ));
    assert!(matches!(
        chart.reserve(&SeatId::aisle(40)).unwrap_err(),
        BookingError::NotBookable { .. }
    ));
    for text in ["81A", "12G"] {
        assert!(matches!(
            text.parse::<SeatId>().unwrap_err(),
            BookingError::UnknownSeat { .. }
        ));
    }
    assert!(matches!(
        chart.reserve(&SeatId::new(81, Column::A)).unwrap_err(),
        BookingError::UnknownSeat { .. }
    ));
}

#[test]
fn test_structural_statuses_never_change() {
    let mut chart = SeatChart::initialize();
    let _ = chart.reserve(&seat("79D"));
    let _ = chart.release(&seat("79D"));
    let _ = chart.reassign(&seat("79D"), &seat("1A"));
    let _ = chart.release(&SeatId::aisle(3));

    for (id, status) in chart.seats() {
        if id.column() == Column::Aisle {
            assert_eq!(*status, SeatStatus::Aisle);
        } else if id.row() >= 79 && id.column().is_storage_side() {
            assert_eq!(*status, SeatStatus::Storage);
        }
    }
}

#[test]
fn test_render_masks_booked_seat() {
    let mut chart = SeatChart::initialize();
    let reference = chart.reserve(&seat("5C")).unwrap();

    let view = chart.render(RedactionPolicy::Redact);
    let row = view.row(5).unwrap();
    assert_eq!(row.cells[Column::C.index()], "R");
    assert!(!view.to_string().contains(reference.as_str()));
    assert!(view
        .rows
        .iter()
        .flat_map(|r| r.cells.iter())
        .all(|cell| cell != reference.as_str()));
}
