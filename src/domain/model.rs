use crate::utils::error::{BookingError, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Number of seat rows in the cabin.
pub const ROWS: u8 = 80;

/// Rows whose D/E/F positions are storage rather than seats.
pub const STORAGE_ROWS: [u8; 2] = [79, 80];

/// Length of a booking reference.
pub const REFERENCE_LEN: usize = 8;

static SEAT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([1-9][0-9]?)([A-F])$").expect("seat pattern is valid"));

static REFERENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{8}$").expect("reference pattern is valid"));

/// The seven cabin slots of a row, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    A,
    B,
    C,
    Aisle,
    D,
    E,
    F,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::A,
        Column::B,
        Column::C,
        Column::Aisle,
        Column::D,
        Column::E,
        Column::F,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Seat letter, `None` for the aisle.
    pub const fn letter(self) -> Option<char> {
        match self {
            Column::A => Some('A'),
            Column::B => Some('B'),
            Column::C => Some('C'),
            Column::Aisle => None,
            Column::D => Some('D'),
            Column::E => Some('E'),
            Column::F => Some('F'),
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A' => Some(Column::A),
            'B' => Some(Column::B),
            'C' => Some(Column::C),
            'D' => Some(Column::D),
            'E' => Some(Column::E),
            'F' => Some(Column::F),
            _ => None,
        }
    }

    pub const fn is_storage_side(self) -> bool {
        matches!(self, Column::D | Column::E | Column::F)
    }
}

/// A cabin position: row number plus column slot.
///
/// Construction does not check the row range; the chart rejects positions
/// outside the grid with `UnknownSeat`. Parsing from text only accepts the
/// `"12A"` form and never yields the aisle slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatId {
    row: u8,
    column: Column,
}

impl SeatId {
    pub const fn new(row: u8, column: Column) -> Self {
        Self { row, column }
    }

    pub const fn aisle(row: u8) -> Self {
        Self::new(row, Column::Aisle)
    }

    pub const fn row(&self) -> u8 {
        self.row
    }

    pub const fn column(&self) -> Column {
        self.column
    }

    pub const fn is_in_grid(&self) -> bool {
        self.row >= 1 && self.row <= ROWS
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column.letter() {
            Some(letter) => write!(f, "{}{}", self.row, letter),
            None => write!(f, "{}aisle", self.row),
        }
    }
}

impl FromStr for SeatId {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        let unknown = || BookingError::UnknownSeat {
            seat: s.to_string(),
        };
        let caps = SEAT_PATTERN.captures(s).ok_or_else(unknown)?;
        let row: u8 = caps[1].parse().map_err(|_| unknown())?;
        if row > ROWS {
            return Err(unknown());
        }
        let column = caps[2]
            .chars()
            .next()
            .and_then(Column::from_letter)
            .ok_or_else(unknown)?;
        Ok(Self::new(row, column))
    }
}

impl TryFrom<String> for SeatId {
    type Error = BookingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SeatId> for String {
    fn from(seat: SeatId) -> Self {
        seat.to_string()
    }
}

/// Eight-character booking reference over `A-Z0-9`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Reference(String);

impl Reference {
    pub fn parse(value: &str) -> Result<Self> {
        if REFERENCE_PATTERN.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(BookingError::ValidationError {
                message: format!(
                    "Booking reference '{}' must be {} letters or digits.",
                    value, REFERENCE_LEN
                ),
            })
        }
    }

    /// Wraps a token produced by the allocator, which only emits the valid alphabet.
    pub(crate) fn from_generated(token: String) -> Self {
        debug_assert!(REFERENCE_PATTERN.is_match(&token));
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Reference {
    type Error = BookingError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Reference> for String {
    fn from(reference: Reference) -> Self {
        reference.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatStatus {
    Free,
    Aisle,
    Storage,
    Booked(Reference),
}

impl SeatStatus {
    /// Description used in messages about non-bookable positions.
    pub fn structural_kind(&self) -> Option<&'static str> {
        match self {
            SeatStatus::Aisle => Some("an aisle"),
            SeatStatus::Storage => Some("a storage area"),
            SeatStatus::Free | SeatStatus::Booked(_) => None,
        }
    }
}

/// What an availability query may reveal about a seat. Never carries the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Booked,
    Aisle,
    Storage,
}

impl From<&SeatStatus> for Availability {
    fn from(status: &SeatStatus) -> Self {
        match status {
            SeatStatus::Free => Availability::Available,
            SeatStatus::Booked(_) => Availability::Booked,
            SeatStatus::Aisle => Availability::Aisle,
            SeatStatus::Storage => Availability::Storage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub first_name: String,
    pub last_name: String,
    pub passport: String,
}

impl Passenger {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Durable record of one confirmed booking, keyed by its reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub reference: Reference,
    pub seat: SeatId,
    pub passenger: Option<Passenger>,
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    pub seat: SeatId,
    pub reference: Reference,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seat_id() {
        let seat: SeatId = "12A".parse().unwrap();
        assert_eq!(seat.row(), 12);
        assert_eq!(seat.column(), Column::A);
        assert_eq!(seat.to_string(), "12A");

        assert_eq!("80F".parse::<SeatId>().unwrap(), SeatId::new(80, Column::F));
        assert_eq!("1D".parse::<SeatId>().unwrap(), SeatId::new(1, Column::D));
    }

    #[test]
    fn test_reject_malformed_seat_ids() {
        for bad in ["81A", "12G", "0A", "012A", "12a", "", "A12", "12", "12AB", " 12A", "100A"] {
            let err = bad.parse::<SeatId>().unwrap_err();
            assert!(
                matches!(err, BookingError::UnknownSeat { .. }),
                "{:?} should be UnknownSeat",
                bad
            );
        }
    }

    #[test]
    fn test_seat_ordering_is_row_then_column() {
        let mut seats = vec![
            SeatId::new(2, Column::A),
            SeatId::new(1, Column::F),
            SeatId::aisle(1),
            SeatId::new(1, Column::C),
        ];
        seats.sort();
        assert_eq!(
            seats,
            vec![
                SeatId::new(1, Column::C),
                SeatId::aisle(1),
                SeatId::new(1, Column::F),
                SeatId::new(2, Column::A),
            ]
        );
    }

    #[test]
    fn test_reference_validation() {
        assert!(Reference::parse("AB12CD34").is_ok());
        assert!(Reference::parse("ab12cd34").is_err());
        assert!(Reference::parse("AB12CD3").is_err());
        assert!(Reference::parse("AB12CD3!").is_err());
    }

    #[test]
    fn test_booking_record_json_shape() {
        let record = BookingRecord {
            reference: Reference::parse("QWERTY12").unwrap(),
            seat: "7B".parse().unwrap(),
            passenger: None,
            booked_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["reference"], "QWERTY12");
        assert_eq!(json["seat"], "7B");

        let back: BookingRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
