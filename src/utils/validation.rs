use crate::domain::model::Passenger;
use crate::utils::error::{BookingError, Result};
use regex::Regex;
use std::sync::LazyLock;

static PASSPORT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{6,15}$").expect("passport pattern is valid"));

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BookingError::ValidationError {
            message: format!("{} cannot be empty.", field_name),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Passport numbers are 6-15 letters or digits, compared upper-cased.
pub fn validate_passport(passport: &str) -> Result<()> {
    if PASSPORT_PATTERN.is_match(&passport.to_uppercase()) {
        Ok(())
    } else {
        Err(BookingError::ValidationError {
            message: "Invalid passport number format. Use 6-15 letters/numbers.".to_string(),
        })
    }
}

/// Markers must not collide with the fixed F / X / S cells of the chart.
pub fn validate_booked_marker(field_name: &str, marker: char) -> Result<()> {
    if marker.is_whitespace() || matches!(marker, 'F' | 'X' | 'S') {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: marker.to_string(),
            reason: "Marker must be visible and differ from F, X and S".to_string(),
        });
    }
    Ok(())
}

impl Validate for Passenger {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("First name", &self.first_name)?;
        validate_non_empty_string("Last name", &self.last_name)?;
        validate_passport(&self.passport)
    }
}
