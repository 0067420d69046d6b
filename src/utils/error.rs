use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Seat {seat} does not exist")]
    UnknownSeat { seat: String },

    #[error("One or both seat IDs do not exist: {current}, {target}")]
    SeatsUnknown { current: String, target: String },

    #[error("Seat {seat} is {kind} and cannot be booked or freed")]
    NotBookable { seat: String, kind: &'static str },

    #[error("Seat {seat} is already booked")]
    AlreadyBooked { seat: String },

    #[error("Seat {seat} is already free")]
    AlreadyFree { seat: String },

    #[error("Current seat {seat} is not booked")]
    CurrentNotBooked { seat: String },

    #[error("New seat {seat} is not available for booking")]
    TargetNotFree { seat: String },

    #[error("Booking reference {reference} is already in use")]
    DuplicateReference { reference: String },

    #[error("Booking reference {reference} not found")]
    ReferenceNotFound { reference: String },

    #[error("No free booking reference found after {attempts} attempts")]
    TokenSpaceExhausted { attempts: u32 },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Record store error: {message}")]
    StoreError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller supplied something outside the cabin grid or malformed text.
    Input,
    /// Aisle or storage position, permanently non-bookable.
    Structural,
    /// Seat state changed under the caller; retry with another seat.
    Conflict,
    Storage,
    Configuration,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BookingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BookingError::UnknownSeat { .. }
            | BookingError::SeatsUnknown { .. }
            | BookingError::ReferenceNotFound { .. }
            | BookingError::ValidationError { .. } => ErrorCategory::Input,
            BookingError::NotBookable { .. } => ErrorCategory::Structural,
            BookingError::AlreadyBooked { .. }
            | BookingError::AlreadyFree { .. }
            | BookingError::CurrentNotBooked { .. }
            | BookingError::TargetNotFree { .. }
            | BookingError::DuplicateReference { .. } => ErrorCategory::Conflict,
            BookingError::StoreError { .. }
            | BookingError::IoError(_)
            | BookingError::SerializationError(_)
            | BookingError::CsvError(_) => ErrorCategory::Storage,
            BookingError::InvalidConfigValueError { .. }
            | BookingError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            BookingError::TokenSpaceExhausted { .. } => ErrorCategory::Fatal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Structural => ErrorSeverity::Low,
            ErrorCategory::Conflict => ErrorSeverity::Medium,
            ErrorCategory::Storage | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Fatal => ErrorSeverity::Critical,
        }
    }

    /// Whether the caller can simply try again, possibly with a different seat.
    pub fn is_recoverable(&self) -> bool {
        self.severity() < ErrorSeverity::High
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BookingError::UnknownSeat { .. } | BookingError::SeatsUnknown { .. } => {
                "Use a row number from 1 to 80 followed by a seat letter A-F, e.g. 12A"
            }
            BookingError::NotBookable { .. } => "Choose a passenger seat instead",
            BookingError::AlreadyBooked { .. } | BookingError::TargetNotFree { .. } => {
                "Pick another seat from the seating chart"
            }
            BookingError::AlreadyFree { .. } | BookingError::CurrentNotBooked { .. } => {
                "Check the seat number of the existing booking"
            }
            BookingError::DuplicateReference { .. } => "Retry the booking",
            BookingError::ReferenceNotFound { .. } => {
                "Check the booking reference on your confirmation"
            }
            BookingError::TokenSpaceExhausted { .. } => {
                "Raise reference.max_attempts or clear stale records from the store"
            }
            BookingError::ValidationError { .. } => "Correct the highlighted input and retry",
            BookingError::InvalidConfigValueError { .. }
            | BookingError::ConfigValidationError { .. } => {
                "Fix the configuration file or command line flags"
            }
            BookingError::StoreError { .. }
            | BookingError::IoError(_)
            | BookingError::SerializationError(_)
            | BookingError::CsvError(_) => {
                "Check that the booking store path is writable and not corrupted"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BookingError::UnknownSeat { seat } => format!("Seat {} does not exist.", seat),
            BookingError::SeatsUnknown { .. } => "One or both seat IDs do not exist.".to_string(),
            BookingError::NotBookable { seat, kind } => {
                format!("Seat {} is {} and is not bookable.", seat, kind)
            }
            BookingError::AlreadyBooked { seat } => format!("Seat {} is already booked.", seat),
            BookingError::AlreadyFree { seat } => format!("Seat {} is already free.", seat),
            BookingError::CurrentNotBooked { seat } => {
                format!("Current seat {} is not booked.", seat)
            }
            BookingError::TargetNotFree { seat } => {
                format!("New seat {} is not available for booking.", seat)
            }
            BookingError::ReferenceNotFound { .. } => "Booking reference not found.".to_string(),
            BookingError::ValidationError { message } => message.clone(),
            other => format!("Something went wrong: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
