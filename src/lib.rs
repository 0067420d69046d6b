pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::Settings;

pub use adapters::{JsonFileStore, MemoryStore};
pub use crate::core::{
    chart::{Occupancy, SeatChart},
    desk::BookingDesk,
    reference::ReferenceAllocator,
    render::{ChartView, RedactionPolicy, RenderOptions},
};
pub use domain::model::{
    Availability, BookingConfirmation, BookingRecord, Column, Passenger, Reference, SeatId,
    SeatStatus,
};
pub use domain::ports::RecordStore;
pub use utils::error::{BookingError, Result};
