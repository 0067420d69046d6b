pub mod chart;
pub mod desk;
pub mod reference;
pub mod render;

pub use crate::domain::model::{Availability, Reference, SeatId, SeatStatus};
pub use crate::domain::ports::RecordStore;
pub use crate::utils::error::Result;
