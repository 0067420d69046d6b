// Domain layer: cabin model and the record-store port. No I/O here.

pub mod model;
pub mod ports;
