// Application layer: the interactive menu driving a booking desk.

pub mod session;

pub use session::{MenuChoice, Session};
