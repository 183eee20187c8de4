pub mod seat;
pub mod grid;
pub mod status;

pub use seat::{Seat, SeatMap, SeatStatus, SeatType, VehicleClass, GUIDE_HOLD_PREFIX, MAX_SEAT_COLUMNS};
pub use grid::{CellChange, GridError, SeatGrid};
pub use status::{derive_status, DerivedStatus};
