pub mod models;
pub mod pii;

pub use models::passenger::{PassengerDetails, PreferenceCategory, SeatAssignment, UnassignedPassenger};
pub use models::events::SeatOperationEvent;
pub use pii::Masked;
