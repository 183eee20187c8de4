use serde::{Deserialize, Serialize};
use std::fmt;
use seatwise_shared::SeatAssignment;
use crate::seat::{Seat, SeatStatus, SeatType};

/// Live seat state, computed from the seat record and the transport's assignments
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DerivedStatus {
    Free,
    Occupied,
    Blocked,
    NonSelectable,
}

impl DerivedStatus {
    pub fn is_free(&self) -> bool {
        *self == DerivedStatus::Free
    }
}

impl fmt::Display for DerivedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DerivedStatus::Free => "free",
            DerivedStatus::Occupied => "occupied",
            DerivedStatus::Blocked => "blocked",
            DerivedStatus::NonSelectable => "non-selectable",
        };
        f.write_str(label)
    }
}

/// `assignments` must belong to a single transport.
/// A missing seat record is an empty cell.
pub fn derive_status(seat: Option<&Seat>, assignments: &[SeatAssignment]) -> DerivedStatus {
    let Some(seat) = seat else {
        return DerivedStatus::NonSelectable;
    };
    if seat.seat_type == SeatType::Empty {
        return DerivedStatus::NonSelectable;
    }
    if seat.is_blocked() {
        return DerivedStatus::Blocked;
    }

    let assigned = assignments.iter().any(|assignment| assignment.seat_id == seat.id);
    if assigned || seat.status == SeatStatus::Booked {
        return DerivedStatus::Occupied;
    }

    if seat.seat_type.is_passenger_seat() {
        DerivedStatus::Free
    } else {
        DerivedStatus::NonSelectable
    }
}
