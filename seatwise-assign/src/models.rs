use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::fmt;
use seatwise_catalog::Seat;
use seatwise_shared::{SeatAssignment, SeatOperationEvent};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Assign,
    Free,
    Move,
    Block,
    Unblock,
    BulkAssign,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Assign => "assign",
            OperationKind::Free => "free",
            OperationKind::Move => "move",
            OperationKind::Block => "block",
            OperationKind::Unblock => "unblock",
            OperationKind::BulkAssign => "bulk_assign",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seat touched by an operation, with the passenger seated there afterwards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeatRef {
    pub seat_id: Uuid,
    pub seat_label: Option<String>,
    pub passenger_name: Option<String>,
}

impl SeatRef {
    pub fn new(seat: &Seat, passenger_name: Option<&str>) -> Self {
        Self {
            seat_id: seat.id,
            seat_label: seat.seat_label.clone(),
            passenger_name: passenger_name.map(str::to_string),
        }
    }
}

/// State an operation destroyed, kept so undo can restore it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PriorState {
    Assignment(SeatAssignment),
    BlockReason(Option<String>),
}

/// Immutable record of one completed mutation.
///
/// `seats` holds one entry for assign/free/block/unblock, `[from, to]` for
/// move, and every touched seat for bulk assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Operation {
    pub id: Uuid,
    pub kind: OperationKind,
    pub transport_id: Uuid,
    pub seats: Vec<SeatRef>,
    pub passenger_name: Option<String>,
    pub prior: Option<PriorState>,
    pub recorded_at: DateTime<Utc>,
}

impl Operation {
    fn new(kind: OperationKind, transport_id: Uuid, seats: Vec<SeatRef>, passenger_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            transport_id,
            seats,
            passenger_name,
            prior: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn assign(transport_id: Uuid, seat: &Seat, assignment: &SeatAssignment) -> Self {
        let name = assignment.passenger.name.as_str();
        Self::new(
            OperationKind::Assign,
            transport_id,
            vec![SeatRef::new(seat, Some(name))],
            Some(name.to_string()),
        )
    }

    pub fn free(transport_id: Uuid, seat: &Seat, removed: SeatAssignment) -> Self {
        let mut op = Self::new(
            OperationKind::Free,
            transport_id,
            vec![SeatRef::new(seat, None)],
            Some(removed.passenger.name.clone()),
        );
        op.prior = Some(PriorState::Assignment(removed));
        op
    }

    pub fn moved(transport_id: Uuid, from: &Seat, to: &Seat, assignment: &SeatAssignment) -> Self {
        let name = assignment.passenger.name.as_str();
        Self::new(
            OperationKind::Move,
            transport_id,
            vec![SeatRef::new(from, None), SeatRef::new(to, Some(name))],
            Some(name.to_string()),
        )
    }

    pub fn block(transport_id: Uuid, seat: &Seat) -> Self {
        Self::new(OperationKind::Block, transport_id, vec![SeatRef::new(seat, None)], None)
    }

    pub fn unblock(transport_id: Uuid, seat: &Seat, cleared_reason: Option<String>) -> Self {
        let mut op = Self::new(OperationKind::Unblock, transport_id, vec![SeatRef::new(seat, None)], None);
        op.prior = Some(PriorState::BlockReason(cleared_reason));
        op
    }

    pub fn bulk_assign(transport_id: Uuid, seats: Vec<SeatRef>) -> Self {
        Self::new(OperationKind::BulkAssign, transport_id, seats, None)
    }

    /// First affected seat; every constructor records at least one
    pub fn primary_seat(&self) -> Option<&SeatRef> {
        self.seats.first()
    }

    pub fn labels(&self) -> Vec<String> {
        self.seats
            .iter()
            .map(|seat| seat.seat_label.clone().unwrap_or_else(|| seat.seat_id.to_string()))
            .collect()
    }

    pub fn to_event(&self) -> SeatOperationEvent {
        SeatOperationEvent {
            operation_id: self.id,
            transport_id: self.transport_id,
            kind: self.kind.to_string(),
            seat_ids: self.seats.iter().map(|seat| seat.seat_id).collect(),
            seat_labels: self.labels(),
            passenger_name: self.passenger_name.clone(),
            occurred_at: self.recorded_at.timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatwise_catalog::SeatType;
    use seatwise_shared::PassengerDetails;

    #[test]
    fn test_move_records_both_seats() {
        let map_id = Uuid::new_v4();
        let transport = Uuid::new_v4();
        let from = Seat::new(map_id, 0, 1, SeatType::Seat);
        let to = Seat::new(map_id, 2, 1, SeatType::Seat);
        let assignment = SeatAssignment::new(to.id, transport, PassengerDetails::new("Anna"));

        let op = Operation::moved(transport, &from, &to, &assignment);
        assert_eq!(op.kind, OperationKind::Move);
        assert_eq!(op.labels(), vec!["1B".to_string(), "2B".to_string()]);
        assert_eq!(op.seats[1].passenger_name.as_deref(), Some("Anna"));
        assert!(op.prior.is_none());
    }

    #[test]
    fn test_free_keeps_snapshot() {
        let seat = Seat::new(Uuid::new_v4(), 0, 1, SeatType::Seat);
        let removed = SeatAssignment::new(seat.id, Uuid::new_v4(), PassengerDetails::new("Ben"));
        let op = Operation::free(removed.transport_id, &seat, removed.clone());

        assert_eq!(op.passenger_name.as_deref(), Some("Ben"));
        assert_eq!(op.prior, Some(PriorState::Assignment(removed)));
    }

    #[test]
    fn test_event_rendering() {
        let seat = Seat::new(Uuid::new_v4(), 4, 2, SeatType::Seat);
        let transport = Uuid::new_v4();
        let op = Operation::block(transport, &seat);

        let event = op.to_event();
        assert_eq!(event.kind, "block");
        assert_eq!(event.seat_labels, vec!["3C".to_string()]);
        assert_eq!(event.seat_ids, vec![seat.id]);
        assert_eq!(event.transport_id, transport);

        let json = serde_json::to_value(OperationKind::BulkAssign).unwrap();
        assert_eq!(json, "bulk_assign");
    }
}
