use serde::{Deserialize, Serialize};
use uuid::Uuid;
use seatwise_catalog::Seat;
use seatwise_shared::UnassignedPassenger;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Planner pass that produced a suggestion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    Companion,
    Position,
    Fallback,
}

/// Proposed seat for one waiting passenger
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkAssignmentSuggestion {
    pub passenger: UnassignedPassenger,
    pub seat_id: Uuid,
    pub seat_label: Option<String>,
    pub row_number: Option<u32>,
    pub seat_letter: Option<char>,
    pub reason: String,
    pub confidence: Confidence,
    pub source: SuggestionSource,
    #[serde(default)]
    pub conflicts: Vec<String>,
}

impl BulkAssignmentSuggestion {
    pub fn new(
        passenger: &UnassignedPassenger,
        seat: &Seat,
        reason: String,
        confidence: Confidence,
        source: SuggestionSource,
    ) -> Self {
        Self {
            passenger: passenger.clone(),
            seat_id: seat.id,
            seat_label: seat.seat_label.clone(),
            row_number: seat.row_number,
            seat_letter: seat.seat_letter,
            reason,
            confidence,
            source,
            conflicts: Vec::new(),
        }
    }

    pub fn passenger_name(&self) -> &str {
        self.passenger.name()
    }
}
