use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted for every mutation applied to a transport's seat plan
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SeatOperationEvent {
    pub operation_id: Uuid,
    pub transport_id: Uuid,
    pub kind: String,
    pub seat_ids: Vec<Uuid>,
    pub seat_labels: Vec<String>,
    pub passenger_name: Option<String>,
    pub occurred_at: i64,
}
