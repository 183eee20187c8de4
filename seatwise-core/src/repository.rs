use async_trait::async_trait;
use uuid::Uuid;
use seatwise_catalog::{Seat, SeatMap};
use seatwise_shared::{SeatAssignment, UnassignedPassenger};

/// Durable storage for seat maps, seats and assignments
#[async_trait]
pub trait SeatRepository: Send + Sync {
    async fn load_seat_map(
        &self,
        seat_map_id: Uuid,
    ) -> Result<Option<SeatMap>, Box<dyn std::error::Error + Send + Sync>>;

    async fn load_seats(
        &self,
        seat_map_id: Uuid,
    ) -> Result<Vec<Seat>, Box<dyn std::error::Error + Send + Sync>>;

    async fn load_seat(
        &self,
        seat_id: Uuid,
    ) -> Result<Option<Seat>, Box<dyn std::error::Error + Send + Sync>>;

    async fn load_assignments(
        &self,
        transport_id: Uuid,
    ) -> Result<Vec<SeatAssignment>, Box<dyn std::error::Error + Send + Sync>>;

    /// Assignments of one seat on every transport
    async fn load_seat_assignments(
        &self,
        seat_id: Uuid,
    ) -> Result<Vec<SeatAssignment>, Box<dyn std::error::Error + Send + Sync>>;

    async fn save_seat(
        &self,
        seat: &Seat,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn delete_seat(
        &self,
        seat_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn save_assignment(
        &self,
        assignment: &SeatAssignment,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn delete_assignment(
        &self,
        seat_id: Uuid,
        transport_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Read-only list of passengers still waiting for a seat
#[async_trait]
pub trait PassengerSource: Send + Sync {
    async fn unassigned_passengers(
        &self,
        transport_id: Uuid,
    ) -> Result<Vec<UnassignedPassenger>, Box<dyn std::error::Error + Send + Sync>>;
}
