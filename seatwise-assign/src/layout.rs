use tracing::info;
use uuid::Uuid;
use seatwise_catalog::{CellChange, SeatGrid, SeatStatus, SeatType};
use seatwise_core::{EngineError, EngineResult};
use crate::manager::AssignmentService;

/// Parse a seat type name as sent by editors, e.g. `seat_window`
pub fn parse_seat_type(value: &str) -> EngineResult<SeatType> {
    Ok(value.parse::<SeatType>()?)
}

pub fn parse_seat_status(value: &str) -> EngineResult<SeatStatus> {
    Ok(value.parse::<SeatStatus>()?)
}

impl AssignmentService {
    /// Set the type of one grid cell and persist the resulting seat record.
    /// `Empty` deletes the record. Layout edits are not undoable.
    ///
    /// A seat assigned on any transport keeps a passenger type until it is freed.
    pub async fn change_seat_type(
        &self,
        seat_map_id: Uuid,
        row: u32,
        column: u32,
        seat_type: SeatType,
        status: Option<SeatStatus>,
    ) -> EngineResult<CellChange> {
        let repo = self.repository();
        let seat_map = repo
            .load_seat_map(seat_map_id)
            .await
            .map_err(EngineError::persistence)?
            .ok_or_else(|| EngineError::SeatNotFound(format!("seat map {}", seat_map_id)))?;
        let seats = repo.load_seats(seat_map_id).await.map_err(EngineError::persistence)?;

        let mut grid = SeatGrid::from_seats(seat_map, seats)?;

        if !seat_type.is_passenger_seat() {
            if let Some(current) = grid.get(row, column) {
                let held = self.load_seat_assignments(current.id).await?;
                if !held.is_empty() {
                    return Err(EngineError::SeatNotAvailable(format!(
                        "seat {} has {} active assignment(s), free it before making it {}",
                        current.display_label(),
                        held.len(),
                        seat_type
                    )));
                }
            }
        }

        let change = grid.set_seat_type(row, column, seat_type, status)?;

        match &change {
            CellChange::Saved(seat) => {
                repo.save_seat(seat).await.map_err(EngineError::persistence)?;
                info!("Cell {},{} is now {} ({})", row, column, seat.seat_type, seat.display_label());
            }
            CellChange::Deleted(seat) => {
                repo.delete_seat(seat.id).await.map_err(EngineError::persistence)?;
                info!("Cell {},{} cleared", row, column);
            }
            CellChange::Unchanged => {}
        }

        Ok(change)
    }
}
