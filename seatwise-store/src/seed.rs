use seatwise_catalog::{GridError, Seat, SeatGrid, SeatMap, SeatType, VehicleClass};
use tracing::info;
use crate::memory_repo::InMemorySeatStore;

/// Standard coach layout: one seat row on every even grid row, window seats
/// on the outer columns, driver and guide in the first row.
pub fn coach_layout(seat_map: &SeatMap) -> Result<Vec<Seat>, GridError> {
    let mut grid = SeatGrid::new(seat_map.clone());
    let last_column = seat_map.columns - 1;

    for row in (0..seat_map.rows).step_by(2) {
        for column in 0..seat_map.columns {
            let seat_type = match (row, column) {
                (0, 0) => SeatType::Driver,
                (0, c) if c == last_column && c > 0 => SeatType::Guide,
                (_, c) if c == 0 || c == last_column => SeatType::SeatWindow,
                _ => SeatType::SeatAisle,
            };
            grid.set_seat_type(row, column, seat_type, None)?;
        }
    }

    Ok(grid.seats().into_iter().cloned().collect())
}

/// Create a coach seat map with its seats in the store
pub async fn seed_coach(
    store: &InMemorySeatStore,
    name: &str,
    rows: u32,
    columns: u32,
    vehicle_class: VehicleClass,
) -> Result<(SeatMap, Vec<Seat>), GridError> {
    let seat_map = SeatMap::new(name, rows, columns, vehicle_class)?;
    let seats = coach_layout(&seat_map)?;

    store.insert_seat_map(seat_map.clone()).await;
    store.insert_seats(seats.clone()).await;

    info!("Seeded seat map '{}' ({}x{}) with {} cells", name, rows, columns, seats.len());
    Ok((seat_map, seats))
}
