use std::collections::HashMap;
use uuid::Uuid;
use crate::seat::{Seat, SeatMap, SeatStatus, SeatType, MAX_SEAT_COLUMNS};

/// Result of changing one grid cell, for the caller to persist
#[derive(Debug, Clone, PartialEq)]
pub enum CellChange {
    /// Seat record created or updated
    Saved(Seat),
    /// Seat record removed; the cell is empty now
    Deleted(Seat),
    /// Cell was already empty
    Unchanged,
}

/// Seat map plus the seats placed on it, indexed by grid position
#[derive(Debug, Clone)]
pub struct SeatGrid {
    map: SeatMap,
    cells: HashMap<(u32, u32), Seat>,
}

impl SeatGrid {
    pub fn new(map: SeatMap) -> Self {
        Self {
            map,
            cells: HashMap::new(),
        }
    }

    /// Build a grid from stored seats; duplicate positions are rejected
    pub fn from_seats(map: SeatMap, seats: impl IntoIterator<Item = Seat>) -> Result<Self, GridError> {
        let mut grid = Self::new(map);
        for seat in seats {
            grid.insert(seat)?;
        }
        Ok(grid)
    }

    pub fn map(&self) -> &SeatMap {
        &self.map
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Place a seat record. The cell must be free.
    pub fn insert(&mut self, seat: Seat) -> Result<(), GridError> {
        if seat.seat_map_id != self.map.id {
            return Err(GridError::ForeignSeat(seat.id));
        }
        self.check_bounds(seat.row, seat.column)?;
        if self.cells.contains_key(&(seat.row, seat.column)) {
            return Err(GridError::PositionTaken { row: seat.row, column: seat.column });
        }
        check_record(&seat)?;

        self.cells.insert((seat.row, seat.column), seat);
        Ok(())
    }

    pub fn get(&self, row: u32, column: u32) -> Option<&Seat> {
        self.cells.get(&(row, column))
    }

    /// Missing cells read as `Empty`
    pub fn seat_type_at(&self, row: u32, column: u32) -> SeatType {
        self.get(row, column)
            .map(|seat| seat.seat_type)
            .unwrap_or(SeatType::Empty)
    }

    pub fn find(&self, seat_id: Uuid) -> Option<&Seat> {
        self.cells.values().find(|seat| seat.id == seat_id)
    }

    /// All seat records in map order (row, then column)
    pub fn seats(&self) -> Vec<&Seat> {
        let mut seats: Vec<&Seat> = self.cells.values().collect();
        seats.sort_by_key(|seat| (seat.row, seat.column));
        seats
    }

    /// Assignable seats in map order
    pub fn passenger_seats(&self) -> Vec<&Seat> {
        self.seats()
            .into_iter()
            .filter(|seat| seat.seat_type.is_passenger_seat())
            .collect()
    }

    /// Retype one cell.
    ///
    /// Passenger variants clear the block reason and reset the status to
    /// `status` (default `Available`); facility types never carry a label
    /// or a booked/blocked status; `Empty` removes the record.
    pub fn set_seat_type(
        &mut self,
        row: u32,
        column: u32,
        seat_type: SeatType,
        status: Option<SeatStatus>,
    ) -> Result<CellChange, GridError> {
        self.check_bounds(row, column)?;

        if seat_type == SeatType::Empty {
            return Ok(match self.cells.remove(&(row, column)) {
                Some(removed) => CellChange::Deleted(removed),
                None => CellChange::Unchanged,
            });
        }

        if seat_type.is_passenger_seat() && column >= MAX_SEAT_COLUMNS {
            return Err(GridError::NoSeatLetter { column });
        }

        let status = match (seat_type.is_passenger_seat(), status) {
            (_, Some(SeatStatus::Blocked)) => {
                return Err(GridError::InvalidStatus(
                    "seats are blocked through the block operation".to_string(),
                ));
            }
            (false, Some(SeatStatus::Booked)) => {
                return Err(GridError::InvalidStatus(format!(
                    "{} cannot be booked",
                    seat_type
                )));
            }
            (_, status) => status.unwrap_or_default(),
        };

        let map_id = self.map.id;
        let seat = self.cells
            .entry((row, column))
            .or_insert_with(|| Seat::new(map_id, row, column, seat_type));

        seat.seat_type = seat_type;
        seat.status = status;
        seat.block_reason = None;
        seat.apply_numbering();

        Ok(CellChange::Saved(seat.clone()))
    }

    fn check_bounds(&self, row: u32, column: u32) -> Result<(), GridError> {
        if !self.map.contains(row, column) {
            return Err(GridError::OutOfBounds {
                row,
                column,
                rows: self.map.rows,
                columns: self.map.columns,
            });
        }
        Ok(())
    }
}

/// Record-level invariants for stored seats
fn check_record(seat: &Seat) -> Result<(), GridError> {
    if seat.seat_type == SeatType::Empty {
        return Err(GridError::InvalidStatus(
            "empty cells have no seat record".to_string(),
        ));
    }
    if seat.seat_type.is_passenger_seat() && seat.column >= MAX_SEAT_COLUMNS {
        return Err(GridError::NoSeatLetter { column: seat.column });
    }
    if seat.status == SeatStatus::Booked && !seat.seat_type.is_passenger_seat() {
        return Err(GridError::InvalidStatus(format!(
            "{} cannot be booked",
            seat.seat_type
        )));
    }
    if seat.is_blocked() && seat.block_reason.is_none() && seat.seat_type.is_passenger_seat() {
        return Err(GridError::InvalidStatus(format!(
            "blocked seat {} has no reason",
            seat.display_label()
        )));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GridError {
    #[error("Invalid grid dimensions: {rows}x{columns}")]
    InvalidDimensions {
        rows: u32,
        columns: u32,
    },

    #[error("Position ({row}, {column}) outside {rows}x{columns} grid")]
    OutOfBounds {
        row: u32,
        column: u32,
        rows: u32,
        columns: u32,
    },

    #[error("Position ({row}, {column}) already holds a seat")]
    PositionTaken {
        row: u32,
        column: u32,
    },

    #[error("Seat {0} belongs to another seat map")]
    ForeignSeat(Uuid),

    #[error("Invalid seat type: {0}")]
    InvalidSeatType(String),

    #[error("Column {column} has no seat letter, passenger seats end at column {last}", last = MAX_SEAT_COLUMNS - 1)]
    NoSeatLetter {
        column: u32,
    },

    #[error("Invalid seat status: {0}")]
    InvalidStatus(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seat::VehicleClass;

    fn bus_grid() -> SeatGrid {
        SeatGrid::new(SeatMap::new("Bus", 6, 4, VehicleClass::Bus).unwrap())
    }

    #[test]
    fn test_lookup_defaults_to_empty() {
        let mut grid = bus_grid();
        grid.set_seat_type(0, 0, SeatType::Driver, None).unwrap();

        assert_eq!(grid.seat_type_at(0, 0), SeatType::Driver);
        assert_eq!(grid.seat_type_at(0, 1), SeatType::Empty);
        assert!(grid.get(0, 1).is_none());
    }

    #[test]
    fn test_duplicate_position_rejected() {
        let mut grid = bus_grid();
        let map_id = grid.map().id;
        grid.insert(Seat::new(map_id, 2, 1, SeatType::Seat)).unwrap();

        let result = grid.insert(Seat::new(map_id, 2, 1, SeatType::SeatAisle));
        assert_eq!(result, Err(GridError::PositionTaken { row: 2, column: 1 }));
        assert_eq!(grid.seat_type_at(2, 1), SeatType::Seat);
    }

    #[test]
    fn test_out_of_bounds_and_foreign_seats() {
        let mut grid = bus_grid();
        let map_id = grid.map().id;

        assert!(matches!(
            grid.insert(Seat::new(map_id, 6, 0, SeatType::Seat)),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.insert(Seat::new(Uuid::new_v4(), 0, 0, SeatType::Seat)),
            Err(GridError::ForeignSeat(_))
        ));
    }

    #[test]
    fn test_retype_to_passenger_seat_clears_block() {
        let mut grid = bus_grid();
        let map_id = grid.map().id;
        let mut seat = Seat::new(map_id, 2, 0, SeatType::Seat);
        seat.status = SeatStatus::Blocked;
        seat.block_reason = Some("broken belt".to_string());
        let seat_id = seat.id;
        grid.insert(seat).unwrap();

        let change = grid.set_seat_type(2, 0, SeatType::SeatWindow, None).unwrap();
        let CellChange::Saved(seat) = change else {
            panic!("expected saved seat");
        };
        assert_eq!(seat.id, seat_id);
        assert_eq!(seat.status, SeatStatus::Available);
        assert_eq!(seat.block_reason, None);
        assert_eq!(seat.seat_label.as_deref(), Some("2A"));
    }

    #[test]
    fn test_retype_with_explicit_status() {
        let mut grid = bus_grid();
        let change = grid.set_seat_type(4, 2, SeatType::Seat, Some(SeatStatus::Booked)).unwrap();
        assert!(matches!(change, CellChange::Saved(ref seat) if seat.status == SeatStatus::Booked));

        assert!(matches!(
            grid.set_seat_type(4, 3, SeatType::Kitchen, Some(SeatStatus::Booked)),
            Err(GridError::InvalidStatus(_))
        ));
        assert!(matches!(
            grid.set_seat_type(4, 3, SeatType::Seat, Some(SeatStatus::Blocked)),
            Err(GridError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_retype_to_facility_drops_label() {
        let mut grid = bus_grid();
        grid.set_seat_type(2, 3, SeatType::Seat, None).unwrap();
        let change = grid.set_seat_type(2, 3, SeatType::Toilet, None).unwrap();

        let CellChange::Saved(seat) = change else {
            panic!("expected saved seat");
        };
        assert_eq!(seat.seat_label, None);
        assert_eq!(seat.seat_letter, None);
    }

    #[test]
    fn test_retype_to_empty_deletes_record() {
        let mut grid = bus_grid();
        grid.set_seat_type(2, 2, SeatType::Seat, None).unwrap();

        assert!(matches!(
            grid.set_seat_type(2, 2, SeatType::Empty, None).unwrap(),
            CellChange::Deleted(_)
        ));
        assert!(grid.is_empty());
        assert_eq!(
            grid.set_seat_type(2, 2, SeatType::Empty, None).unwrap(),
            CellChange::Unchanged
        );
    }

    #[test]
    fn test_wide_vessel_columns() {
        let mut grid = SeatGrid::new(SeatMap::new("Ferry", 4, 30, VehicleClass::Ship).unwrap());

        let change = grid.set_seat_type(2, 12, SeatType::Seat, None).unwrap();
        assert!(matches!(change, CellChange::Saved(ref seat) if seat.seat_label.as_deref() == Some("2M")));

        assert_eq!(
            grid.set_seat_type(2, 26, SeatType::SeatWindow, None),
            Err(GridError::NoSeatLetter { column: 26 })
        );
        assert!(matches!(grid.set_seat_type(2, 27, SeatType::Table, None), Ok(CellChange::Saved(_))));

        let map_id = grid.map().id;
        assert_eq!(
            grid.insert(Seat::new(map_id, 0, 28, SeatType::Seat)),
            Err(GridError::NoSeatLetter { column: 28 })
        );
    }

    #[test]
    fn test_passenger_seats_in_map_order() {
        let mut grid = bus_grid();
        grid.set_seat_type(2, 1, SeatType::Seat, None).unwrap();
        grid.set_seat_type(0, 3, SeatType::Seat, None).unwrap();
        grid.set_seat_type(0, 0, SeatType::Driver, None).unwrap();
        grid.set_seat_type(0, 1, SeatType::Seat, None).unwrap();

        let labels: Vec<_> = grid
            .passenger_seats()
            .iter()
            .filter_map(|seat| seat.seat_label.clone())
            .collect();
        assert_eq!(labels, vec!["1B", "1D", "2B"]);
    }
}
