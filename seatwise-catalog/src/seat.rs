use serde::{Deserialize, Serialize};
use uuid::Uuid;
use std::fmt;
use std::str::FromStr;
use crate::grid::GridError;

/// Block reasons starting with this prefix mark a seat held for the tour guide
pub const GUIDE_HOLD_PREFIX: &str = "Reiseleitung";

/// Passenger seats need a letter, so they fit in columns A to Z
pub const MAX_SEAT_COLUMNS: u32 = 26;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Bus,
    Ship,
}

/// Fixed grid template for one vehicle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeatMap {
    pub id: Uuid,
    pub name: String,
    pub rows: u32,
    pub columns: u32,
    pub vehicle_class: VehicleClass,
}

impl SeatMap {
    pub fn new(name: impl Into<String>, rows: u32, columns: u32, vehicle_class: VehicleClass) -> Result<Self, GridError> {
        if rows == 0 || columns == 0 {
            return Err(GridError::InvalidDimensions { rows, columns });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rows,
            columns,
            vehicle_class,
        })
    }

    pub fn contains(&self, row: u32, column: u32) -> bool {
        row < self.rows && column < self.columns
    }
}

/// Every kind of cell a seat map can hold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SeatType {
    Seat,
    SeatRearFacing,
    SeatAisle,
    SeatWindow,
    Driver,
    Guide,
    Toilet,
    Kitchen,
    Table,
    BoardingDoor,
    StructuralPost,
    StairsUp,
    StairsDown,
    Empty,
}

impl SeatType {
    pub const ALL: [SeatType; 14] = [
        SeatType::Seat,
        SeatType::SeatRearFacing,
        SeatType::SeatAisle,
        SeatType::SeatWindow,
        SeatType::Driver,
        SeatType::Guide,
        SeatType::Toilet,
        SeatType::Kitchen,
        SeatType::Table,
        SeatType::BoardingDoor,
        SeatType::StructuralPost,
        SeatType::StairsUp,
        SeatType::StairsDown,
        SeatType::Empty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeatType::Seat => "seat",
            SeatType::SeatRearFacing => "seat_rear_facing",
            SeatType::SeatAisle => "seat_aisle",
            SeatType::SeatWindow => "seat_window",
            SeatType::Driver => "driver",
            SeatType::Guide => "guide",
            SeatType::Toilet => "toilet",
            SeatType::Kitchen => "kitchen",
            SeatType::Table => "table",
            SeatType::BoardingDoor => "boarding_door",
            SeatType::StructuralPost => "structural_post",
            SeatType::StairsUp => "stairs_up",
            SeatType::StairsDown => "stairs_down",
            SeatType::Empty => "empty",
        }
    }

    /// Only passenger-seat variants can ever be assigned or booked
    pub fn is_passenger_seat(&self) -> bool {
        match self {
            SeatType::Seat
            | SeatType::SeatRearFacing
            | SeatType::SeatAisle
            | SeatType::SeatWindow => true,
            SeatType::Driver
            | SeatType::Guide
            | SeatType::Toilet
            | SeatType::Kitchen
            | SeatType::Table
            | SeatType::BoardingDoor
            | SeatType::StructuralPost
            | SeatType::StairsUp
            | SeatType::StairsDown
            | SeatType::Empty => false,
        }
    }
}

impl fmt::Display for SeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SeatType::ALL
            .into_iter()
            .find(|seat_type| seat_type.as_str() == wanted)
            .ok_or_else(|| GridError::InvalidSeatType(s.to_string()))
    }
}

/// Stored seat status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    #[default]
    Available,
    Booked,
    Blocked,
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Booked => "booked",
            SeatStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatStatus {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(SeatStatus::Available),
            "booked" => Ok(SeatStatus::Booked),
            "blocked" => Ok(SeatStatus::Blocked),
            _ => Err(GridError::InvalidStatus(format!("unknown seat status '{}'", s))),
        }
    }
}

/// One addressable cell of a seat map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seat {
    pub id: Uuid,
    pub seat_map_id: Uuid,
    pub row: u32,
    pub column: u32,
    pub seat_type: SeatType,
    pub seat_label: Option<String>,
    pub status: SeatStatus,
    pub block_reason: Option<String>,
    /// Zone tag, e.g. deck or cabin section
    pub block: Option<String>,
    pub row_number: Option<u32>,
    pub seat_letter: Option<char>,
}

impl Seat {
    pub fn new(seat_map_id: Uuid, row: u32, column: u32, seat_type: SeatType) -> Self {
        let mut seat = Self {
            id: Uuid::new_v4(),
            seat_map_id,
            row,
            column,
            seat_type,
            seat_label: None,
            status: SeatStatus::Available,
            block_reason: None,
            block: None,
            row_number: None,
            seat_letter: None,
        };
        seat.apply_numbering();
        seat
    }

    /// Logical (row number, letter) for a grid cell.
    /// Two grid rows make up one logical row.
    pub fn logical_position(row: u32, column: u32) -> Option<(u32, char)> {
        if column >= MAX_SEAT_COLUMNS {
            return None;
        }
        let letter = char::from_u32('A' as u32 + column)?;
        Some((row / 2 + 1, letter))
    }

    /// Passenger seats get a label like "3B"; everything else carries none
    pub(crate) fn apply_numbering(&mut self) {
        match Self::logical_position(self.row, self.column) {
            Some((row_number, letter)) if self.seat_type.is_passenger_seat() => {
                self.row_number = Some(row_number);
                self.seat_letter = Some(letter);
                self.seat_label = Some(format!("{}{}", row_number, letter));
            }
            _ => {
                self.row_number = None;
                self.seat_letter = None;
                self.seat_label = None;
            }
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.status == SeatStatus::Blocked
    }

    pub fn is_guide_hold(&self) -> bool {
        self.is_blocked()
            && self.block_reason
                .as_deref()
                .is_some_and(|reason| reason.starts_with(GUIDE_HOLD_PREFIX))
    }

    pub fn is_window(&self) -> bool {
        matches!(self.seat_letter, Some('A') | Some('D'))
    }

    pub fn is_aisle(&self) -> bool {
        matches!(self.seat_letter, Some('B') | Some('C'))
    }

    /// Same logical row and a coupled letter pair (A-B or C-D)
    pub fn is_adjacent_to(&self, other: &Seat) -> bool {
        if self.id == other.id {
            return false;
        }
        match (self.row_number, self.seat_letter, other.row_number, other.seat_letter) {
            (Some(row_a), Some(letter_a), Some(row_b), Some(letter_b)) => {
                row_a == row_b && letters_coupled(letter_a, letter_b)
            }
            _ => false,
        }
    }

    /// Sort key for row-then-letter ordering; unnumbered seats go last
    pub fn logical_key(&self) -> (u32, char) {
        (
            self.row_number.unwrap_or(u32::MAX),
            self.seat_letter.unwrap_or(char::MAX),
        )
    }

    /// Label for messages, falling back to grid coordinates
    pub fn display_label(&self) -> String {
        self.seat_label
            .clone()
            .unwrap_or_else(|| format!("r{}c{}", self.row, self.column))
    }
}

fn letters_coupled(a: char, b: char) -> bool {
    matches!((a, b), ('A', 'B') | ('B', 'A') | ('C', 'D') | ('D', 'C'))
}
