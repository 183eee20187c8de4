use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use crate::pii::Masked;

/// What kind of seating wish a passenger expressed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceCategory {
    Position,
    Companion,
    Accessibility,
    Other,
}

/// Passenger data carried by both assignments and the waiting list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PassengerDetails {
    pub name: String,
    #[serde(default)]
    pub booking_reference: Option<String>,
    #[serde(default)]
    pub contact_email: Option<Masked<String>>,
    #[serde(default)]
    pub contact_phone: Option<Masked<String>>,
    #[serde(default)]
    pub preference: Option<String>,
    #[serde(default)]
    pub preference_type: Option<PreferenceCategory>,
}

impl PassengerDetails {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_booking_reference(mut self, reference: impl Into<String>) -> Self {
        self.booking_reference = Some(reference.into());
        self
    }

    pub fn with_preference(mut self, category: PreferenceCategory, text: impl Into<String>) -> Self {
        self.preference_type = Some(category);
        self.preference = Some(text.into());
        self
    }

    /// Preference text, if any non-blank text was given
    pub fn preference_text(&self) -> Option<&str> {
        self.preference
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Binding of one passenger to one seat for one transport
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeatAssignment {
    pub id: Uuid,
    pub seat_id: Uuid,
    pub transport_id: Uuid,
    #[serde(flatten)]
    pub passenger: PassengerDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SeatAssignment {
    pub fn new(seat_id: Uuid, transport_id: Uuid, passenger: PassengerDetails) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            seat_id,
            transport_id,
            passenger,
            created_at: now,
            updated_at: now,
        }
    }

    /// Same passenger, booking and preference, bound to another seat
    pub fn relocated(&self, seat_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            seat_id,
            transport_id: self.transport_id,
            passenger: self.passenger.clone(),
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}

/// Passenger waiting for a seat; `id` is the identity used by the passenger source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnassignedPassenger {
    pub id: String,
    #[serde(flatten)]
    pub passenger: PassengerDetails,
}

impl UnassignedPassenger {
    pub fn new(id: impl Into<String>, passenger: PassengerDetails) -> Self {
        Self { id: id.into(), passenger }
    }

    pub fn name(&self) -> &str {
        &self.passenger.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocated_keeps_passenger_data() {
        let passenger = PassengerDetails::new("Anna Schmidt")
            .with_booking_reference("BK-1001")
            .with_preference(PreferenceCategory::Position, "vorne");
        let original = SeatAssignment::new(Uuid::new_v4(), Uuid::new_v4(), passenger);

        let target = Uuid::new_v4();
        let moved = original.relocated(target);

        assert_eq!(moved.seat_id, target);
        assert_eq!(moved.transport_id, original.transport_id);
        assert_eq!(moved.passenger, original.passenger);
        assert_eq!(moved.created_at, original.created_at);
        assert_ne!(moved.id, original.id);
    }

    #[test]
    fn test_blank_preference_is_ignored() {
        let mut passenger = PassengerDetails::new("Jonas Weber");
        passenger.preference = Some("   ".to_string());
        assert_eq!(passenger.preference_text(), None);
    }

    #[test]
    fn test_assignment_json_is_flat() {
        let mut passenger = PassengerDetails::new("Lea Braun");
        passenger.contact_email = Some(Masked::from("lea@example.com"));
        let assignment = SeatAssignment::new(Uuid::new_v4(), Uuid::new_v4(), passenger);

        let value = serde_json::to_value(&assignment).unwrap();
        assert_eq!(value["name"], "Lea Braun");
        assert_eq!(value["contact_email"], "lea@example.com");
        assert!(!format!("{:?}", assignment).contains("lea@example.com"));
    }
}
