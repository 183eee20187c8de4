use async_trait::async_trait;
use std::collections::HashMap;
use std::error::Error;
use tokio::sync::RwLock;
use uuid::Uuid;
use seatwise_catalog::{Seat, SeatMap};
use seatwise_core::{PassengerSource, SeatRepository};
use seatwise_shared::{SeatAssignment, UnassignedPassenger};

/// Process-local seat storage.
///
/// Assignments are keyed by (transport, seat), so at most one per seat and
/// transport can exist. The passenger roster returns only passengers whose
/// name holds no assignment on that transport.
#[derive(Default)]
pub struct InMemorySeatStore {
    seat_maps: RwLock<HashMap<Uuid, SeatMap>>,
    seats: RwLock<HashMap<Uuid, Seat>>,
    assignments: RwLock<HashMap<(Uuid, Uuid), SeatAssignment>>,
    roster: RwLock<HashMap<Uuid, Vec<UnassignedPassenger>>>,
}

impl InMemorySeatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_seat_map(&self, seat_map: SeatMap) {
        self.seat_maps.write().await.insert(seat_map.id, seat_map);
    }

    pub async fn insert_seats(&self, seats: impl IntoIterator<Item = Seat>) {
        let mut stored = self.seats.write().await;
        for seat in seats {
            stored.insert(seat.id, seat);
        }
    }

    /// Add a passenger to a transport's roster
    pub async fn add_passenger(&self, transport_id: Uuid, passenger: UnassignedPassenger) {
        self.roster
            .write()
            .await
            .entry(transport_id)
            .or_default()
            .push(passenger);
    }

    pub async fn assignment_count(&self, transport_id: Uuid) -> usize {
        self.assignments
            .read()
            .await
            .keys()
            .filter(|(transport, _)| *transport == transport_id)
            .count()
    }

    pub async fn seat_maps(&self) -> Vec<SeatMap> {
        self.seat_maps.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl SeatRepository for InMemorySeatStore {
    async fn load_seat_map(
        &self,
        seat_map_id: Uuid,
    ) -> Result<Option<SeatMap>, Box<dyn Error + Send + Sync>> {
        Ok(self.seat_maps.read().await.get(&seat_map_id).cloned())
    }

    async fn load_seats(
        &self,
        seat_map_id: Uuid,
    ) -> Result<Vec<Seat>, Box<dyn Error + Send + Sync>> {
        let mut seats: Vec<Seat> = self.seats
            .read()
            .await
            .values()
            .filter(|seat| seat.seat_map_id == seat_map_id)
            .cloned()
            .collect();
        seats.sort_by_key(|seat| (seat.row, seat.column));
        Ok(seats)
    }

    async fn load_seat(
        &self,
        seat_id: Uuid,
    ) -> Result<Option<Seat>, Box<dyn Error + Send + Sync>> {
        Ok(self.seats.read().await.get(&seat_id).cloned())
    }

    async fn load_assignments(
        &self,
        transport_id: Uuid,
    ) -> Result<Vec<SeatAssignment>, Box<dyn Error + Send + Sync>> {
        let mut assignments: Vec<SeatAssignment> = self.assignments
            .read()
            .await
            .values()
            .filter(|assignment| assignment.transport_id == transport_id)
            .cloned()
            .collect();
        assignments.sort_by_key(|assignment| assignment.created_at);
        Ok(assignments)
    }

    async fn load_seat_assignments(
        &self,
        seat_id: Uuid,
    ) -> Result<Vec<SeatAssignment>, Box<dyn Error + Send + Sync>> {
        let mut assignments: Vec<SeatAssignment> = self.assignments
            .read()
            .await
            .values()
            .filter(|assignment| assignment.seat_id == seat_id)
            .cloned()
            .collect();
        assignments.sort_by_key(|assignment| assignment.created_at);
        Ok(assignments)
    }

    async fn save_seat(
        &self,
        seat: &Seat,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.seats.write().await.insert(seat.id, seat.clone());
        Ok(())
    }

    async fn delete_seat(
        &self,
        seat_id: Uuid,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.seats
            .write()
            .await
            .remove(&seat_id)
            .map(|_| ())
            .ok_or_else(|| format!("seat {} does not exist", seat_id).into())
    }

    async fn save_assignment(
        &self,
        assignment: &SeatAssignment,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.assignments
            .write()
            .await
            .insert((assignment.transport_id, assignment.seat_id), assignment.clone());
        Ok(())
    }

    async fn delete_assignment(
        &self,
        seat_id: Uuid,
        transport_id: Uuid,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.assignments
            .write()
            .await
            .remove(&(transport_id, seat_id))
            .map(|_| ())
            .ok_or_else(|| format!("no assignment for seat {} on transport {}", seat_id, transport_id).into())
    }
}

#[async_trait]
impl PassengerSource for InMemorySeatStore {
    async fn unassigned_passengers(
        &self,
        transport_id: Uuid,
    ) -> Result<Vec<UnassignedPassenger>, Box<dyn Error + Send + Sync>> {
        let assignments = self.assignments.read().await;
        let seated: Vec<&str> = assignments
            .values()
            .filter(|assignment| assignment.transport_id == transport_id)
            .map(|assignment| assignment.passenger.name.as_str())
            .collect();

        let roster = self.roster.read().await;
        Ok(roster
            .get(&transport_id)
            .map(|passengers| {
                passengers
                    .iter()
                    .filter(|passenger| !seated.contains(&passenger.name()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatwise_catalog::{SeatType, VehicleClass};
    use seatwise_shared::PassengerDetails;

    #[tokio::test]
    async fn test_seat_roundtrip_per_map() {
        let store = InMemorySeatStore::new();
        let map = SeatMap::new("Coach", 4, 4, VehicleClass::Bus).unwrap();
        let other = SeatMap::new("Ferry", 4, 4, VehicleClass::Ship).unwrap();
        let seat = Seat::new(map.id, 2, 1, SeatType::Seat);
        store.insert_seat_map(map.clone()).await;
        store.insert_seats([seat.clone(), Seat::new(other.id, 0, 0, SeatType::Seat)]).await;

        assert_eq!(store.load_seats(map.id).await.unwrap(), vec![seat.clone()]);
        assert_eq!(store.load_seat(seat.id).await.unwrap(), Some(seat.clone()));
        assert_eq!(store.load_seat_map(map.id).await.unwrap(), Some(map));

        store.delete_seat(seat.id).await.unwrap();
        assert!(store.load_seat(seat.id).await.unwrap().is_none());
        assert!(store.delete_seat(seat.id).await.is_err());
    }

    #[tokio::test]
    async fn test_assignments_are_scoped_by_transport() {
        let store = InMemorySeatStore::new();
        let seat_id = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        store.save_assignment(&SeatAssignment::new(seat_id, first, PassengerDetails::new("Anna"))).await.unwrap();
        store.save_assignment(&SeatAssignment::new(seat_id, second, PassengerDetails::new("Ben"))).await.unwrap();

        assert_eq!(store.assignment_count(first).await, 1);
        assert_eq!(store.load_assignments(second).await.unwrap()[0].passenger.name, "Ben");
        assert_eq!(store.load_seat_assignments(seat_id).await.unwrap().len(), 2);
        assert!(store.load_seat_assignments(Uuid::new_v4()).await.unwrap().is_empty());

        store.delete_assignment(seat_id, first).await.unwrap();
        assert_eq!(store.assignment_count(first).await, 0);
        assert!(store.delete_assignment(seat_id, first).await.is_err());
    }

    #[tokio::test]
    async fn test_roster_hides_seated_passengers() {
        let store = InMemorySeatStore::new();
        let transport = Uuid::new_v4();
        store.add_passenger(transport, UnassignedPassenger::new("p1", PassengerDetails::new("Anna"))).await;
        store.add_passenger(transport, UnassignedPassenger::new("p2", PassengerDetails::new("Ben"))).await;

        store.save_assignment(&SeatAssignment::new(Uuid::new_v4(), transport, PassengerDetails::new("Anna"))).await.unwrap();

        let waiting = store.unassigned_passengers(transport).await.unwrap();
        assert_eq!(waiting.len(), 1);
        assert_eq!(waiting[0].name(), "Ben");
        assert!(store.unassigned_passengers(Uuid::new_v4()).await.unwrap().is_empty());
    }
}
