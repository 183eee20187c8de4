use async_trait::async_trait;
use std::error::Error;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;
use seatwise_catalog::{derive_status, DerivedStatus, Seat, SeatMap, VehicleClass};
use seatwise_core::SeatRepository;
use seatwise_shared::SeatAssignment;
use seatwise_store::{seed_coach, InMemorySeatStore};
use crate::manager::AssignmentService;

/// Seeded 6x4 coach: driver and guide in front, seats 1B, 1C, 2A-2D, 3A-3D
pub struct Fixture {
    pub store: Arc<InMemorySeatStore>,
    pub service: AssignmentService,
    pub map: SeatMap,
    pub seats: Vec<Seat>,
    pub transport: Uuid,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = Arc::new(InMemorySeatStore::new());
        let (map, seats) = seed_coach(&store, "Coach", 6, 4, VehicleClass::Bus)
            .await
            .expect("seed coach");
        let service = AssignmentService::new(store.clone());

        Self {
            store,
            service,
            map,
            seats,
            transport: Uuid::new_v4(),
        }
    }

    pub fn seat(&self, label: &str) -> Uuid {
        self.seats
            .iter()
            .find(|seat| seat.seat_label.as_deref() == Some(label))
            .map(|seat| seat.id)
            .unwrap_or_else(|| panic!("no seat {}", label))
    }

    pub fn cell(&self, row: u32, column: u32) -> Uuid {
        self.seats
            .iter()
            .find(|seat| seat.row == row && seat.column == column)
            .map(|seat| seat.id)
            .unwrap_or_else(|| panic!("no cell at {},{}", row, column))
    }

    pub async fn status(&self, label: &str) -> DerivedStatus {
        let seat = self.store.load_seat(self.seat(label)).await.unwrap();
        let assignments = self.store.load_assignments(self.transport).await.unwrap();
        derive_status(seat.as_ref(), &assignments)
    }
}

/// Store wrapper whose writes can be made to fail on demand
pub struct FlakyRepository {
    inner: Arc<InMemorySeatStore>,
    failing_saves: AtomicUsize,
    /// Assignment deletes still allowed; `usize::MAX` means unlimited
    deletes_left: AtomicUsize,
    writes_down: AtomicBool,
}

impl FlakyRepository {
    pub fn new(inner: Arc<InMemorySeatStore>) -> Self {
        Self {
            inner,
            failing_saves: AtomicUsize::new(0),
            deletes_left: AtomicUsize::new(usize::MAX),
            writes_down: AtomicBool::new(false),
        }
    }

    /// The next `count` assignment saves fail
    pub fn fail_next_saves(&self, count: usize) {
        self.failing_saves.store(count, Ordering::SeqCst);
    }

    /// Let `count` assignment deletes through, then fail the rest until `heal`
    pub fn fail_deletes_after(&self, count: usize) {
        self.deletes_left.store(count, Ordering::SeqCst);
    }

    /// Every write fails until `heal`
    pub fn fail_writes(&self) {
        self.writes_down.store(true, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.failing_saves.store(0, Ordering::SeqCst);
        self.deletes_left.store(usize::MAX, Ordering::SeqCst);
        self.writes_down.store(false, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.writes_down.load(Ordering::SeqCst) {
            return Err("storage unavailable".into());
        }
        Ok(())
    }
}

#[async_trait]
impl SeatRepository for FlakyRepository {
    async fn load_seat_map(&self, seat_map_id: Uuid) -> Result<Option<SeatMap>, Box<dyn Error + Send + Sync>> {
        self.inner.load_seat_map(seat_map_id).await
    }

    async fn load_seats(&self, seat_map_id: Uuid) -> Result<Vec<Seat>, Box<dyn Error + Send + Sync>> {
        self.inner.load_seats(seat_map_id).await
    }

    async fn load_seat(&self, seat_id: Uuid) -> Result<Option<Seat>, Box<dyn Error + Send + Sync>> {
        self.inner.load_seat(seat_id).await
    }

    async fn load_assignments(&self, transport_id: Uuid) -> Result<Vec<SeatAssignment>, Box<dyn Error + Send + Sync>> {
        self.inner.load_assignments(transport_id).await
    }

    async fn load_seat_assignments(&self, seat_id: Uuid) -> Result<Vec<SeatAssignment>, Box<dyn Error + Send + Sync>> {
        self.inner.load_seat_assignments(seat_id).await
    }

    async fn save_seat(&self, seat: &Seat) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.check_write()?;
        self.inner.save_seat(seat).await
    }

    async fn delete_seat(&self, seat_id: Uuid) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.check_write()?;
        self.inner.delete_seat(seat_id).await
    }

    async fn save_assignment(&self, assignment: &SeatAssignment) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.check_write()?;
        let pending = self.failing_saves.load(Ordering::SeqCst);
        if pending > 0 {
            self.failing_saves.store(pending - 1, Ordering::SeqCst);
            return Err("assignment write rejected".into());
        }
        self.inner.save_assignment(assignment).await
    }

    async fn delete_assignment(&self, seat_id: Uuid, transport_id: Uuid) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.check_write()?;
        match self.deletes_left.load(Ordering::SeqCst) {
            0 => return Err("assignment delete rejected".into()),
            usize::MAX => {}
            left => self.deletes_left.store(left - 1, Ordering::SeqCst),
        }
        self.inner.delete_assignment(seat_id, transport_id).await
    }
}
