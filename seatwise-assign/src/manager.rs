use std::sync::Arc;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;
use seatwise_catalog::{derive_status, DerivedStatus, Seat, SeatStatus};
use seatwise_core::{EngineError, EngineResult, SeatRepository};
use seatwise_planner::BulkAssignmentSuggestion;
use seatwise_shared::{PassengerDetails, SeatAssignment};
use crate::history::OperationLog;
use crate::models::{Operation, SeatRef};

/// Stored when a seat is blocked without a reason
pub const DEFAULT_BLOCK_REASON: &str = "blocked";

/// Seat with its live status for one transport
#[derive(Debug, Clone, Serialize)]
pub struct SeatView {
    pub seat: Seat,
    pub status: DerivedStatus,
    pub passenger_name: Option<String>,
}

/// Applies seat mutations through the persistence collaborator.
///
/// Every public operation either fully succeeds and appends one entry to
/// the caller's log, or fails with no state change and no log entry.
#[derive(Clone)]
pub struct AssignmentService {
    repo: Arc<dyn SeatRepository>,
    default_block_reason: String,
}

impl AssignmentService {
    pub fn new(repo: Arc<dyn SeatRepository>) -> Self {
        Self {
            repo,
            default_block_reason: DEFAULT_BLOCK_REASON.to_string(),
        }
    }

    pub fn with_default_block_reason(mut self, reason: impl Into<String>) -> Self {
        self.default_block_reason = reason.into();
        self
    }

    pub fn repository(&self) -> &Arc<dyn SeatRepository> {
        &self.repo
    }

    /// Seat a passenger on a free passenger seat
    pub async fn assign(
        &self,
        log: &mut OperationLog,
        seat_id: Uuid,
        transport_id: Uuid,
        passenger: PassengerDetails,
    ) -> EngineResult<SeatAssignment> {
        let seat = self.load_seat(seat_id).await?;
        let assignment = SeatAssignment::new(seat.id, transport_id, passenger);
        self.place(&seat, &assignment).await?;

        info!("Assigned {} to seat {} on transport {}", assignment.passenger.name, seat.display_label(), transport_id);
        log.record(Operation::assign(transport_id, &seat, &assignment));
        Ok(assignment)
    }

    /// Remove the seat's assignment; returns what was removed
    pub async fn free(
        &self,
        log: &mut OperationLog,
        seat_id: Uuid,
        transport_id: Uuid,
    ) -> EngineResult<SeatAssignment> {
        let (seat, removed) = self.release(seat_id, transport_id).await?;

        info!("Freed seat {} ({}) on transport {}", seat.display_label(), removed.passenger.name, transport_id);
        log.record(Operation::free(transport_id, &seat, removed.clone()));
        Ok(removed)
    }

    pub async fn move_passenger(
        &self,
        log: &mut OperationLog,
        from_seat_id: Uuid,
        to_seat_id: Uuid,
        transport_id: Uuid,
    ) -> EngineResult<SeatAssignment> {
        let (from, to, moved) = self.relocate(from_seat_id, to_seat_id, transport_id).await?;

        info!(
            "Moved {} from seat {} to {} on transport {}",
            moved.passenger.name,
            from.display_label(),
            to.display_label(),
            transport_id
        );
        log.record(Operation::moved(transport_id, &from, &to, &moved));
        Ok(moved)
    }

    /// Block a seat. The block is stored on the seat record and so holds on
    /// every transport; the seat must not be assigned on any of them.
    pub async fn block(
        &self,
        log: &mut OperationLog,
        seat_id: Uuid,
        transport_id: Uuid,
        reason: Option<String>,
    ) -> EngineResult<Seat> {
        let seat = self.set_blocked(seat_id, transport_id, reason).await?;

        info!("Blocked seat {} ({})", seat.display_label(), seat.block_reason.as_deref().unwrap_or_default());
        log.record(Operation::block(transport_id, &seat));
        Ok(seat)
    }

    pub async fn unblock(
        &self,
        log: &mut OperationLog,
        seat_id: Uuid,
        transport_id: Uuid,
    ) -> EngineResult<Seat> {
        let (seat, cleared_reason) = self.clear_block(seat_id).await?;

        info!("Unblocked seat {}", seat.display_label());
        log.record(Operation::unblock(transport_id, &seat, cleared_reason));
        Ok(seat)
    }

    /// Assign every accepted suggestion as one operation.
    /// On the first failure the assignments already made are rolled back.
    pub async fn apply_suggestions(
        &self,
        log: &mut OperationLog,
        transport_id: Uuid,
        suggestions: &[BulkAssignmentSuggestion],
    ) -> EngineResult<Vec<SeatAssignment>> {
        if suggestions.is_empty() {
            return Ok(Vec::new());
        }

        let mut placed: Vec<(Seat, SeatAssignment)> = Vec::with_capacity(suggestions.len());
        for suggestion in suggestions {
            match self.place_suggestion(transport_id, suggestion).await {
                Ok(pair) => placed.push(pair),
                Err(err) => {
                    warn!("Bulk assignment stopped at {}: {}", suggestion.passenger_name(), err);
                    self.rollback(&placed, transport_id).await;
                    return Err(err);
                }
            }
        }

        info!("Bulk assigned {} passengers on transport {}", placed.len(), transport_id);
        let seats = placed
            .iter()
            .map(|(seat, assignment)| SeatRef::new(seat, Some(&assignment.passenger.name)))
            .collect();
        log.record(Operation::bulk_assign(transport_id, seats));

        Ok(placed.into_iter().map(|(_, assignment)| assignment).collect())
    }

    /// Every seat of a map with its derived status, in map order
    pub async fn seat_overview(&self, seat_map_id: Uuid, transport_id: Uuid) -> EngineResult<Vec<SeatView>> {
        let seats = self.repo.load_seats(seat_map_id).await.map_err(EngineError::persistence)?;
        let assignments = self.load_assignments(transport_id).await?;

        let mut views: Vec<SeatView> = seats
            .into_iter()
            .map(|seat| {
                let status = derive_status(Some(&seat), &assignments);
                let passenger_name = assignments
                    .iter()
                    .find(|assignment| assignment.seat_id == seat.id)
                    .map(|assignment| assignment.passenger.name.clone());
                SeatView { seat, status, passenger_name }
            })
            .collect();
        views.sort_by_key(|view| (view.seat.row, view.seat.column));

        Ok(views)
    }

    /// Seats whose derived status is free, for the planner
    pub async fn free_seats(&self, seat_map_id: Uuid, transport_id: Uuid) -> EngineResult<Vec<Seat>> {
        Ok(self
            .seat_overview(seat_map_id, transport_id)
            .await?
            .into_iter()
            .filter(|view| view.status.is_free())
            .map(|view| view.seat)
            .collect())
    }

    pub(crate) async fn load_seat(&self, seat_id: Uuid) -> EngineResult<Seat> {
        self.repo
            .load_seat(seat_id)
            .await
            .map_err(EngineError::persistence)?
            .ok_or_else(|| EngineError::SeatNotFound(seat_id.to_string()))
    }

    pub(crate) async fn load_assignments(&self, transport_id: Uuid) -> EngineResult<Vec<SeatAssignment>> {
        self.repo
            .load_assignments(transport_id)
            .await
            .map_err(EngineError::persistence)
    }

    pub(crate) async fn load_seat_assignments(&self, seat_id: Uuid) -> EngineResult<Vec<SeatAssignment>> {
        self.repo
            .load_seat_assignments(seat_id)
            .await
            .map_err(EngineError::persistence)
    }

    /// Store `assignment` if its seat is free and the passenger holds no other seat
    pub(crate) async fn place(&self, seat: &Seat, assignment: &SeatAssignment) -> EngineResult<()> {
        let assignments = self.load_assignments(assignment.transport_id).await?;

        let status = derive_status(Some(seat), &assignments);
        if !status.is_free() {
            warn!("Refused to seat {} on {}: seat is {}", assignment.passenger.name, seat.display_label(), status);
            return Err(EngineError::SeatNotAvailable(format!(
                "seat {} is {}",
                seat.display_label(),
                status
            )));
        }

        if let Some(existing) = assignments
            .iter()
            .find(|other| other.passenger.name == assignment.passenger.name)
        {
            return Err(EngineError::DuplicateAssignment(format!(
                "{} already holds seat {}",
                assignment.passenger.name, existing.seat_id
            )));
        }

        self.repo
            .save_assignment(assignment)
            .await
            .map_err(EngineError::persistence)
    }

    pub(crate) async fn release(&self, seat_id: Uuid, transport_id: Uuid) -> EngineResult<(Seat, SeatAssignment)> {
        let seat = self.load_seat(seat_id).await?;
        let existing = self
            .load_assignments(transport_id)
            .await?
            .into_iter()
            .find(|assignment| assignment.seat_id == seat_id)
            .ok_or_else(|| {
                EngineError::AssignmentNotFound(format!(
                    "seat {} on transport {}",
                    seat.display_label(),
                    transport_id
                ))
            })?;

        self.repo
            .delete_assignment(seat_id, transport_id)
            .await
            .map_err(EngineError::persistence)?;

        Ok((seat, existing))
    }

    pub(crate) async fn relocate(
        &self,
        from_seat_id: Uuid,
        to_seat_id: Uuid,
        transport_id: Uuid,
    ) -> EngineResult<(Seat, Seat, SeatAssignment)> {
        let from = self.load_seat(from_seat_id).await?;
        let to = self.load_seat(to_seat_id).await?;
        let assignments = self.load_assignments(transport_id).await?;

        let current = assignments
            .iter()
            .find(|assignment| assignment.seat_id == from.id)
            .cloned()
            .ok_or_else(|| {
                EngineError::AssignmentNotFound(format!(
                    "seat {} on transport {}",
                    from.display_label(),
                    transport_id
                ))
            })?;

        let target_status = derive_status(Some(&to), &assignments);
        if !target_status.is_free() {
            return Err(EngineError::SeatNotAvailable(format!(
                "seat {} is {}",
                to.display_label(),
                target_status
            )));
        }

        let moved = current.relocated(to.id);
        self.repo
            .delete_assignment(from.id, transport_id)
            .await
            .map_err(EngineError::persistence)?;

        if let Err(err) = self.repo.save_assignment(&moved).await {
            if let Err(restore_err) = self.repo.save_assignment(&current).await {
                error!(
                    "Could not restore {} on seat {} after failed move: {}",
                    current.passenger.name,
                    from.display_label(),
                    restore_err
                );
            }
            return Err(EngineError::persistence(err));
        }

        Ok((from, to, moved))
    }

    pub(crate) async fn set_blocked(
        &self,
        seat_id: Uuid,
        transport_id: Uuid,
        reason: Option<String>,
    ) -> EngineResult<Seat> {
        let mut seat = self.load_seat(seat_id).await?;
        let assignments = self.load_assignments(transport_id).await?;

        match derive_status(Some(&seat), &assignments) {
            DerivedStatus::Free => {}
            DerivedStatus::Occupied => {
                return Err(EngineError::SeatNotAvailable(format!(
                    "seat {} is occupied, free it first",
                    seat.display_label()
                )));
            }
            status => {
                return Err(EngineError::SeatNotAvailable(format!(
                    "seat {} is {}",
                    seat.display_label(),
                    status
                )));
            }
        }

        let held = self.load_seat_assignments(seat_id).await?;
        if let Some(other) = held.first() {
            warn!("Refused to block {}: held on transport {}", seat.display_label(), other.transport_id);
            return Err(EngineError::SeatNotAvailable(format!(
                "seat {} is occupied on transport {}, free it first",
                seat.display_label(),
                other.transport_id
            )));
        }

        let reason = reason
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty())
            .unwrap_or_else(|| self.default_block_reason.clone());

        seat.status = SeatStatus::Blocked;
        seat.block_reason = Some(reason);
        self.repo.save_seat(&seat).await.map_err(EngineError::persistence)?;

        Ok(seat)
    }

    /// Returns the seat and the reason that was cleared
    pub(crate) async fn clear_block(&self, seat_id: Uuid) -> EngineResult<(Seat, Option<String>)> {
        let mut seat = self.load_seat(seat_id).await?;
        if !seat.is_blocked() {
            return Err(EngineError::SeatNotAvailable(format!(
                "seat {} is not blocked",
                seat.display_label()
            )));
        }

        let cleared_reason = seat.block_reason.take();
        seat.status = SeatStatus::Available;
        self.repo.save_seat(&seat).await.map_err(EngineError::persistence)?;

        Ok((seat, cleared_reason))
    }

    async fn place_suggestion(
        &self,
        transport_id: Uuid,
        suggestion: &BulkAssignmentSuggestion,
    ) -> EngineResult<(Seat, SeatAssignment)> {
        let seat = self.load_seat(suggestion.seat_id).await?;
        let assignment = SeatAssignment::new(seat.id, transport_id, suggestion.passenger.passenger.clone());
        self.place(&seat, &assignment).await?;
        Ok((seat, assignment))
    }

    async fn rollback(&self, placed: &[(Seat, SeatAssignment)], transport_id: Uuid) {
        for (seat, assignment) in placed.iter().rev() {
            if let Err(err) = self.repo.delete_assignment(seat.id, transport_id).await {
                error!(
                    "Rollback of {} on seat {} failed: {}",
                    assignment.passenger.name,
                    seat.display_label(),
                    err
                );
            }
        }
    }
}
