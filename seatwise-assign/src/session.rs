use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use seatwise_catalog::Seat;
use seatwise_core::{EngineError, EngineResult, PassengerSource};
use seatwise_planner::{BulkAssignmentSuggestion, BulkPlanner};
use seatwise_shared::{PassengerDetails, SeatAssignment, SeatOperationEvent};
use crate::history::OperationLog;
use crate::manager::{AssignmentService, SeatView};
use crate::models::Operation;

/// One user's editing context for a single transport.
///
/// Owns the operation log, so undo only ever reverses this session's work.
pub struct EditorSession {
    transport_id: Uuid,
    service: AssignmentService,
    passengers: Arc<dyn PassengerSource>,
    planner: BulkPlanner,
    log: OperationLog,
}

impl EditorSession {
    pub fn new(transport_id: Uuid, service: AssignmentService, passengers: Arc<dyn PassengerSource>) -> Self {
        Self {
            transport_id,
            service,
            passengers,
            planner: BulkPlanner::new(),
            log: OperationLog::new(),
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.log = OperationLog::with_limit(limit);
        self
    }

    pub fn transport_id(&self) -> Uuid {
        self.transport_id
    }

    pub async fn assign(&mut self, seat_id: Uuid, passenger: PassengerDetails) -> EngineResult<SeatAssignment> {
        self.service.assign(&mut self.log, seat_id, self.transport_id, passenger).await
    }

    pub async fn free(&mut self, seat_id: Uuid) -> EngineResult<SeatAssignment> {
        self.service.free(&mut self.log, seat_id, self.transport_id).await
    }

    pub async fn move_passenger(&mut self, from_seat_id: Uuid, to_seat_id: Uuid) -> EngineResult<SeatAssignment> {
        self.service
            .move_passenger(&mut self.log, from_seat_id, to_seat_id, self.transport_id)
            .await
    }

    pub async fn block(&mut self, seat_id: Uuid, reason: Option<String>) -> EngineResult<Seat> {
        self.service.block(&mut self.log, seat_id, self.transport_id, reason).await
    }

    pub async fn unblock(&mut self, seat_id: Uuid) -> EngineResult<Seat> {
        self.service.unblock(&mut self.log, seat_id, self.transport_id).await
    }

    /// Suggestions for every waiting passenger over the currently free seats.
    /// Nothing is written.
    pub async fn plan(&self, seat_map_id: Uuid) -> EngineResult<Vec<BulkAssignmentSuggestion>> {
        let waiting = self
            .passengers
            .unassigned_passengers(self.transport_id)
            .await
            .map_err(EngineError::persistence)?;
        let free = self.service.free_seats(seat_map_id, self.transport_id).await?;

        debug!("Planning {} passengers over {} free seats", waiting.len(), free.len());
        Ok(self.planner.plan(&waiting, &free))
    }

    pub async fn apply(&mut self, suggestions: &[BulkAssignmentSuggestion]) -> EngineResult<Vec<SeatAssignment>> {
        self.service
            .apply_suggestions(&mut self.log, self.transport_id, suggestions)
            .await
    }

    pub async fn undo(&mut self) -> EngineResult<Option<Operation>> {
        self.service.undo(&mut self.log).await
    }

    pub async fn overview(&self, seat_map_id: Uuid) -> EngineResult<Vec<SeatView>> {
        self.service.seat_overview(seat_map_id, self.transport_id).await
    }

    pub fn history(&self) -> &OperationLog {
        &self.log
    }

    /// History as audit events, newest first
    pub fn events(&self) -> Vec<SeatOperationEvent> {
        self.log.iter().map(Operation::to_event).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatwise_catalog::DerivedStatus;
    use seatwise_planner::SuggestionSource;
    use seatwise_shared::{PreferenceCategory, UnassignedPassenger};
    use crate::models::OperationKind;
    use crate::testing::Fixture;

    async fn session(fx: &Fixture) -> EditorSession {
        for (id, details) in [
            ("p1", PassengerDetails::new("Anna Schmidt")),
            ("p2", PassengerDetails::new("Ben Ott").with_preference(PreferenceCategory::Companion, "with Anna Schmidt")),
            ("p3", PassengerDetails::new("Clara Berg").with_preference(PreferenceCategory::Position, "hinten")),
        ] {
            fx.store.add_passenger(fx.transport, UnassignedPassenger::new(id, details)).await;
        }
        EditorSession::new(fx.transport, fx.service.clone(), fx.store.clone())
    }

    #[tokio::test]
    async fn test_plan_apply_undo() {
        let fx = Fixture::new().await;
        let mut session = session(&fx).await;

        let suggestions = session.plan(fx.map.id).await.unwrap();
        assert_eq!(suggestions.len(), 3);
        let ben = suggestions.iter().find(|s| s.passenger_name() == "Ben Ott").unwrap();
        assert_eq!(ben.source, SuggestionSource::Companion);
        let clara = suggestions.iter().find(|s| s.passenger_name() == "Clara Berg").unwrap();
        assert_eq!(clara.row_number, Some(3));

        session.apply(&suggestions).await.unwrap();
        assert!(session.plan(fx.map.id).await.unwrap().is_empty());
        assert_eq!(session.history().head().unwrap().kind, OperationKind::BulkAssign);

        session.undo().await.unwrap();
        assert_eq!(fx.store.assignment_count(fx.transport).await, 0);
        assert_eq!(session.plan(fx.map.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_history_is_bounded_and_per_session() {
        let fx = Fixture::new().await;
        let mut first = session(&fx).await.with_history_limit(2);
        let second = EditorSession::new(fx.transport, fx.service.clone(), fx.store.clone());

        first.block(fx.seat("2A"), None).await.unwrap();
        first.block(fx.seat("2B"), None).await.unwrap();
        first.block(fx.seat("2C"), None).await.unwrap();
        assert_eq!(first.history().len(), 2);
        assert!(second.history().is_empty());

        let events = first.events();
        assert_eq!(events[0].seat_labels, vec!["2C".to_string()]);
        assert_eq!(events[0].kind, "block");

        first.undo().await.unwrap();
        first.undo().await.unwrap();
        assert!(first.undo().await.unwrap().is_none());

        let overview = first.overview(fx.map.id).await.unwrap();
        let status = |id| overview.iter().find(|view| view.seat.id == id).unwrap().status;
        assert_eq!(status(fx.seat("2A")), DerivedStatus::Blocked);
        assert_eq!(status(fx.seat("2B")), DerivedStatus::Free);
        assert_eq!(status(fx.seat("2C")), DerivedStatus::Free);
    }

    #[tokio::test]
    async fn test_session_moves() {
        let fx = Fixture::new().await;
        let mut session = session(&fx).await;

        session.assign(fx.seat("1B"), PassengerDetails::new("Anna Schmidt")).await.unwrap();
        session.move_passenger(fx.seat("1B"), fx.seat("1C")).await.unwrap();
        session.free(fx.seat("1C")).await.unwrap();
        assert_eq!(session.history().len(), 3);

        session.undo().await.unwrap();
        assert_eq!(fx.status("1C").await, DerivedStatus::Occupied);
        assert_eq!(session.transport_id(), fx.transport);
    }
}
