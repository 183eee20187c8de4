use tracing::{debug, info, warn};
use seatwise_core::{EngineError, EngineResult};
use crate::history::OperationLog;
use crate::manager::AssignmentService;
use crate::models::{Operation, OperationKind, PriorState};

impl AssignmentService {
    /// Reverse the most recent operation in `log`.
    ///
    /// The compensating mutation is not itself recorded. On success the head
    /// entry is removed and returned; an empty log yields `Ok(None)`. When
    /// compensation fails the entry stays in place so the call can be retried.
    pub async fn undo(&self, log: &mut OperationLog) -> EngineResult<Option<Operation>> {
        let Some(op) = log.head().cloned() else {
            debug!("Nothing to undo");
            return Ok(None);
        };

        if let Err(err) = self.compensate(&op).await {
            warn!("Undo of {} {} failed: {}", op.kind, op.id, err);
            return Err(match err {
                EngineError::PersistenceFailure(_) => err,
                other => EngineError::persistence(format!("cannot undo {}: {}", op.kind, other)),
            });
        }

        log.pop_head();
        info!("Undid {} on {}", op.kind, op.labels().join(", "));
        Ok(Some(op))
    }

    async fn compensate(&self, op: &Operation) -> EngineResult<()> {
        let primary = op
            .primary_seat()
            .ok_or_else(|| EngineError::SeatNotFound(format!("operation {} touched no seat", op.id)))?;

        match op.kind {
            OperationKind::Assign => {
                self.release(primary.seat_id, op.transport_id).await?;
            }
            OperationKind::Free => match &op.prior {
                Some(PriorState::Assignment(removed)) => {
                    let seat = self.load_seat(removed.seat_id).await?;
                    self.place(&seat, removed).await?;
                }
                _ => {
                    return Err(EngineError::AssignmentNotFound(format!(
                        "no snapshot of the assignment freed by {}",
                        op.id
                    )));
                }
            },
            OperationKind::Move => {
                let to = op
                    .seats
                    .get(1)
                    .ok_or_else(|| EngineError::SeatNotFound(format!("move {} has no target seat", op.id)))?;
                self.relocate(to.seat_id, primary.seat_id, op.transport_id).await?;
            }
            OperationKind::Block => {
                self.clear_block(primary.seat_id).await?;
            }
            OperationKind::Unblock => {
                let reason = match &op.prior {
                    Some(PriorState::BlockReason(reason)) => reason.clone(),
                    _ => None,
                };
                self.set_blocked(primary.seat_id, op.transport_id, reason).await?;
            }
            OperationKind::BulkAssign => {
                self.release_bulk(op).await?;
            }
        }

        Ok(())
    }

    /// Free every seat still held by the passenger the bulk operation put there.
    /// Seats freed or reassigned since then are left alone.
    async fn release_bulk(&self, op: &Operation) -> EngineResult<()> {
        let assignments = self.load_assignments(op.transport_id).await?;

        for seat in &op.seats {
            let still_held = assignments.iter().any(|assignment| {
                assignment.seat_id == seat.seat_id
                    && seat.passenger_name.as_deref() == Some(assignment.passenger.name.as_str())
            });
            if !still_held {
                debug!("Seat {} no longer holds its bulk passenger, skipping", seat.seat_id);
                continue;
            }
            self.release(seat.seat_id, op.transport_id).await?;
        }

        Ok(())
    }
}
