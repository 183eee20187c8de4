use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use seatwise_assign::layout::{parse_seat_status, parse_seat_type};
use seatwise_assign::{Operation, SeatView};
use seatwise_catalog::{CellChange, DerivedStatus, Seat, SeatMap};
use seatwise_core::SeatRepository;
use seatwise_planner::BulkAssignmentSuggestion;
use seatwise_shared::{PassengerDetails, SeatAssignment, SeatOperationEvent};
use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub seat_id: Uuid,
    pub passenger: PassengerDetails,
}

#[derive(Debug, Deserialize)]
pub struct SeatRequest {
    pub seat_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub from_seat_id: Uuid,
    pub to_seat_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct BlockRequest {
    pub seat_id: Uuid,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub suggestions: Vec<BulkAssignmentSuggestion>,
}

#[derive(Debug, Deserialize)]
pub struct CellRequest {
    pub seat_type: String,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeatResponse {
    pub id: Uuid,
    pub row: u32,
    pub column: u32,
    pub seat_type: String,
    pub label: Option<String>,
    pub status: DerivedStatus,
    pub passenger_name: Option<String>,
    pub block_reason: Option<String>,
    pub guide_hold: bool,
}

impl From<SeatView> for SeatResponse {
    fn from(view: SeatView) -> Self {
        Self {
            id: view.seat.id,
            row: view.seat.row,
            column: view.seat.column,
            seat_type: view.seat.seat_type.to_string(),
            label: view.seat.seat_label.clone(),
            status: view.status,
            passenger_name: view.passenger_name,
            guide_hold: view.seat.is_guide_hold(),
            block_reason: view.seat.block_reason,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CellResponse {
    pub change: String,
    pub seat: Option<Seat>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UndoResponse {
    pub undone: Option<Operation>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/maps", get(list_maps))
        .route("/v1/maps/{map_id}/transports/{transport_id}/seats", get(list_seats))
        .route("/v1/maps/{map_id}/transports/{transport_id}/plan", post(plan))
        .route("/v1/maps/{map_id}/cells/{row}/{column}", put(change_cell))
        .route("/v1/transports/{transport_id}/assign", post(assign))
        .route("/v1/transports/{transport_id}/free", post(free))
        .route("/v1/transports/{transport_id}/move", post(move_passenger))
        .route("/v1/transports/{transport_id}/block", post(block))
        .route("/v1/transports/{transport_id}/unblock", post(unblock))
        .route("/v1/transports/{transport_id}/bulk", post(apply_bulk))
        .route("/v1/transports/{transport_id}/undo", post(undo))
        .route("/v1/transports/{transport_id}/history", get(history))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/maps
pub async fn list_maps(State(state): State<AppState>) -> Json<Vec<SeatMap>> {
    let mut maps = state.store.seat_maps().await;
    maps.sort_by(|a, b| a.name.cmp(&b.name));
    Json(maps)
}

/// GET /v1/maps/{map_id}/transports/{transport_id}/seats
/// Every cell of the map with its live status for the transport
pub async fn list_seats(
    State(state): State<AppState>,
    Path((map_id, transport_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<SeatResponse>>, AppError> {
    ensure_map(&state, map_id).await?;
    let views = state.service.seat_overview(map_id, transport_id).await?;
    Ok(Json(views.into_iter().map(SeatResponse::from).collect()))
}

/// POST /v1/maps/{map_id}/transports/{transport_id}/plan
/// Suggestions only; nothing is assigned until they are posted to /bulk
pub async fn plan(
    State(state): State<AppState>,
    Path((map_id, transport_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<BulkAssignmentSuggestion>>, AppError> {
    ensure_map(&state, map_id).await?;
    let suggestions = match state.existing_session(transport_id).await {
        Some(session) => {
            let session = session.lock().await;
            let suggestions = session.plan(map_id).await?;
            suggestions
        }
        None => state.new_session(transport_id).plan(map_id).await?,
    };
    Ok(Json(suggestions))
}

/// PUT /v1/maps/{map_id}/cells/{row}/{column}
pub async fn change_cell(
    State(state): State<AppState>,
    Path((map_id, row, column)): Path<(Uuid, u32, u32)>,
    Json(req): Json<CellRequest>,
) -> Result<Json<CellResponse>, AppError> {
    let seat_type = parse_seat_type(&req.seat_type)?;
    let status = req
        .status
        .as_deref()
        .map(parse_seat_status)
        .transpose()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let change = state.service.change_seat_type(map_id, row, column, seat_type, status).await?;
    let response = match change {
        CellChange::Saved(seat) => CellResponse { change: "saved".to_string(), seat: Some(seat) },
        CellChange::Deleted(seat) => CellResponse { change: "deleted".to_string(), seat: Some(seat) },
        CellChange::Unchanged => CellResponse { change: "unchanged".to_string(), seat: None },
    };
    Ok(Json(response))
}

/// POST /v1/transports/{transport_id}/assign
pub async fn assign(
    State(state): State<AppState>,
    Path(transport_id): Path<Uuid>,
    Json(req): Json<AssignRequest>,
) -> Result<(StatusCode, Json<SeatAssignment>), AppError> {
    if req.passenger.name.trim().is_empty() {
        return Err(AppError::ValidationError("passenger name is required".to_string()));
    }

    let session = state.session(transport_id).await;
    let assignment = session.lock().await.assign(req.seat_id, req.passenger).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// POST /v1/transports/{transport_id}/free
pub async fn free(
    State(state): State<AppState>,
    Path(transport_id): Path<Uuid>,
    Json(req): Json<SeatRequest>,
) -> Result<Json<SeatAssignment>, AppError> {
    let session = state.session(transport_id).await;
    let removed = session.lock().await.free(req.seat_id).await?;
    Ok(Json(removed))
}

/// POST /v1/transports/{transport_id}/move
pub async fn move_passenger(
    State(state): State<AppState>,
    Path(transport_id): Path<Uuid>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<SeatAssignment>, AppError> {
    let session = state.session(transport_id).await;
    let moved = session
        .lock()
        .await
        .move_passenger(req.from_seat_id, req.to_seat_id)
        .await?;
    Ok(Json(moved))
}

/// POST /v1/transports/{transport_id}/block
pub async fn block(
    State(state): State<AppState>,
    Path(transport_id): Path<Uuid>,
    Json(req): Json<BlockRequest>,
) -> Result<Json<Seat>, AppError> {
    let session = state.session(transport_id).await;
    let seat = session.lock().await.block(req.seat_id, req.reason).await?;
    Ok(Json(seat))
}

/// POST /v1/transports/{transport_id}/unblock
pub async fn unblock(
    State(state): State<AppState>,
    Path(transport_id): Path<Uuid>,
    Json(req): Json<SeatRequest>,
) -> Result<Json<Seat>, AppError> {
    let session = state.session(transport_id).await;
    let seat = session.lock().await.unblock(req.seat_id).await?;
    Ok(Json(seat))
}

/// POST /v1/transports/{transport_id}/bulk
/// Apply accepted planner suggestions as one undoable operation
pub async fn apply_bulk(
    State(state): State<AppState>,
    Path(transport_id): Path<Uuid>,
    Json(req): Json<BulkRequest>,
) -> Result<Json<Vec<SeatAssignment>>, AppError> {
    let session = state.session(transport_id).await;
    let assignments = session.lock().await.apply(&req.suggestions).await?;
    Ok(Json(assignments))
}

/// POST /v1/transports/{transport_id}/undo
/// Without an open session there is nothing to undo
pub async fn undo(
    State(state): State<AppState>,
    Path(transport_id): Path<Uuid>,
) -> Result<Json<UndoResponse>, AppError> {
    let undone = match state.existing_session(transport_id).await {
        Some(session) => {
            let mut session = session.lock().await;
            let undone = session.undo().await?;
            undone
        }
        None => None,
    };
    Ok(Json(UndoResponse { undone }))
}

/// GET /v1/transports/{transport_id}/history
/// Newest first
pub async fn history(
    State(state): State<AppState>,
    Path(transport_id): Path<Uuid>,
) -> Json<Vec<SeatOperationEvent>> {
    let events = match state.existing_session(transport_id).await {
        Some(session) => {
            let session = session.lock().await;
            let events = session.events();
            events
        }
        None => Vec::new(),
    };
    Json(events)
}

async fn ensure_map(state: &AppState, map_id: Uuid) -> Result<SeatMap, AppError> {
    state
        .store
        .load_seat_map(map_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError(format!("Seat map {} not found", map_id)))
}
