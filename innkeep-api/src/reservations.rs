use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use innkeep_core::policy::Caller;
use innkeep_core::reservation::Reservation;
use innkeep_core::slot::TimeSlot;

use crate::error::ApiError;
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub start_date: String,
    pub end_date: String,
    pub room: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub room: Uuid,
    pub user: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        ReservationResponse {
            id: reservation.id,
            room: reservation.room_id,
            user: reservation.user_id,
            start_date: reservation.slot.start(),
            end_date: reservation.slot.end(),
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/v1/reservations",
            get(list_reservations).post(create_reservation),
        )
        .route(
            "/v1/reservations/{id}",
            axum::routing::delete(delete_reservation),
        )
        .route_layer(axum::middleware::from_fn_with_state(state, auth_middleware))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/reservations
/// The caller's reservations; every reservation for admins.
async fn list_reservations(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<ReservationResponse>>, ApiError> {
    let reservations = state.booking.list_reservations(&caller).await?;
    Ok(Json(
        reservations
            .into_iter()
            .map(ReservationResponse::from)
            .collect(),
    ))
}

/// POST /v1/reservations
async fn create_reservation(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReservationResponse>), ApiError> {
    let Json(req) = body?;
    let slot = TimeSlot::parse(&req.start_date, &req.end_date)?;
    let reservation = state
        .booking
        .create_reservation(&caller, req.room, slot)
        .await?;

    Ok((StatusCode::CREATED, Json(ReservationResponse::from(reservation))))
}

/// DELETE /v1/reservations/{id}
async fn delete_reservation(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.booking.delete_reservation(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
