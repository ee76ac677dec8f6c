use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use innkeep_core::room::{NewRoom, Room, RoomFilters};
use innkeep_core::slot::TimeSlot;

use crate::error::ApiError;
use crate::middleware::auth::admin_auth_middleware;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start_date: String,
    pub end_date: String,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_capacity: Option<i32>,
    pub max_capacity: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub id: Uuid,
    pub name: String,
    pub price_per_day: Decimal,
    pub capacity: i32,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        RoomResponse {
            id: room.id,
            name: room.name,
            price_per_day: room.price_per_day,
            capacity: room.capacity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    pub price_per_day: Decimal,
    pub capacity: i32,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/rooms/available", get(available_rooms))
}

pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/admin/rooms", post(create_room).get(list_rooms))
        .route("/v1/admin/rooms/{id}", axum::routing::delete(delete_room))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            admin_auth_middleware,
        ))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/rooms/available
/// Rooms with zero reservations overlapping the requested window, narrowed
/// by the optional price/capacity bounds.
async fn available_rooms(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<RoomResponse>>, ApiError> {
    let slot = TimeSlot::parse(&query.start_date, &query.end_date)?;
    let filters = RoomFilters {
        min_price: query.min_price,
        max_price: query.max_price,
        min_capacity: query.min_capacity,
        max_capacity: query.max_capacity,
    };

    let rooms = state.availability.find_available_rooms(slot, &filters).await?;
    Ok(Json(rooms.into_iter().map(RoomResponse::from).collect()))
}

/// POST /v1/admin/rooms
async fn create_room(
    State(state): State<AppState>,
    body: Result<Json<CreateRoomRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RoomResponse>), ApiError> {
    let Json(req) = body?;
    let room = state
        .rooms
        .create(NewRoom {
            name: req.name,
            price_per_day: req.price_per_day,
            capacity: req.capacity,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RoomResponse::from(room))))
}

/// GET /v1/admin/rooms
async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<RoomResponse>>, ApiError> {
    let rooms = state.rooms.list().await?;
    Ok(Json(rooms.into_iter().map(RoomResponse::from).collect()))
}

/// DELETE /v1/admin/rooms/{id}
/// Deletes the room and, through the store cascade, all its reservations.
async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.rooms.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
