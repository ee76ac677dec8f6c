use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::reservation::Reservation;
use crate::room::{NewRoom, Room};
use crate::slot::TimeSlot;
use crate::DomainResult;

/// Repository trait for room data access. Deleting a room cascades to its
/// reservations; that referential integrity belongs to the store.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room: NewRoom) -> DomainResult<Room>;

    async fn find(&self, id: Uuid) -> DomainResult<Option<Room>>;

    async fn list(&self) -> DomainResult<Vec<Room>>;

    /// Fails with `RoomNotFound` if the room does not exist.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
}

/// Repository trait for reservation data access.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Atomically re-check that no existing reservation for `room_id`
    /// overlaps `slot`, then insert. The check and the insert must be one
    /// atomic unit; a clash fails with `ReservationConflict` and writes
    /// nothing.
    async fn create_if_free(
        &self,
        user_id: &str,
        room_id: Uuid,
        slot: TimeSlot,
    ) -> DomainResult<Reservation>;

    async fn find(&self, id: Uuid) -> DomainResult<Option<Reservation>>;

    async fn list_all(&self) -> DomainResult<Vec<Reservation>>;

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>>;

    /// Ids of every room with at least one reservation overlapping `slot`.
    async fn booked_room_ids(&self, slot: &TimeSlot) -> DomainResult<HashSet<Uuid>>;

    /// Fails with `ReservationNotFound` if the row is already gone.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
}
