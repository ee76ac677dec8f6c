use std::sync::Arc;

use crate::repository::{ReservationRepository, RoomRepository};
use crate::room::{Room, RoomFilters};
use crate::slot::TimeSlot;
use crate::DomainResult;

/// Read-only availability queries: which rooms have zero reservations
/// overlapping a candidate slot. The result is a snapshot, not a hold; a
/// racing create can still win the room.
#[derive(Clone)]
pub struct AvailabilityService {
    rooms: Arc<dyn RoomRepository>,
    reservations: Arc<dyn ReservationRepository>,
}

impl AvailabilityService {
    pub fn new(rooms: Arc<dyn RoomRepository>, reservations: Arc<dyn ReservationRepository>) -> Self {
        Self { rooms, reservations }
    }

    /// One range query for the conflicting room-id set, then set difference
    /// plus the composed filter predicate. No ordering guarantee.
    pub async fn find_available_rooms(
        &self,
        slot: TimeSlot,
        filters: &RoomFilters,
    ) -> DomainResult<Vec<Room>> {
        let booked = self.reservations.booked_room_ids(&slot).await?;
        let rooms = self.rooms.list().await?;

        Ok(rooms
            .into_iter()
            .filter(|room| !booked.contains(&room.id) && filters.matches(room))
            .collect())
    }
}
