//! In-memory store. Backs the test suites and doubles as a reference for
//! the store contract: `create_if_free` holds one lock across the overlap
//! check and the insert, so two racing creates serialize, and deleting a
//! room drops its reservations with it.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::repository::{ReservationRepository, RoomRepository};
use crate::reservation::Reservation;
use crate::room::{NewRoom, Room};
use crate::slot::TimeSlot;
use crate::{DomainError, DomainResult};

/// One struct implements both repository traits so the room/reservation
/// relation lives in one place, mirroring the two tables of the SQL store.
#[derive(Default)]
pub struct InMemoryStore {
    rooms: Mutex<HashMap<Uuid, Room>>,
    reservations: Mutex<Vec<Reservation>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryStore {
    async fn create(&self, room: NewRoom) -> DomainResult<Room> {
        room.validate()?;
        let room = Room {
            id: Uuid::new_v4(),
            name: room.name,
            price_per_day: room.price_per_day,
            capacity: room.capacity,
        };
        self.rooms.lock().unwrap().insert(room.id, room.clone());
        Ok(room)
    }

    async fn find(&self, id: Uuid) -> DomainResult<Option<Room>> {
        Ok(self.rooms.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Room>> {
        Ok(self.rooms.lock().unwrap().values().cloned().collect())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.rooms
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or(DomainError::RoomNotFound(id))?;

        // Cascade: the room's reservations go with it.
        self.reservations.lock().unwrap().retain(|r| r.room_id != id);
        Ok(())
    }
}

#[async_trait]
impl ReservationRepository for InMemoryStore {
    async fn create_if_free(
        &self,
        user_id: &str,
        room_id: Uuid,
        slot: TimeSlot,
    ) -> DomainResult<Reservation> {
        // Check and insert under the same lock.
        let mut rows = self.reservations.lock().unwrap();
        if rows
            .iter()
            .any(|r| r.room_id == room_id && r.slot.overlaps(&slot))
        {
            return Err(DomainError::ReservationConflict(room_id));
        }

        let reservation = Reservation {
            id: Uuid::new_v4(),
            room_id,
            user_id: user_id.to_string(),
            slot,
        };
        rows.push(reservation.clone());
        Ok(reservation)
    }

    async fn find(&self, id: Uuid) -> DomainResult<Option<Reservation>> {
        Ok(self
            .reservations
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list_all(&self) -> DomainResult<Vec<Reservation>> {
        Ok(self.reservations.lock().unwrap().clone())
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn booked_room_ids(&self, slot: &TimeSlot) -> DomainResult<HashSet<Uuid>> {
        Ok(self
            .reservations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.slot.overlaps(slot))
            .map(|r| r.room_id)
            .collect())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let mut rows = self.reservations.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(DomainError::ReservationNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn slot(from: u32, to: u32) -> TimeSlot {
        TimeSlot::new(
            Utc.with_ymd_and_hms(2025, 6, 1, from, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, to, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_deleting_a_room_cascades_to_its_reservations() {
        let store = InMemoryStore::new();

        let kept = store
            .create(NewRoom {
                name: "Kept".to_string(),
                price_per_day: Decimal::new(6000, 2),
                capacity: 2,
            })
            .await
            .unwrap();
        let doomed = store
            .create(NewRoom {
                name: "Doomed".to_string(),
                price_per_day: Decimal::new(6000, 2),
                capacity: 2,
            })
            .await
            .unwrap();

        store.create_if_free("alice", kept.id, slot(10, 11)).await.unwrap();
        store.create_if_free("alice", doomed.id, slot(10, 11)).await.unwrap();
        store.create_if_free("bob", doomed.id, slot(12, 13)).await.unwrap();

        RoomRepository::delete(&store, doomed.id).await.unwrap();

        // Only the surviving room's reservation is left, and the deleted
        // room's slots no longer block anything.
        let remaining = store.list_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].room_id, kept.id);

        let booked = store.booked_room_ids(&slot(10, 11)).await.unwrap();
        assert!(!booked.contains(&doomed.id));
    }
}
