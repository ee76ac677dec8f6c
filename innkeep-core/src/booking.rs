use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::policy::{can_delete, Caller};
use crate::repository::{ReservationRepository, RoomRepository};
use crate::reservation::Reservation;
use crate::slot::TimeSlot;
use crate::{DomainError, DomainResult};

/// Mutating reservation commands: validated create and delete, plus the
/// per-caller list view. All validation happens before any write; once the
/// store operation starts, its transaction decides success or failure.
#[derive(Clone)]
pub struct BookingService {
    rooms: Arc<dyn RoomRepository>,
    reservations: Arc<dyn ReservationRepository>,
}

impl BookingService {
    pub fn new(rooms: Arc<dyn RoomRepository>, reservations: Arc<dyn ReservationRepository>) -> Self {
        Self { rooms, reservations }
    }

    pub async fn create_reservation(
        &self,
        caller: &Caller,
        room_id: Uuid,
        slot: TimeSlot,
    ) -> DomainResult<Reservation> {
        self.rooms
            .find(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound(room_id))?;

        // The overlap re-check happens inside the store's atomic unit, not
        // here; a pre-check alone would race with concurrent creates.
        let reservation = self
            .reservations
            .create_if_free(&caller.user_id, room_id, slot)
            .await?;

        info!(
            reservation_id = %reservation.id,
            room_id = %room_id,
            "reservation created"
        );
        Ok(reservation)
    }

    pub async fn list_reservations(&self, caller: &Caller) -> DomainResult<Vec<Reservation>> {
        if caller.is_admin {
            self.reservations.list_all().await
        } else {
            self.reservations.list_for_user(&caller.user_id).await
        }
    }

    pub async fn delete_reservation(&self, caller: &Caller, id: Uuid) -> DomainResult<()> {
        let reservation = self
            .reservations
            .find(id)
            .await?
            .ok_or(DomainError::ReservationNotFound(id))?;

        if !can_delete(caller, &reservation) {
            return Err(DomainError::PermissionDenied);
        }

        self.reservations.delete(id).await?;
        info!(reservation_id = %id, "reservation deleted");
        Ok(())
    }
}
