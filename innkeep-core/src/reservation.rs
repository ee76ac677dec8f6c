use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slot::TimeSlot;

/// A confirmed booking of one room by one user. The only lifecycle is
/// create then delete; changing dates means delete + create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub room_id: Uuid,
    pub user_id: String,
    pub slot: TimeSlot,
}
