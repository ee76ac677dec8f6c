pub mod availability;
pub mod booking;
pub mod memory;
pub mod policy;
pub mod repository;
pub mod reservation;
pub mod room;
pub mod slot;

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Room not found: {0}")]
    RoomNotFound(Uuid),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(Uuid),

    #[error("Room {0} is already reserved for the given dates")]
    ReservationConflict(Uuid),

    #[error("You do not have permission to perform this operation")]
    PermissionDenied,

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Store failure: {0}")]
    Store(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
