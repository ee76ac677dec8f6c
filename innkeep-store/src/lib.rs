pub mod app_config;
pub mod database;
pub mod reservation_repo;
pub mod room_repo;

pub use database::DbClient;
pub use reservation_repo::StoreReservationRepository;
pub use room_repo::StoreRoomRepository;

use innkeep_core::DomainError;

/// Connectivity and timeout failures surface as an opaque store fault; the
/// core never retries them.
pub(crate) fn store_err(err: sqlx::Error) -> DomainError {
    DomainError::Store(err.to_string())
}
