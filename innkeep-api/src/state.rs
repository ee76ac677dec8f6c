use std::sync::Arc;

use innkeep_core::availability::AvailabilityService;
use innkeep_core::booking::BookingService;
use innkeep_core::repository::{ReservationRepository, RoomRepository};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<dyn RoomRepository>,
    pub availability: AvailabilityService,
    pub booking: BookingService,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        reservations: Arc<dyn ReservationRepository>,
        auth: AuthConfig,
    ) -> Self {
        Self {
            availability: AvailabilityService::new(rooms.clone(), reservations.clone()),
            booking: BookingService::new(rooms.clone(), reservations),
            rooms,
            auth,
        }
    }
}
