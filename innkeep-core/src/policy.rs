use crate::reservation::Reservation;

/// The authenticated principal behind a request. Opaque to the core beyond
/// equality on `user_id` and the admin flag.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: String,
    pub is_admin: bool,
}

/// A reservation may be deleted by its owner or by any admin.
pub fn can_delete(caller: &Caller, reservation: &Reservation) -> bool {
    caller.is_admin || caller.user_id == reservation.user_id
}
