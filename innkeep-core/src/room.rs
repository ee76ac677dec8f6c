use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DomainError, DomainResult};

pub const NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub price_per_day: Decimal,
    pub capacity: i32,
}

/// Admin-submitted room data, validated before it reaches a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
    pub name: String,
    pub price_per_day: Decimal,
    pub capacity: i32,
}

impl NewRoom {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.is_empty() || self.name.len() > NAME_MAX_LENGTH {
            return Err(DomainError::ValidationError(format!(
                "room name must be between 1 and {} characters",
                NAME_MAX_LENGTH
            )));
        }
        if self.price_per_day < Decimal::ZERO {
            return Err(DomainError::ValidationError(
                "price per day must not be negative".to_string(),
            ));
        }
        if self.capacity <= 0 {
            return Err(DomainError::ValidationError(
                "capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Optional inclusive bounds narrowing an availability query. Each bound is
/// independent; they combine with AND.
#[derive(Debug, Clone, Default)]
pub struct RoomFilters {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_capacity: Option<i32>,
    pub max_capacity: Option<i32>,
}

impl RoomFilters {
    pub fn matches(&self, room: &Room) -> bool {
        self.min_price.is_none_or(|p| room.price_per_day >= p)
            && self.max_price.is_none_or(|p| room.price_per_day <= p)
            && self.min_capacity.is_none_or(|c| room.capacity >= c)
            && self.max_capacity.is_none_or(|c| room.capacity <= c)
    }
}
