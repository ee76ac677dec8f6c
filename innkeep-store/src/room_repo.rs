use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use innkeep_core::repository::RoomRepository;
use innkeep_core::room::{NewRoom, Room};
use innkeep_core::{DomainError, DomainResult};

use crate::store_err;

pub struct StoreRoomRepository {
    pool: PgPool,
}

impl StoreRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RoomRow {
    id: Uuid,
    name: String,
    price_per_day: Decimal,
    capacity: i32,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            id: row.id,
            name: row.name,
            price_per_day: row.price_per_day,
            capacity: row.capacity,
        }
    }
}

#[async_trait]
impl RoomRepository for StoreRoomRepository {
    async fn create(&self, room: NewRoom) -> DomainResult<Room> {
        room.validate()?;

        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO rooms (id, name, price_per_day, capacity) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(&room.name)
            .bind(room.price_per_day)
            .bind(room.capacity)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(Room {
            id,
            name: room.name,
            price_per_day: room.price_per_day,
            capacity: room.capacity,
        })
    }

    async fn find(&self, id: Uuid) -> DomainResult<Option<Room>> {
        sqlx::query_as::<_, RoomRow>(
            "SELECT id, name, price_per_day, capacity FROM rooms WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Room::from))
        .map_err(store_err)
    }

    async fn list(&self) -> DomainResult<Vec<Room>> {
        sqlx::query_as::<_, RoomRow>("SELECT id, name, price_per_day, capacity FROM rooms")
            .fetch_all(&self.pool)
            .await
            .map(|rows| rows.into_iter().map(Room::from).collect())
            .map_err(store_err)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        // Reservations go with the room via ON DELETE CASCADE.
        let res = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        if res.rows_affected() == 0 {
            return Err(DomainError::RoomNotFound(id));
        }
        Ok(())
    }
}
