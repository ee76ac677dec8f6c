use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use innkeep_core::repository::ReservationRepository;
use innkeep_core::reservation::Reservation;
use innkeep_core::slot::TimeSlot;
use innkeep_core::{DomainError, DomainResult};

use crate::store_err;

// SQLSTATE codes the create path must translate into domain errors.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
const PG_EXCLUSION_VIOLATION: &str = "23P01";
const PG_SERIALIZATION_FAILURE: &str = "40001";

pub struct StoreReservationRepository {
    pool: PgPool,
}

impl StoreReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: Uuid,
    room_id: Uuid,
    user_id: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = DomainError;

    fn try_from(row: ReservationRow) -> DomainResult<Self> {
        // The schema's CHECK constraint keeps start < end, so this only
        // fails on a corrupted row.
        let slot = TimeSlot::new(row.start_date, row.end_date)
            .map_err(|_| DomainError::Store(format!("reservation {} has an inverted interval", row.id)))?;

        Ok(Reservation {
            id: row.id,
            room_id: row.room_id,
            user_id: row.user_id,
            slot,
        })
    }
}

fn rows_to_reservations(rows: Vec<ReservationRow>) -> DomainResult<Vec<Reservation>> {
    rows.into_iter().map(Reservation::try_from).collect()
}

/// Failures during the insert half of create: a racing insert trips either
/// the exclusion constraint or serializable isolation, both of which mean
/// someone else booked the room first.
fn map_insert_error(err: sqlx::Error, room_id: Uuid) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        match db.code().as_deref() {
            Some(PG_EXCLUSION_VIOLATION) | Some(PG_SERIALIZATION_FAILURE) => {
                return DomainError::ReservationConflict(room_id);
            }
            Some(PG_FOREIGN_KEY_VIOLATION) => {
                return DomainError::RoomNotFound(room_id);
            }
            _ => {}
        }
    }
    store_err(err)
}

#[async_trait]
impl ReservationRepository for StoreReservationRepository {
    async fn create_if_free(
        &self,
        user_id: &str,
        room_id: Uuid,
        slot: TimeSlot,
    ) -> DomainResult<Reservation> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        // Serializable isolation makes the overlap check plus the insert one
        // atomic unit; the exclusion constraint in the schema backs it up.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(store_err)?;

        let clash: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM reservations
            WHERE room_id = $1 AND start_date < $3 AND end_date > $2
            LIMIT 1
            "#,
        )
        .bind(room_id)
        .bind(slot.start())
        .bind(slot.end())
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_err)?;

        if clash.is_some() {
            return Err(DomainError::ReservationConflict(room_id));
        }

        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO reservations (id, room_id, user_id, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(room_id)
        .bind(user_id)
        .bind(slot.start())
        .bind(slot.end())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_insert_error(e, room_id))?;

        tx.commit().await.map_err(|e| map_insert_error(e, room_id))?;

        Ok(Reservation {
            id,
            room_id,
            user_id: user_id.to_string(),
            slot,
        })
    }

    async fn find(&self, id: Uuid) -> DomainResult<Option<Reservation>> {
        let row = sqlx::query_as::<_, ReservationRow>(
            "SELECT id, room_id, user_id, start_date, end_date FROM reservations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        row.map(Reservation::try_from).transpose()
    }

    async fn list_all(&self) -> DomainResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, ReservationRow>(
            "SELECT id, room_id, user_id, start_date, end_date FROM reservations ORDER BY start_date",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows_to_reservations(rows)
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT id, room_id, user_id, start_date, end_date FROM reservations
            WHERE user_id = $1
            ORDER BY start_date
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows_to_reservations(rows)
    }

    async fn booked_room_ids(&self, slot: &TimeSlot) -> DomainResult<HashSet<Uuid>> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT DISTINCT room_id FROM reservations WHERE start_date < $2 AND end_date > $1",
        )
        .bind(slot.start())
        .bind(slot.end())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows.into_iter().map(|(room_id,)| room_id).collect())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let res = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        if res.rows_affected() == 0 {
            return Err(DomainError::ReservationNotFound(id));
        }
        Ok(())
    }
}
