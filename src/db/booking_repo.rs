// src/db/booking_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{error::AppError, pagination::PageRequest},
    db::map_unique_violation,
    models::booking::{Booking, BookingChanges, BookingFilter, NewBooking},
};

const BOOKING_COLUMNS: &str = "id, garage_id, garage_name, garage_address, service_id, automobile_id, \
     user_id, reserved_at, status, notes, created_at, updated_at";

const SLOT_TAKEN: &str = "Este horário já está reservado para esta garagem.";

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Falha com `Conflict` se (garage_id, reserved_at) já existir.
    async fn insert(&self, booking: NewBooking) -> Result<Booking, AppError>;

    async fn find_by_id(&self, booking_id: i32) -> Result<Option<Booking>, AppError>;

    /// Linhas da página pedida e o total sem paginação.
    async fn list(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<(Vec<Booking>, i64), AppError>;

    async fn slot_taken(
        &self,
        garage_id: i32,
        reserved_at: DateTime<Utc>,
        ignore_booking_id: Option<i32>,
    ) -> Result<bool, AppError>;

    async fn update(
        &self,
        booking_id: i32,
        changes: BookingChanges,
    ) -> Result<Option<Booking>, AppError>;

    async fn delete(&self, booking_id: i32) -> Result<Option<Booking>, AppError>;
}

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: BookingFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(user_id) = filter.user_id {
        builder.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(garage_id) = filter.garage_id {
        builder.push(" AND garage_id = ").push_bind(garage_id);
    }
    if let Some(service_id) = filter.service_id {
        builder.push(" AND service_id = ").push_bind(service_id);
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn insert(&self, booking: NewBooking) -> Result<Booking, AppError> {
        // user_id vem resolvido do carro pelo service; o trigger do banco recalcula igual
        let sql = format!(
            r#"
            INSERT INTO booking (
                garage_id, garage_name, garage_address, service_id,
                automobile_id, user_id, reserved_at, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Booking>(&sql)
            .bind(booking.garage_id)
            .bind(booking.garage_name)
            .bind(booking.garage_address)
            .bind(booking.service_id)
            .bind(booking.automobile_id)
            .bind(booking.user_id)
            .bind(booking.reserved_at)
            .bind(booking.status)
            .bind(booking.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, SLOT_TAKEN))
    }

    async fn find_by_id(&self, booking_id: i32) -> Result<Option<Booking>, AppError> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM booking WHERE id = $1");
        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    async fn list(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<(Vec<Booking>, i64), AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM booking");
        push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {BOOKING_COLUMNS} FROM booking"));
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY reserved_at DESC, id DESC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let bookings = select.build_query_as::<Booking>().fetch_all(&self.pool).await?;

        Ok((bookings, total))
    }

    async fn slot_taken(
        &self,
        garage_id: i32,
        reserved_at: DateTime<Utc>,
        ignore_booking_id: Option<i32>,
    ) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM booking
                WHERE garage_id = $1
                  AND reserved_at = $2
                  AND ($3::INTEGER IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(garage_id)
        .bind(reserved_at)
        .bind(ignore_booking_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn update(
        &self,
        booking_id: i32,
        changes: BookingChanges,
    ) -> Result<Option<Booking>, AppError> {
        let sql = format!(
            r#"
            UPDATE booking
            SET reserved_at = COALESCE($2, reserved_at),
                status = COALESCE($3, status),
                notes = CASE WHEN $4 THEN $5 ELSE notes END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Booking>(&sql)
            .bind(booking_id)
            .bind(changes.reserved_at)
            .bind(changes.status)
            .bind(changes.notes.is_some())
            .bind(changes.notes.flatten())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, SLOT_TAKEN))
    }

    async fn delete(&self, booking_id: i32) -> Result<Option<Booking>, AppError> {
        let sql = format!("DELETE FROM booking WHERE id = $1 RETURNING {BOOKING_COLUMNS}");
        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }
}
