// src/db/car_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{common::error::AppError, models::car::Car};

#[async_trait]
pub trait CarStore: Send + Sync {
    async fn find_by_id(&self, car_id: i32) -> Result<Option<Car>, AppError>;
}

// Só leitura: o CRUD de carros é de outro módulo do sistema
#[derive(Clone)]
pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarStore for CarRepository {
    async fn find_by_id(&self, car_id: i32) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<_, Car>(
            "SELECT id, matricule, brand, model, user_id, created_at FROM cars WHERE id = $1",
        )
        .bind(car_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(car)
    }
}
