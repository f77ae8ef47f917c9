// src/db/favorite_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{error::AppError, pagination::PageRequest},
    db::map_unique_violation,
    models::favorite::{Favorite, FavoriteFilter},
};

const FAVORITE_COLUMNS: &str = "id, garage_id, automobile_id, user_id, created_at";

#[async_trait]
pub trait FavoriteStore: Send + Sync {
    async fn find_pair(&self, garage_id: i32, automobile_id: i32) -> Result<Option<Favorite>, AppError>;

    /// Falha com `Conflict` se o par já existir.
    async fn insert(
        &self,
        garage_id: i32,
        automobile_id: i32,
        user_id: Option<i32>,
    ) -> Result<Favorite, AppError>;

    /// Remove o par numa única instrução e devolve o que foi apagado.
    async fn delete_pair(&self, garage_id: i32, automobile_id: i32) -> Result<Option<Favorite>, AppError>;

    async fn delete(&self, favorite_id: i32, automobile_id: Option<i32>) -> Result<Option<Favorite>, AppError>;

    async fn list(
        &self,
        filter: FavoriteFilter,
        page: PageRequest,
    ) -> Result<(Vec<Favorite>, i64), AppError>;

    async fn count_for_garage(&self, garage_id: i32) -> Result<i64, AppError>;
}

#[derive(Clone)]
pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: FavoriteFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(user_id) = filter.user_id {
        builder.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(automobile_id) = filter.automobile_id {
        builder.push(" AND automobile_id = ").push_bind(automobile_id);
    }
    if let Some(garage_id) = filter.garage_id {
        builder.push(" AND garage_id = ").push_bind(garage_id);
    }
}

#[async_trait]
impl FavoriteStore for FavoriteRepository {
    async fn find_pair(&self, garage_id: i32, automobile_id: i32) -> Result<Option<Favorite>, AppError> {
        let sql = format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorites WHERE garage_id = $1 AND automobile_id = $2"
        );
        let favorite = sqlx::query_as::<_, Favorite>(&sql)
            .bind(garage_id)
            .bind(automobile_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(favorite)
    }

    async fn insert(
        &self,
        garage_id: i32,
        automobile_id: i32,
        user_id: Option<i32>,
    ) -> Result<Favorite, AppError> {
        let sql = format!(
            r#"
            INSERT INTO favorites (garage_id, automobile_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING {FAVORITE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Favorite>(&sql)
            .bind(garage_id)
            .bind(automobile_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "Esta garagem já está nos favoritos deste carro."))
    }

    async fn delete_pair(&self, garage_id: i32, automobile_id: i32) -> Result<Option<Favorite>, AppError> {
        let sql = format!(
            "DELETE FROM favorites WHERE garage_id = $1 AND automobile_id = $2 RETURNING {FAVORITE_COLUMNS}"
        );
        let favorite = sqlx::query_as::<_, Favorite>(&sql)
            .bind(garage_id)
            .bind(automobile_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(favorite)
    }

    async fn delete(&self, favorite_id: i32, automobile_id: Option<i32>) -> Result<Option<Favorite>, AppError> {
        // Com dono informado, só apaga se o favorito for mesmo daquele carro
        let sql = format!(
            r#"
            DELETE FROM favorites
            WHERE id = $1 AND ($2::INTEGER IS NULL OR automobile_id = $2)
            RETURNING {FAVORITE_COLUMNS}
            "#
        );
        let favorite = sqlx::query_as::<_, Favorite>(&sql)
            .bind(favorite_id)
            .bind(automobile_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(favorite)
    }

    async fn list(
        &self,
        filter: FavoriteFilter,
        page: PageRequest,
    ) -> Result<(Vec<Favorite>, i64), AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM favorites");
        push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {FAVORITE_COLUMNS} FROM favorites"));
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let favorites = select.build_query_as::<Favorite>().fetch_all(&self.pool).await?;

        Ok((favorites, total))
    }

    async fn count_for_garage(&self, garage_id: i32) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE garage_id = $1")
            .bind(garage_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
