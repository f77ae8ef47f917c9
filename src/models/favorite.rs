// src/models/favorite.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::catalog::GarageSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 2)]
    pub garage_id: i32,
    #[schema(example = 3)]
    pub automobile_id: i32,
    // Cópia do dono do carro, recalculada a cada escrita
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FavoriteFilter {
    pub user_id: Option<i32>,
    pub automobile_id: Option<i32>,
    pub garage_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome {
    pub action: ToggleAction,
    pub favorite: Favorite,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCheck {
    pub is_favorite: bool,
    pub favorite: Option<Favorite>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteView {
    #[serde(flatten)]
    pub favorite: Favorite,
    pub garage: GarageSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_favorites: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePage {
    pub favorites: Vec<FavoriteView>,
    pub pagination: FavoritePagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCount {
    pub garage_id: i32,
    pub count: i64,
}
