// src/handlers/favorites.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        pagination::PageRequest,
    },
    config::AppState,
    models::favorite::{
        Favorite, FavoriteCheck, FavoriteCount, FavoriteFilter, FavoritePage, ToggleAction,
        ToggleOutcome,
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePayload {
    #[validate(required(message = "required"))]
    #[schema(example = 2)]
    pub garage_id: Option<i32>,

    // Identifica o carro; o dono (userId) é derivado dele
    #[validate(required(message = "required"))]
    #[schema(example = 3)]
    pub automobile_id: Option<i32>,
}

impl FavoritePayload {
    fn pair(&self) -> Result<(i32, i32), AppError> {
        self.validate()?;
        match (self.garage_id, self.automobile_id) {
            (Some(garage_id), Some(automobile_id)) => Ok((garage_id, automobile_id)),
            _ => Err(AppError::InvalidInput("garageId e automobileId são obrigatórios.".into())),
        }
    }
}

// POST /api/favorites
#[utoipa::path(
    post,
    path = "/api/favorites",
    tag = "Favorites",
    request_body = FavoritePayload,
    responses(
        (status = 201, description = "Favorito criado", body = Favorite),
        (status = 404, description = "Carro ou garagem não encontrado"),
        (status = 409, description = "Já é favorito")
    )
)]
pub async fn add_favorite(
    State(app_state): State<AppState>,
    Json(payload): Json<FavoritePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let (garage_id, automobile_id) = payload.pair().map_err(|e| e.to_api_error(app_state.env))?;

    let favorite = app_state
        .favorite_service
        .add(garage_id, automobile_id)
        .await
        .map_err(|e| e.to_api_error(app_state.env))?;

    Ok((StatusCode::CREATED, Json(favorite)))
}

// POST /api/favorites/toggle
#[utoipa::path(
    post,
    path = "/api/favorites/toggle",
    tag = "Favorites",
    request_body = FavoritePayload,
    responses(
        (status = 201, description = "Favorito adicionado (action = added)", body = ToggleOutcome),
        (status = 200, description = "Favorito removido (action = removed)", body = ToggleOutcome),
        (status = 404, description = "Carro ou garagem não encontrado")
    )
)]
pub async fn toggle_favorite(
    State(app_state): State<AppState>,
    Json(payload): Json<FavoritePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let (garage_id, automobile_id) = payload.pair().map_err(|e| e.to_api_error(app_state.env))?;

    let outcome = app_state
        .favorite_service
        .toggle(garage_id, automobile_id)
        .await
        .map_err(|e| e.to_api_error(app_state.env))?;

    let status = match outcome.action {
        ToggleAction::Added => StatusCode::CREATED,
        ToggleAction::Removed => StatusCode::OK,
    };

    Ok((status, Json(outcome)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CheckFavoriteQuery {
    pub garage_id: i32,
    pub automobile_id: i32,
}

// GET /api/favorites/check
#[utoipa::path(
    get,
    path = "/api/favorites/check",
    tag = "Favorites",
    params(CheckFavoriteQuery),
    responses(
        (status = 200, description = "Se o par existe (sem consultar o catálogo)", body = FavoriteCheck)
    )
)]
pub async fn check_favorite(
    State(app_state): State<AppState>,
    Query(query): Query<CheckFavoriteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let check = app_state
        .favorite_service
        .check(query.garage_id, query.automobile_id)
        .await
        .map_err(|e| e.to_api_error(app_state.env))?;

    Ok((StatusCode::OK, Json(check)))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListFavoritesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Dono dos carros (derivado)
    pub user_id: Option<i32>,
    pub automobile_id: Option<i32>,
    pub garage_id: Option<i32>,
}

// GET /api/favorites
#[utoipa::path(
    get,
    path = "/api/favorites",
    tag = "Favorites",
    params(ListFavoritesQuery),
    responses(
        (status = 200, description = "Favoritos paginados; garagens fora do catálogo aparecem como indisponíveis", body = FavoritePage)
    )
)]
pub async fn list_favorites(
    State(app_state): State<AppState>,
    Query(query): Query<ListFavoritesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = FavoriteFilter {
        user_id: query.user_id,
        automobile_id: query.automobile_id,
        garage_id: query.garage_id,
    };

    let page = app_state
        .favorite_service
        .list(filter, PageRequest::new(query.page, query.limit))
        .await
        .map_err(|e| e.to_api_error(app_state.env))?;

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/favorites/garage/{garage_id}/count
#[utoipa::path(
    get,
    path = "/api/favorites/garage/{garage_id}/count",
    tag = "Favorites",
    params(("garage_id" = i32, Path, description = "ID da garagem no catálogo")),
    responses(
        (status = 200, description = "Quantos carros favoritaram a garagem", body = FavoriteCount)
    )
)]
pub async fn count_garage_favorites(
    State(app_state): State<AppState>,
    Path(garage_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let count = app_state
        .favorite_service
        .count_for_garage(garage_id)
        .await
        .map_err(|e| e.to_api_error(app_state.env))?;

    Ok((StatusCode::OK, Json(count)))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeleteFavoriteQuery {
    /// Se informado, só apaga favoritos deste carro
    pub automobile_id: Option<i32>,
}

// DELETE /api/favorites/{id}
#[utoipa::path(
    delete,
    path = "/api/favorites/{favorite_id}",
    tag = "Favorites",
    params(
        ("favorite_id" = i32, Path, description = "ID do favorito"),
        DeleteFavoriteQuery
    ),
    responses(
        (status = 200, description = "Favorito removido", body = Favorite),
        (status = 404, description = "Nenhum favorito com esse id (e dono)")
    )
)]
pub async fn delete_favorite(
    State(app_state): State<AppState>,
    Path(favorite_id): Path<i32>,
    Query(query): Query<DeleteFavoriteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let favorite = app_state
        .favorite_service
        .delete(favorite_id, query.automobile_id)
        .await
        .map_err(|e| e.to_api_error(app_state.env))?;

    Ok((StatusCode::OK, Json(favorite)))
}
