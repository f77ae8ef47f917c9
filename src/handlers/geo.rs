// src/handlers/geo.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        pagination::PageRequest,
    },
    config::AppState,
    models::geo::{BoundingBox, GeoPoint, NearbyResponse, NearestResponse, WithinBoundsResponse},
};

// Parâmetros geográficos chegam em snake_case (lat, lng, north_lat...),
// diferente do resto da API.

// O `range` do validator deixa NaN passar (toda comparação com NaN é falsa)
fn finite(values: &[f64]) -> Result<(), AppError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(AppError::InvalidInput("Coordenadas devem ser números finitos.".into()))
    }
}

fn center_from(lat: Option<f64>, lng: Option<f64>) -> Result<GeoPoint, AppError> {
    match (lat, lng) {
        (Some(latitude), Some(longitude)) => {
            finite(&[latitude, longitude])?;
            Ok(GeoPoint { latitude, longitude })
        }
        _ => Err(AppError::InvalidInput("lat e lng são obrigatórios.".into())),
    }
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NearbyQuery {
    #[validate(required(message = "required"), range(min = -90.0, max = 90.0, message = "out_of_range"))]
    pub lat: Option<f64>,
    #[validate(required(message = "required"), range(min = -180.0, max = 180.0, message = "out_of_range"))]
    pub lng: Option<f64>,
    /// Raio em km (padrão 10)
    pub radius: Option<f64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// GET /api/garages/nearby
#[utoipa::path(
    get,
    path = "/api/garages/nearby",
    tag = "Geo",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Garagens dentro do raio, da mais próxima para a mais distante", body = NearbyResponse),
        (status = 400, description = "Coordenadas ausentes ou fora do intervalo")
    )
)]
pub async fn nearby_garages(
    State(app_state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(app_state.env))?;
    let center = center_from(query.lat, query.lng).map_err(|e| e.to_api_error(app_state.env))?;

    let response = app_state
        .proximity_service
        .nearby(center, query.radius, PageRequest::new(query.page, query.limit))
        .await
        .map_err(|e| e.to_api_error(app_state.env))?;

    Ok((StatusCode::OK, Json(response)))
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NearestQuery {
    #[validate(required(message = "required"), range(min = -90.0, max = 90.0, message = "out_of_range"))]
    pub lat: Option<f64>,
    #[validate(required(message = "required"), range(min = -180.0, max = 180.0, message = "out_of_range"))]
    pub lng: Option<f64>,
    /// Quantidade (1..=20, padrão 5)
    pub limit: Option<usize>,
}

// GET /api/garages/nearest
#[utoipa::path(
    get,
    path = "/api/garages/nearest",
    tag = "Geo",
    params(NearestQuery),
    responses(
        (status = 200, description = "As N garagens mais próximas, sem limite de raio", body = NearestResponse),
        (status = 400, description = "Coordenadas inválidas ou limit fora de 1..=20")
    )
)]
pub async fn nearest_garages(
    State(app_state): State<AppState>,
    Query(query): Query<NearestQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(app_state.env))?;
    let center = center_from(query.lat, query.lng).map_err(|e| e.to_api_error(app_state.env))?;

    let response = app_state
        .proximity_service
        .nearest(center, query.limit)
        .await
        .map_err(|e| e.to_api_error(app_state.env))?;

    Ok((StatusCode::OK, Json(response)))
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WithinBoundsQuery {
    #[validate(required(message = "required"), range(min = -90.0, max = 90.0, message = "out_of_range"))]
    pub north_lat: Option<f64>,
    #[validate(required(message = "required"), range(min = -90.0, max = 90.0, message = "out_of_range"))]
    pub south_lat: Option<f64>,
    #[validate(required(message = "required"), range(min = -180.0, max = 180.0, message = "out_of_range"))]
    pub east_lng: Option<f64>,
    #[validate(required(message = "required"), range(min = -180.0, max = 180.0, message = "out_of_range"))]
    pub west_lng: Option<f64>,
}

impl WithinBoundsQuery {
    fn bounds(&self) -> Result<BoundingBox, AppError> {
        self.validate()?;
        match (self.north_lat, self.south_lat, self.east_lng, self.west_lng) {
            (Some(north), Some(south), Some(east), Some(west)) => {
                finite(&[north, south, east, west])?;
                Ok(BoundingBox { north, south, east, west })
            }
            _ => Err(AppError::InvalidInput("Os quatro limites da caixa são obrigatórios.".into())),
        }
    }
}

// GET /api/garages/within-bounds
#[utoipa::path(
    get,
    path = "/api/garages/within-bounds",
    tag = "Geo",
    params(WithinBoundsQuery),
    responses(
        (status = 200, description = "Garagens dentro da caixa (bordas inclusivas)", body = WithinBoundsResponse),
        (status = 400, description = "Limites ausentes ou caixa invertida")
    )
)]
pub async fn garages_within_bounds(
    State(app_state): State<AppState>,
    Query(query): Query<WithinBoundsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let bounds = query.bounds().map_err(|e| e.to_api_error(app_state.env))?;

    let response = app_state
        .proximity_service
        .within_bounds(bounds)
        .await
        .map_err(|e| e.to_api_error(app_state.env))?;

    Ok((StatusCode::OK, Json(response)))
}
