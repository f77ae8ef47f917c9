// src/handlers/bookings.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        pagination::PageRequest,
    },
    config::AppState,
    models::booking::{Booking, BookingChanges, BookingFilter, BookingPage, BookingStatus, BookingView},
    services::booking_service::CreateBooking,
};

// =============================================================================
//  CRIAÇÃO
// =============================================================================

// Campos opcionais no tipo para que a falta de um deles vire 400 (validator),
// e não a rejeição genérica do extrator Json.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingPayload {
    #[validate(required(message = "required"))]
    #[schema(example = 1)]
    pub garage_id: Option<i32>,

    #[validate(required(message = "required"))]
    #[schema(example = 5)]
    pub service_id: Option<i32>,

    #[validate(required(message = "required"))]
    #[schema(example = 1)]
    pub automobile_id: Option<i32>,

    #[validate(required(message = "required"))]
    #[schema(example = "2025-05-28T10:00:00Z")]
    pub reserved_at: Option<DateTime<Utc>>,

    #[validate(length(max = 2000, message = "too_long"))]
    #[schema(example = "Barulho na suspensão dianteira")]
    pub notes: Option<String>,
}

// POST /api/bookings
#[utoipa::path(
    post,
    path = "/api/bookings",
    tag = "Bookings",
    request_body = CreateBookingPayload,
    responses(
        (status = 201, description = "Reserva criada (status pending)", body = BookingView),
        (status = 400, description = "Campo obrigatório ausente"),
        (status = 404, description = "Carro, garagem ou serviço não encontrado/indisponível"),
        (status = 409, description = "Horário já reservado nesta garagem")
    )
)]
pub async fn create_booking(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateBookingPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(app_state.env))?;

    // Os `required` acima garantem os Some
    let (Some(garage_id), Some(service_id), Some(automobile_id), Some(reserved_at)) = (
        payload.garage_id,
        payload.service_id,
        payload.automobile_id,
        payload.reserved_at,
    ) else {
        return Err(AppError::InvalidInput("Campos obrigatórios ausentes.".into()).to_api_error(app_state.env));
    };

    let booking = app_state
        .booking_service
        .create(CreateBooking {
            garage_id,
            service_id,
            automobile_id,
            reserved_at,
            notes: payload.notes,
        })
        .await
        .map_err(|e| e.to_api_error(app_state.env))?;

    Ok((StatusCode::CREATED, Json(booking)))
}

// =============================================================================
//  LEITURA
// =============================================================================

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListBookingsQuery {
    /// Página (começa em 1)
    pub page: Option<i64>,
    /// Itens por página (máx. 100)
    pub limit: Option<i64>,
    pub user_id: Option<i32>,
    pub garage_id: Option<i32>,
    pub service_id: Option<i32>,
    pub status: Option<BookingStatus>,
}

// GET /api/bookings
#[utoipa::path(
    get,
    path = "/api/bookings",
    tag = "Bookings",
    params(ListBookingsQuery),
    responses(
        (status = 200, description = "Reservas paginadas, enriquecidas com o catálogo quando disponível", body = BookingPage)
    )
)]
pub async fn list_bookings(
    State(app_state): State<AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = BookingFilter {
        user_id: query.user_id,
        garage_id: query.garage_id,
        service_id: query.service_id,
        status: query.status,
    };

    let page = app_state
        .booking_service
        .list(filter, PageRequest::new(query.page, query.limit))
        .await
        .map_err(|e| e.to_api_error(app_state.env))?;

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/bookings/{id}
#[utoipa::path(
    get,
    path = "/api/bookings/{booking_id}",
    tag = "Bookings",
    params(("booking_id" = i32, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Reserva", body = BookingView),
        (status = 404, description = "Reserva não encontrada")
    )
)]
pub async fn get_booking(
    State(app_state): State<AppState>,
    Path(booking_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = app_state
        .booking_service
        .get(booking_id)
        .await
        .map_err(|e| e.to_api_error(app_state.env))?;

    Ok((StatusCode::OK, Json(booking)))
}

// =============================================================================
//  ATUALIZAÇÃO / REMOÇÃO
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingPayload {
    #[schema(example = "2025-05-28T14:00:00Z")]
    pub reserved_at: Option<DateTime<Utc>>,

    #[schema(example = "confirmed")]
    pub status: Option<BookingStatus>,

    // Ausente: não altera. `null`: apaga as notas.
    #[serde(default, deserialize_with = "present")]
    #[validate(length(max = 2000, message = "too_long"))]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

// Distingue campo ausente (None, via `default`) de `null` explícito (Some(None))
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

// PATCH /api/bookings/{id}
#[utoipa::path(
    patch,
    path = "/api/bookings/{booking_id}",
    tag = "Bookings",
    request_body = UpdateBookingPayload,
    params(("booking_id" = i32, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Reserva atualizada", body = Booking),
        (status = 400, description = "Nenhum campo informado"),
        (status = 404, description = "Reserva não encontrada"),
        (status = 409, description = "Novo horário já reservado")
    )
)]
pub async fn update_booking(
    State(app_state): State<AppState>,
    Path(booking_id): Path<i32>,
    Json(payload): Json<UpdateBookingPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(app_state.env))?;

    let changes = BookingChanges {
        reserved_at: payload.reserved_at,
        status: payload.status,
        notes: payload.notes,
    };

    let booking = app_state
        .booking_service
        .update(booking_id, changes)
        .await
        .map_err(|e| e.to_api_error(app_state.env))?;

    Ok((StatusCode::OK, Json(booking)))
}

// DELETE /api/bookings/{id}
#[utoipa::path(
    delete,
    path = "/api/bookings/{booking_id}",
    tag = "Bookings",
    params(("booking_id" = i32, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Reserva removida", body = Booking),
        (status = 404, description = "Reserva não encontrada")
    )
)]
pub async fn delete_booking(
    State(app_state): State<AppState>,
    Path(booking_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = app_state
        .booking_service
        .delete(booking_id)
        .await
        .map_err(|e| e.to_api_error(app_state.env))?;

    Ok((StatusCode::OK, Json(booking)))
}
