// src/models/booking.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::{
    car::Car,
    catalog::{GarageSummary, ServiceSummary},
};

// --- Enums ---
// Nenhuma transição é bloqueada: qualquer um dos quatro valores é aceito no update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

// --- Linha persistida ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub garage_id: i32,
    // Snapshot da garagem no momento da criação (não é sincronizado depois)
    #[schema(example = "Garage Atlas")]
    pub garage_name: Option<String>,
    pub garage_address: Option<String>,
    #[schema(example = 5)]
    pub service_id: i32,
    #[schema(example = 1)]
    pub automobile_id: i32,
    // Sempre derivado do carro, nunca do corpo da requisição
    #[schema(example = 1)]
    pub user_id: Option<i32>,
    #[schema(example = "2025-05-28T10:00:00Z")]
    pub reserved_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn snapshot_garage(&self) -> GarageSummary {
        GarageSummary::from_snapshot(
            self.garage_id,
            self.garage_name.as_deref(),
            self.garage_address.as_deref(),
        )
    }
}

// --- Escrita ---

#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub garage_id: i32,
    pub garage_name: Option<String>,
    pub garage_address: Option<String>,
    pub service_id: i32,
    pub automobile_id: i32,
    pub user_id: Option<i32>,
    pub reserved_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingChanges {
    pub reserved_at: Option<DateTime<Utc>>,
    pub status: Option<BookingStatus>,
    // None: não mexe. Some(None): apaga as notas.
    pub notes: Option<Option<String>>,
}

impl BookingChanges {
    pub fn is_empty(&self) -> bool {
        self.reserved_at.is_none() && self.status.is_none() && self.notes.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub user_id: Option<i32>,
    pub garage_id: Option<i32>,
    pub service_id: Option<i32>,
    pub status: Option<BookingStatus>,
}

// --- Leitura (enriquecida com o catálogo) ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automobile: Option<Car>,
    pub garage: GarageSummary,
    pub service: Option<ServiceSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingPagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_bookings: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingPage {
    pub bookings: Vec<BookingView>,
    pub pagination: BookingPagination,
}
