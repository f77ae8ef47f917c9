// src/services/booking_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;

use crate::{
    clients::CatalogPort,
    common::{
        error::AppError,
        pagination::{PageInfo, PageRequest},
    },
    db::{BookingStore, CarStore},
    models::booking::{
        Booking, BookingChanges, BookingFilter, BookingPage, BookingPagination, BookingStatus,
        BookingView, NewBooking,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateBooking {
    pub garage_id: i32,
    pub service_id: i32,
    pub automobile_id: i32,
    pub reserved_at: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingStore>,
    cars: Arc<dyn CarStore>,
    catalog: Arc<dyn CatalogPort>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        cars: Arc<dyn CarStore>,
        catalog: Arc<dyn CatalogPort>,
    ) -> Self {
        Self { bookings, cars, catalog }
    }

    // =========================================================================
    //  CRIAÇÃO
    // =========================================================================

    /// Cria uma reserva `pending`. Garagem e serviço precisam existir no
    /// catálogo agora; se ele não responder, a reserva não é criada.
    pub async fn create(&self, input: CreateBooking) -> Result<BookingView, AppError> {
        // 1. Carro local. O dono sai daqui, nunca do corpo da requisição.
        let car = self
            .cars
            .find_by_id(input.automobile_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Carro {}", input.automobile_id)))?;

        // 2 e 3. Garagem e serviço no catálogo (fail-closed)
        let garage = self.catalog.garage(input.garage_id).await.map_err(|e| {
            tracing::warn!(garage_id = input.garage_id, error = %e, "Garagem indisponível na criação da reserva");
            AppError::not_found(format!("Garagem {} (indisponível)", input.garage_id))
        })?;

        let service = self.catalog.service(input.service_id).await.map_err(|e| {
            tracing::warn!(service_id = input.service_id, error = %e, "Serviço indisponível na criação da reserva");
            AppError::not_found(format!("Serviço {} (indisponível)", input.service_id))
        })?;

        // 4. Um horário por garagem, não importa o carro
        if self
            .bookings
            .slot_taken(input.garage_id, input.reserved_at, None)
            .await?
        {
            return Err(AppError::conflict(
                "Este horário já está reservado para esta garagem.",
            ));
        }

        // 5. Insere com o snapshot da garagem. Se outra requisição pegou o
        // mesmo horário entre o check e o insert, o UNIQUE devolve Conflict.
        let booking = self
            .bookings
            .insert(NewBooking {
                garage_id: input.garage_id,
                garage_name: Some(garage.name.clone()).filter(|name| !name.is_empty()),
                garage_address: garage.address.clone(),
                service_id: input.service_id,
                automobile_id: car.id,
                user_id: car.user_id,
                reserved_at: input.reserved_at,
                status: BookingStatus::Pending,
                notes: input.notes,
            })
            .await?;

        tracing::info!(
            booking_id = booking.id,
            garage_id = booking.garage_id,
            automobile_id = booking.automobile_id,
            "📅 Reserva criada"
        );

        // 6. Resposta com os dados frescos, não com o snapshot
        Ok(BookingView {
            booking,
            automobile: Some(car),
            garage,
            service: Some(service),
        })
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn list(&self, filter: BookingFilter, page: PageRequest) -> Result<BookingPage, AppError> {
        let (rows, total) = self.bookings.list(filter, page).await?;

        // join_all mantém a ordem das linhas locais
        let bookings = join_all(rows.into_iter().map(|booking| self.enrich(booking))).await;

        let info = PageInfo::new(page, total);
        Ok(BookingPage {
            bookings,
            pagination: BookingPagination {
                current_page: info.current_page,
                total_pages: info.total_pages,
                total_bookings: info.total,
                has_next: info.has_next,
                has_prev: info.has_prev,
            },
        })
    }

    pub async fn get(&self, booking_id: i32) -> Result<BookingView, AppError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reserva {booking_id}")))?;

        Ok(self.enrich(booking).await)
    }

    // Melhor esforço: falha no catálogo cai para o snapshot / service nulo
    async fn enrich(&self, booking: Booking) -> BookingView {
        let (garage, service) = tokio::join!(
            self.catalog.garage(booking.garage_id),
            self.catalog.service(booking.service_id),
        );

        let garage = garage.unwrap_or_else(|e| {
            tracing::warn!(booking_id = booking.id, garage_id = booking.garage_id, error = %e, "Usando snapshot da garagem");
            booking.snapshot_garage()
        });

        let service = service
            .inspect_err(|e| {
                tracing::warn!(booking_id = booking.id, service_id = booking.service_id, error = %e, "Serviço indisponível");
            })
            .ok();

        BookingView {
            booking,
            automobile: None,
            garage,
            service,
        }
    }

    // =========================================================================
    //  ATUALIZAÇÃO / REMOÇÃO
    // =========================================================================

    /// Atualização parcial. Qualquer status é aceito; mudar o horário passa
    /// de novo pela checagem de conflito.
    pub async fn update(&self, booking_id: i32, changes: BookingChanges) -> Result<Booking, AppError> {
        if changes.is_empty() {
            return Err(AppError::InvalidInput(
                "Informe ao menos um campo: reservedAt, status ou notes.".into(),
            ));
        }

        let current = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reserva {booking_id}")))?;

        if let Some(reserved_at) = changes.reserved_at {
            if reserved_at != current.reserved_at
                && self
                    .bookings
                    .slot_taken(current.garage_id, reserved_at, Some(booking_id))
                    .await?
            {
                return Err(AppError::conflict(
                    "Este horário já está reservado para esta garagem.",
                ));
            }
        }

        let updated = self
            .bookings
            .update(booking_id, changes)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reserva {booking_id}")))?;

        tracing::info!(booking_id, status = ?updated.status, "Reserva atualizada");
        Ok(updated)
    }

    pub async fn delete(&self, booking_id: i32) -> Result<Booking, AppError> {
        let deleted = self
            .bookings
            .delete(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reserva {booking_id}")))?;

        tracing::info!(booking_id, "🗑️ Reserva removida");
        Ok(deleted)
    }
}
