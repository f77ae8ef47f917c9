// src/test_support.rs
//
// Implementações em memória dos stores e do catálogo, com as mesmas
// restrições de unicidade do schema.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    clients::{CatalogPort, Unavailable},
    common::{error::AppError, pagination::PageRequest},
    db::{BookingStore, CarStore, FavoriteStore},
    models::{
        booking::{Booking, BookingChanges, BookingFilter, NewBooking},
        car::Car,
        catalog::{GarageSummary, ServiceSummary},
        favorite::{Favorite, FavoriteFilter},
    },
};

pub fn car(id: i32, user_id: Option<i32>) -> Car {
    Car {
        id,
        matricule: format!("{id:05}-A-6"),
        brand: Some("Dacia".into()),
        model: Some("Logan".into()),
        user_id,
        created_at: Utc::now(),
    }
}

pub fn garage(id: i32, latitude: Option<f64>, longitude: Option<f64>) -> GarageSummary {
    GarageSummary {
        id,
        name: format!("Garage {id}"),
        address: Some(format!("{id} Rue de Casablanca")),
        phone: None,
        latitude,
        longitude,
        services_count: None,
        is_available: None,
        extra: Default::default(),
    }
}

pub fn service(id: i32) -> ServiceSummary {
    ServiceSummary {
        id,
        name: format!("Service {id}"),
        description: None,
        price: Some(250.0),
        duration_minutes: Some(60),
        garage_id: None,
        extra: Default::default(),
    }
}

fn page_slice<T: Clone>(rows: &[T], page: PageRequest) -> Vec<T> {
    rows.iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

// --- Carros ---

#[derive(Default)]
pub struct InMemoryCars {
    cars: Mutex<HashMap<i32, Car>>,
}

impl InMemoryCars {
    pub fn with(cars: impl IntoIterator<Item = Car>) -> Arc<Self> {
        Arc::new(Self {
            cars: Mutex::new(cars.into_iter().map(|c| (c.id, c)).collect()),
        })
    }
}

#[async_trait]
impl CarStore for InMemoryCars {
    async fn find_by_id(&self, car_id: i32) -> Result<Option<Car>, AppError> {
        Ok(self.cars.lock().expect("lock").get(&car_id).cloned())
    }
}

// --- Reservas ---

#[derive(Default)]
pub struct InMemoryBookings {
    rows: Mutex<Vec<Booking>>,
    next_id: AtomicUsize,
    stale_reads: AtomicBool,
}

impl InMemoryBookings {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `slot_taken` passa a responder "livre", como se outra requisição
    /// tivesse gravado o horário logo depois da checagem. O insert continua
    /// barrando pelo UNIQUE.
    pub fn set_stale_reads(&self, stale: bool) {
        self.stale_reads.store(stale, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<Booking> {
        self.rows.lock().expect("lock").clone()
    }

    fn matches(booking: &Booking, filter: BookingFilter) -> bool {
        filter.user_id.is_none_or(|id| booking.user_id == Some(id))
            && filter.garage_id.is_none_or(|id| booking.garage_id == id)
            && filter.service_id.is_none_or(|id| booking.service_id == id)
            && filter.status.is_none_or(|s| booking.status == s)
    }
}

#[async_trait]
impl BookingStore for InMemoryBookings {
    async fn insert(&self, booking: NewBooking) -> Result<Booking, AppError> {
        let mut rows = self.rows.lock().expect("lock");
        // Mesma regra do UNIQUE (garage_id, reserved_at)
        if rows
            .iter()
            .any(|b| b.garage_id == booking.garage_id && b.reserved_at == booking.reserved_at)
        {
            return Err(AppError::conflict("slot ocupado"));
        }
        let now = Utc::now();
        let row = Booking {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1,
            garage_id: booking.garage_id,
            garage_name: booking.garage_name,
            garage_address: booking.garage_address,
            service_id: booking.service_id,
            automobile_id: booking.automobile_id,
            user_id: booking.user_id,
            reserved_at: booking.reserved_at,
            status: booking.status,
            notes: booking.notes,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, booking_id: i32) -> Result<Option<Booking>, AppError> {
        Ok(self.rows().into_iter().find(|b| b.id == booking_id))
    }

    async fn list(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<(Vec<Booking>, i64), AppError> {
        let matching: Vec<Booking> = self
            .rows()
            .into_iter()
            .filter(|b| Self::matches(b, filter))
            .collect();
        Ok((page_slice(&matching, page), matching.len() as i64))
    }

    async fn slot_taken(
        &self,
        garage_id: i32,
        reserved_at: DateTime<Utc>,
        ignore_booking_id: Option<i32>,
    ) -> Result<bool, AppError> {
        if self.stale_reads.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self.rows().iter().any(|b| {
            b.garage_id == garage_id
                && b.reserved_at == reserved_at
                && Some(b.id) != ignore_booking_id
        }))
    }

    async fn update(
        &self,
        booking_id: i32,
        changes: BookingChanges,
    ) -> Result<Option<Booking>, AppError> {
        let mut rows = self.rows.lock().expect("lock");
        let Some(index) = rows.iter().position(|b| b.id == booking_id) else {
            return Ok(None);
        };
        if let Some(reserved_at) = changes.reserved_at {
            let garage_id = rows[index].garage_id;
            if rows
                .iter()
                .any(|b| b.id != booking_id && b.garage_id == garage_id && b.reserved_at == reserved_at)
            {
                return Err(AppError::conflict("slot ocupado"));
            }
        }
        let row = &mut rows[index];
        if let Some(reserved_at) = changes.reserved_at {
            row.reserved_at = reserved_at;
        }
        if let Some(status) = changes.status {
            row.status = status;
        }
        if let Some(notes) = changes.notes {
            row.notes = notes;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, booking_id: i32) -> Result<Option<Booking>, AppError> {
        let mut rows = self.rows.lock().expect("lock");
        let index = rows.iter().position(|b| b.id == booking_id);
        Ok(index.map(|i| rows.remove(i)))
    }
}

// --- Favoritos ---

#[derive(Default)]
pub struct InMemoryFavorites {
    rows: Mutex<Vec<Favorite>>,
    next_id: AtomicUsize,
    stale_reads: AtomicBool,
}

impl InMemoryFavorites {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `delete_pair` não enxerga a linha, como se ela tivesse sido inserida
    /// por outra requisição entre o DELETE e o INSERT do toggle.
    pub fn set_stale_reads(&self, stale: bool) {
        self.stale_reads.store(stale, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<Favorite> {
        self.rows.lock().expect("lock").clone()
    }
}

#[async_trait]
impl FavoriteStore for InMemoryFavorites {
    async fn find_pair(&self, garage_id: i32, automobile_id: i32) -> Result<Option<Favorite>, AppError> {
        Ok(self
            .rows()
            .into_iter()
            .find(|f| f.garage_id == garage_id && f.automobile_id == automobile_id))
    }

    async fn insert(
        &self,
        garage_id: i32,
        automobile_id: i32,
        user_id: Option<i32>,
    ) -> Result<Favorite, AppError> {
        let mut rows = self.rows.lock().expect("lock");
        if rows
            .iter()
            .any(|f| f.garage_id == garage_id && f.automobile_id == automobile_id)
        {
            return Err(AppError::conflict("favorito duplicado"));
        }
        let row = Favorite {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1,
            garage_id,
            automobile_id,
            user_id,
            created_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn delete_pair(&self, garage_id: i32, automobile_id: i32) -> Result<Option<Favorite>, AppError> {
        if self.stale_reads.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let mut rows = self.rows.lock().expect("lock");
        let index = rows
            .iter()
            .position(|f| f.garage_id == garage_id && f.automobile_id == automobile_id);
        Ok(index.map(|i| rows.remove(i)))
    }

    async fn delete(&self, favorite_id: i32, automobile_id: Option<i32>) -> Result<Option<Favorite>, AppError> {
        let mut rows = self.rows.lock().expect("lock");
        let index = rows.iter().position(|f| {
            f.id == favorite_id && automobile_id.is_none_or(|car| f.automobile_id == car)
        });
        Ok(index.map(|i| rows.remove(i)))
    }

    async fn list(
        &self,
        filter: FavoriteFilter,
        page: PageRequest,
    ) -> Result<(Vec<Favorite>, i64), AppError> {
        let matching: Vec<Favorite> = self
            .rows()
            .into_iter()
            .filter(|f| {
                filter.user_id.is_none_or(|id| f.user_id == Some(id))
                    && filter.automobile_id.is_none_or(|id| f.automobile_id == id)
                    && filter.garage_id.is_none_or(|id| f.garage_id == id)
            })
            .collect();
        Ok((page_slice(&matching, page), matching.len() as i64))
    }

    async fn count_for_garage(&self, garage_id: i32) -> Result<i64, AppError> {
        Ok(self.rows().iter().filter(|f| f.garage_id == garage_id).count() as i64)
    }
}

// --- Catálogo ---

#[derive(Default)]
pub struct FakeCatalog {
    garages: Mutex<HashMap<i32, GarageSummary>>,
    services: Mutex<HashMap<i32, ServiceSummary>>,
    down: AtomicBool,
}

impl FakeCatalog {
    pub fn with(garages: Vec<GarageSummary>, services: Vec<ServiceSummary>) -> Arc<Self> {
        Arc::new(Self {
            garages: Mutex::new(garages.into_iter().map(|g| (g.id, g)).collect()),
            services: Mutex::new(services.into_iter().map(|s| (s.id, s)).collect()),
            down: AtomicBool::new(false),
        })
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn remove_garage(&self, garage_id: i32) {
        self.garages.lock().expect("lock").remove(&garage_id);
    }

    fn check_up(&self) -> Result<(), Unavailable> {
        if self.down.load(Ordering::SeqCst) {
            Err(Unavailable::Transport("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CatalogPort for FakeCatalog {
    async fn garage(&self, garage_id: i32) -> Result<GarageSummary, Unavailable> {
        self.check_up()?;
        self.garages
            .lock()
            .expect("lock")
            .get(&garage_id)
            .cloned()
            .ok_or(Unavailable::NotFound)
    }

    async fn service(&self, service_id: i32) -> Result<ServiceSummary, Unavailable> {
        self.check_up()?;
        self.services
            .lock()
            .expect("lock")
            .get(&service_id)
            .cloned()
            .ok_or(Unavailable::NotFound)
    }

    async fn garages(&self) -> Result<Vec<GarageSummary>, Unavailable> {
        self.check_up()?;
        let mut garages: Vec<GarageSummary> =
            self.garages.lock().expect("lock").values().cloned().collect();
        garages.sort_by_key(|g| g.id);
        Ok(garages)
    }
}
