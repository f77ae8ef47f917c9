pub mod booking_repo;
pub use booking_repo::{BookingRepository, BookingStore};
pub mod car_repo;
pub use car_repo::{CarRepository, CarStore};
pub mod favorite_repo;
pub use favorite_repo::{FavoriteRepository, FavoriteStore};

use crate::common::error::AppError;

// Converte erro de violação de chave única em Conflict; o resto segue como erro de banco
pub(crate) fn map_unique_violation(e: sqlx::Error, message: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::conflict(message);
        }
    }
    AppError::DatabaseError(e)
}
