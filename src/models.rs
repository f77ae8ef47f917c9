pub mod booking;
pub mod car;
pub mod catalog;
pub mod favorite;
pub mod geo;
