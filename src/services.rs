pub mod booking_service;
pub use booking_service::BookingService;
pub mod favorite_service;
pub use favorite_service::FavoriteService;
pub mod proximity_service;
pub use proximity_service::ProximityService;
