// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Garage Reservations API",
        description = "Reservas, favoritos e busca geográfica de garagens. Garagens e serviços vêm do catálogo externo."
    ),
    paths(
        // --- Bookings ---
        handlers::bookings::create_booking,
        handlers::bookings::list_bookings,
        handlers::bookings::get_booking,
        handlers::bookings::update_booking,
        handlers::bookings::delete_booking,

        // --- Favorites ---
        handlers::favorites::add_favorite,
        handlers::favorites::toggle_favorite,
        handlers::favorites::check_favorite,
        handlers::favorites::list_favorites,
        handlers::favorites::count_garage_favorites,
        handlers::favorites::delete_favorite,

        // --- Geo ---
        handlers::geo::nearby_garages,
        handlers::geo::nearest_garages,
        handlers::geo::garages_within_bounds,
    ),
    components(
        schemas(
            // --- Catálogo / Carros ---
            models::catalog::GarageSummary,
            models::catalog::ServiceSummary,
            models::car::Car,

            // --- Bookings ---
            models::booking::BookingStatus,
            models::booking::Booking,
            models::booking::BookingView,
            models::booking::BookingPagination,
            models::booking::BookingPage,

            // --- Favorites ---
            models::favorite::Favorite,
            models::favorite::ToggleAction,
            models::favorite::ToggleOutcome,
            models::favorite::FavoriteCheck,
            models::favorite::FavoriteView,
            models::favorite::FavoritePagination,
            models::favorite::FavoritePage,
            models::favorite::FavoriteCount,

            // --- Geo ---
            models::geo::GeoPoint,
            models::geo::BoundingBox,
            models::geo::NearbyGarage,
            models::geo::BoundedGarage,
            models::geo::GeoPagination,
            models::geo::NearbyResponse,
            models::geo::NearestResponse,
            models::geo::WithinBoundsResponse,

            // --- Payloads ---
            handlers::bookings::CreateBookingPayload,
            handlers::bookings::UpdateBookingPayload,
            handlers::favorites::FavoritePayload,
        )
    ),
    tags(
        (name = "Bookings", description = "Reservas de serviço em garagens"),
        (name = "Favorites", description = "Garagens favoritas por carro"),
        (name = "Geo", description = "Busca de garagens por proximidade")
    )
)]
pub struct ApiDoc;
