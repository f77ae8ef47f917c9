//src/main.rs

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod clients;
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

#[cfg(test)]
mod test_support;

use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;

fn router(app_state: AppState) -> Router {
    let booking_routes = Router::new()
        .route("/"
               ,post(handlers::bookings::create_booking)
               .get(handlers::bookings::list_bookings)
        )
        .route("/{id}"
               ,get(handlers::bookings::get_booking)
               .patch(handlers::bookings::update_booking)
               .delete(handlers::bookings::delete_booking)
        );

    let favorite_routes = Router::new()
        .route("/"
               ,post(handlers::favorites::add_favorite)
               .get(handlers::favorites::list_favorites)
        )
        .route("/toggle", post(handlers::favorites::toggle_favorite))
        .route("/check", get(handlers::favorites::check_favorite))
        .route("/garage/{garage_id}/count", get(handlers::favorites::count_garage_favorites))
        .route("/{id}", delete(handlers::favorites::delete_favorite));

    let geo_routes = Router::new()
        .route("/nearby", get(handlers::geo::nearby_garages))
        .route("/nearest", get(handlers::geo::nearest_garages))
        .route("/within-bounds", get(handlers::geo::garages_within_bounds));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/bookings", booking_routes)
        .nest("/api/favorites", favorite_routes)
        .nest("/api/garages", geo_routes)
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // RUST_LOG controla o nível; sem ele, info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env()?;
    let app_state = AppState::new(&config).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Documentação em http://{}/swagger-ui", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
