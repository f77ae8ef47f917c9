// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    clients::CatalogClient,
    db::{BookingRepository, CarRepository, FavoriteRepository},
    services::{BookingService, FavoriteService, ProximityService},
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppEnv {
    #[default]
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => AppEnv::Production,
            _ => AppEnv::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == AppEnv::Production
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub catalog_api_url: String,
    pub catalog_timeout: Duration,
    pub bind_addr: String,
    pub env: AppEnv,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Separado do `env::var` para dar pra testar sem mexer no ambiente do processo
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let catalog_api_url = lookup("CATALOG_API_URL")
            .context("CATALOG_API_URL deve ser definida")?
            .trim_end_matches('/')
            .to_string();

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS inválido: {raw}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let catalog_timeout_secs = match lookup("CATALOG_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("CATALOG_TIMEOUT_SECS inválido: {raw}"))?,
            None => DEFAULT_CATALOG_TIMEOUT_SECS,
        };

        Ok(Self {
            database_url,
            database_max_connections,
            catalog_api_url,
            catalog_timeout: Duration::from_secs(catalog_timeout_secs),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            env: lookup("APP_ENV").map(|v| AppEnv::parse(&v)).unwrap_or_default(),
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub env: AppEnv,
    pub booking_service: BookingService,
    pub favorite_service: FavoriteService,
    pub proximity_service: ProximityService,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let catalog = Arc::new(CatalogClient::new(
            &config.catalog_api_url,
            config.catalog_timeout,
        )?);
        let cars = Arc::new(CarRepository::new(db_pool.clone()));
        let bookings = Arc::new(BookingRepository::new(db_pool.clone()));
        let favorites = Arc::new(FavoriteRepository::new(db_pool.clone()));

        let booking_service = BookingService::new(bookings, cars.clone(), catalog.clone());
        let favorite_service = FavoriteService::new(favorites, cars, catalog.clone());
        let proximity_service = ProximityService::new(catalog);

        Ok(Self {
            db_pool,
            env: config.env,
            booking_service,
            favorite_service,
            proximity_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/customers"),
            ("CATALOG_API_URL", "http://catalog:4000/api/"),
        ]))
        .expect("config válida");

        assert_eq!(config.catalog_api_url, "http://catalog:4000/api");
        assert_eq!(config.database_max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.catalog_timeout, Duration::from_secs(5));
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.env, AppEnv::Development);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/customers"),
            ("CATALOG_API_URL", "http://catalog"),
            ("CATALOG_TIMEOUT_SECS", "2"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("APP_ENV", "Production"),
        ]))
        .expect("config válida");

        assert_eq!(config.catalog_timeout, Duration::from_secs(2));
        assert_eq!(config.database_max_connections, 12);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert!(config.env.is_production());
    }

    #[test]
    fn requires_database_and_catalog_urls() {
        assert!(AppConfig::from_lookup(lookup_from(&[("CATALOG_API_URL", "http://c")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")])).is_err());
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("CATALOG_API_URL", "http://c"),
            ("CATALOG_TIMEOUT_SECS", "cinco"),
        ]));
        assert!(result.is_err());
    }
}
