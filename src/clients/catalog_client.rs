// src/clients/catalog_client.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use crate::models::catalog::{GarageSummary, ServiceSummary};

/// Motivo pelo qual o catálogo não respondeu com o recurso.
/// Nunca sobe como erro HTTP por si só: quem chama decide se degrada
/// o campo (listagens) ou se recusa a operação (criação).
#[derive(Debug, Error)]
pub enum Unavailable {
    #[error("recurso não existe no catálogo")]
    NotFound,
    #[error("catálogo respondeu {0}")]
    Status(StatusCode),
    #[error("falha de transporte: {0}")]
    Transport(String),
    #[error("resposta ilegível: {0}")]
    Decode(String),
}

#[async_trait]
pub trait CatalogPort: Send + Sync {
    async fn garage(&self, garage_id: i32) -> Result<GarageSummary, Unavailable>;

    async fn service(&self, service_id: i32) -> Result<ServiceSummary, Unavailable>;

    async fn garages(&self) -> Result<Vec<GarageSummary>, Unavailable>;
}

// --- Envelopes de resposta do catálogo ---

#[derive(Debug, Deserialize)]
struct GarageEnvelope {
    garage: GarageSummary,
}

#[derive(Debug, Deserialize)]
struct ServiceEnvelope {
    service: ServiceSummary,
}

#[derive(Debug, Deserialize)]
struct GarageListEnvelope {
    garages: Vec<GarageSummary>,
}

/// Cliente HTTP do catálogo de garagens e serviços.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Unavailable> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Unavailable::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(Unavailable::NotFound),
            status if !status.is_success() => return Err(Unavailable::Status(status)),
            _ => {}
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Unavailable::Transport(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| Unavailable::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatalogPort for CatalogClient {
    async fn garage(&self, garage_id: i32) -> Result<GarageSummary, Unavailable> {
        let envelope: GarageEnvelope = self.fetch_json(&format!("/garages/{garage_id}")).await?;
        Ok(envelope.garage)
    }

    async fn service(&self, service_id: i32) -> Result<ServiceSummary, Unavailable> {
        let envelope: ServiceEnvelope = self.fetch_json(&format!("/services/{service_id}")).await?;
        Ok(envelope.service)
    }

    async fn garages(&self) -> Result<Vec<GarageSummary>, Unavailable> {
        let envelope: GarageListEnvelope = self.fetch_json("/garages").await?;
        Ok(envelope.garages)
    }
}
