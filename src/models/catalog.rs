// src/models/catalog.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::models::geo::GeoPoint;

pub const UNAVAILABLE_GARAGE_NAME: &str = "Garage indisponible";
pub const UNAVAILABLE_GARAGE_ADDRESS: &str = "Adresse indisponible";

// Garagem como o catálogo remoto a devolve. Nada disso é persistido aqui,
// exceto o nome/endereço copiados para a reserva no momento da criação.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GarageSummary {
    #[schema(example = 1)]
    pub id: i32,
    #[serde(default)]
    #[schema(example = "Garage Atlas")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "12 Bd Zerktouni, Casablanca")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, alias = "services_count", skip_serializing_if = "Option::is_none")]
    pub services_count: Option<i64>,
    #[serde(default, alias = "is_available", skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    // Demais campos do catálogo (horários, avaliação...) repassados como vieram
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GarageSummary {
    /// Versão reconstruída a partir do snapshot gravado na reserva.
    pub fn from_snapshot(id: i32, name: Option<&str>, address: Option<&str>) -> Self {
        Self {
            id,
            name: name.unwrap_or_default().to_string(),
            address: address.map(str::to_string),
            phone: None,
            latitude: None,
            longitude: None,
            services_count: None,
            is_available: None,
            extra: Map::new(),
        }
    }

    /// Placeholder exibido quando um favorito aponta para uma garagem que o
    /// catálogo não devolve mais.
    pub fn unavailable(id: i32) -> Self {
        Self {
            is_available: Some(false),
            ..Self::from_snapshot(id, Some(UNAVAILABLE_GARAGE_NAME), Some(UNAVAILABLE_GARAGE_ADDRESS))
        }
    }

    /// `None` se qualquer uma das coordenadas faltar; nunca vira (0, 0).
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint { latitude, longitude }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    #[schema(example = 5)]
    pub id: i32,
    #[serde(default)]
    #[schema(example = "Vidange")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, alias = "duration_minutes", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    #[serde(default, alias = "garage_id", skip_serializing_if = "Option::is_none")]
    pub garage_id: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// O catálogo às vezes serializa colunas DECIMAL como string ("33.5731").
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => Ok(Some(value)),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
