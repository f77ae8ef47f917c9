// src/models/geo.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::catalog::GarageSummary;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    #[schema(example = 33.5731)]
    pub latitude: f64,
    #[schema(example = -7.5898)]
    pub longitude: f64,
}

// Caixa alinhada aos eixos; os limites são inclusivos.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearbyGarage {
    #[serde(flatten)]
    pub garage: GarageSummary,
    #[schema(example = 2.41)]
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoundedGarage {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub services_count: i64,
    pub is_available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoPagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_garages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResponse {
    pub center: GeoPoint,
    pub radius_km: f64,
    pub count: usize,
    pub garages: Vec<NearbyGarage>,
    pub pagination: GeoPagination,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearestResponse {
    pub center: GeoPoint,
    pub limit: usize,
    pub count: usize,
    pub garages: Vec<NearbyGarage>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithinBoundsResponse {
    pub bounds: BoundingBox,
    pub count: usize,
    pub garages: Vec<BoundedGarage>,
}
