// src/services/proximity_service.rs

use std::sync::Arc;

use crate::{
    clients::CatalogPort,
    common::{
        error::AppError,
        pagination::{paginate, PageRequest},
    },
    models::{
        catalog::GarageSummary,
        geo::{
            BoundedGarage, BoundingBox, GeoPagination, GeoPoint, NearbyGarage, NearbyResponse,
            NearestResponse, WithinBoundsResponse,
        },
    },
};

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_RADIUS_KM: f64 = 10.0;
pub const DEFAULT_NEAREST_LIMIT: usize = 5;
pub const MAX_NEAREST_LIMIT: usize = 20;

/// Qualquer coisa que possa ter (ou não) coordenadas.
pub trait Locatable {
    fn location(&self) -> Option<GeoPoint>;
}

impl Locatable for GarageSummary {
    fn location(&self) -> Option<GeoPoint> {
        GarageSummary::location(self)
    }
}

/// Distância de grande círculo (lei dos cossenos esférica), em km.
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    // A fórmula não fecha em exatamente 1.0 para o mesmo ponto (dá ~1e-4 km)
    if from == to {
        return 0.0;
    }

    let (lat1, lng1) = (from.latitude.to_radians(), from.longitude.to_radians());
    let (lat2, lng2) = (to.latitude.to_radians(), to.longitude.to_radians());

    let cosine = lat1.cos() * lat2.cos() * (lng2 - lng1).cos() + lat1.sin() * lat2.sin();

    // Arredondamento pode passar de 1.0 para pontos quase iguais e o acos vira NaN
    EARTH_RADIUS_KM * cosine.clamp(-1.0, 1.0).acos()
}

// Sem coordenada, o candidato é descartado (nunca tratado como 0,0)
fn with_distances<T: Locatable>(origin: GeoPoint, candidates: Vec<T>) -> Vec<(T, f64)> {
    let mut ranked: Vec<(T, f64)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let point = candidate.location()?;
            let distance = distance_km(origin, point);
            Some((candidate, distance))
        })
        .collect();

    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked
}

/// Candidatos a até `radius_km`, do mais perto ao mais longe.
pub fn within_radius<T: Locatable>(origin: GeoPoint, candidates: Vec<T>, radius_km: f64) -> Vec<(T, f64)> {
    let mut ranked = with_distances(origin, candidates);
    ranked.retain(|(_, distance)| *distance <= radius_km);
    ranked
}

/// Os `limit` candidatos mais próximos, sem raio.
pub fn nearest<T: Locatable>(origin: GeoPoint, candidates: Vec<T>, limit: usize) -> Vec<(T, f64)> {
    let mut ranked = with_distances(origin, candidates);
    ranked.truncate(limit);
    ranked
}

/// Filtro de caixa, sem cálculo de distância. Ordem de entrada preservada.
pub fn within_bounds<T: Locatable>(bounds: BoundingBox, candidates: Vec<T>) -> Vec<T> {
    candidates
        .into_iter()
        .filter(|candidate| candidate.location().is_some_and(|point| bounds.contains(point)))
        .collect()
}

#[derive(Clone)]
pub struct ProximityService {
    catalog: Arc<dyn CatalogPort>,
}

impl ProximityService {
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self { catalog }
    }

    // Catálogo fora do ar: resultado vazio, não erro
    async fn candidates(&self) -> Vec<GarageSummary> {
        match self.catalog.garages().await {
            Ok(garages) => garages,
            Err(e) => {
                tracing::warn!(error = %e, "Listagem de garagens indisponível para busca geográfica");
                Vec::new()
            }
        }
    }

    pub async fn nearby(
        &self,
        center: GeoPoint,
        radius_km: Option<f64>,
        page: PageRequest,
    ) -> Result<NearbyResponse, AppError> {
        let radius_km = radius_km.unwrap_or(DEFAULT_RADIUS_KM);
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(AppError::InvalidInput("radius deve ser maior que zero.".into()));
        }

        let ranked = within_radius(center, self.candidates().await, radius_km);
        let (ranked, info) = paginate(ranked, page);

        let garages: Vec<NearbyGarage> = ranked
            .into_iter()
            .map(|(garage, distance_km)| NearbyGarage { garage, distance_km })
            .collect();

        Ok(NearbyResponse {
            center,
            radius_km,
            count: garages.len(),
            garages,
            pagination: GeoPagination {
                current_page: info.current_page,
                total_pages: info.total_pages,
                total_garages: info.total,
                has_next: info.has_next,
                has_prev: info.has_prev,
            },
        })
    }

    pub async fn nearest(&self, center: GeoPoint, limit: Option<usize>) -> Result<NearestResponse, AppError> {
        let limit = limit.unwrap_or(DEFAULT_NEAREST_LIMIT);
        if !(1..=MAX_NEAREST_LIMIT).contains(&limit) {
            return Err(AppError::InvalidInput(format!(
                "limit deve estar entre 1 e {MAX_NEAREST_LIMIT}."
            )));
        }

        let garages: Vec<NearbyGarage> = nearest(center, self.candidates().await, limit)
            .into_iter()
            .map(|(garage, distance_km)| NearbyGarage { garage, distance_km })
            .collect();

        Ok(NearestResponse {
            center,
            limit,
            count: garages.len(),
            garages,
        })
    }

    pub async fn within_bounds(&self, bounds: BoundingBox) -> Result<WithinBoundsResponse, AppError> {
        if bounds.south > bounds.north || bounds.west > bounds.east {
            return Err(AppError::InvalidInput(
                "Caixa inválida: south_lat <= north_lat e west_lng <= east_lng.".into(),
            ));
        }

        let garages: Vec<BoundedGarage> = within_bounds(bounds, self.candidates().await)
            .into_iter()
            .filter_map(|garage| {
                let point = garage.location()?;
                Some(BoundedGarage {
                    id: garage.id,
                    name: garage.name,
                    address: garage.address,
                    latitude: point.latitude,
                    longitude: point.longitude,
                    services_count: garage.services_count.unwrap_or(0),
                    is_available: garage.is_available.unwrap_or(true),
                })
            })
            .collect();

        Ok(WithinBoundsResponse {
            bounds,
            count: garages.len(),
            garages,
        })
    }
}
