// src/common/pagination.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
// Acima disso o offset estoura i64
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// Página pedida pelo cliente, já normalizada (1 <= page <= MAX_PAGE, 1 <= limit <= 100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

// Metadados devolvidos junto com as listagens.
// O nome do total muda por recurso (totalBookings, totalFavorites...),
// por isso o campo é serializado pelo wrapper de cada listagem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: i64,
    pub total_pages: i64,
    #[serde(skip)]
    pub total: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let total_pages = if total == 0 { 0 } else { (total + request.limit - 1) / request.limit };
        Self {
            current_page: request.page,
            total_pages,
            total,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}

/// Fatia um vetor já ordenado segundo a página pedida.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> (Vec<T>, PageInfo) {
    let info = PageInfo::new(request, items.len() as i64);
    let page = items
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.limit as usize)
        .collect();
    (page, info)
}
