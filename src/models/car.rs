// src/models/car.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// O CRUD de carros vive fora deste serviço; aqui só lemos o dono.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "12345-A-6")]
    pub matricule: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    // Dono do carro. É daqui que sai o `userId` de reservas e favoritos.
    #[schema(example = 1)]
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}
