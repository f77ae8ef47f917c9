// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::AppEnv;

// Erro interno de services e repositórios.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validações que não cabem num `#[validate]` (ex: "pelo menos um campo")
    #[error("Requisição inválida: {0}")]
    InvalidInput(String),

    #[error("{0} não encontrado(a)")]
    NotFound(String),

    #[error("Conflito: {0}")]
    Conflict(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(message.into())
    }

    /// Converte para a resposta HTTP. Fora de produção os erros 500
    /// levam o detalhe técnico em `details`.
    pub fn to_api_error(&self, env: AppEnv) -> ApiError {
        match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: "Um ou mais campos são inválidos.".into(),
                    details: Some(Value::Object(details)),
                }
            }
            AppError::InvalidInput(message) => ApiError::new(StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, self.to_string()),
            AppError::Conflict(message) => ApiError::new(StatusCode::CONFLICT, message.clone()),

            // DatabaseError e InternalServerError viram 500
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                tracing::error!("Erro Interno do Servidor: {}", self);
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: "Ocorreu um erro inesperado.".into(),
                    details: (!env.is_production()).then(|| json!(self.to_string())),
                }
            }
        }
    }
}

// O que realmente sai na resposta HTTP
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self { status, error: error.into(), details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::InvalidInput("x".into()), StatusCode::BAD_REQUEST)]
    #[case(AppError::not_found("Reserva 3"), StatusCode::NOT_FOUND)]
    #[case(AppError::conflict("slot"), StatusCode::CONFLICT)]
    #[case(AppError::DatabaseError(sqlx::Error::RowNotFound), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_variants_to_status_codes(#[case] error: AppError, #[case] expected: StatusCode) {
        assert_eq!(error.to_api_error(AppEnv::Development).status, expected);
    }

    #[test]
    fn internal_errors_hide_details_in_production() {
        let error = AppError::InternalServerError(anyhow::anyhow!("pool fechado"));

        let prod = error.to_api_error(AppEnv::Production);
        assert!(prod.details.is_none());
        assert_eq!(prod.error, "Ocorreu um erro inesperado.");

        let dev = error.to_api_error(AppEnv::Development);
        let details = dev.details.expect("detalhe em desenvolvimento");
        assert!(details.as_str().unwrap_or_default().contains("pool fechado"));
    }

    #[test]
    fn not_found_message_names_the_resource() {
        let api = AppError::not_found("Carro 7").to_api_error(AppEnv::Production);
        assert_eq!(api.error, "Carro 7 não encontrado(a)");
    }
}
