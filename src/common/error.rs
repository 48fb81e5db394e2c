// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// O erro de domínio. Serviços e repositórios só conhecem este tipo.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{entity} {id} não encontrado")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Empresa não determinada")]
    TenantNotResolved,

    #[error("Acesso a outra empresa")]
    CrossTenantAccess,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Qualquer outro erro inesperado, com o contexto do anyhow.
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        AppError::NotFound { entity, id }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } | AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidToken | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::CrossTenantAccess => StatusCode::FORBIDDEN,
            AppError::TenantNotResolved => StatusCode::BAD_REQUEST,
            AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "errors.validation",
            AppError::NotFound { .. } => "errors.not_found",
            AppError::UserNotFound => "errors.user_not_found",
            AppError::InvalidToken | AppError::JwtError(_) => "errors.invalid_token",
            AppError::Forbidden => "errors.forbidden",
            AppError::TenantNotResolved => "errors.tenant_not_resolved",
            AppError::CrossTenantAccess => "errors.cross_tenant",
            AppError::UniqueConstraintViolation(_) => "errors.unique_violation",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => "errors.internal",
        }
    }

    /// Converte para a resposta HTTP, traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| store.translate(&locale.0, m))
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(details))
            }
            AppError::NotFound { entity, id } => Some(json!({ "entity": entity, "id": id })),
            AppError::UniqueConstraintViolation(what) => Some(json!({ "constraint": what })),
            _ => None,
        };

        ApiError {
            status,
            error: store.translate(&locale.0, self.message_key()),
            details,
        }
    }
}

// A resposta de erro que sai para o cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
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

/// Converte violações de unicidade do Postgres no erro de domínio.
pub fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            return AppError::UniqueConstraintViolation(constraint);
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    fn store() -> I18nStore {
        I18nStore::embedded("en").unwrap()
    }

    #[test]
    fn not_found_maps_to_404_with_details() {
        let api = AppError::not_found("contact", 9).to_api_error(&Locale("en".into()), &store());
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Record not found.");
        assert_eq!(api.details.unwrap()["id"], 9);
    }

    #[test]
    fn user_not_found_is_translated() {
        let api = AppError::UserNotFound.to_api_error(&Locale("pt".into()), &store());
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Usuário não encontrado.");
    }

    #[test]
    fn cross_tenant_is_forbidden() {
        assert_eq!(AppError::CrossTenantAccess.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::TenantNotResolved.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_errors_are_listed_per_field() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("errors.validation".into());
        errors.add("name", err);

        let api = AppError::ValidationError(errors).to_api_error(&Locale("en".into()), &store());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.unwrap();
        assert_eq!(details["name"][0], "One or more fields are invalid.");
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let err = AppError::InternalServerError(anyhow::anyhow!("pool exhausted"));
        let api = err.to_api_error(&Locale("en".into()), &store());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error, "An unexpected error occurred.");
        assert!(api.details.is_none());
    }
}
