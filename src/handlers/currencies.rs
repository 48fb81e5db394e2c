// src/handlers/currencies.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::ApiError,
    config::AppState,
    db::currency_repo::CurrencyFields,
    handlers::validation::reject,
    middleware::{
        i18n::Locale,
        rbac::{RequireCapability, Superadmin},
    },
    models::currency::Currency,
};

fn default_thousand_separator() -> String {
    ",".to_string()
}

fn default_decimal_separator() -> String {
    ".".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyPayload {
    #[validate(length(min = 1, max = 100, message = "validation.required"))]
    #[schema(example = "Brazil")]
    pub country: String,
    #[validate(length(min = 1, max = 100, message = "validation.required"))]
    #[schema(example = "Real")]
    pub currency: String,
    #[validate(length(min = 1, max = 25, message = "validation.required"))]
    #[schema(example = "BRL")]
    pub code: String,
    #[validate(length(min = 1, max = 25, message = "validation.required"))]
    #[schema(example = "R$")]
    pub symbol: String,

    #[serde(default = "default_thousand_separator")]
    #[validate(length(min = 1, max = 10, message = "validation.too_long"))]
    pub thousand_separator: String,
    #[serde(default = "default_decimal_separator")]
    #[validate(length(min = 1, max = 10, message = "validation.too_long"))]
    pub decimal_separator: String,
}

impl From<CurrencyPayload> for CurrencyFields {
    fn from(p: CurrencyPayload) -> Self {
        CurrencyFields {
            country: p.country.trim().to_string(),
            currency: p.currency.trim().to_string(),
            code: p.code.trim().to_uppercase(),
            symbol: p.symbol,
            thousand_separator: p.thousand_separator,
            decimal_separator: p.decimal_separator,
        }
    }
}

// GET /api/currencies
#[utoipa::path(
    get,
    path = "/api/currencies",
    tag = "Currencies",
    responses(
        (status = 200, description = "Moedas cadastradas", body = Vec<Currency>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_currencies(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let currencies = app_state
        .currency_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(currencies))
}

// POST /api/currencies
#[utoipa::path(
    post,
    path = "/api/currencies",
    tag = "Currencies",
    request_body = CurrencyPayload,
    responses(
        (status = 201, description = "Moeda criada", body = Currency),
        (status = 403, description = "Apenas superadmin"),
        (status = 409, description = "Moeda já cadastrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_currency(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireCapability<Superadmin>,
    Json(payload): Json<CurrencyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| reject(e, &locale, &app_state.i18n_store))?;

    let currency = app_state
        .currency_service
        .create(&payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(currency)))
}

// PUT /api/currencies/{id}
#[utoipa::path(
    put,
    path = "/api/currencies/{id}",
    tag = "Currencies",
    request_body = CurrencyPayload,
    params(("id" = i64, Path, description = "ID da moeda")),
    responses(
        (status = 200, description = "Moeda atualizada", body = Currency),
        (status = 404, description = "Moeda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_currency(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireCapability<Superadmin>,
    Path(id): Path<i64>,
    Json(payload): Json<CurrencyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| reject(e, &locale, &app_state.i18n_store))?;

    let currency = app_state
        .currency_service
        .update(id, &payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(currency))
}

// DELETE /api/currencies/{id}
#[utoipa::path(
    delete,
    path = "/api/currencies/{id}",
    tag = "Currencies",
    params(("id" = i64, Path, description = "ID da moeda")),
    responses(
        (status = 204, description = "Moeda excluída"),
        (status = 404, description = "Moeda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_currency(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireCapability<Superadmin>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .currency_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
