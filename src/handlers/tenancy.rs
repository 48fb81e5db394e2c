// src/handlers/tenancy.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    common::error::ApiError,
    config::AppState,
    db::tenancy_repo::BusinessFields,
    handlers::validation::{reject, validate_not_negative, validate_percent},
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::tenancy::{AccountingMethod, Business, BusinessListing, BusinessLocation},
    services::{access_service::ensure_can_manage, business_service::TIME_ZONES},
};

fn validate_time_zone(tz: &str) -> Result<(), ValidationError> {
    if TIME_ZONES.contains(&tz) {
        return Ok(());
    }
    let mut err = ValidationError::new("invalid_choice");
    err.message = Some("validation.invalid_choice".into());
    Err(err)
}

fn default_time_zone() -> String {
    TIME_ZONES[0].to_string()
}

fn default_fy_start_month() -> i16 {
    1
}

// ---
// 1. Empresas
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessPayload {
    #[validate(length(min = 1, max = 255, message = "validation.too_long"))]
    #[schema(example = "Mercadinho Central")]
    pub name: String,

    #[schema(example = 1)]
    pub currency_id: i64,
    pub start_date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 100, message = "validation.too_long"))]
    pub tax_number_1: String,
    #[validate(length(min = 1, max = 10, message = "validation.too_long"))]
    pub tax_label_1: String,
    #[validate(length(max = 100, message = "validation.too_long"))]
    pub tax_number_2: Option<String>,
    #[validate(length(max = 10, message = "validation.too_long"))]
    pub tax_label_2: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_percent"))]
    pub default_profit_percent: Decimal,

    #[serde(default = "default_time_zone")]
    #[validate(custom(function = "validate_time_zone"))]
    #[schema(example = "UTC")]
    pub time_zone: String,

    #[serde(default = "default_fy_start_month")]
    #[validate(range(min = 1, max = 12, message = "validation.out_of_range"))]
    pub fy_start_month: i16,

    #[serde(default)]
    pub accounting_method: AccountingMethod,

    #[validate(custom(function = "validate_not_negative"))]
    pub default_sales_discount: Option<Decimal>,
}

impl From<BusinessPayload> for BusinessFields {
    fn from(p: BusinessPayload) -> Self {
        BusinessFields {
            name: p.name.trim().to_string(),
            currency_id: p.currency_id,
            start_date: p.start_date,
            tax_number_1: p.tax_number_1,
            tax_label_1: p.tax_label_1,
            tax_number_2: p.tax_number_2,
            tax_label_2: p.tax_label_2,
            default_profit_percent: p.default_profit_percent,
            time_zone: p.time_zone,
            fy_start_month: p.fy_start_month,
            accounting_method: p.accounting_method,
            default_sales_discount: p.default_sales_discount,
        }
    }
}

// GET /api/businesses
#[utoipa::path(
    get,
    path = "/api/businesses",
    tag = "Businesses",
    responses(
        (status = 200, description = "Empresas visíveis ao usuário", body = Vec<BusinessListing>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_businesses(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let businesses = app_state
        .business_service
        .list(&actor)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(businesses))
}

// POST /api/businesses
#[utoipa::path(
    post,
    path = "/api/businesses",
    tag = "Businesses",
    request_body = BusinessPayload,
    responses(
        (status = 201, description = "Empresa criada; o usuário vira o dono", body = Business),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_business(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<BusinessPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| reject(e, &locale, &app_state.i18n_store))?;

    let business = app_state
        .business_service
        .create(&actor, &payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(business)))
}

// PUT /api/businesses/{id}
#[utoipa::path(
    put,
    path = "/api/businesses/{id}",
    tag = "Businesses",
    request_body = BusinessPayload,
    params(("id" = i64, Path, description = "ID da Empresa")),
    responses(
        (status = 200, description = "Empresa atualizada", body = Business),
        (status = 403, description = "Empresa de outro usuário ou sem permissão de administrador"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_business(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<BusinessPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| reject(e, &locale, &app_state.i18n_store))?;

    let business = app_state
        .business_service
        .update(&actor, id, &payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(business))
}

// DELETE /api/businesses/{id}
#[utoipa::path(
    delete,
    path = "/api/businesses/{id}",
    tag = "Businesses",
    params(("id" = i64, Path, description = "ID da Empresa")),
    responses(
        (status = 204, description = "Empresa excluída"),
        (status = 403, description = "Empresa de outro usuário ou sem permissão de administrador"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_business(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .business_service
        .delete(&actor, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// 2. Locais
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationPayload {
    #[validate(length(min = 1, max = 255, message = "validation.required"))]
    #[schema(example = "Loja Centro")]
    pub name: String,
    #[validate(length(max = 255, message = "validation.too_long"))]
    pub location_code: Option<String>,
    #[validate(length(max = 255, message = "validation.too_long"))]
    pub city: Option<String>,
}

// GET /api/locations
#[utoipa::path(
    get,
    path = "/api/locations",
    tag = "Locations",
    params(("x-business-id" = Option<i64>, Header, description = "ID da Empresa")),
    responses(
        (status = 200, description = "Locais que o usuário pode ver", body = Vec<BusinessLocation>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_locations(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let scope = app_state
        .access_service
        .scope_for(&actor, tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let locations = app_state
        .business_service
        .list_locations(tenant.0, &scope)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(locations))
}

// POST /api/locations
#[utoipa::path(
    post,
    path = "/api/locations",
    tag = "Locations",
    request_body = CreateLocationPayload,
    params(("x-business-id" = Option<i64>, Header, description = "ID da Empresa")),
    responses(
        (status = 201, description = "Local criado", body = BusinessLocation),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_location(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
    Json(payload): Json<CreateLocationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| reject(e, &locale, &app_state.i18n_store))?;

    ensure_can_manage(&actor, tenant.0)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let location = app_state
        .business_service
        .create_location(
            tenant.0,
            payload.name.trim(),
            payload.location_code.as_deref(),
            payload.city.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(location)))
}

// GET /api/locations/{id}/access
#[utoipa::path(
    get,
    path = "/api/locations/{id}/access",
    tag = "Locations",
    params(
        ("id" = i64, Path, description = "ID do Local"),
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 200, description = "Se o usuário pode acessar o local")
    ),
    security(("api_jwt" = []))
)]
pub async fn location_access(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let allowed = app_state
        .access_service
        .can_access_this_location(&actor, tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "locationId": id, "allowed": allowed })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(extra: &str) -> BusinessPayload {
        serde_json::from_str(&format!(
            r#"{{"name": "Loja", "currencyId": 1, "taxNumber1": "123", "taxLabel1": "CNPJ"{extra}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let p = payload("");
        assert_eq!(p.time_zone, "Asia/Kolkata");
        assert_eq!(p.fy_start_month, 1);
        assert_eq!(p.accounting_method, AccountingMethod::Fifo);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn fiscal_year_month_is_bounded() {
        let errors = payload(r#", "fyStartMonth": 13"#).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("fy_start_month"));
    }

    #[test]
    fn unknown_time_zone_is_rejected() {
        assert!(payload(r#", "timeZone": "Mars/Olympus""#).validate().is_err());
        assert!(payload(r#", "timeZone": "UTC""#).validate().is_ok());
    }

    #[test]
    fn tax_label_is_short() {
        assert!(payload("").validate().is_ok());
        let long = BusinessPayload { tax_label_1: "X".repeat(11), ..payload("") };
        assert!(long.validate().is_err());
    }

    #[test]
    fn accounting_method_is_an_enum() {
        let p = payload(r#", "accountingMethod": "avco""#);
        assert_eq!(p.accounting_method, AccountingMethod::Avco);
        assert!(serde_json::from_str::<BusinessPayload>(
            r#"{"name": "L", "currencyId": 1, "taxNumber1": "1", "taxLabel1": "T", "accountingMethod": "lifo2"}"#
        )
        .is_err());
    }
}
