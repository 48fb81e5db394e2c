// src/handlers/catalog.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use crate::{
    common::{db_utils::Trashed, error::ApiError},
    config::AppState,
    handlers::validation::{field_error, reject},
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::catalog::{Brand, Unit},
    services::catalog_service::NewUnit,
};

// ---
// 1. Unidades
// ---
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UnitListParams {
    /// Aninha as sub-unidades sob a unidade base.
    #[serde(default)]
    pub with_sub_units: bool,
    #[serde(default)]
    pub include_trashed: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitPayload {
    #[validate(length(min = 1, max = 255, message = "validation.required"))]
    #[schema(example = "Gram")]
    pub actual_name: String,
    #[validate(length(max = 255, message = "validation.too_long"))]
    #[schema(example = "g")]
    pub short_name: Option<String>,
    #[serde(default)]
    pub allow_decimal: bool,
    pub base_unit_id: Option<i64>,
    #[schema(example = 0.001)]
    pub base_unit_multiplier: Option<Decimal>,
}

impl UnitPayload {
    /// Sub-unidade exige multiplicador positivo; unidade base não usa multiplicador.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        match (self.base_unit_id, self.base_unit_multiplier) {
            (Some(_), Some(m)) if m > Decimal::ZERO => Ok(()),
            (Some(_), _) => Err(field_error(
                "base_unit_multiplier",
                "range",
                "validation.out_of_range",
            )),
            (None, _) => Ok(()),
        }
    }

    pub fn into_new_unit(self) -> NewUnit {
        let short_name = self
            .short_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        NewUnit {
            actual_name: self.actual_name.trim().to_string(),
            short_name,
            allow_decimal: self.allow_decimal,
            base_unit_multiplier: self.base_unit_id.and(self.base_unit_multiplier),
            base_unit_id: self.base_unit_id,
        }
    }
}

// GET /api/units
#[utoipa::path(
    get,
    path = "/api/units",
    tag = "Catalog",
    params(
        UnitListParams,
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 200, description = "Unidades da empresa; com withSubUnits=true vem no formato UnitWithSubUnits", body = Vec<Unit>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_units(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(params): Query<UnitListParams>,
) -> Result<Response, ApiError> {
    if params.with_sub_units {
        let grouped = app_state
            .catalog_service
            .list_units_grouped(tenant.0)
            .await
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
        return Ok(Json(grouped).into_response());
    }

    let units = app_state
        .catalog_service
        .list_units(tenant.0, Trashed::from_flag(params.include_trashed))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(units).into_response())
}

// POST /api/units
#[utoipa::path(
    post,
    path = "/api/units",
    tag = "Catalog",
    request_body = UnitPayload,
    params(("x-business-id" = Option<i64>, Header, description = "ID da Empresa")),
    responses(
        (status = 201, description = "Unidade criada", body = Unit),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Unidade base não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
    Json(payload): Json<UnitPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .check()
        .map_err(|e| reject(e, &locale, &app_state.i18n_store))?;

    let unit = app_state
        .catalog_service
        .create_unit(&actor, tenant.0, &payload.into_new_unit())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(unit)))
}

// DELETE /api/units/{id}
#[utoipa::path(
    delete,
    path = "/api/units/{id}",
    tag = "Catalog",
    params(
        ("id" = i64, Path, description = "ID da unidade"),
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 204, description = "Unidade movida para a lixeira"),
        (status = 404, description = "Unidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_unit(tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// 2. Marcas
// ---
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BrandListParams {
    #[serde(default)]
    pub include_trashed: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandPayload {
    #[validate(length(min = 1, max = 255, message = "validation.required"))]
    #[schema(example = "Acme")]
    pub name: String,
    #[validate(length(max = 1000, message = "validation.too_long"))]
    pub description: Option<String>,
    #[serde(default)]
    pub use_for_repair: bool,
}

// GET /api/brands
#[utoipa::path(
    get,
    path = "/api/brands",
    tag = "Catalog",
    params(
        BrandListParams,
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 200, description = "Marcas da empresa", body = Vec<Brand>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_brands(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(params): Query<BrandListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let brands = app_state
        .catalog_service
        .list_brands(tenant.0, Trashed::from_flag(params.include_trashed))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(brands))
}

// POST /api/brands
#[utoipa::path(
    post,
    path = "/api/brands",
    tag = "Catalog",
    request_body = BrandPayload,
    params(("x-business-id" = Option<i64>, Header, description = "ID da Empresa")),
    responses(
        (status = 201, description = "Marca criada", body = Brand),
        (status = 409, description = "Marca já cadastrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
    Json(payload): Json<BrandPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| reject(e, &locale, &app_state.i18n_store))?;

    let brand = app_state
        .catalog_service
        .create_brand(
            &actor,
            tenant.0,
            payload.name.trim(),
            payload.description.as_deref(),
            payload.use_for_repair,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(brand)))
}

// DELETE /api/brands/{id}
#[utoipa::path(
    delete,
    path = "/api/brands/{id}",
    tag = "Catalog",
    params(
        ("id" = i64, Path, description = "ID da marca"),
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 204, description = "Marca movida para a lixeira"),
        (status = 404, description = "Marca não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_brand(tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> UnitPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn base_unit_needs_no_multiplier() {
        assert!(payload(r#"{"actualName": "Kilogram", "shortName": "Kg"}"#).check().is_ok());
    }

    #[test]
    fn sub_unit_requires_positive_multiplier() {
        let errors = payload(r#"{"actualName": "Gram", "baseUnitId": 1}"#).check().unwrap_err();
        assert!(errors.field_errors().contains_key("base_unit_multiplier"));

        assert!(payload(r#"{"actualName": "Gram", "baseUnitId": 1, "baseUnitMultiplier": 0}"#)
            .check()
            .is_err());
        assert!(payload(r#"{"actualName": "Gram", "baseUnitId": 1, "baseUnitMultiplier": 0.001}"#)
            .check()
            .is_ok());
    }

    #[test]
    fn blank_short_name_is_dropped() {
        let unit = payload(r#"{"actualName": " Pieces ", "shortName": "  ", "baseUnitMultiplier": 2}"#)
            .into_new_unit();
        assert_eq!(unit.actual_name, "Pieces");
        assert_eq!(unit.short_name, None);
        // Sem unidade base, o multiplicador é descartado.
        assert_eq!(unit.base_unit_multiplier, None);
    }
}
