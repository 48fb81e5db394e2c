// src/handlers/dropdowns.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::dropdown::DropdownOption,
    services::dropdown_service::{
        BrandDropdownFlags, SentinelFlags, UnitDropdownFlags, UserDropdownFlags,
    },
};

// GET /api/dropdowns/units
#[utoipa::path(
    get,
    path = "/api/dropdowns/units",
    tag = "Dropdowns",
    params(
        UnitDropdownFlags,
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 200, description = "Opções de unidades, na ordem de exibição", body = Vec<DropdownOption>)
    ),
    security(("api_jwt" = []))
)]
pub async fn units(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(flags): Query<UnitDropdownFlags>,
) -> Result<impl IntoResponse, ApiError> {
    let dropdown = app_state
        .dropdown_service
        .units(tenant.0, flags, &locale.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dropdown))
}

// GET /api/dropdowns/brands
#[utoipa::path(
    get,
    path = "/api/dropdowns/brands",
    tag = "Dropdowns",
    params(
        BrandDropdownFlags,
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 200, description = "Marcas em ordem alfabética", body = Vec<DropdownOption>)
    ),
    security(("api_jwt" = []))
)]
pub async fn brands(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(flags): Query<BrandDropdownFlags>,
) -> Result<impl IntoResponse, ApiError> {
    let dropdown = app_state
        .dropdown_service
        .brands(tenant.0, flags, &locale.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dropdown))
}

// GET /api/dropdowns/users
#[utoipa::path(
    get,
    path = "/api/dropdowns/users",
    tag = "Dropdowns",
    params(
        UserDropdownFlags,
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 200, description = "Usuários da empresa", body = Vec<DropdownOption>)
    ),
    security(("api_jwt" = []))
)]
pub async fn users(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
    Query(flags): Query<UserDropdownFlags>,
) -> Result<impl IntoResponse, ApiError> {
    let dropdown = app_state
        .dropdown_service
        .users(&actor, tenant.0, flags, &locale.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dropdown))
}

// GET /api/dropdowns/commission-agents
#[utoipa::path(
    get,
    path = "/api/dropdowns/commission-agents",
    tag = "Dropdowns",
    params(
        SentinelFlags,
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 200, description = "Agentes de comissão", body = Vec<DropdownOption>)
    ),
    security(("api_jwt" = []))
)]
pub async fn commission_agents(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(flags): Query<SentinelFlags>,
) -> Result<impl IntoResponse, ApiError> {
    let dropdown = app_state
        .dropdown_service
        .sale_commission_agents(tenant.0, flags.prepend_none, &locale.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dropdown))
}

// GET /api/dropdowns/all-users
#[utoipa::path(
    get,
    path = "/api/dropdowns/all-users",
    tag = "Dropdowns",
    params(
        SentinelFlags,
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 200, description = "Todos os usuários, inclusive agentes", body = Vec<DropdownOption>)
    ),
    security(("api_jwt" = []))
)]
pub async fn all_users(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(flags): Query<SentinelFlags>,
) -> Result<impl IntoResponse, ApiError> {
    let dropdown = app_state
        .dropdown_service
        .all_users(tenant.0, flags, &locale.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dropdown))
}

// GET /api/dropdowns/customer-groups
#[utoipa::path(
    get,
    path = "/api/dropdowns/customer-groups",
    tag = "Dropdowns",
    params(
        SentinelFlags,
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 200, description = "Grupos de clientes", body = Vec<DropdownOption>)
    ),
    security(("api_jwt" = []))
)]
pub async fn customer_groups(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(flags): Query<SentinelFlags>,
) -> Result<impl IntoResponse, ApiError> {
    let dropdown = app_state
        .dropdown_service
        .customer_groups(tenant.0, flags, &locale.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dropdown))
}

// GET /api/dropdowns/currencies
#[utoipa::path(
    get,
    path = "/api/dropdowns/currencies",
    tag = "Dropdowns",
    responses(
        (status = 200, description = "Moedas (globais)", body = Vec<DropdownOption>)
    ),
    security(("api_jwt" = []))
)]
pub async fn currencies(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let dropdown = app_state
        .dropdown_service
        .currencies()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dropdown))
}
