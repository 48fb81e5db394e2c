// src/handlers/rbac.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::rbac::{Permission, SetUserLocationsPayload},
};

// GET /api/permissions (para a tela de permissões do frontend)
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "RBAC",
    responses(
        (status = 200, description = "Permissões cadastradas", body = Vec<Permission>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_permissions(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let permissions = app_state
        .user_service
        .list_permissions()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(permissions))
}

// PUT /api/users/{id}/locations
#[utoipa::path(
    put,
    path = "/api/users/{id}/locations",
    tag = "RBAC",
    request_body = SetUserLocationsPayload,
    params(
        ("id" = i64, Path, description = "ID do usuário"),
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 200, description = "Permissões de local concedidas"),
        (status = 403, description = "Apenas administradores"),
        (status = 404, description = "Usuário ou local não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_user_locations(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
    Path(user_id): Path<i64>,
    Json(payload): Json<SetUserLocationsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let permissions = app_state
        .user_service
        .set_locations(&actor, tenant.0, user_id, &payload.location_ids)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "userId": user_id, "permissions": permissions })))
}
