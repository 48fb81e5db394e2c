// src/handlers/users.rs

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
    models::auth::User,
};

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(("x-business-id" = Option<i64>, Header, description = "ID da Empresa")),
    responses(
        (status = 200, description = "Usuários da empresa nos locais permitidos", body = Vec<User>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let users = app_state
        .user_service
        .list(&actor, tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(users))
}

// GET /api/users/{id}/selected-contacts
#[utoipa::path(
    get,
    path = "/api/users/{id}/selected-contacts",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "ID do usuário"),
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 200, description = "Se o usuário só vê contatos selecionados"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn selected_contacts(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let flag = app_state
        .user_service
        .is_selected_contacts(&actor, tenant.0, user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "userId": user_id, "selectedContacts": flag })))
}
