// src/handlers/auth.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::{
        auth::Profile,
        billing::{Plan, SubscriptionSummary},
    },
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPlanPayload {
    #[schema(example = 2)]
    pub plan_id: i64,
}

// GET /api/me
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Users",
    responses(
        (status = 200, description = "Perfil do usuário autenticado", body = Profile),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(actor): AuthenticatedUser) -> Json<Profile> {
    Json(Profile::from(actor))
}

// GET /api/me/locations
#[utoipa::path(
    get,
    path = "/api/me/locations",
    tag = "Users",
    responses(
        (status = 200, description = "\"all\" ou a lista de IDs de locais permitidos"),
        (status = 403, description = "Sem acesso à empresa")
    ),
    params(("x-business-id" = Option<i64>, Header, description = "ID da Empresa")),
    security(("api_jwt" = []))
)]
pub async fn get_my_locations(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let access = app_state
        .access_service
        .permitted_locations(&actor, tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "businessId": tenant.0, "locations": access })))
}

// GET /api/me/subscription
#[utoipa::path(
    get,
    path = "/api/me/subscription",
    tag = "Users",
    responses(
        (status = 200, description = "Situação da assinatura", body = SubscriptionSummary)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_subscription(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .subscription_service
        .summary(&actor)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}

// GET /api/me/subscription/{plan}
#[utoipa::path(
    get,
    path = "/api/me/subscription/{plan}",
    tag = "Users",
    params(("plan" = String, Path, description = "Nome do plano")),
    responses(
        (status = 200, description = "Se o usuário assina o plano")
    ),
    security(("api_jwt" = []))
)]
pub async fn subscribed_to_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(plan): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let subscribed = app_state
        .subscription_service
        .subscribed_to_plan(actor.id(), &plan)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "plan": plan, "subscribed": subscribed })))
}

// POST /api/me/plan
#[utoipa::path(
    post,
    path = "/api/me/plan",
    tag = "Users",
    request_body = SwitchPlanPayload,
    responses(
        (status = 200, description = "Plano trocado", body = Plan),
        (status = 403, description = "Sem assinatura ativa do plano"),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn switch_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<SwitchPlanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = app_state
        .subscription_service
        .switch_plans(&actor, payload.plan_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(plan)))
}
