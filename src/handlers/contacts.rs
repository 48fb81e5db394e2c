// src/handlers/contacts.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{db_utils::Trashed, error::ApiError},
    config::AppState,
    handlers::validation::reject,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::contacts::{
        Contact, ContactFields, ContactKind, ContactType, ContactTypeFilter, PayTermType,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ContactListParams {
    /// supplier | customer | both (padrão)
    #[serde(rename = "type")]
    pub contact_type: Option<String>,
    #[serde(default)]
    pub include_trashed: bool,
}

impl ContactListParams {
    fn filter(&self) -> ContactTypeFilter {
        ContactTypeFilter::parse(self.contact_type.as_deref())
    }
}

// ---
// Payload (criação e edição)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    /// Sem valor, usa o filtro `?type=` da requisição.
    #[serde(rename = "type")]
    pub contact_type: Option<ContactType>,
    pub kind: Option<ContactKind>,

    #[validate(length(max = 255, message = "validation.too_long"))]
    pub supplier_business_name: Option<String>,

    #[validate(length(min = 1, max = 255, message = "validation.required"))]
    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[validate(length(max = 255, message = "validation.too_long"))]
    pub tax_number: Option<String>,
    #[validate(length(max = 255, message = "validation.too_long"))]
    pub city: Option<String>,
    #[validate(length(max = 255, message = "validation.too_long"))]
    pub state: Option<String>,
    #[validate(length(max = 255, message = "validation.too_long"))]
    pub country: Option<String>,
    #[validate(length(max = 255, message = "validation.too_long"))]
    pub landmark: Option<String>,
    #[validate(length(max = 255, message = "validation.too_long"))]
    pub mobile: Option<String>,
    #[validate(length(max = 255, message = "validation.too_long"))]
    pub landline: Option<String>,
    #[validate(length(max = 255, message = "validation.too_long"))]
    pub alternate_number: Option<String>,

    #[validate(range(min = 0, message = "validation.out_of_range"))]
    pub pay_term_number: Option<i32>,
    pub pay_term_type: Option<PayTermType>,

    #[serde(default)]
    pub is_default: bool,
}

impl ContactPayload {
    pub fn into_fields(self, default_type: ContactType) -> ContactFields {
        ContactFields {
            contact_type: self.contact_type.unwrap_or(default_type),
            kind: self.kind,
            supplier_business_name: self.supplier_business_name,
            name: self.name.trim().to_string(),
            tax_number: self.tax_number,
            city: self.city,
            state: self.state,
            country: self.country,
            landmark: self.landmark,
            mobile: self.mobile,
            landline: self.landline,
            alternate_number: self.alternate_number,
            pay_term_number: self.pay_term_number,
            pay_term_type: self.pay_term_type,
            is_default: self.is_default,
        }
    }
}

// GET /api/contacts
#[utoipa::path(
    get,
    path = "/api/contacts",
    tag = "Contacts",
    params(
        ContactListParams,
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 200, description = "Contatos da empresa, por ID crescente", body = Vec<Contact>),
        (status = 403, description = "Sem acesso à empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_contacts(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
    Query(params): Query<ContactListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let contacts = app_state
        .contact_service
        .list(&actor, tenant.0, params.filter(), Trashed::from_flag(params.include_trashed))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(contacts))
}

// GET /api/contacts/{id}
#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    tag = "Contacts",
    params(
        ("id" = i64, Path, description = "ID do contato"),
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 200, description = "Contato", body = Contact),
        (status = 404, description = "Contato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = app_state
        .contact_service
        .get(&actor, tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(contact))
}

// POST /api/contacts
#[utoipa::path(
    post,
    path = "/api/contacts",
    tag = "Contacts",
    request_body = ContactPayload,
    params(
        ContactListParams,
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 201, description = "Contato criado", body = Contact),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
    Query(params): Query<ContactListParams>,
    Json(payload): Json<ContactPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| reject(e, &locale, &app_state.i18n_store))?;

    let fields = payload.into_fields(params.filter().default_type());
    let contact = app_state
        .contact_service
        .create(&actor, tenant.0, &fields)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(contact)))
}

// PUT /api/contacts/{id}
#[utoipa::path(
    put,
    path = "/api/contacts/{id}",
    tag = "Contacts",
    request_body = ContactPayload,
    params(
        ("id" = i64, Path, description = "ID do contato"),
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 200, description = "Contato atualizado", body = Contact),
        (status = 404, description = "Contato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<ContactPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| reject(e, &locale, &app_state.i18n_store))?;

    let current = app_state
        .contact_service
        .get(&actor, tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let fields = payload.into_fields(current.contact_type);
    let contact = app_state
        .contact_service
        .update(&actor, tenant.0, id, &fields)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(contact))
}

// DELETE /api/contacts/{id}
#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    tag = "Contacts",
    params(
        ("id" = i64, Path, description = "ID do contato"),
        ("x-business-id" = Option<i64>, Header, description = "ID da Empresa")
    ),
    responses(
        (status = 204, description = "Contato movido para a lixeira"),
        (status = 404, description = "Contato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .contact_service
        .delete(&actor, tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> ContactPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn type_defaults_to_the_listing_filter() {
        let fields = payload(r#"{"name": " Ana "}"#).into_fields(ContactType::Customer);
        assert_eq!(fields.contact_type, ContactType::Customer);
        assert_eq!(fields.name, "Ana");

        let fields = payload(r#"{"name": "Ana", "type": "supplier"}"#).into_fields(ContactType::Customer);
        assert_eq!(fields.contact_type, ContactType::Supplier);
    }

    #[test]
    fn empty_name_fails_validation() {
        let errors = payload(r#"{"name": ""}"#).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn negative_pay_term_fails_validation() {
        assert!(payload(r#"{"name": "Ana", "payTermNumber": -1}"#).validate().is_err());
        assert!(payload(r#"{"name": "Ana", "payTermNumber": 30, "payTermType": "days"}"#)
            .validate()
            .is_ok());
    }
}
