// src/middleware/tenancy.rs

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};

use crate::{
    common::{
        error::{ApiError, AppError},
        i18n::I18nStore,
    },
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::tenancy::BusinessId,
    services::access_service::{authorize_tenant, resolve_tenant},
};

// O nome do nosso cabeçalho HTTP customizado
const BUSINESS_ID_HEADER: &str = "x-business-id";

/// Empresa pedida explicitamente pelo cliente (cabeçalho X-Business-Id).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantHint(pub Option<BusinessId>);

impl TenantHint {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let Some(value) = headers.get(BUSINESS_ID_HEADER) else {
            return Ok(TenantHint(None));
        };

        let id = value
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<BusinessId>().ok())
            .ok_or(AppError::TenantNotResolved)?;

        Ok(TenantHint(Some(id)))
    }
}

impl<S> FromRequestParts<S> for TenantHint
where
    S: Send + Sync,
    Arc<I18nStore>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        TenantHint::from_headers(&parts.headers).map_err(|e| {
            let store = Arc::<I18nStore>::from_ref(state);
            let locale = Locale::from_headers(&parts.headers, store.default_locale());
            e.to_api_error(&locale, &store)
        })
    }
}

/// A empresa efetiva da requisição, já autorizada para o ator.
/// Ordem: cabeçalho -> empresa do usuário -> empresa do token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext(pub BusinessId);

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
    Arc<I18nStore>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = Arc::<I18nStore>::from_ref(state);
        let locale = Locale::from_headers(&parts.headers, store.default_locale());
        let reject = |e: AppError| e.to_api_error(&locale, &store);

        let AuthenticatedUser(actor) = AuthenticatedUser::from_request_parts(parts, state).await?;
        let TenantHint(explicit) = TenantHint::from_request_parts(parts, state).await?;

        let business_id = resolve_tenant(explicit, actor.user.business_id, actor.session_business_id)
            .ok_or(AppError::TenantNotResolved)
            .map_err(reject)?;

        authorize_tenant(&actor, business_id).map_err(reject)?;

        Ok(TenantContext(business_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::tests::actor;
    use axum::http::{Request, StatusCode};

    fn parts(business_header: Option<&str>, user: Option<AuthenticatedUser>) -> Parts {
        let mut builder = Request::builder().uri("/api/contacts");
        if let Some(value) = business_header {
            builder = builder.header(BUSINESS_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        if let Some(user) = user {
            parts.extensions.insert(user);
        }
        parts
    }

    fn state() -> Arc<I18nStore> {
        Arc::new(I18nStore::embedded("en").unwrap())
    }

    #[tokio::test]
    async fn hint_is_optional() {
        let mut p = parts(None, None);
        assert_eq!(TenantHint::from_request_parts(&mut p, &state()).await.unwrap(), TenantHint(None));

        let mut p = parts(Some(" 12 "), None);
        assert_eq!(TenantHint::from_request_parts(&mut p, &state()).await.unwrap(), TenantHint(Some(12)));
    }

    #[tokio::test]
    async fn malformed_hint_is_rejected() {
        let mut p = parts(Some("doze"), None);
        let err = TenantHint::from_request_parts(&mut p, &state()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(matches!(
            TenantHint::from_headers(&p.headers),
            Err(AppError::TenantNotResolved)
        ));
    }

    #[tokio::test]
    async fn falls_back_to_the_actor_business() {
        let mut p = parts(None, Some(AuthenticatedUser(actor(Some(7), &[], &[]))));
        let ctx = TenantContext::from_request_parts(&mut p, &state()).await.unwrap();
        assert_eq!(ctx, TenantContext(7));
    }

    #[tokio::test]
    async fn falls_back_to_the_session_business() {
        let mut a = actor(None, &[], &["superadmin"]);
        a.session_business_id = Some(3);
        let mut p = parts(None, Some(AuthenticatedUser(a)));
        let ctx = TenantContext::from_request_parts(&mut p, &state()).await.unwrap();
        assert_eq!(ctx, TenantContext(3));
    }

    #[tokio::test]
    async fn foreign_business_is_forbidden() {
        let mut p = parts(Some("8"), Some(AuthenticatedUser(actor(Some(7), &[], &[]))));
        let err = TenantContext::from_request_parts(&mut p, &state()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unresolved_business_is_a_bad_request() {
        let mut p = parts(None, Some(AuthenticatedUser(actor(None, &[], &[]))));
        let err = TenantContext::from_request_parts(&mut p, &state()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
