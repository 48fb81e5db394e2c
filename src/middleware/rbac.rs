// src/middleware/rbac.rs

use std::{marker::PhantomData, sync::Arc};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    common::{
        error::{AppError, ApiError},
        i18n::I18nStore,
    },
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::access::{Capability, CapabilitySet},
};

/// 1. O Trait que define uma capacidade exigida pela rota
pub trait CapabilityDef: Send + Sync + 'static {
    fn capability() -> Capability;
}

/// Superadmin passa por qualquer guarda.
pub fn satisfies(caps: &CapabilitySet, required: &Capability) -> bool {
    caps.is_superadmin() || caps.contains(required)
}

/// 2. O Extractor (Guardião)
pub struct RequireCapability<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireCapability<T>
where
    T: CapabilityDef,
    S: Send + Sync,
    Arc<I18nStore>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(actor) = AuthenticatedUser::from_request_parts(parts, state).await?;

        let required = T::capability();
        if !satisfies(&actor.capabilities, &required) {
            tracing::warn!(user_id = actor.id(), %required, "capacidade ausente");
            let store = Arc::<I18nStore>::from_ref(state);
            let locale = Locale::from_headers(&parts.headers, store.default_locale());
            return Err(AppError::Forbidden.to_api_error(&locale, &store));
        }

        Ok(RequireCapability(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS CAPACIDADES (TIPOS)
// ---

pub struct Superadmin;
impl CapabilityDef for Superadmin {
    fn capability() -> Capability { Capability::Superadmin }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::tests::actor;
    use axum::http::{Request, StatusCode};

    async fn guard(caps: &[&str]) -> Result<RequireCapability<Superadmin>, ApiError> {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(AuthenticatedUser(actor(Some(1), &[], caps)));
        let state = Arc::new(I18nStore::embedded("en").unwrap());
        RequireCapability::<Superadmin>::from_request_parts(&mut parts, &state).await
    }

    #[tokio::test]
    async fn superadmin_passes() {
        assert!(guard(&["superadmin"]).await.is_ok());
    }

    #[tokio::test]
    async fn others_are_forbidden() {
        let err = guard(&["Admin#1", "access_all_locations"]).await.err().unwrap();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn named_capabilities_are_matched_exactly() {
        let caps = CapabilitySet::from_names(["user.view"]);
        assert!(satisfies(&caps, &Capability::Named("user.view".into())));
        assert!(!satisfies(&caps, &Capability::Named("user.create".into())));
    }
}
