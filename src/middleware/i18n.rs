// src/middleware/i18n.rs

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts, HeaderMap};

use crate::common::i18n::I18nStore;

// Idioma preferido do cliente ("pt", "en", ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Locale {
    /// Primeira tag do Accept-Language, sem a região ("pt-BR" -> "pt").
    pub fn from_headers(headers: &HeaderMap, default_lang: &str) -> Self {
        let lang = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first()
                    .and_then(|tag| tag.split('-').next())
                    .map(str::to_lowercase)
            })
            .unwrap_or_else(|| default_lang.to_string());
        Locale(lang)
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
    Arc<I18nStore>: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = Arc::<I18nStore>::from_ref(state);
        Ok(Locale::from_headers(&parts.headers, store.default_locale()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(accept_language: Option<&str>) -> Locale {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = accept_language {
            builder = builder.header(header::ACCEPT_LANGUAGE, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        let state = Arc::new(I18nStore::new("pt"));
        Locale::from_request_parts(&mut parts, &state).await.unwrap()
    }

    #[tokio::test]
    async fn region_is_stripped() {
        assert_eq!(extract(Some("pt-BR,pt;q=0.9,en;q=0.8")).await, Locale("pt".into()));
    }

    #[tokio::test]
    async fn highest_quality_wins() {
        assert_eq!(extract(Some("fr;q=0.5, en-US")).await, Locale("en".into()));
    }

    #[tokio::test]
    async fn missing_header_uses_store_default() {
        assert_eq!(extract(None).await, Locale("pt".into()));
    }
}
