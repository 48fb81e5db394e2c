// src/config.rs

use std::{env, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use axum::extract::FromRef;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    db::{
        BillingRepository, CatalogRepository, ContactRepository, CurrencyRepository,
        RbacRepository, TenantRepository, UserRepository,
    },
    services::{
        access_service::AccessService, auth::AuthService, business_service::BusinessService,
        catalog_service::CatalogService, contact_service::ContactService,
        currency_service::CurrencyService, dropdown_service::DropdownService,
        subscription_service::SubscriptionService, user_service::UserService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} deve ser definida")]
    Missing(&'static str),

    #[error("{name} inválida: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Configuração lida do ambiente (e do .env, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub default_locale: String,
    pub locales_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de qualquer fonte chave -> valor.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid { name: "BIND_ADDR", value: bind_raw.clone() })?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid { name: "DATABASE_MAX_CONNECTIONS", value: raw })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr,
            max_connections,
            default_locale: lookup("DEFAULT_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            locales_dir: lookup("LOCALES_DIR").map(PathBuf::from),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: Arc<I18nStore>,

    pub auth_service: AuthService,
    pub access_service: AccessService,
    pub dropdown_service: DropdownService,
    pub contact_service: ContactService,
    pub business_service: BusinessService,
    pub currency_service: CurrencyService,
    pub catalog_service: CatalogService,
    pub user_service: UserService,
    pub subscription_service: SubscriptionService,
}

impl FromRef<AppState> for Arc<I18nStore> {
    fn from_ref(state: &AppState) -> Self {
        state.i18n_store.clone()
    }
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let mut i18n_store = I18nStore::embedded(config.default_locale.clone())?;
        if let Some(dir) = &config.locales_dir {
            let loaded = i18n_store.load_dir(dir)?;
            tracing::info!("🌐 {} catálogo(s) de tradução carregado(s) de {}", loaded, dir.display());
        }

        Ok(Self::assemble(db_pool, Arc::new(i18n_store), config.jwt_secret.clone()))
    }

    // --- Monta o gráfico de dependências ---
    fn assemble(db_pool: PgPool, i18n_store: Arc<I18nStore>, jwt_secret: String) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let tenant_repo = TenantRepository::new(db_pool.clone());
        let rbac_repo = RbacRepository::new(db_pool.clone());
        let contact_repo = ContactRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let currency_repo = CurrencyRepository::new(db_pool.clone());
        let billing_repo = BillingRepository::new(db_pool.clone());

        let access_service = AccessService::new(tenant_repo.clone());

        Self {
            auth_service: AuthService::new(user_repo.clone(), jwt_secret),
            dropdown_service: DropdownService::new(
                catalog_repo.clone(),
                user_repo.clone(),
                currency_repo.clone(),
                access_service.clone(),
                i18n_store.clone(),
            ),
            contact_service: ContactService::new(contact_repo, db_pool.clone()),
            business_service: BusinessService::new(tenant_repo.clone(), db_pool.clone()),
            currency_service: CurrencyService::new(currency_repo),
            catalog_service: CatalogService::new(catalog_repo, db_pool.clone()),
            user_service: UserService::new(
                user_repo.clone(),
                rbac_repo,
                tenant_repo,
                access_service.clone(),
                db_pool.clone(),
            ),
            subscription_service: SubscriptionService::new(billing_repo, user_repo, db_pool.clone()),
            access_service,
            i18n_store,
            db_pool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_vars_are_absent() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/gestao"),
            ("JWT_SECRET", "s3cr3t"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.default_locale, "en");
        assert!(config.locales_dir.is_none());
    }

    #[test]
    fn missing_required_vars_are_reported() {
        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));

        let err = Config::from_lookup(lookup(&[("DATABASE_URL", " "), ("JWT_SECRET", "s")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let base = [("DATABASE_URL", "postgres://x"), ("JWT_SECRET", "s")];

        let mut pairs = base.to_vec();
        pairs.push(("BIND_ADDR", "localhost"));
        assert!(matches!(
            Config::from_lookup(lookup(&pairs)),
            Err(ConfigError::Invalid { name: "BIND_ADDR", .. })
        ));

        let mut pairs = base.to_vec();
        pairs.push(("DATABASE_MAX_CONNECTIONS", "0"));
        assert!(matches!(
            Config::from_lookup(lookup(&pairs)),
            Err(ConfigError::Invalid { name: "DATABASE_MAX_CONNECTIONS", .. })
        ));
    }
}
