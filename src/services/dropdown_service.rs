// src/services/dropdown_service.rs

use std::sync::Arc;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::{error::AppError, i18n::I18nStore},
    db::{
        catalog_repo::UnitLabelRow, scope::ScopeDecision, user_repo::UserListFilter,
        CatalogRepository, CurrencyRepository, UserRepository,
    },
    models::{
        auth::Actor,
        currency::Currency,
        dropdown::Dropdown,
        tenancy::BusinessId,
    },
    services::access_service::AccessService,
};

const NONE_KEY: &str = "lang_v1.none";
const ALL_KEY: &str = "lang_v1.all";
const PLEASE_SELECT_KEY: &str = "messages.please_select";

// ---
// Rótulos derivados
// ---

/// "sobrenome nome", ignorando partes ausentes ou vazias.
pub fn user_full_name(surname: Option<&str>, name: Option<&str>) -> String {
    [surname, name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// "Kilogram (Kg)", ou só "Kilogram" sem abreviação.
pub fn unit_label(actual_name: &str, short_name: Option<&str>) -> String {
    let actual_name = actual_name.trim();
    match short_name.map(str::trim).filter(|s| !s.is_empty()) {
        Some(short) => format!("{actual_name} ({short})"),
        None => actual_name.to_string(),
    }
}

pub fn currency_label(currency: &Currency) -> String {
    format!("{} ({})", currency.currency, currency.code)
}

// ---
// Sentinelas
// ---

/// Quais entradas sintéticas ("" -> rótulo) vão no topo da lista.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sentinels {
    pub none: Option<&'static str>,
    pub all: bool,
}

impl Sentinels {
    pub fn none_if(flag: bool) -> Self {
        Self { none: flag.then_some(NONE_KEY), all: false }
    }

    pub fn with_all(mut self, flag: bool) -> Self {
        self.all = flag;
        self
    }

    pub fn apply(self, dropdown: Dropdown, store: &I18nStore, locale: &str) -> Dropdown {
        dropdown.with_sentinels(
            self.none.map(|key| store.translate(locale, key)),
            self.all.then(|| store.translate(locale, ALL_KEY)),
        )
    }
}

// ---
// Flags de cada builder (vêm da query string)
// ---

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UnitDropdownFlags {
    /// Inclui "Please Select" no topo.
    #[serde(default)]
    pub show_none: bool,
    /// Só unidades base (sem sub-unidades).
    #[serde(default = "yes")]
    pub only_base: bool,
}

impl Default for UnitDropdownFlags {
    fn default() -> Self {
        Self { show_none: false, only_base: true }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BrandDropdownFlags {
    #[serde(default)]
    pub show_none: bool,
    /// Só marcas usadas em consertos.
    #[serde(default)]
    pub only_repair: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserDropdownFlags {
    #[serde(default = "yes")]
    pub prepend_none: bool,
    #[serde(default)]
    pub include_commission_agents: bool,
    #[serde(default)]
    pub prepend_all: bool,
    /// Restringe aos usuários dos locais que o ator pode ver.
    #[serde(default)]
    pub check_location_permission: bool,
}

impl Default for UserDropdownFlags {
    fn default() -> Self {
        Self {
            prepend_none: true,
            include_commission_agents: false,
            prepend_all: false,
            check_location_permission: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SentinelFlags {
    #[serde(default = "yes")]
    pub prepend_none: bool,
    #[serde(default)]
    pub prepend_all: bool,
}

impl Default for SentinelFlags {
    fn default() -> Self {
        Self { prepend_none: true, prepend_all: false }
    }
}

// ---
// Montagem a partir das linhas (sem banco)
// ---

pub fn unit_dropdown(rows: Vec<UnitLabelRow>) -> Dropdown {
    Dropdown::from_rows(
        rows.into_iter()
            .map(|row| (row.id, unit_label(&row.actual_name, row.short_name.as_deref()))),
    )
}

pub fn user_dropdown<I>(rows: I) -> Dropdown
where
    I: IntoIterator<Item = crate::db::user_repo::UserLabelRow>,
{
    Dropdown::from_rows(
        rows.into_iter()
            .map(|row| (row.id, user_full_name(row.surname.as_deref(), row.name.as_deref()))),
    )
}

#[derive(Clone)]
pub struct DropdownService {
    catalog_repo: CatalogRepository,
    user_repo: UserRepository,
    currency_repo: CurrencyRepository,
    access: AccessService,
    i18n: Arc<I18nStore>,
}

impl DropdownService {
    pub fn new(
        catalog_repo: CatalogRepository,
        user_repo: UserRepository,
        currency_repo: CurrencyRepository,
        access: AccessService,
        i18n: Arc<I18nStore>,
    ) -> Self {
        Self { catalog_repo, user_repo, currency_repo, access, i18n }
    }

    pub async fn units(
        &self,
        business_id: BusinessId,
        flags: UnitDropdownFlags,
        locale: &str,
    ) -> Result<Dropdown, AppError> {
        let rows = self.catalog_repo.unit_label_rows(business_id, flags.only_base).await?;
        let sentinels = Sentinels {
            none: flags.show_none.then_some(PLEASE_SELECT_KEY),
            all: false,
        };
        Ok(sentinels.apply(unit_dropdown(rows), &self.i18n, locale))
    }

    pub async fn brands(
        &self,
        business_id: BusinessId,
        flags: BrandDropdownFlags,
        locale: &str,
    ) -> Result<Dropdown, AppError> {
        let rows = self.catalog_repo.brand_label_rows(business_id, flags.only_repair).await?;
        let dropdown = Dropdown::from_rows(rows.into_iter().map(|row| (row.id, row.name)));
        Ok(Sentinels::none_if(flags.show_none).apply(dropdown, &self.i18n, locale))
    }

    pub async fn users(
        &self,
        actor: &Actor,
        business_id: BusinessId,
        flags: UserDropdownFlags,
        locale: &str,
    ) -> Result<Dropdown, AppError> {
        let scope = if flags.check_location_permission {
            self.access.scope_for(actor, business_id).await?
        } else {
            ScopeDecision::Unrestricted
        };
        let filter = UserListFilter {
            include_commission_agents: flags.include_commission_agents,
            only_commission_agents: false,
        };
        let rows = self.user_repo.label_rows(business_id, filter, &scope).await?;
        let sentinels = Sentinels::none_if(flags.prepend_none).with_all(flags.prepend_all);
        Ok(sentinels.apply(user_dropdown(rows), &self.i18n, locale))
    }

    pub async fn sale_commission_agents(
        &self,
        business_id: BusinessId,
        prepend_none: bool,
        locale: &str,
    ) -> Result<Dropdown, AppError> {
        let filter = UserListFilter { include_commission_agents: true, only_commission_agents: true };
        let rows = self
            .user_repo
            .label_rows(business_id, filter, &ScopeDecision::Unrestricted)
            .await?;
        Ok(Sentinels::none_if(prepend_none).apply(user_dropdown(rows), &self.i18n, locale))
    }

    pub async fn all_users(
        &self,
        business_id: BusinessId,
        flags: SentinelFlags,
        locale: &str,
    ) -> Result<Dropdown, AppError> {
        let filter = UserListFilter { include_commission_agents: true, only_commission_agents: false };
        let rows = self
            .user_repo
            .label_rows(business_id, filter, &ScopeDecision::Unrestricted)
            .await?;
        let sentinels = Sentinels::none_if(flags.prepend_none).with_all(flags.prepend_all);
        Ok(sentinels.apply(user_dropdown(rows), &self.i18n, locale))
    }

    pub async fn customer_groups(
        &self,
        business_id: BusinessId,
        flags: SentinelFlags,
        locale: &str,
    ) -> Result<Dropdown, AppError> {
        let groups = self.catalog_repo.customer_groups(business_id).await?;
        let dropdown = Dropdown::from_rows(groups.into_iter().map(|g| (g.id, g.name)));
        let sentinels = Sentinels::none_if(flags.prepend_none).with_all(flags.prepend_all);
        Ok(sentinels.apply(dropdown, &self.i18n, locale))
    }

    /// Moedas são globais; não dependem de empresa.
    pub async fn currencies(&self) -> Result<Dropdown, AppError> {
        let currencies = self.currency_repo.list().await?;
        Ok(Dropdown::from_rows(
            currencies.iter().map(|c| (c.id, currency_label(c))),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::user_repo::UserLabelRow;
    use crate::models::dropdown::DropdownKey;

    fn store() -> I18nStore {
        I18nStore::embedded("en").unwrap()
    }

    fn unit_row(id: i64, name: &str, short: Option<&str>) -> UnitLabelRow {
        UnitLabelRow {
            id,
            actual_name: name.into(),
            short_name: short.map(Into::into),
        }
    }

    #[test]
    fn full_name_skips_missing_parts() {
        assert_eq!(user_full_name(None, Some("Alice")), "Alice");
        assert_eq!(user_full_name(Some("Mr"), Some("Bob")), "Mr Bob");
        assert_eq!(user_full_name(Some("  "), Some("Bob")), "Bob");
        assert_eq!(user_full_name(Some("Silva"), None), "Silva");
        assert_eq!(user_full_name(None, None), "");
    }

    #[test]
    fn unit_label_drops_missing_short_name() {
        assert_eq!(unit_label("Kg", Some("Kg")), "Kg (Kg)");
        assert_eq!(unit_label("Piece", None), "Piece");
        assert_eq!(unit_label("Piece", Some("")), "Piece");
    }

    #[test]
    fn base_units_only_scenario() {
        // O banco já devolve só as unidades base quando only_base = true.
        let dropdown = unit_dropdown(vec![unit_row(1, "Kg", Some("Kg"))]);
        assert_eq!(dropdown.len(), 1);
        assert_eq!(dropdown.options()[0].value, DropdownKey::Id(1));
        assert_eq!(dropdown.labels(), vec!["Kg (Kg)"]);
    }

    #[test]
    fn unit_flags_default_to_base_units_without_sentinel() {
        let flags = UnitDropdownFlags::default();
        assert!(flags.only_base);
        assert!(!flags.show_none);

        let parsed: UnitDropdownFlags = serde_json::from_str("{}").unwrap();
        assert!(parsed.only_base);
    }

    #[test]
    fn user_flags_default_to_none_sentinel() {
        let parsed: UserDropdownFlags = serde_json::from_str(r#"{"prependAll": true}"#).unwrap();
        assert!(parsed.prepend_none);
        assert!(parsed.prepend_all);
        assert!(!parsed.check_location_permission);
    }

    #[test]
    fn user_labels_never_show_null_placeholders() {
        let dropdown = user_dropdown(vec![
            UserLabelRow { id: 4, surname: None, name: Some("Alice".into()) },
            UserLabelRow { id: 2, surname: Some("Dr".into()), name: None },
        ]);
        assert_eq!(dropdown.labels(), vec!["Alice", "Dr"]);
    }

    #[test]
    fn empty_tenant_yields_only_sentinels_in_fixed_order() {
        let sentinels = Sentinels::none_if(true).with_all(true);
        let dropdown = sentinels.apply(user_dropdown(Vec::new()), &store(), "en");
        assert_eq!(dropdown.labels(), vec!["None", "All"]);
        assert!(dropdown.options().iter().all(|o| o.value == DropdownKey::Empty));
    }

    #[test]
    fn sentinel_labels_follow_locale() {
        let dropdown = Sentinels::none_if(true)
            .with_all(true)
            .apply(Dropdown::default(), &store(), "pt");
        assert_eq!(dropdown.labels(), vec!["Nenhum", "Todos"]);
    }

    #[test]
    fn please_select_is_used_for_units() {
        let sentinels = Sentinels { none: Some(PLEASE_SELECT_KEY), all: false };
        let dropdown = sentinels.apply(unit_dropdown(vec![unit_row(1, "Kg", Some("Kg"))]), &store(), "en");
        assert_eq!(dropdown.labels(), vec!["Please Select", "Kg (Kg)"]);
    }

    #[test]
    fn no_sentinels_requested() {
        let dropdown = Sentinels::none_if(false).apply(Dropdown::default(), &store(), "en");
        assert!(dropdown.is_empty());
    }
}
