// src/common/i18n.rs

use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;

// Catálogos embutidos no binário. Um diretório externo pode sobrescrevê-los.
const EMBEDDED_CATALOGS: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("pt", include_str!("../../locales/pt.json")),
];

/// Tabela de traduções: idioma -> (chave -> texto).
#[derive(Debug, Clone)]
pub struct I18nStore {
    default_locale: String,
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            catalogs: HashMap::new(),
        }
    }

    /// Carrega os catálogos que acompanham o binário.
    pub fn embedded(default_locale: impl Into<String>) -> anyhow::Result<Self> {
        let mut store = Self::new(default_locale);
        for (locale, raw) in EMBEDDED_CATALOGS {
            store.merge_json(locale, raw)?;
        }
        Ok(store)
    }

    /// Sobrescreve/complementa com arquivos `<locale>.json` de um diretório.
    pub fn load_dir(&mut self, dir: &Path) -> anyhow::Result<usize> {
        let mut loaded = 0;
        for entry in fs::read_dir(dir).with_context(|| format!("lendo {}", dir.display()))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(locale) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("lendo {}", path.display()))?;
            self.merge_json(locale, &raw)?;
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn merge_json(&mut self, locale: &str, raw: &str) -> anyhow::Result<()> {
        let entries: HashMap<String, String> = serde_json::from_str(raw)
            .with_context(|| format!("catálogo '{}' inválido", locale))?;
        self.catalogs
            .entry(locale.to_string())
            .or_default()
            .extend(entries);
        Ok(())
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Resolve uma chave: idioma pedido -> idioma padrão -> a própria chave.
    pub fn translate(&self, locale: &str, key: &str) -> String {
        self.lookup(locale, key)
            .or_else(|| self.lookup(&self.default_locale, key))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        self.catalogs
            .get(locale)
            .and_then(|catalog| catalog.get(key))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalogs_cover_sentinel_keys() {
        let store = I18nStore::embedded("en").unwrap();
        assert_eq!(store.translate("en", "lang_v1.none"), "None");
        assert_eq!(store.translate("en", "lang_v1.all"), "All");
        assert_eq!(store.translate("pt", "lang_v1.all"), "Todos");
        assert_eq!(store.translate("pt", "messages.please_select"), "Selecione");
    }

    #[test]
    fn unknown_locale_falls_back_to_default() {
        let store = I18nStore::embedded("en").unwrap();
        assert_eq!(store.translate("de", "lang_v1.none"), "None");
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        let store = I18nStore::embedded("en").unwrap();
        assert_eq!(store.translate("pt", "nao.existe"), "nao.existe");
    }

    #[test]
    fn merge_overrides_existing_entries() {
        let mut store = I18nStore::embedded("en").unwrap();
        store.merge_json("en", r#"{"lang_v1.none": "Nothing"}"#).unwrap();
        assert_eq!(store.translate("en", "lang_v1.none"), "Nothing");
        assert_eq!(store.translate("en", "lang_v1.all"), "All");
    }

    #[test]
    fn invalid_catalog_is_rejected() {
        let mut store = I18nStore::new("en");
        assert!(store.merge_json("en", "[1, 2]").is_err());
    }
}
