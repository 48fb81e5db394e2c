// src/models/dropdown.rs

use serde::{Serialize, Serializer};
use utoipa::ToSchema;

// Chave de uma opção: o ID da linha ou "" para as sentinelas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownKey {
    Empty,
    Id(i64),
}

impl Serialize for DropdownKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DropdownKey::Empty => serializer.serialize_str(""),
            DropdownKey::Id(id) => serializer.serialize_str(&id.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DropdownOption {
    #[schema(value_type = String, example = "1")]
    pub value: DropdownKey,
    #[schema(example = "Kilogram (Kg)")]
    pub label: String,
}

/// Lista ordenada de opções para selects.
/// Sai como array (e não objeto) para que as duas sentinelas de chave ""
/// sobrevivam à serialização.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Dropdown {
    options: Vec<DropdownOption>,
}

impl Dropdown {
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (i64, String)>,
    {
        Self {
            options: rows
                .into_iter()
                .map(|(id, label)| DropdownOption { value: DropdownKey::Id(id), label })
                .collect(),
        }
    }

    /// Insere as sentinelas no topo, sempre na ordem "nenhum" e depois "todos".
    pub fn with_sentinels(mut self, none: Option<String>, all: Option<String>) -> Self {
        let head: Vec<DropdownOption> = [none, all]
            .into_iter()
            .flatten()
            .map(|label| DropdownOption { value: DropdownKey::Empty, label })
            .collect();
        self.options.splice(0..0, head);
        self
    }

    pub fn options(&self) -> &[DropdownOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn preserves_row_order() {
        let d = Dropdown::from_rows([(3, "c".to_string()), (1, "a".to_string())]);
        assert_eq!(d.labels(), vec!["c", "a"]);
    }

    #[test]
    fn sentinels_head_the_list_none_then_all() {
        let d = Dropdown::from_rows([(5, "Bob".to_string())])
            .with_sentinels(Some("None".into()), Some("All".into()));
        assert_eq!(d.labels(), vec!["None", "All", "Bob"]);
        assert_eq!(d.options()[0].value, DropdownKey::Empty);
        assert_eq!(d.options()[1].value, DropdownKey::Empty);
        assert_eq!(d.options()[2].value, DropdownKey::Id(5));
    }

    #[test]
    fn empty_scope_keeps_sentinels() {
        let d = Dropdown::from_rows(Vec::new()).with_sentinels(None, Some("All".into()));
        assert_eq!(d.len(), 1);
        assert_eq!(d.options()[0].value, DropdownKey::Empty);
        assert!(Dropdown::from_rows(Vec::new()).with_sentinels(None, None).is_empty());
    }

    #[test]
    fn serializes_as_ordered_array() {
        let d = Dropdown::from_rows([(1, "Kg (Kg)".to_string())])
            .with_sentinels(Some("Please Select".into()), None);
        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!([
                { "value": "", "label": "Please Select" },
                { "value": "1", "label": "Kg (Kg)" }
            ])
        );
    }
}
