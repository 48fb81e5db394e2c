// src/models/contacts.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::tenancy::BusinessId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contact_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    Supplier,
    Customer,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contact_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Individual,
    Business,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pay_term_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PayTermType {
    Days,
    Months,
}

// ---
// Filtro da listagem (?type=supplier|customer|both)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContactTypeFilter {
    Supplier,
    Customer,
    #[default]
    Both,
}

impl ContactTypeFilter {
    /// Valores desconhecidos ou vazios caem em `Both`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("supplier") => ContactTypeFilter::Supplier,
            Some("customer") => ContactTypeFilter::Customer,
            _ => ContactTypeFilter::Both,
        }
    }

    /// Tipos de contato aceitos pelo filtro.
    pub fn types(self) -> &'static [ContactType] {
        match self {
            ContactTypeFilter::Supplier => &[ContactType::Supplier],
            ContactTypeFilter::Customer => &[ContactType::Customer],
            ContactTypeFilter::Both => &[ContactType::Supplier, ContactType::Customer],
        }
    }

    /// Tipo sugerido no formulário de criação.
    pub fn default_type(self) -> ContactType {
        match self {
            ContactTypeFilter::Supplier => ContactType::Supplier,
            ContactTypeFilter::Customer => ContactType::Customer,
            ContactTypeFilter::Both => ContactType::Both,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub business_id: BusinessId,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub contact_type: ContactType,
    #[sqlx(rename = "contact_type")]
    pub kind: Option<ContactKind>,

    pub supplier_business_name: Option<String>,

    #[schema(example = "Maria da Silva")]
    pub name: String,
    pub tax_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub landmark: Option<String>,
    pub mobile: Option<String>,
    pub landline: Option<String>,
    pub alternate_number: Option<String>,
    pub pay_term_number: Option<i32>,
    pub pay_term_type: Option<PayTermType>,

    pub created_by: i64,
    pub is_default: bool,

    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Campos editáveis de um contato (criação e atualização).
#[derive(Debug, Clone)]
pub struct ContactFields {
    pub contact_type: ContactType,
    pub kind: Option<ContactKind>,
    pub supplier_business_name: Option<String>,
    pub name: String,
    pub tax_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub landmark: Option<String>,
    pub mobile: Option<String>,
    pub landline: Option<String>,
    pub alternate_number: Option<String>,
    pub pay_term_number: Option<i32>,
    pub pay_term_type: Option<PayTermType>,
    pub is_default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_filters() {
        assert_eq!(ContactTypeFilter::parse(Some("supplier")), ContactTypeFilter::Supplier);
        assert_eq!(ContactTypeFilter::parse(Some(" Customer ")), ContactTypeFilter::Customer);
        assert_eq!(ContactTypeFilter::parse(Some("both")), ContactTypeFilter::Both);
    }

    #[test]
    fn parse_falls_back_to_both() {
        assert_eq!(ContactTypeFilter::parse(None), ContactTypeFilter::Both);
        assert_eq!(ContactTypeFilter::parse(Some("")), ContactTypeFilter::Both);
        assert_eq!(ContactTypeFilter::parse(Some("vendor")), ContactTypeFilter::Both);
    }

    #[test]
    fn customer_filter_only_admits_customers() {
        assert_eq!(ContactTypeFilter::Customer.types(), &[ContactType::Customer]);
        assert_eq!(
            ContactTypeFilter::Both.types(),
            &[ContactType::Supplier, ContactType::Customer]
        );
    }

    #[test]
    fn filter_suggests_creation_type() {
        assert_eq!(ContactTypeFilter::Supplier.default_type(), ContactType::Supplier);
        assert_eq!(ContactTypeFilter::Both.default_type(), ContactType::Both);
    }
}
