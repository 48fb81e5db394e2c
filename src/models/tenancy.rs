// src/models/tenancy.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub type BusinessId = i64;
pub type LocationId = i64;
pub type UserId = i64;

// ---
// 1. Business (a "Empresa", unidade de isolamento)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "accounting_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountingMethod {
    #[default]
    Fifo,
    Lifo,
    Avco,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    #[schema(example = 7)]
    pub id: BusinessId,

    #[schema(example = "Mercadinho Central")]
    pub name: String,

    pub currency_id: i64,
    pub start_date: Option<NaiveDate>,

    #[schema(example = "12.345.678/0001-99")]
    pub tax_number_1: String,
    #[schema(example = "CNPJ")]
    pub tax_label_1: String,
    pub tax_number_2: Option<String>,
    pub tax_label_2: Option<String>,

    pub default_profit_percent: Decimal,
    pub owner_id: i64,

    #[schema(example = "UTC")]
    pub time_zone: String,
    #[schema(example = 1)]
    pub fy_start_month: i16,
    pub accounting_method: AccountingMethod,
    pub default_sales_discount: Option<Decimal>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha da listagem: empresa + nomes da moeda e do dono.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessListing {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub business: Business,

    #[schema(example = "Real")]
    pub currency_name: Option<String>,
    #[schema(example = "Maria")]
    pub owner_name: Option<String>,
}

// ---
// 2. BusinessLocation (o "Local" físico)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessLocation {
    pub id: LocationId,
    pub business_id: BusinessId,

    #[schema(example = "Loja Centro")]
    pub name: String,
    pub location_code: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
