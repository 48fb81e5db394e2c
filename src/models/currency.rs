// src/models/currency.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// Moedas são globais: não pertencem a nenhuma empresa.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: i64,

    #[schema(example = "Brazil")]
    pub country: String,

    #[schema(example = "Real")]
    pub currency: String,

    #[schema(example = "BRL")]
    pub code: String,

    #[schema(example = "R$")]
    pub symbol: String,

    #[schema(example = ".")]
    pub thousand_separator: String,

    #[schema(example = ",")]
    pub decimal_separator: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
