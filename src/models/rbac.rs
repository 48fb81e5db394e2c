// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// O que sai do banco (Tabela Permissions)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[schema(example = 3)]
    pub id: i64,

    #[schema(example = "location.4")]
    pub name: String,
}

// Payload para definir os locais de um usuário
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetUserLocationsPayload {
    #[schema(example = json!([1, 4]))]
    pub location_ids: Vec<i64>,
}
