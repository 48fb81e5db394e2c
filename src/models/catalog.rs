// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::tenancy::BusinessId;

// --- 1. Unidades de Medida ---
// Uma unidade sem `base_unit_id` é uma unidade base (ex: "Kg");
// as demais são sub-unidades dela (ex: "g" = 0.001 Kg).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: i64,
    pub business_id: BusinessId,

    #[schema(example = "Kilogram")]
    pub actual_name: String,
    #[schema(example = "Kg")]
    pub short_name: Option<String>,

    pub allow_decimal: bool,
    pub base_unit_id: Option<i64>,
    pub base_unit_multiplier: Option<Decimal>,

    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Unit {
    pub fn is_base(&self) -> bool {
        self.base_unit_id.is_none()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitWithSubUnits {
    #[serde(flatten)]
    pub unit: Unit,
    pub sub_units: Vec<Unit>,
}

// --- 2. Marcas ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: i64,
    pub business_id: BusinessId,

    #[schema(example = "Acme")]
    pub name: String,
    pub description: Option<String>,
    pub use_for_repair: bool,

    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 3. Grupos de Clientes ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerGroup {
    pub id: i64,
    pub business_id: BusinessId,

    #[schema(example = "Atacado")]
    pub name: String,
    pub amount: Decimal,
}

/// Agrupa sub-unidades sob a unidade base, mantendo a ordem recebida.
pub fn group_sub_units(units: Vec<Unit>) -> Vec<UnitWithSubUnits> {
    let (bases, subs): (Vec<Unit>, Vec<Unit>) = units.into_iter().partition(Unit::is_base);
    bases
        .into_iter()
        .map(|unit| {
            let sub_units = subs
                .iter()
                .filter(|s| s.base_unit_id == Some(unit.id))
                .cloned()
                .collect();
            UnitWithSubUnits { unit, sub_units }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: i64, name: &str, base: Option<i64>) -> Unit {
        let now = Utc::now();
        Unit {
            id,
            business_id: 7,
            actual_name: name.into(),
            short_name: Some(name.into()),
            allow_decimal: false,
            base_unit_id: base,
            base_unit_multiplier: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn sub_units_are_nested_under_their_base() {
        let grouped = group_sub_units(vec![
            unit(1, "Kg", None),
            unit(2, "g", Some(1)),
            unit(3, "L", None),
        ]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].unit.id, 1);
        assert_eq!(grouped[0].sub_units.iter().map(|u| u.id).collect::<Vec<_>>(), vec![2]);
        assert!(grouped[1].sub_units.is_empty());
    }

    #[test]
    fn orphan_sub_units_are_dropped() {
        let grouped = group_sub_units(vec![unit(5, "ml", Some(99))]);
        assert!(grouped.is_empty());
    }
}
