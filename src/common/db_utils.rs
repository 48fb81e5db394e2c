// src/common/db_utils.rs

use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use utoipa::ToSchema;

// ---
// Soft delete: linhas com `deleted_at` preenchido ficam fora das consultas
// padrão, mas continuam no banco para auditoria.
// ---
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trashed {
    #[default]
    Exclude,
    Include,
    Only,
}

impl Trashed {
    pub fn from_flag(include_trashed: bool) -> Self {
        if include_trashed { Trashed::Include } else { Trashed::Exclude }
    }

    /// Acrescenta o predicado de soft delete para a tabela/alias informado.
    pub fn push_predicate(self, qb: &mut QueryBuilder<'_, Postgres>, alias: &str) {
        match self {
            Trashed::Exclude => {
                qb.push(format!(" AND {alias}.deleted_at IS NULL"));
            }
            Trashed::Only => {
                qb.push(format!(" AND {alias}.deleted_at IS NOT NULL"));
            }
            Trashed::Include => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> QueryBuilder<'static, Postgres> {
        QueryBuilder::new("SELECT * FROM brands b WHERE b.business_id = 1")
    }

    #[test]
    fn default_excludes_deleted_rows() {
        let mut qb = base();
        Trashed::default().push_predicate(&mut qb, "b");
        assert!(qb.sql().ends_with("AND b.deleted_at IS NULL"));
    }

    #[test]
    fn include_leaves_query_untouched() {
        let mut qb = base();
        Trashed::from_flag(true).push_predicate(&mut qb, "b");
        assert_eq!(qb.sql(), "SELECT * FROM brands b WHERE b.business_id = 1");
    }

    #[test]
    fn only_selects_deleted_rows() {
        let mut qb = base();
        Trashed::Only.push_predicate(&mut qb, "b");
        assert!(qb.sql().ends_with("AND b.deleted_at IS NOT NULL"));
    }
}
