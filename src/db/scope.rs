// src/db/scope.rs

use std::collections::BTreeSet;

use sqlx::{Postgres, QueryBuilder};

use crate::models::{access::Capability, tenancy::LocationId};

/// Resultado da verificação de acesso: ou a consulta passa intacta,
/// ou ela é restrita ao conjunto de locais permitidos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeDecision {
    Unrestricted,
    Restricted(BTreeSet<LocationId>),
}

/// Sobre qual tipo de linha o filtro está sendo aplicado.
#[derive(Debug, Clone, Copy)]
pub enum ScopeTarget<'a> {
    /// Linhas de `business_locations`; `alias` é o alias da tabela na consulta.
    Locations { alias: &'a str },
    /// Linhas de `users`: o usuário precisa ter alguma permissão de local
    /// dentro do conjunto permitido.
    Users { alias: &'a str },
}

impl ScopeDecision {
    pub fn admits(&self, location_id: LocationId) -> bool {
        match self {
            ScopeDecision::Unrestricted => true,
            ScopeDecision::Restricted(allowed) => allowed.contains(&location_id),
        }
    }

    /// Acrescenta o predicado (`AND ...`) à consulta. Sem restrição, a
    /// consulta não muda. Conjunto vazio vira `AND FALSE`.
    pub fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>, target: ScopeTarget<'_>) {
        let ScopeDecision::Restricted(allowed) = self else {
            return;
        };

        if allowed.is_empty() {
            // Intencional: nada casa, nem usuários com access_all_locations.
            qb.push(" AND FALSE");
            return;
        }

        match target {
            ScopeTarget::Locations { alias } => {
                let ids: Vec<LocationId> = allowed.iter().copied().collect();
                qb.push(format!(" AND {alias}.id = ANY("));
                qb.push_bind(ids);
                qb.push(")");
            }
            ScopeTarget::Users { alias } => {
                qb.push(format!(
                    " AND EXISTS (SELECT 1 FROM user_permissions sp \
                     JOIN permissions p ON p.id = sp.permission_id \
                     WHERE sp.user_id = {alias}.id AND p.name = ANY("
                ));
                qb.push_bind(permission_names(allowed));
                qb.push("))");
            }
        }
    }
}

// Quem tem "access_all_locations" também trabalha nos locais permitidos.
fn permission_names(allowed: &BTreeSet<LocationId>) -> Vec<String> {
    std::iter::once(Capability::AccessAllLocations)
        .chain(allowed.iter().map(|id| Capability::Location(*id)))
        .map(|cap| cap.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "SELECT l.id, l.name FROM business_locations l WHERE l.business_id = 7";

    fn restricted(ids: &[LocationId]) -> ScopeDecision {
        ScopeDecision::Restricted(ids.iter().copied().collect())
    }

    #[test]
    fn unrestricted_leaves_the_query_untouched() {
        let mut qb = QueryBuilder::<Postgres>::new(BASE);
        ScopeDecision::Unrestricted.apply(&mut qb, ScopeTarget::Locations { alias: "l" });
        assert_eq!(qb.sql(), BASE);
    }

    #[test]
    fn empty_allow_set_matches_nothing() {
        let mut qb = QueryBuilder::<Postgres>::new(BASE);
        restricted(&[]).apply(&mut qb, ScopeTarget::Locations { alias: "l" });
        assert_eq!(qb.sql(), format!("{BASE} AND FALSE"));

        let mut qb = QueryBuilder::<Postgres>::new("SELECT u.id FROM users u WHERE TRUE");
        restricted(&[]).apply(&mut qb, ScopeTarget::Users { alias: "u" });
        assert!(qb.sql().ends_with("AND FALSE"));
    }

    #[test]
    fn locations_are_filtered_by_id() {
        let mut qb = QueryBuilder::<Postgres>::new(BASE);
        restricted(&[1, 2]).apply(&mut qb, ScopeTarget::Locations { alias: "l" });
        assert_eq!(qb.sql(), format!("{BASE} AND l.id = ANY($1)"));
    }

    #[test]
    fn users_are_filtered_through_the_permissions_relation() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT u.id FROM users u WHERE u.business_id = ");
        qb.push_bind(7_i64);
        restricted(&[3]).apply(&mut qb, ScopeTarget::Users { alias: "u" });
        let sql = qb.sql();
        assert!(sql.contains("EXISTS (SELECT 1 FROM user_permissions sp"));
        assert!(sql.contains("sp.user_id = u.id"));
        assert!(sql.ends_with("p.name = ANY($2))"));
    }

    #[test]
    fn permission_names_include_the_blanket_capability() {
        let names = permission_names(&[2, 5].into_iter().collect());
        assert_eq!(names, vec!["access_all_locations", "location.2", "location.5"]);
    }

    #[test]
    fn admits_is_exact_membership() {
        let decision = restricted(&[1, 2]);
        let rows = [(10, 1), (11, 2), (12, 3), (13, 1)];
        let visible: Vec<i64> = rows
            .iter()
            .filter(|(_, location)| decision.admits(*location))
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(visible, vec![10, 11, 13]);

        assert!(rows.iter().all(|(_, l)| ScopeDecision::Unrestricted.admits(*l)));
    }
}
