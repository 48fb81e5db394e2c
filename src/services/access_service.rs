// src/services/access_service.rs

use crate::{
    common::error::AppError,
    db::{scope::ScopeDecision, TenantRepository},
    models::{
        access::{CapabilitySet, LocationAccess},
        auth::Actor,
        tenancy::{BusinessId, LocationId},
    },
};

// ---
// Regras puras (sem banco)
// ---

/// Ordem: parâmetro explícito -> empresa do usuário -> empresa da sessão.
pub fn resolve_tenant(
    explicit: Option<BusinessId>,
    actor_business: Option<BusinessId>,
    session_business: Option<BusinessId>,
) -> Option<BusinessId> {
    explicit.or(actor_business).or(session_business)
}

/// Uma empresa resolvida só vale se for a do próprio usuário
/// (superadmins podem operar qualquer uma).
pub fn authorize_tenant(actor: &Actor, business_id: BusinessId) -> Result<BusinessId, AppError> {
    if actor.capabilities.is_superadmin() || actor.user.business_id == Some(business_id) {
        Ok(business_id)
    } else {
        tracing::warn!(
            user_id = actor.id(),
            business_id,
            "tentativa de acesso a outra empresa"
        );
        Err(AppError::CrossTenantAccess)
    }
}

/// Operações administrativas da empresa (locais, permissões de usuários).
pub fn ensure_can_manage(actor: &Actor, business_id: BusinessId) -> Result<(), AppError> {
    let caps = &actor.capabilities;
    if caps.is_superadmin() || caps.is_business_admin(business_id) || actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Locais visíveis: "todos" ou os locais da empresa com `location.<id>`.
/// Permissões de locais de outras empresas são ignoradas.
pub fn permitted_locations(caps: &CapabilitySet, tenant_locations: &[LocationId]) -> LocationAccess {
    if caps.access_all_locations() {
        return LocationAccess::All;
    }
    let granted: std::collections::BTreeSet<LocationId> = caps.granted_locations().collect();
    LocationAccess::Only(
        tenant_locations
            .iter()
            .copied()
            .filter(|id| granted.contains(id))
            .collect(),
    )
}

/// Administradores (globais ou da empresa) e quem vê todos os locais
/// não recebem filtro algum.
pub fn bypasses_location_scope(caps: &CapabilitySet, business_id: BusinessId) -> bool {
    caps.access_all_locations() || caps.is_superadmin() || caps.is_business_admin(business_id)
}

pub fn scope_decision(
    caps: &CapabilitySet,
    business_id: BusinessId,
    tenant_locations: &[LocationId],
) -> ScopeDecision {
    if bypasses_location_scope(caps, business_id) {
        return ScopeDecision::Unrestricted;
    }
    match permitted_locations(caps, tenant_locations) {
        LocationAccess::All => ScopeDecision::Unrestricted,
        LocationAccess::Only(ids) => ScopeDecision::Restricted(ids),
    }
}

pub fn can_access_this_location(
    caps: &CapabilitySet,
    tenant_locations: &[LocationId],
    location_id: LocationId,
) -> bool {
    permitted_locations(caps, tenant_locations).allows(location_id)
}

// ---
// Serviço: busca os locais da empresa e aplica as regras acima
// ---
#[derive(Clone)]
pub struct AccessService {
    tenant_repo: TenantRepository,
}

impl AccessService {
    pub fn new(tenant_repo: TenantRepository) -> Self {
        Self { tenant_repo }
    }

    pub async fn permitted_locations(
        &self,
        actor: &Actor,
        business_id: BusinessId,
    ) -> Result<LocationAccess, AppError> {
        if actor.capabilities.access_all_locations() {
            return Ok(LocationAccess::All);
        }
        let locations = self.tenant_repo.location_ids(business_id).await?;
        Ok(permitted_locations(&actor.capabilities, &locations))
    }

    pub async fn scope_for(
        &self,
        actor: &Actor,
        business_id: BusinessId,
    ) -> Result<ScopeDecision, AppError> {
        if bypasses_location_scope(&actor.capabilities, business_id) {
            return Ok(ScopeDecision::Unrestricted);
        }
        let locations = self.tenant_repo.location_ids(business_id).await?;
        let decision = scope_decision(&actor.capabilities, business_id, &locations);
        tracing::debug!(user_id = actor.id(), business_id, ?decision, "escopo de locais");
        Ok(decision)
    }

    pub async fn can_access_this_location(
        &self,
        actor: &Actor,
        business_id: BusinessId,
        location_id: LocationId,
    ) -> Result<bool, AppError> {
        let locations = self.tenant_repo.location_ids(business_id).await?;
        Ok(can_access_this_location(&actor.capabilities, &locations, location_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::tests::actor;

    fn caps(names: &[&str]) -> CapabilitySet {
        CapabilitySet::from_names(names.iter().copied())
    }

    #[test]
    fn tenant_resolution_order() {
        assert_eq!(resolve_tenant(Some(1), Some(2), Some(3)), Some(1));
        assert_eq!(resolve_tenant(None, Some(2), Some(3)), Some(2));
        assert_eq!(resolve_tenant(None, None, Some(3)), Some(3));
        assert_eq!(resolve_tenant(None, None, None), None);
    }

    #[test]
    fn actors_are_confined_to_their_business() {
        let clerk = actor(Some(7), &[], &[]);
        assert_eq!(authorize_tenant(&clerk, 7).unwrap(), 7);
        assert!(matches!(authorize_tenant(&clerk, 8), Err(AppError::CrossTenantAccess)));

        let root = actor(None, &[], &["superadmin"]);
        assert_eq!(authorize_tenant(&root, 8).unwrap(), 8);
    }

    #[test]
    fn only_admins_manage_the_business() {
        assert!(ensure_can_manage(&actor(Some(7), &[], &["Admin#7"]), 7).is_ok());
        assert!(ensure_can_manage(&actor(Some(7), &["admin"], &[]), 7).is_ok());
        assert!(matches!(
            ensure_can_manage(&actor(Some(7), &[], &["Admin#8"]), 7),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn blanket_capability_sees_every_location() {
        let access = permitted_locations(&caps(&["access_all_locations"]), &[1, 2]);
        assert_eq!(access, LocationAccess::All);
        assert!(access.allows(999));
    }

    #[test]
    fn allow_set_only_keeps_tenant_locations() {
        let access = permitted_locations(&caps(&["location.1", "location.2", "location.40"]), &[1, 2, 3]);
        assert_eq!(access, LocationAccess::Only([1, 2].into_iter().collect()));
    }

    #[test]
    fn admins_short_circuit_the_filter() {
        for names in [&["superadmin"][..], &["Admin#7"], &["access_all_locations"]] {
            assert_eq!(scope_decision(&caps(names), 7, &[1, 2]), ScopeDecision::Unrestricted);
        }
        // Admin de outra empresa não conta.
        assert_eq!(
            scope_decision(&caps(&["Admin#8"]), 7, &[1, 2]),
            ScopeDecision::Restricted(Default::default())
        );
    }

    #[test]
    fn restricted_scope_admits_exactly_the_allow_set() {
        let decision = scope_decision(&caps(&["location.1", "location.2"]), 7, &[1, 2, 3]);
        assert!(decision.admits(1));
        assert!(decision.admits(2));
        assert!(!decision.admits(3));
    }

    #[test]
    fn no_location_permission_means_no_access() {
        let decision = scope_decision(&caps(&["sell.view"]), 7, &[1, 2]);
        assert_eq!(decision, ScopeDecision::Restricted(Default::default()));
        assert!(!can_access_this_location(&caps(&["sell.view"]), &[1, 2], 1));
    }

    #[test]
    fn single_location_check_reuses_the_allow_set() {
        let c = caps(&["location.2"]);
        assert!(can_access_this_location(&c, &[1, 2], 2));
        assert!(!can_access_this_location(&c, &[1, 2], 1));
        // Local que não pertence à empresa
        assert!(!can_access_this_location(&c, &[1], 2));
    }
}
