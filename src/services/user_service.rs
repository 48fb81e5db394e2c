// src/services/user_service.rs

use std::collections::BTreeSet;

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{RbacRepository, TenantRepository, UserRepository},
    models::{
        access::Capability,
        auth::{Actor, User},
        rbac::Permission,
        tenancy::{BusinessId, LocationId, UserId},
    },
    services::access_service::{ensure_can_manage, AccessService},
};

const LOCATION_PERMISSION_PREFIX: &str = "location.";

/// Nomes das permissões `location.<id>`, sem repetição e em ordem.
pub fn location_permission_names(location_ids: &[LocationId]) -> Vec<String> {
    location_ids
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|id| Capability::Location(id).to_string())
        .collect()
}

/// O primeiro local pedido que não pertence à empresa, se houver.
pub fn foreign_location(requested: &[LocationId], tenant_locations: &[LocationId]) -> Option<LocationId> {
    requested
        .iter()
        .copied()
        .find(|id| !tenant_locations.contains(id))
}

/// Superadmins consultam usuários de qualquer empresa.
pub fn user_lookup_tenant(actor: &Actor, business_id: BusinessId) -> Option<BusinessId> {
    (!actor.capabilities.is_superadmin()).then_some(business_id)
}

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    rbac_repo: RbacRepository,
    tenant_repo: TenantRepository,
    access: AccessService,
    pool: PgPool,
}

impl UserService {
    pub fn new(
        user_repo: UserRepository,
        rbac_repo: RbacRepository,
        tenant_repo: TenantRepository,
        access: AccessService,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, rbac_repo, tenant_repo, access, pool }
    }

    /// Usuário inexistente, excluído ou de outra empresa é erro, não `false`.
    pub async fn is_selected_contacts(
        &self,
        actor: &Actor,
        business_id: BusinessId,
        user_id: UserId,
    ) -> Result<bool, AppError> {
        self.user_repo
            .selected_contacts_flag(user_id, user_lookup_tenant(actor, business_id))
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Usuários da empresa, restritos aos locais que o ator enxerga.
    pub async fn list(&self, actor: &Actor, business_id: BusinessId) -> Result<Vec<User>, AppError> {
        let scope = self.access.scope_for(actor, business_id).await?;
        self.user_repo.list(business_id, &scope).await
    }

    pub async fn list_permissions(&self) -> Result<Vec<Permission>, AppError> {
        self.rbac_repo.list_all_permissions().await
    }

    /// Substitui as permissões `location.<id>` diretas do usuário.
    /// Demais permissões e cargos ficam intactos.
    pub async fn set_locations(
        &self,
        actor: &Actor,
        business_id: BusinessId,
        user_id: UserId,
        location_ids: &[LocationId],
    ) -> Result<Vec<String>, AppError> {
        ensure_can_manage(actor, business_id)?;

        let target = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .filter(|u| u.business_id == Some(business_id))
            .ok_or(AppError::UserNotFound)?;

        let tenant_locations = self.tenant_repo.location_ids(business_id).await?;
        if let Some(id) = foreign_location(location_ids, &tenant_locations) {
            return Err(AppError::not_found("location", id));
        }

        let names = location_permission_names(location_ids);

        let mut tx = self.pool.begin().await?;

        let keep = self.rbac_repo.ensure_permissions(&mut *tx, &names).await?;
        let revoked = self
            .rbac_repo
            .revoke_prefixed_except(&mut *tx, target.id, LOCATION_PERMISSION_PREFIX, &keep)
            .await?;
        if !keep.is_empty() {
            self.rbac_repo.grant_permissions(&mut *tx, target.id, &keep).await?;
        }

        tx.commit().await?;

        tracing::info!(
            user_id = target.id,
            business_id,
            granted = keep.len(),
            revoked,
            "locais do usuário atualizados"
        );
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::tests::actor;

    #[test]
    fn user_lookups_stay_inside_the_tenant() {
        assert_eq!(user_lookup_tenant(&actor(Some(7), &[], &[]), 7), Some(7));
        assert_eq!(user_lookup_tenant(&actor(Some(7), &["admin"], &["Admin#7"]), 7), Some(7));
        assert_eq!(user_lookup_tenant(&actor(None, &[], &["superadmin"]), 7), None);
    }

    #[test]
    fn location_names_are_deduplicated_and_sorted() {
        assert_eq!(
            location_permission_names(&[4, 1, 4]),
            vec!["location.1".to_string(), "location.4".to_string()]
        );
        assert!(location_permission_names(&[]).is_empty());
    }

    #[test]
    fn foreign_locations_are_detected() {
        assert_eq!(foreign_location(&[1, 9], &[1, 2, 3]), Some(9));
        assert_eq!(foreign_location(&[1, 2], &[1, 2, 3]), None);
        assert_eq!(foreign_location(&[], &[]), None);
    }
}
