// src/services/business_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{scope::ScopeDecision, tenancy_repo::BusinessFields, TenantRepository},
    models::{
        auth::Actor,
        tenancy::{Business, BusinessId, BusinessListing, BusinessLocation},
    },
    services::access_service::{authorize_tenant, ensure_can_manage},
};

/// Fusos aceitos no cadastro de empresas.
pub const TIME_ZONES: &[&str] = &["Asia/Kolkata", "UTC"];

/// Que empresas o ator enxerga na listagem: todas (superadmin),
/// só a própria, ou nenhuma.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessVisibility {
    All,
    Only(BusinessId),
    Nothing,
}

pub fn business_visibility(actor: &Actor) -> BusinessVisibility {
    if actor.capabilities.is_superadmin() {
        return BusinessVisibility::All;
    }
    match actor.user.business_id {
        Some(id) => BusinessVisibility::Only(id),
        None => BusinessVisibility::Nothing,
    }
}

/// Alterar ou excluir a empresa exige ser membro e administrador dela.
pub fn authorize_business_admin(actor: &Actor, id: BusinessId) -> Result<(), AppError> {
    authorize_tenant(actor, id)?;
    ensure_can_manage(actor, id)
}

#[derive(Clone)]
pub struct BusinessService {
    tenant_repo: TenantRepository,
    pool: PgPool,
}

impl BusinessService {
    pub fn new(tenant_repo: TenantRepository, pool: PgPool) -> Self {
        Self { tenant_repo, pool }
    }

    pub async fn list(&self, actor: &Actor) -> Result<Vec<BusinessListing>, AppError> {
        match business_visibility(actor) {
            BusinessVisibility::All => self.tenant_repo.list_businesses(None).await,
            BusinessVisibility::Only(id) => self.tenant_repo.list_businesses(Some(id)).await,
            BusinessVisibility::Nothing => Ok(Vec::new()),
        }
    }

    /// Cria a empresa com o ator como dono e, na mesma transação,
    /// vincula o dono a ela (se ele ainda não tiver empresa).
    pub async fn create(&self, actor: &Actor, fields: &BusinessFields) -> Result<Business, AppError> {
        let mut tx = self.pool.begin().await?;

        let business = self
            .tenant_repo
            .create_business(&mut *tx, actor.id(), fields)
            .await?;

        self.tenant_repo
            .attach_owner(&mut *tx, actor.id(), business.id)
            .await?;

        tx.commit().await?;

        tracing::info!(business_id = business.id, owner_id = actor.id(), "empresa criada");
        Ok(business)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: BusinessId,
        fields: &BusinessFields,
    ) -> Result<Business, AppError> {
        authorize_business_admin(actor, id)?;
        self.tenant_repo
            .update_business(&self.pool, id, fields)
            .await?
            .ok_or(AppError::not_found("business", id))
    }

    pub async fn delete(&self, actor: &Actor, id: BusinessId) -> Result<(), AppError> {
        authorize_business_admin(actor, id)?;
        if !self.tenant_repo.delete_business(id).await? {
            return Err(AppError::not_found("business", id));
        }
        tracing::info!(business_id = id, user_id = actor.id(), "empresa excluída");
        Ok(())
    }

    pub async fn list_locations(
        &self,
        business_id: BusinessId,
        scope: &ScopeDecision,
    ) -> Result<Vec<BusinessLocation>, AppError> {
        self.tenant_repo.list_locations(business_id, scope).await
    }

    pub async fn create_location(
        &self,
        business_id: BusinessId,
        name: &str,
        location_code: Option<&str>,
        city: Option<&str>,
    ) -> Result<BusinessLocation, AppError> {
        self.tenant_repo
            .create_location(&self.pool, business_id, name, location_code, city)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::tests::actor;

    #[test]
    fn superadmin_lists_every_business() {
        let root = actor(None, &[], &["superadmin"]);
        assert_eq!(business_visibility(&root), BusinessVisibility::All);
    }

    #[test]
    fn members_only_list_their_own_business() {
        assert_eq!(business_visibility(&actor(Some(7), &[], &[])), BusinessVisibility::Only(7));
        assert_eq!(business_visibility(&actor(None, &[], &[])), BusinessVisibility::Nothing);
    }

    #[test]
    fn only_admins_change_a_business() {
        let clerk = actor(Some(7), &[], &[]);
        assert!(matches!(authorize_business_admin(&clerk, 7), Err(AppError::Forbidden)));

        let admin = actor(Some(7), &[], &["Admin#7"]);
        assert!(authorize_business_admin(&admin, 7).is_ok());
        assert!(matches!(authorize_business_admin(&admin, 8), Err(AppError::CrossTenantAccess)));

        assert!(authorize_business_admin(&actor(None, &[], &["superadmin"]), 8).is_ok());
    }
}
