// src/services/contact_service.rs

use sqlx::PgPool;

use crate::{
    common::{db_utils::Trashed, error::AppError},
    db::{contact_repo::ContactQuery, ContactRepository},
    models::{
        auth::Actor,
        contacts::{Contact, ContactFields, ContactTypeFilter},
        tenancy::{BusinessId, UserId},
    },
};

#[derive(Clone)]
pub struct ContactService {
    repo: ContactRepository,
    pool: PgPool,
}

/// Usuário a quem os contatos ficam restritos (listagem e contato único).
pub fn restricted_to(actor: &Actor) -> Option<UserId> {
    actor.user.selected_contacts.then_some(actor.id())
}

pub fn listing_query(
    actor: &Actor,
    business_id: BusinessId,
    filter: ContactTypeFilter,
    trashed: Trashed,
) -> ContactQuery {
    ContactQuery {
        business_id,
        filter,
        restricted_to: restricted_to(actor),
        trashed,
    }
}

impl ContactService {
    pub fn new(repo: ContactRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(
        &self,
        actor: &Actor,
        business_id: BusinessId,
        filter: ContactTypeFilter,
        trashed: Trashed,
    ) -> Result<Vec<Contact>, AppError> {
        self.repo
            .list(listing_query(actor, business_id, filter, trashed))
            .await
    }

    pub async fn get(
        &self,
        actor: &Actor,
        business_id: BusinessId,
        id: i64,
    ) -> Result<Contact, AppError> {
        self.repo
            .find(business_id, id, restricted_to(actor))
            .await?
            .ok_or(AppError::not_found("contact", id))
    }

    pub async fn create(
        &self,
        actor: &Actor,
        business_id: BusinessId,
        fields: &ContactFields,
    ) -> Result<Contact, AppError> {
        let contact = self
            .repo
            .create(&self.pool, business_id, actor.id(), fields)
            .await?;
        tracing::info!(contact_id = contact.id, business_id, "contato criado");
        Ok(contact)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        business_id: BusinessId,
        id: i64,
        fields: &ContactFields,
    ) -> Result<Contact, AppError> {
        self.repo
            .update(&self.pool, business_id, id, restricted_to(actor), fields)
            .await?
            .ok_or(AppError::not_found("contact", id))
    }

    pub async fn delete(&self, actor: &Actor, business_id: BusinessId, id: i64) -> Result<(), AppError> {
        if !self.repo.soft_delete(business_id, id, restricted_to(actor)).await? {
            return Err(AppError::not_found("contact", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::tests::actor;

    #[test]
    fn unrestricted_actor_sees_every_contact_of_the_tenant() {
        let a = actor(Some(7), &[], &[]);
        let q = listing_query(&a, 7, ContactTypeFilter::Customer, Trashed::Exclude);
        assert_eq!(q.business_id, 7);
        assert!(q.restricted_to.is_none());
    }

    #[test]
    fn selected_contacts_actor_is_restricted_to_own_grants() {
        let mut a = actor(Some(7), &[], &[]);
        a.user.selected_contacts = true;
        let q = listing_query(&a, 7, ContactTypeFilter::Both, Trashed::Exclude);
        assert_eq!(q.restricted_to, Some(a.id()));
    }

    #[test]
    fn single_contact_access_uses_the_same_restriction() {
        let mut a = actor(Some(7), &[], &[]);
        assert_eq!(restricted_to(&a), None);
        a.user.selected_contacts = true;
        assert_eq!(restricted_to(&a), Some(a.id()));
    }
}
