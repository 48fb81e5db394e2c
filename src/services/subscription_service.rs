// src/services/subscription_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{BillingRepository, UserRepository},
    models::{
        auth::Actor,
        billing::{latest_active, Plan, SubscriptionSummary},
        tenancy::UserId,
    },
};

/// Só troca para um plano que o usuário assina e está ativo.
pub fn ensure_plan_switch_allowed(has_active_subscription: bool) -> Result<(), AppError> {
    if has_active_subscription {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[derive(Clone)]
pub struct SubscriptionService {
    billing_repo: BillingRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl SubscriptionService {
    pub fn new(billing_repo: BillingRepository, user_repo: UserRepository, pool: PgPool) -> Self {
        Self { billing_repo, user_repo, pool }
    }

    pub async fn summary(&self, actor: &Actor) -> Result<SubscriptionSummary, AppError> {
        let subscriptions = self.billing_repo.subscriptions_for(actor.id()).await?;
        let plan = match latest_active(&subscriptions) {
            Some(latest) => self.billing_repo.find_plan(latest.plan_id).await?,
            None => None,
        };
        Ok(SubscriptionSummary::build(actor.user.trial_ends_at, &subscriptions, plan))
    }

    /// Plano desconhecido responde `false`.
    pub async fn subscribed_to_plan(&self, user_id: UserId, plan_name: &str) -> Result<bool, AppError> {
        let Some(plan) = self.billing_repo.find_plan_by_name(plan_name).await? else {
            return Ok(false);
        };
        self.billing_repo.has_active_subscription_to(user_id, plan.id).await
    }

    /// Troca todos os cargos do usuário pelo cargo do plano.
    pub async fn switch_plans(&self, actor: &Actor, plan_id: i64) -> Result<Plan, AppError> {
        let plan = self
            .billing_repo
            .find_plan(plan_id)
            .await?
            .ok_or(AppError::not_found("plan", plan_id))?;

        let subscribed = self
            .billing_repo
            .has_active_subscription_to(actor.id(), plan.id)
            .await?;
        if let Err(e) = ensure_plan_switch_allowed(subscribed) {
            tracing::warn!(user_id = actor.id(), plan_id, "troca para plano sem assinatura ativa");
            return Err(e);
        }

        let mut tx = self.pool.begin().await?;
        self.user_repo
            .sync_roles(&mut *tx, actor.id(), &[plan.role_id])
            .await?;
        tx.commit().await?;

        tracing::info!(user_id = actor.id(), plan = %plan.name, "plano alterado");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_requires_an_active_subscription() {
        assert!(ensure_plan_switch_allowed(true).is_ok());
        assert!(matches!(ensure_plan_switch_allowed(false), Err(AppError::Forbidden)));
    }
}
