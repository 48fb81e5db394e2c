// src/db/billing_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{
        billing::{Plan, Subscription},
        tenancy::UserId,
    },
};

#[derive(Clone)]
pub struct BillingRepository {
    pool: PgPool,
}

impl BillingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Todas as assinaturas do usuário, mais recentes primeiro.
    pub async fn subscriptions_for(&self, user_id: UserId) -> Result<Vec<Subscription>, AppError> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions WHERE billable_id = $1 ORDER BY created_at DESC",
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(subscriptions)
    }

    pub async fn find_plan(&self, id: i64) -> Result<Option<Plan>, AppError> {
        let plan = sqlx::query_as::<_, Plan>("SELECT id, name, role_id FROM plans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(plan)
    }

    pub async fn find_plan_by_name(&self, name: &str) -> Result<Option<Plan>, AppError> {
        let plan = sqlx::query_as::<_, Plan>("SELECT id, name, role_id FROM plans WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(plan)
    }

    pub async fn has_active_subscription_to(
        &self,
        user_id: UserId,
        plan_id: i64,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM subscriptions
                WHERE billable_id = $1 AND plan_id = $2 AND status = 'active'
            )
            "#,
        )
            .bind(user_id)
            .bind(plan_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
