// src/models/billing.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::tenancy::UserId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: i64,
    #[schema(example = "pro")]
    pub name: String,
    // Cargo atribuído a quem assina este plano.
    pub role_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "subscription_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "billing_cycle", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Month,
    Year,
}

impl BillingCycle {
    pub fn interval_label(self) -> &'static str {
        match self {
            BillingCycle::Month => "Monthly",
            BillingCycle::Year => "Yearly",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    pub billable_id: UserId,
    pub plan_id: i64,
    pub status: SubscriptionStatus,
    pub cycle: BillingCycle,
    pub vendor_subscription_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}

// Resposta de /api/me/subscription
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSummary {
    pub subscriber: bool,
    pub on_trial: bool,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub plan: Option<Plan>,
    #[schema(example = "Monthly")]
    pub plan_interval: Option<String>,
    pub latest_subscription: Option<Subscription>,
}

impl SubscriptionSummary {
    /// Monta o resumo a partir das assinaturas do usuário.
    /// Em teste = tem data de fim de teste e ainda não assina nada.
    pub fn build(
        trial_ends_at: Option<DateTime<Utc>>,
        subscriptions: &[Subscription],
        plan: Option<Plan>,
    ) -> Self {
        let latest = latest_active(subscriptions).cloned();
        let subscriber = latest.is_some();
        SubscriptionSummary {
            subscriber,
            on_trial: trial_ends_at.is_some() && !subscriber,
            trial_ends_at,
            plan_interval: latest.as_ref().map(|s| s.cycle.interval_label().to_string()),
            plan,
            latest_subscription: latest,
        }
    }
}

/// A assinatura ativa mais recente.
pub fn latest_active(subscriptions: &[Subscription]) -> Option<&Subscription> {
    subscriptions
        .iter()
        .filter(|s| s.is_active())
        .max_by_key(|s| s.created_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sub(id: i64, status: SubscriptionStatus, cycle: BillingCycle, age_days: i64) -> Subscription {
        Subscription {
            id,
            billable_id: 1,
            plan_id: 10 + id,
            status,
            cycle,
            vendor_subscription_id: None,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    #[test]
    fn no_trial_date_means_not_on_trial() {
        let summary = SubscriptionSummary::build(None, &[], None);
        assert!(!summary.on_trial);
        assert!(!summary.subscriber);
        assert!(summary.plan_interval.is_none());
    }

    #[test]
    fn trial_ends_when_subscribed() {
        let trial = Some(Utc::now() + Duration::days(3));
        assert!(SubscriptionSummary::build(trial, &[], None).on_trial);

        let subs = [sub(1, SubscriptionStatus::Active, BillingCycle::Month, 1)];
        let summary = SubscriptionSummary::build(trial, &subs, None);
        assert!(!summary.on_trial);
        assert!(summary.subscriber);
    }

    #[test]
    fn latest_active_ignores_cancelled_subscriptions() {
        let subs = [
            sub(1, SubscriptionStatus::Active, BillingCycle::Year, 30),
            sub(2, SubscriptionStatus::Cancelled, BillingCycle::Month, 1),
            sub(3, SubscriptionStatus::Active, BillingCycle::Month, 5),
        ];
        assert_eq!(latest_active(&subs).map(|s| s.id), Some(3));
        let summary = SubscriptionSummary::build(None, &subs, None);
        assert_eq!(summary.plan_interval.as_deref(), Some("Monthly"));
    }

    #[test]
    fn yearly_cycle_label() {
        assert_eq!(BillingCycle::Year.interval_label(), "Yearly");
    }
}
