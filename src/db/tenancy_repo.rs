// src/db/tenancy_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::{map_unique_violation, AppError},
    db::scope::{ScopeDecision, ScopeTarget},
    models::tenancy::{
        AccountingMethod, Business, BusinessId, BusinessListing, BusinessLocation, LocationId,
        UserId,
    },
};

const BUSINESS_COLUMNS: &str = "b.id, b.name, b.currency_id, b.start_date, b.tax_number_1, \
    b.tax_label_1, b.tax_number_2, b.tax_label_2, b.default_profit_percent, b.owner_id, \
    b.time_zone, b.fy_start_month, b.accounting_method, b.default_sales_discount, \
    b.created_at, b.updated_at";

/// Campos editáveis de uma empresa.
#[derive(Debug, Clone)]
pub struct BusinessFields {
    pub name: String,
    pub currency_id: i64,
    pub start_date: Option<NaiveDate>,
    pub tax_number_1: String,
    pub tax_label_1: String,
    pub tax_number_2: Option<String>,
    pub tax_label_2: Option<String>,
    pub default_profit_percent: Decimal,
    pub time_zone: String,
    pub fy_start_month: i16,
    pub accounting_method: AccountingMethod,
    pub default_sales_discount: Option<Decimal>,
}

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  EMPRESAS
    // =========================================================================

    pub(crate) fn business_listing_query(only: Option<BusinessId>) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {BUSINESS_COLUMNS}, c.currency AS currency_name, o.name AS owner_name \
             FROM businesses b \
             LEFT JOIN currencies c ON c.id = b.currency_id \
             LEFT JOIN users o ON o.id = b.owner_id \
             WHERE TRUE"
        ));
        if let Some(id) = only {
            qb.push(" AND b.id = ");
            qb.push_bind(id);
        }
        qb.push(" ORDER BY b.name ASC");
        qb
    }

    /// Lista empresas; `only` restringe a uma empresa (usuários comuns).
    pub async fn list_businesses(
        &self,
        only: Option<BusinessId>,
    ) -> Result<Vec<BusinessListing>, AppError> {
        let rows = Self::business_listing_query(only)
            .build_query_as::<BusinessListing>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn create_business<'e, E>(
        &self,
        executor: E,
        owner_id: UserId,
        fields: &BusinessFields,
    ) -> Result<Business, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Business>(
            r#"
            INSERT INTO businesses (
                name, currency_id, start_date, tax_number_1, tax_label_1,
                tax_number_2, tax_label_2, default_profit_percent, owner_id,
                time_zone, fy_start_month, accounting_method, default_sales_discount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
            .bind(&fields.name)
            .bind(fields.currency_id)
            .bind(fields.start_date)
            .bind(&fields.tax_number_1)
            .bind(&fields.tax_label_1)
            .bind(&fields.tax_number_2)
            .bind(&fields.tax_label_2)
            .bind(fields.default_profit_percent)
            .bind(owner_id)
            .bind(&fields.time_zone)
            .bind(fields.fy_start_month)
            .bind(fields.accounting_method)
            .bind(fields.default_sales_discount)
            .fetch_one(executor)
            .await
            .map_err(map_unique_violation)
    }

    pub async fn update_business<'e, E>(
        &self,
        executor: E,
        id: BusinessId,
        fields: &BusinessFields,
    ) -> Result<Option<Business>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let business = sqlx::query_as::<_, Business>(
            r#"
            UPDATE businesses SET
                name = $2, currency_id = $3, start_date = $4, tax_number_1 = $5,
                tax_label_1 = $6, tax_number_2 = $7, tax_label_2 = $8,
                default_profit_percent = $9, time_zone = $10, fy_start_month = $11,
                accounting_method = $12, default_sales_discount = $13,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(&fields.name)
            .bind(fields.currency_id)
            .bind(fields.start_date)
            .bind(&fields.tax_number_1)
            .bind(&fields.tax_label_1)
            .bind(&fields.tax_number_2)
            .bind(&fields.tax_label_2)
            .bind(fields.default_profit_percent)
            .bind(&fields.time_zone)
            .bind(fields.fy_start_month)
            .bind(fields.accounting_method)
            .bind(fields.default_sales_discount)
            .fetch_optional(executor)
            .await
            .map_err(map_unique_violation)?;
        Ok(business)
    }

    pub async fn delete_business(&self, id: BusinessId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM businesses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Liga o dono recém-criado à empresa, se ele ainda não tiver uma.
    pub async fn attach_owner<'e, E>(
        &self,
        executor: E,
        owner_id: UserId,
        business_id: BusinessId,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET business_id = $2 WHERE id = $1 AND business_id IS NULL")
            .bind(owner_id)
            .bind(business_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  LOCAIS
    // =========================================================================

    /// IDs de todos os locais da empresa (base do cálculo de permissões).
    pub async fn location_ids(&self, business_id: BusinessId) -> Result<Vec<LocationId>, AppError> {
        let ids = sqlx::query_scalar::<_, LocationId>(
            "SELECT id FROM business_locations WHERE business_id = $1 ORDER BY id ASC",
        )
            .bind(business_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    pub(crate) fn locations_query(
        business_id: BusinessId,
        scope: &ScopeDecision,
    ) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(
            "SELECT l.id, l.business_id, l.name, l.location_code, l.city, l.is_active, \
             l.created_at, l.updated_at FROM business_locations l WHERE l.business_id = ",
        );
        qb.push_bind(business_id);
        scope.apply(&mut qb, ScopeTarget::Locations { alias: "l" });
        qb.push(" ORDER BY l.id ASC");
        qb
    }

    pub async fn list_locations(
        &self,
        business_id: BusinessId,
        scope: &ScopeDecision,
    ) -> Result<Vec<BusinessLocation>, AppError> {
        let locations = Self::locations_query(business_id, scope)
            .build_query_as::<BusinessLocation>()
            .fetch_all(&self.pool)
            .await?;
        Ok(locations)
    }

    pub async fn create_location<'e, E>(
        &self,
        executor: E,
        business_id: BusinessId,
        name: &str,
        location_code: Option<&str>,
        city: Option<&str>,
    ) -> Result<BusinessLocation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, BusinessLocation>(
            r#"
            INSERT INTO business_locations (business_id, name, location_code, city)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
            .bind(business_id)
            .bind(name)
            .bind(location_code)
            .bind(city)
            .fetch_one(executor)
            .await
            .map_err(map_unique_violation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_listing_can_be_confined_to_one_business() {
        let all = TenantRepository::business_listing_query(None);
        assert!(!all.sql().contains("b.id = $1"));

        let one = TenantRepository::business_listing_query(Some(7));
        assert!(one.sql().contains("AND b.id = $1"));
        assert!(one.sql().ends_with("ORDER BY b.name ASC"));
    }

    #[test]
    fn unrestricted_location_listing_only_filters_by_business() {
        let qb = TenantRepository::locations_query(7, &ScopeDecision::Unrestricted);
        assert!(qb.sql().contains("WHERE l.business_id = $1 ORDER BY l.id ASC"));
    }

    #[test]
    fn restricted_location_listing_binds_the_allow_set() {
        let scope = ScopeDecision::Restricted([1, 2].into_iter().collect());
        let qb = TenantRepository::locations_query(7, &scope);
        assert!(qb.sql().contains("l.business_id = $1 AND l.id = ANY($2) ORDER BY"));
    }
}
