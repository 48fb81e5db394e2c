// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::Trashed,
        error::{map_unique_violation, AppError},
    },
    models::{
        catalog::{Brand, CustomerGroup, Unit},
        tenancy::{BusinessId, UserId},
    },
};

#[derive(Debug, Clone, FromRow)]
pub struct UnitLabelRow {
    pub id: i64,
    pub actual_name: String,
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct NamedRow {
    pub id: i64,
    pub name: String,
}

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Unidades
    // ---

    pub(crate) fn unit_label_query(
        business_id: BusinessId,
        only_base: bool,
    ) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(
            "SELECT u.id, u.actual_name, u.short_name FROM units u WHERE u.business_id = ",
        );
        qb.push_bind(business_id);
        if only_base {
            qb.push(" AND u.base_unit_id IS NULL");
        }
        Trashed::Exclude.push_predicate(&mut qb, "u");
        qb.push(" ORDER BY u.id ASC");
        qb
    }

    pub async fn unit_label_rows(
        &self,
        business_id: BusinessId,
        only_base: bool,
    ) -> Result<Vec<UnitLabelRow>, AppError> {
        let rows = Self::unit_label_query(business_id, only_base)
            .build_query_as::<UnitLabelRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_units(
        &self,
        business_id: BusinessId,
        trashed: Trashed,
    ) -> Result<Vec<Unit>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT u.* FROM units u WHERE u.business_id = ");
        qb.push_bind(business_id);
        trashed.push_predicate(&mut qb, "u");
        qb.push(" ORDER BY u.id ASC");

        let units = qb.build_query_as::<Unit>().fetch_all(&self.pool).await?;
        Ok(units)
    }

    pub async fn find_unit(&self, business_id: BusinessId, id: i64) -> Result<Option<Unit>, AppError> {
        let unit = sqlx::query_as::<_, Unit>(
            "SELECT * FROM units WHERE business_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
            .bind(business_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(unit)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_unit<'e, E>(
        &self,
        executor: E,
        business_id: BusinessId,
        created_by: UserId,
        actual_name: &str,
        short_name: Option<&str>,
        allow_decimal: bool,
        base_unit_id: Option<i64>,
        base_unit_multiplier: Option<Decimal>,
    ) -> Result<Unit, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units (
                business_id, actual_name, short_name, allow_decimal,
                base_unit_id, base_unit_multiplier, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, business_id, actual_name, short_name, allow_decimal,
                      base_unit_id, base_unit_multiplier, deleted_at, created_at, updated_at
            "#,
        )
            .bind(business_id)
            .bind(actual_name)
            .bind(short_name)
            .bind(allow_decimal)
            .bind(base_unit_id)
            .bind(base_unit_multiplier)
            .bind(created_by)
            .fetch_one(executor)
            .await
            .map_err(map_unique_violation)
    }

    pub async fn soft_delete_unit(&self, business_id: BusinessId, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE units SET deleted_at = NOW() \
             WHERE business_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
            .bind(business_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Marcas
    // ---

    pub(crate) fn brand_label_query(
        business_id: BusinessId,
        only_repair: bool,
    ) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT b.id, b.name FROM brands b WHERE b.business_id = ");
        qb.push_bind(business_id);
        if only_repair {
            qb.push(" AND b.use_for_repair = TRUE");
        }
        Trashed::Exclude.push_predicate(&mut qb, "b");
        qb.push(" ORDER BY b.name ASC");
        qb
    }

    pub async fn brand_label_rows(
        &self,
        business_id: BusinessId,
        only_repair: bool,
    ) -> Result<Vec<NamedRow>, AppError> {
        let rows = Self::brand_label_query(business_id, only_repair)
            .build_query_as::<NamedRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_brands(
        &self,
        business_id: BusinessId,
        trashed: Trashed,
    ) -> Result<Vec<Brand>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT b.* FROM brands b WHERE b.business_id = ");
        qb.push_bind(business_id);
        trashed.push_predicate(&mut qb, "b");
        qb.push(" ORDER BY b.name ASC");

        let brands = qb.build_query_as::<Brand>().fetch_all(&self.pool).await?;
        Ok(brands)
    }

    pub async fn create_brand<'e, E>(
        &self,
        executor: E,
        business_id: BusinessId,
        created_by: UserId,
        name: &str,
        description: Option<&str>,
        use_for_repair: bool,
    ) -> Result<Brand, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Brand>(
            r#"
            INSERT INTO brands (business_id, name, description, use_for_repair, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, business_id, name, description, use_for_repair,
                      deleted_at, created_at, updated_at
            "#,
        )
            .bind(business_id)
            .bind(name)
            .bind(description)
            .bind(use_for_repair)
            .bind(created_by)
            .fetch_one(executor)
            .await
            .map_err(map_unique_violation)
    }

    pub async fn soft_delete_brand(&self, business_id: BusinessId, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE brands SET deleted_at = NOW() \
             WHERE business_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
            .bind(business_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Grupos de clientes
    // ---

    pub async fn customer_groups(&self, business_id: BusinessId) -> Result<Vec<CustomerGroup>, AppError> {
        let groups = sqlx::query_as::<_, CustomerGroup>(
            "SELECT id, business_id, name, amount FROM customer_groups \
             WHERE business_id = $1 ORDER BY id ASC",
        )
            .bind(business_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_unit_listing_excludes_sub_units() {
        let qb = CatalogRepository::unit_label_query(7, true);
        let sql = qb.sql();
        assert!(sql.contains("u.business_id = $1 AND u.base_unit_id IS NULL"));
        assert!(sql.contains("u.deleted_at IS NULL"));
    }

    #[test]
    fn full_unit_listing_keeps_sub_units() {
        let qb = CatalogRepository::unit_label_query(7, false);
        assert!(!qb.sql().contains("base_unit_id IS NULL"));
    }

    #[test]
    fn brands_are_ordered_by_name() {
        let qb = CatalogRepository::brand_label_query(7, false);
        assert!(qb.sql().ends_with("ORDER BY b.name ASC"));
        assert!(!qb.sql().contains("use_for_repair"));
    }

    #[test]
    fn repair_filter_is_optional() {
        let qb = CatalogRepository::brand_label_query(7, true);
        assert!(qb.sql().contains("AND b.use_for_repair = TRUE"));
    }
}
