// src/services/catalog_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{db_utils::Trashed, error::AppError},
    db::CatalogRepository,
    models::{
        auth::Actor,
        catalog::{group_sub_units, Brand, Unit, UnitWithSubUnits},
        tenancy::BusinessId,
    },
};

/// Dados de uma nova unidade, já validados pelo handler.
#[derive(Debug, Clone)]
pub struct NewUnit {
    pub actual_name: String,
    pub short_name: Option<String>,
    pub allow_decimal: bool,
    pub base_unit_id: Option<i64>,
    pub base_unit_multiplier: Option<Decimal>,
}

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // =========================================================================
    //  UNIDADES
    // =========================================================================

    pub async fn list_units(
        &self,
        business_id: BusinessId,
        trashed: Trashed,
    ) -> Result<Vec<Unit>, AppError> {
        self.repo.list_units(business_id, trashed).await
    }

    pub async fn list_units_grouped(
        &self,
        business_id: BusinessId,
    ) -> Result<Vec<UnitWithSubUnits>, AppError> {
        let units = self.repo.list_units(business_id, Trashed::Exclude).await?;
        Ok(group_sub_units(units))
    }

    pub async fn create_unit(
        &self,
        actor: &Actor,
        business_id: BusinessId,
        unit: &NewUnit,
    ) -> Result<Unit, AppError> {
        // A unidade base precisa ser da mesma empresa (e ser ela mesma uma base).
        if let Some(base_id) = unit.base_unit_id {
            let base = self
                .repo
                .find_unit(business_id, base_id)
                .await?
                .ok_or(AppError::not_found("unit", base_id))?;
            if !base.is_base() {
                return Err(AppError::not_found("unit", base_id));
            }
        }

        let created = self
            .repo
            .create_unit(
                &self.pool,
                business_id,
                actor.id(),
                &unit.actual_name,
                unit.short_name.as_deref(),
                unit.allow_decimal,
                unit.base_unit_id,
                unit.base_unit_multiplier,
            )
            .await?;
        tracing::info!(unit_id = created.id, business_id, "unidade criada");
        Ok(created)
    }

    pub async fn delete_unit(&self, business_id: BusinessId, id: i64) -> Result<(), AppError> {
        if !self.repo.soft_delete_unit(business_id, id).await? {
            return Err(AppError::not_found("unit", id));
        }
        Ok(())
    }

    // =========================================================================
    //  MARCAS
    // =========================================================================

    pub async fn list_brands(
        &self,
        business_id: BusinessId,
        trashed: Trashed,
    ) -> Result<Vec<Brand>, AppError> {
        self.repo.list_brands(business_id, trashed).await
    }

    pub async fn create_brand(
        &self,
        actor: &Actor,
        business_id: BusinessId,
        name: &str,
        description: Option<&str>,
        use_for_repair: bool,
    ) -> Result<Brand, AppError> {
        self.repo
            .create_brand(&self.pool, business_id, actor.id(), name, description, use_for_repair)
            .await
    }

    pub async fn delete_brand(&self, business_id: BusinessId, id: i64) -> Result<(), AppError> {
        if !self.repo.soft_delete_brand(business_id, id).await? {
            return Err(AppError::not_found("brand", id));
        }
        Ok(())
    }
}
