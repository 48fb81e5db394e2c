// src/services/currency_service.rs

use crate::{
    common::error::AppError,
    db::{currency_repo::CurrencyFields, CurrencyRepository},
    models::currency::Currency,
};

#[derive(Clone)]
pub struct CurrencyService {
    repo: CurrencyRepository,
}

impl CurrencyService {
    pub fn new(repo: CurrencyRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Currency>, AppError> {
        self.repo.list().await
    }

    pub async fn create(&self, fields: &CurrencyFields) -> Result<Currency, AppError> {
        let currency = self.repo.create(fields).await?;
        tracing::info!(currency_id = currency.id, code = %currency.code, "moeda criada");
        Ok(currency)
    }

    pub async fn update(&self, id: i64, fields: &CurrencyFields) -> Result<Currency, AppError> {
        self.repo
            .update(id, fields)
            .await?
            .ok_or(AppError::not_found("currency", id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if self.repo.find(id).await?.is_none() {
            return Err(AppError::not_found("currency", id));
        }
        self.repo.delete(id).await?;
        Ok(())
    }
}
