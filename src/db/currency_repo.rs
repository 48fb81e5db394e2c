// src/db/currency_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::currency::Currency,
};

/// Campos editáveis de uma moeda.
#[derive(Debug, Clone)]
pub struct CurrencyFields {
    pub country: String,
    pub currency: String,
    pub code: String,
    pub symbol: String,
    pub thousand_separator: String,
    pub decimal_separator: String,
}

#[derive(Clone)]
pub struct CurrencyRepository {
    pool: PgPool,
}

impl CurrencyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Currency>, AppError> {
        let currencies = sqlx::query_as::<_, Currency>(
            "SELECT * FROM currencies ORDER BY country ASC, id ASC",
        )
            .fetch_all(&self.pool)
            .await?;
        Ok(currencies)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Currency>, AppError> {
        let currency = sqlx::query_as::<_, Currency>("SELECT * FROM currencies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(currency)
    }

    pub async fn create(&self, fields: &CurrencyFields) -> Result<Currency, AppError> {
        sqlx::query_as::<_, Currency>(
            r#"
            INSERT INTO currencies (
                country, currency, code, symbol, thousand_separator, decimal_separator
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
            .bind(&fields.country)
            .bind(&fields.currency)
            .bind(&fields.code)
            .bind(&fields.symbol)
            .bind(&fields.thousand_separator)
            .bind(&fields.decimal_separator)
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_violation)
    }

    pub async fn update(&self, id: i64, fields: &CurrencyFields) -> Result<Option<Currency>, AppError> {
        let currency = sqlx::query_as::<_, Currency>(
            r#"
            UPDATE currencies SET
                country = $2, currency = $3, code = $4, symbol = $5,
                thousand_separator = $6, decimal_separator = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(&fields.country)
            .bind(&fields.currency)
            .bind(&fields.code)
            .bind(&fields.symbol)
            .bind(&fields.thousand_separator)
            .bind(&fields.decimal_separator)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)?;
        Ok(currency)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM currencies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
