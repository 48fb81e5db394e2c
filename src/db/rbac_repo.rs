// src/db/rbac_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::{rbac::Permission, tenancy::UserId},
};

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Listar todas as permissões cadastradas (para o frontend montar a tela)
    pub async fn list_all_permissions(&self) -> Result<Vec<Permission>, AppError> {
        let permissions = sqlx::query_as::<_, Permission>(
            "SELECT id, name FROM permissions ORDER BY name ASC",
        )
            .fetch_all(&self.pool)
            .await?;
        Ok(permissions)
    }

    /// Garante que as permissões existam e devolve seus IDs.
    pub async fn ensure_permissions<'e, E>(
        &self,
        executor: E,
        names: &[String],
    ) -> Result<Vec<i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO permissions (name)
            SELECT unnest($1::varchar[])
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
            .bind(names)
            .fetch_all(executor)
            .await?;
        Ok(ids)
    }

    /// Remove do usuário as permissões diretas cujo nome começa com `prefix`
    /// e não estão em `keep`.
    pub async fn revoke_prefixed_except<'e, E>(
        &self,
        executor: E,
        user_id: UserId,
        prefix: &str,
        keep: &[i64],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            DELETE FROM user_permissions up
            USING permissions p
            WHERE p.id = up.permission_id
              AND up.user_id = $1
              AND p.name LIKE $2 || '%'
              AND NOT (up.permission_id = ANY($3))
            "#,
        )
            .bind(user_id)
            .bind(prefix)
            .bind(keep)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn grant_permissions<'e, E>(
        &self,
        executor: E,
        user_id: UserId,
        permission_ids: &[i64],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Inserção em massa usando UNNEST
        sqlx::query(
            r#"
            INSERT INTO user_permissions (user_id, permission_id)
            SELECT $1, unnest($2::bigint[])
            ON CONFLICT DO NOTHING
            "#,
        )
            .bind(user_id)
            .bind(permission_ids)
            .execute(executor)
            .await?;
        Ok(())
    }
}
