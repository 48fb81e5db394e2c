// src/db/user_repo.rs

use sqlx::{Executor, FromRow, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    db::scope::{ScopeDecision, ScopeTarget},
    models::{
        auth::User,
        tenancy::{BusinessId, UserId},
    },
};

/// Colunas mínimas para montar o rótulo "sobrenome nome".
#[derive(Debug, Clone, FromRow)]
pub struct UserLabelRow {
    pub id: UserId,
    pub surname: Option<String>,
    pub name: Option<String>,
}

/// Filtros da listagem de usuários para selects.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserListFilter {
    pub include_commission_agents: bool,
    pub only_commission_agents: bool,
}

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário ativo (não excluído) pelo seu ID
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    /// Nomes dos cargos do usuário, na ordem em que foram atribuídos.
    pub async fn role_names(&self, user_id: UserId) -> Result<Vec<String>, AppError> {
        let roles = sqlx::query_scalar::<_, String>(
            r#"
            SELECT r.name
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = $1
            ORDER BY ur.created_at ASC, r.id ASC
            "#,
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    /// Nomes de todas as permissões efetivas: diretas e herdadas dos cargos.
    pub async fn permission_names(&self, user_id: UserId) -> Result<Vec<String>, AppError> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT p.name
            FROM user_permissions up
            JOIN permissions p ON p.id = up.permission_id
            WHERE up.user_id = $1
            UNION
            SELECT p.name
            FROM user_roles ur
            JOIN role_permissions rp ON rp.role_id = ur.role_id
            JOIN permissions p ON p.id = rp.permission_id
            WHERE ur.user_id = $1
            "#,
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    pub(crate) fn label_rows_query(
        business_id: BusinessId,
        filter: UserListFilter,
        scope: &ScopeDecision,
    ) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(
            "SELECT u.id, u.surname, u.name FROM users u WHERE u.deleted_at IS NULL AND u.business_id = ",
        );
        qb.push_bind(business_id);
        if filter.only_commission_agents {
            qb.push(" AND u.is_cmmsn_agnt = TRUE");
        } else if !filter.include_commission_agents {
            qb.push(" AND u.is_cmmsn_agnt = FALSE");
        }
        scope.apply(&mut qb, ScopeTarget::Users { alias: "u" });
        qb.push(" ORDER BY u.id ASC");
        qb
    }

    pub async fn label_rows(
        &self,
        business_id: BusinessId,
        filter: UserListFilter,
        scope: &ScopeDecision,
    ) -> Result<Vec<UserLabelRow>, AppError> {
        let rows = Self::label_rows_query(business_id, filter, scope)
            .build_query_as::<UserLabelRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub(crate) fn list_query(
        business_id: BusinessId,
        scope: &ScopeDecision,
    ) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(
            "SELECT u.* FROM users u WHERE u.deleted_at IS NULL AND u.business_id = ",
        );
        qb.push_bind(business_id);
        scope.apply(&mut qb, ScopeTarget::Users { alias: "u" });
        qb.push(" ORDER BY u.id ASC");
        qb
    }

    /// Usuários da empresa que trabalham nos locais visíveis ao ator.
    pub async fn list(
        &self,
        business_id: BusinessId,
        scope: &ScopeDecision,
    ) -> Result<Vec<User>, AppError> {
        let users = Self::list_query(business_id, scope)
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub(crate) fn selected_contacts_query(
        user_id: UserId,
        business_id: Option<BusinessId>,
    ) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT selected_contacts FROM users WHERE id = ");
        qb.push_bind(user_id);
        qb.push(" AND deleted_at IS NULL");
        if let Some(business_id) = business_id {
            qb.push(" AND business_id = ").push_bind(business_id);
        }
        qb
    }

    /// `None` quando o usuário não existe, foi excluído ou é de outra empresa.
    /// Sem `business_id` a busca vale para qualquer empresa.
    pub async fn selected_contacts_flag(
        &self,
        user_id: UserId,
        business_id: Option<BusinessId>,
    ) -> Result<Option<bool>, AppError> {
        let flag = Self::selected_contacts_query(user_id, business_id)
            .build_query_scalar::<bool>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(flag)
    }

    /// Substitui todos os cargos do usuário.
    pub async fn sync_roles<'e, E>(
        &self,
        executor: E,
        user_id: UserId,
        role_ids: &[i64],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            WITH removed AS (
                DELETE FROM user_roles WHERE user_id = $1 AND NOT (role_id = ANY($2))
            )
            INSERT INTO user_roles (user_id, role_id)
            SELECT $1, unnest($2::bigint[])
            ON CONFLICT DO NOTHING
            "#,
        )
            .bind(user_id)
            .bind(role_ids)
            .execute(executor)
            .await?;
        Ok(())
    }
}
