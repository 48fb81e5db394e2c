// src/db/contact_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::Trashed,
        error::{map_unique_violation, AppError},
    },
    models::{
        contacts::{Contact, ContactFields, ContactTypeFilter},
        tenancy::{BusinessId, UserId},
    },
};

/// Critérios da listagem de contatos.
#[derive(Debug, Clone, Copy)]
pub struct ContactQuery {
    pub business_id: BusinessId,
    pub filter: ContactTypeFilter,
    // Usuário com "selected_contacts": só vê os contatos liberados para ele.
    pub restricted_to: Option<UserId>,
    pub trashed: Trashed,
}

// Usuário com "selected_contacts" só enxerga os contatos liberados para ele.
fn push_access_predicate(qb: &mut QueryBuilder<'_, Postgres>, restricted_to: Option<UserId>) {
    if let Some(user_id) = restricted_to {
        qb.push(
            " AND EXISTS (SELECT 1 FROM user_contact_access uca \
             WHERE uca.contact_id = c.id AND uca.user_id = ",
        );
        qb.push_bind(user_id);
        qb.push(")");
    }
}

// "WHERE" comum a leitura, edição e exclusão de um contato.
fn push_single_contact(
    qb: &mut QueryBuilder<'_, Postgres>,
    business_id: BusinessId,
    id: i64,
    restricted_to: Option<UserId>,
) {
    qb.push(" WHERE c.business_id = ");
    qb.push_bind(business_id);
    qb.push(" AND c.id = ");
    qb.push_bind(id);
    qb.push(" AND c.deleted_at IS NULL");
    push_access_predicate(qb, restricted_to);
}

#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) fn list_query(query: ContactQuery) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT c.* FROM contacts c WHERE c.business_id = ");
        qb.push_bind(query.business_id);

        qb.push(" AND c.type IN (");
        let mut types = qb.separated(", ");
        for contact_type in query.filter.types() {
            types.push_bind(*contact_type);
        }
        types.push_unseparated(")");

        push_access_predicate(&mut qb, query.restricted_to);

        query.trashed.push_predicate(&mut qb, "c");
        qb.push(" ORDER BY c.id ASC");
        qb
    }

    pub async fn list(&self, query: ContactQuery) -> Result<Vec<Contact>, AppError> {
        let contacts = Self::list_query(query)
            .build_query_as::<Contact>()
            .fetch_all(&self.pool)
            .await?;
        Ok(contacts)
    }

    pub(crate) fn find_query(
        business_id: BusinessId,
        id: i64,
        restricted_to: Option<UserId>,
    ) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT c.* FROM contacts c");
        push_single_contact(&mut qb, business_id, id, restricted_to);
        qb
    }

    pub async fn find(
        &self,
        business_id: BusinessId,
        id: i64,
        restricted_to: Option<UserId>,
    ) -> Result<Option<Contact>, AppError> {
        let contact = Self::find_query(business_id, id, restricted_to)
            .build_query_as::<Contact>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(contact)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        business_id: BusinessId,
        created_by: UserId,
        fields: &ContactFields,
    ) -> Result<Contact, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (
                business_id, type, contact_type, supplier_business_name, name,
                tax_number, city, state, country, landmark, mobile, landline,
                alternate_number, pay_term_number, pay_term_type, created_by, is_default
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
            .bind(business_id)
            .bind(fields.contact_type)
            .bind(fields.kind)
            .bind(&fields.supplier_business_name)
            .bind(&fields.name)
            .bind(&fields.tax_number)
            .bind(&fields.city)
            .bind(&fields.state)
            .bind(&fields.country)
            .bind(&fields.landmark)
            .bind(&fields.mobile)
            .bind(&fields.landline)
            .bind(&fields.alternate_number)
            .bind(fields.pay_term_number)
            .bind(fields.pay_term_type)
            .bind(created_by)
            .bind(fields.is_default)
            .fetch_one(executor)
            .await
            .map_err(map_unique_violation)
    }

    pub(crate) fn update_query(
        business_id: BusinessId,
        id: i64,
        restricted_to: Option<UserId>,
        fields: &ContactFields,
    ) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("UPDATE contacts c SET ");
        let mut set = qb.separated(", ");
        set.push("type = ").push_bind_unseparated(fields.contact_type);
        set.push("contact_type = ").push_bind_unseparated(fields.kind);
        set.push("supplier_business_name = ")
            .push_bind_unseparated(fields.supplier_business_name.clone());
        set.push("name = ").push_bind_unseparated(fields.name.clone());
        set.push("tax_number = ").push_bind_unseparated(fields.tax_number.clone());
        set.push("city = ").push_bind_unseparated(fields.city.clone());
        set.push("state = ").push_bind_unseparated(fields.state.clone());
        set.push("country = ").push_bind_unseparated(fields.country.clone());
        set.push("landmark = ").push_bind_unseparated(fields.landmark.clone());
        set.push("mobile = ").push_bind_unseparated(fields.mobile.clone());
        set.push("landline = ").push_bind_unseparated(fields.landline.clone());
        set.push("alternate_number = ").push_bind_unseparated(fields.alternate_number.clone());
        set.push("pay_term_number = ").push_bind_unseparated(fields.pay_term_number);
        set.push("pay_term_type = ").push_bind_unseparated(fields.pay_term_type);
        set.push("is_default = ").push_bind_unseparated(fields.is_default);
        set.push("updated_at = NOW()");

        push_single_contact(&mut qb, business_id, id, restricted_to);
        qb.push(" RETURNING c.*");
        qb
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        business_id: BusinessId,
        id: i64,
        restricted_to: Option<UserId>,
        fields: &ContactFields,
    ) -> Result<Option<Contact>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contact = Self::update_query(business_id, id, restricted_to, fields)
            .build_query_as::<Contact>()
            .fetch_optional(executor)
            .await
            .map_err(map_unique_violation)?;
        Ok(contact)
    }

    pub(crate) fn soft_delete_query(
        business_id: BusinessId,
        id: i64,
        restricted_to: Option<UserId>,
    ) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("UPDATE contacts c SET deleted_at = NOW()");
        push_single_contact(&mut qb, business_id, id, restricted_to);
        qb
    }

    /// Marca como excluído; a linha continua no banco.
    pub async fn soft_delete(
        &self,
        business_id: BusinessId,
        id: i64,
        restricted_to: Option<UserId>,
    ) -> Result<bool, AppError> {
        let result = Self::soft_delete_query(business_id, id, restricted_to)
            .build()
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contacts::ContactType;

    fn query(filter: ContactTypeFilter) -> ContactQuery {
        ContactQuery {
            business_id: 7,
            filter,
            restricted_to: None,
            trashed: Trashed::Exclude,
        }
    }

    #[test]
    fn customer_listing_binds_a_single_type() {
        let qb = ContactRepository::list_query(query(ContactTypeFilter::Customer));
        let sql = qb.sql();
        assert!(sql.contains("c.business_id = $1 AND c.type IN ($2)"));
        assert!(sql.contains("c.deleted_at IS NULL"));
        assert!(sql.ends_with("ORDER BY c.id ASC"));
    }

    #[test]
    fn both_listing_binds_suppliers_and_customers() {
        let qb = ContactRepository::list_query(query(ContactTypeFilter::Both));
        assert!(qb.sql().contains("c.type IN ($2, $3)"));
        assert_eq!(ContactTypeFilter::Both.types().len(), 2);
    }

    #[test]
    fn selected_contacts_restrict_through_the_access_table() {
        let mut q = query(ContactTypeFilter::Supplier);
        q.restricted_to = Some(42);
        q.trashed = Trashed::Include;
        let qb = ContactRepository::list_query(q);
        let sql = qb.sql();
        assert!(sql.contains("uca.user_id = $3)"));
        assert!(!sql.contains("deleted_at"));
    }

    #[test]
    fn single_contact_queries_honour_selected_contacts() {
        let find = ContactRepository::find_query(7, 3, Some(42));
        assert!(find.sql().contains("c.business_id = $1 AND c.id = $2"));
        assert!(find.sql().contains("uca.user_id = $3)"));

        let delete = ContactRepository::soft_delete_query(7, 3, Some(42));
        assert!(delete.sql().starts_with("UPDATE contacts c SET deleted_at = NOW() WHERE"));
        assert!(delete.sql().contains("uca.user_id = $3)"));

        let open = ContactRepository::find_query(7, 3, None);
        assert!(!open.sql().contains("user_contact_access"));
    }

    #[test]
    fn update_is_limited_to_released_contacts() {
        let fields = ContactFields {
            contact_type: ContactType::Customer,
            kind: None,
            supplier_business_name: None,
            name: "Ana".into(),
            tax_number: None,
            city: None,
            state: None,
            country: None,
            landmark: None,
            mobile: None,
            landline: None,
            alternate_number: None,
            pay_term_number: None,
            pay_term_type: None,
            is_default: false,
        };
        let qb = ContactRepository::update_query(7, 3, Some(42), &fields);
        let sql = qb.sql();
        assert!(sql.contains("is_default = $15, updated_at = NOW() WHERE c.business_id = $16"));
        assert!(sql.contains("uca.user_id = $18)"));
        assert!(sql.ends_with("RETURNING c.*"));
    }
}
