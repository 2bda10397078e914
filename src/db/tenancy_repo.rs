// src/db/tenancy_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::tenancy::Tenant,
};

#[derive(Clone, Default)]
pub struct TenantRepository;

impl TenantRepository {
    pub fn new() -> Self {
        Self
    }

    /// Cria um novo tenant (Empresa) na base de dados.
    pub async fn create_tenant<'e, E>(
        &self,
        executor: E,
        name: &str,
        slug: &str,
    ) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (name, slug)
            VALUES ($1, LOWER($2))
            RETURNING *
            "#,
        )
            .bind(name)
            .bind(slug)
            .fetch_one(executor)
            .await
            .map_err(|e| map_unique_violation(e, |_| AppError::SlugAlreadyExists))
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<Option<Tenant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;
        Ok(tenant)
    }

    pub async fn update_tenant<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        currency: Option<&str>,
    ) -> Result<Option<Tenant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET name = $2,
                currency = COALESCE(UPPER($3), currency),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(tenant_id)
            .bind(name)
            .bind(currency)
            .fetch_optional(executor)
            .await?;
        Ok(tenant)
    }
}
