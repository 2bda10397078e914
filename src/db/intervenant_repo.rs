// src/db/intervenant_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::intervenant::{Intervenant, IntervenantKind},
};

#[derive(Clone, Default)]
pub struct IntervenantRepository;

impl IntervenantRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        kind: IntervenantKind,
        phone: Option<&str>,
        email: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Intervenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let intervenant = sqlx::query_as::<_, Intervenant>(
            r#"
            INSERT INTO intervenants (tenant_id, name, kind, phone, email, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
            .bind(tenant_id)
            .bind(name)
            .bind(kind)
            .bind(phone)
            .bind(email)
            .bind(notes)
            .fetch_one(executor)
            .await?;
        Ok(intervenant)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Intervenant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let intervenants = sqlx::query_as::<_, Intervenant>(
            r#"
            SELECT * FROM intervenants
            WHERE tenant_id = $1 AND (NOT $2 OR is_active)
            ORDER BY name ASC
            "#,
        )
            .bind(tenant_id)
            .bind(active_only)
            .fetch_all(executor)
            .await?;
        Ok(intervenants)
    }

    // Filtrar por tenant faz de um ID de outro tenant um simples "não encontrado"
    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Intervenant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let intervenant = sqlx::query_as::<_, Intervenant>(
            "SELECT * FROM intervenants WHERE id = $1 AND tenant_id = $2",
        )
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;
        Ok(intervenant)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        name: Option<&str>,
        kind: Option<IntervenantKind>,
        phone: Option<&str>,
        email: Option<&str>,
        notes: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<Intervenant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let intervenant = sqlx::query_as::<_, Intervenant>(
            r#"
            UPDATE intervenants
            SET name = COALESCE($3, name),
                kind = COALESCE($4, kind),
                phone = COALESCE($5, phone),
                email = COALESCE($6, email),
                notes = COALESCE($7, notes),
                is_active = COALESCE($8, is_active),
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(tenant_id)
            .bind(name)
            .bind(kind)
            .bind(phone)
            .bind(email)
            .bind(notes)
            .bind(is_active)
            .fetch_optional(executor)
            .await?;
        Ok(intervenant)
    }
}
