// src/db/mouvement_repo.rs

use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        balance::MovementLine,
        mouvement::{Mouvement, MouvementChanges, MouvementFilter, NewMouvement},
    },
};

const DEFAULT_LIMIT: i64 = 200;
const MAX_LIMIT: i64 = 1000;

#[derive(Clone, Default)]
pub struct MouvementRepository;

impl MouvementRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        created_by: Uuid,
        new: &NewMouvement,
    ) -> Result<Mouvement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mouvement = sqlx::query_as::<_, Mouvement>(
            r#"
            INSERT INTO mouvements (
                tenant_id, intervenant_id, kind, amount, modality, category,
                description, occurred_on, disbursement_id, advance_id, document_id,
                created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
            .bind(tenant_id)
            .bind(new.intervenant_id)
            .bind(new.kind)
            .bind(new.amount)
            .bind(new.modality)
            .bind(&new.category)
            .bind(new.description.as_deref())
            .bind(new.occurred_on)
            .bind(new.disbursement_id)
            .bind(new.advance_id)
            .bind(new.document_id)
            .bind(created_by)
            .fetch_one(executor)
            .await?;
        Ok(mouvement)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        filter: &MouvementFilter,
    ) -> Result<Vec<Mouvement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM mouvements WHERE tenant_id = ");
        qb.push_bind(tenant_id);

        if let Some(intervenant_id) = filter.intervenant_id {
            qb.push(" AND intervenant_id = ").push_bind(intervenant_id);
        }
        if let Some(kind) = filter.kind {
            qb.push(" AND kind = ").push_bind(kind);
        }
        if let Some(modality) = filter.modality {
            qb.push(" AND modality = ").push_bind(modality);
        }
        if let Some(disbursement_id) = filter.disbursement_id {
            qb.push(" AND disbursement_id = ").push_bind(disbursement_id);
        }
        if let Some(from) = filter.from {
            qb.push(" AND occurred_on >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND occurred_on <= ").push_bind(to);
        }

        let limit = filter.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        qb.push(" ORDER BY occurred_on DESC, created_at DESC LIMIT ").push_bind(limit);

        let mouvements = qb
            .build_query_as::<Mouvement>()
            .fetch_all(executor)
            .await?;
        Ok(mouvements)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Mouvement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mouvement = sqlx::query_as::<_, Mouvement>(
            "SELECT * FROM mouvements WHERE id = $1 AND tenant_id = $2",
        )
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;
        Ok(mouvement)
    }

    pub async fn list_for_disbursement<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        disbursement_id: Uuid,
    ) -> Result<Vec<Mouvement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mouvements = sqlx::query_as::<_, Mouvement>(
            r#"
            SELECT * FROM mouvements
            WHERE tenant_id = $1 AND disbursement_id = $2
            ORDER BY occurred_on ASC, created_at ASC
            "#,
        )
            .bind(tenant_id)
            .bind(disbursement_id)
            .fetch_all(executor)
            .await?;
        Ok(mouvements)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        changes: &MouvementChanges,
    ) -> Result<Option<Mouvement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mouvement = sqlx::query_as::<_, Mouvement>(
            r#"
            UPDATE mouvements
            SET intervenant_id = COALESCE($3, intervenant_id),
                kind = COALESCE($4, kind),
                amount = COALESCE($5, amount),
                modality = COALESCE($6, modality),
                category = COALESCE($7, category),
                description = CASE WHEN $8::text IS NULL THEN description ELSE NULLIF($8, '') END,
                occurred_on = COALESCE($9, occurred_on),
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(tenant_id)
            .bind(changes.intervenant_id)
            .bind(changes.kind)
            .bind(changes.amount)
            .bind(changes.modality)
            .bind(changes.category.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.occurred_on)
            .fetch_optional(executor)
            .await?;
        Ok(mouvement)
    }

    pub async fn delete<'e, E>(&self, executor: E, tenant_id: Uuid, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM mouvements WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Linhas mínimas para os cálculos de saldo (opcionalmente de um interveniente só).
    pub async fn movement_lines<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        intervenant_id: Option<Uuid>,
    ) -> Result<Vec<MovementLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as::<_, MovementLine>(
            r#"
            SELECT intervenant_id, kind, amount, modality
            FROM mouvements
            WHERE tenant_id = $1 AND ($2::uuid IS NULL OR intervenant_id = $2)
            "#,
        )
            .bind(tenant_id)
            .bind(intervenant_id)
            .fetch_all(executor)
            .await?;
        Ok(lines)
    }
}
