// src/db/alert_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::alert::{Alert, AlertDraft},
};

#[derive(Clone, Default)]
pub struct AlertRepository;

impl AlertRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        include_dismissed: bool,
    ) -> Result<Vec<Alert>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alerts = sqlx::query_as::<_, Alert>(
            r#"
            SELECT * FROM alerts
            WHERE tenant_id = $1 AND ($2 OR NOT is_dismissed)
            ORDER BY created_at DESC
            "#,
        )
            .bind(tenant_id)
            .bind(include_dismissed)
            .fetch_all(executor)
            .await?;
        Ok(alerts)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        draft: &AlertDraft,
    ) -> Result<Alert, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (tenant_id, kind, severity, title, message, entity_id, amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(tenant_id)
            .bind(draft.kind)
            .bind(draft.severity)
            .bind(&draft.title)
            .bind(&draft.message)
            .bind(draft.entity_id)
            .bind(draft.amount)
            .fetch_one(executor)
            .await?;
        Ok(alert)
    }

    // Dispensar de novo mantém a data e o autor da primeira vez
    pub async fn dismiss<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Alert>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            UPDATE alerts
            SET is_dismissed = TRUE,
                dismissed_at = COALESCE(dismissed_at, NOW()),
                dismissed_by = COALESCE(dismissed_by, $3)
            WHERE id = $1 AND tenant_id = $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(tenant_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await?;
        Ok(alert)
    }
}
