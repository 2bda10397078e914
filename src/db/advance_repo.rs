// src/db/advance_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        advance::{Advance, AdvanceStatus},
        mouvement::PaymentModality,
    },
};

#[derive(Clone, Default)]
pub struct AdvanceRepository;

impl AdvanceRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        intervenant_id: Uuid,
        amount: Decimal,
        description: Option<&str>,
        modality: PaymentModality,
        advanced_on: NaiveDate,
        created_by: Uuid,
    ) -> Result<Advance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let advance = sqlx::query_as::<_, Advance>(
            r#"
            INSERT INTO advances (
                tenant_id, intervenant_id, amount, remaining_amount, status,
                description, modality, advanced_on, created_by
            )
            VALUES ($1, $2, $3, $3, 'OPEN', $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(tenant_id)
            .bind(intervenant_id)
            .bind(amount)
            .bind(description)
            .bind(modality)
            .bind(advanced_on)
            .bind(created_by)
            .fetch_one(executor)
            .await?;
        Ok(advance)
    }

    pub async fn list<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<Vec<Advance>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let advances = sqlx::query_as::<_, Advance>(
            "SELECT * FROM advances WHERE tenant_id = $1 ORDER BY advanced_on DESC, created_at DESC",
        )
            .bind(tenant_id)
            .fetch_all(executor)
            .await?;
        Ok(advances)
    }

    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Advance>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let advance = sqlx::query_as::<_, Advance>(
            "SELECT * FROM advances WHERE id = $1 AND tenant_id = $2 FOR UPDATE",
        )
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;
        Ok(advance)
    }

    pub async fn update_remaining<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        remaining: Decimal,
        status: AdvanceStatus,
    ) -> Result<Advance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let advance = sqlx::query_as::<_, Advance>(
            r#"
            UPDATE advances
            SET remaining_amount = $3, status = $4, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(tenant_id)
            .bind(remaining)
            .bind(status)
            .fetch_one(executor)
            .await?;
        Ok(advance)
    }
}
