// src/db/disbursement_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        disbursement::{Disbursement, DisbursementStatus, Justification},
        mouvement::PaymentModality,
    },
};

#[derive(Clone, Default)]
pub struct DisbursementRepository;

impl DisbursementRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        intervenant_id: Uuid,
        amount: Decimal,
        purpose: &str,
        modality: PaymentModality,
        disbursed_on: NaiveDate,
        created_by: Uuid,
    ) -> Result<Disbursement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let disbursement = sqlx::query_as::<_, Disbursement>(
            r#"
            INSERT INTO disbursements (
                tenant_id, intervenant_id, initial_amount, remaining_amount, status,
                purpose, modality, disbursed_on, created_by
            )
            VALUES ($1, $2, $3, $3, 'OPEN', $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(tenant_id)
            .bind(intervenant_id)
            .bind(amount)
            .bind(purpose)
            .bind(modality)
            .bind(disbursed_on)
            .bind(created_by)
            .fetch_one(executor)
            .await?;
        Ok(disbursement)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        status: Option<DisbursementStatus>,
    ) -> Result<Vec<Disbursement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let disbursements = sqlx::query_as::<_, Disbursement>(
            r#"
            SELECT * FROM disbursements
            WHERE tenant_id = $1 AND ($2::disbursement_status IS NULL OR status = $2)
            ORDER BY disbursed_on DESC, created_at DESC
            "#,
        )
            .bind(tenant_id)
            .bind(status)
            .fetch_all(executor)
            .await?;
        Ok(disbursements)
    }

    /// Desembolsos ainda não totalmente justificados, do mais antigo ao mais recente.
    pub async fn list_unjustified<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<Disbursement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let disbursements = sqlx::query_as::<_, Disbursement>(
            r#"
            SELECT * FROM disbursements
            WHERE tenant_id = $1 AND status <> 'JUSTIFIED'
            ORDER BY disbursed_on ASC
            "#,
        )
            .bind(tenant_id)
            .fetch_all(executor)
            .await?;
        Ok(disbursements)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Disbursement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let disbursement = sqlx::query_as::<_, Disbursement>(
            "SELECT * FROM disbursements WHERE id = $1 AND tenant_id = $2",
        )
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;
        Ok(disbursement)
    }

    // Bloqueia a linha até o fim da transação
    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Disbursement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let disbursement = sqlx::query_as::<_, Disbursement>(
            "SELECT * FROM disbursements WHERE id = $1 AND tenant_id = $2 FOR UPDATE",
        )
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;
        Ok(disbursement)
    }

    pub async fn update_remaining<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        remaining: Decimal,
        status: DisbursementStatus,
    ) -> Result<Disbursement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let disbursement = sqlx::query_as::<_, Disbursement>(
            r#"
            UPDATE disbursements
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
        Ok(disbursement)
    }

    pub async fn insert_justification<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        disbursement_id: Uuid,
        amount: Decimal,
        description: &str,
        reference: Option<&str>,
        justified_on: NaiveDate,
        created_by: Uuid,
    ) -> Result<Justification, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let justification = sqlx::query_as::<_, Justification>(
            r#"
            INSERT INTO justifications (
                tenant_id, disbursement_id, amount, description, reference,
                justified_on, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(tenant_id)
            .bind(disbursement_id)
            .bind(amount)
            .bind(description)
            .bind(reference)
            .bind(justified_on)
            .bind(created_by)
            .fetch_one(executor)
            .await?;
        Ok(justification)
    }

    pub async fn list_justifications<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        disbursement_id: Uuid,
    ) -> Result<Vec<Justification>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let justifications = sqlx::query_as::<_, Justification>(
            r#"
            SELECT * FROM justifications
            WHERE tenant_id = $1 AND disbursement_id = $2
            ORDER BY justified_on ASC, created_at ASC
            "#,
        )
            .bind(tenant_id)
            .bind(disbursement_id)
            .fetch_all(executor)
            .await?;
        Ok(justifications)
    }
}
