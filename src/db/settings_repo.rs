// src/db/settings_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::settings::{TenantSettings, UpdateSettingsRequest, DEFAULT_DISBURSEMENT_AGE_DAYS},
};

#[derive(Clone, Default)]
pub struct SettingsRepository;

impl SettingsRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn get_settings<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<TenantSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let settings = sqlx::query_as::<_, TenantSettings>(
            "SELECT * FROM tenant_settings WHERE tenant_id = $1",
        )
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;

        // Tenant sem linha de configuração: limites desligados
        Ok(settings.unwrap_or_else(|| TenantSettings::defaults(tenant_id)))
    }

    pub async fn create_default<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO tenant_settings (tenant_id, disbursement_age_days)
            VALUES ($1, $2)
            ON CONFLICT (tenant_id) DO NOTHING
            "#,
        )
            .bind(tenant_id)
            .bind(DEFAULT_DISBURSEMENT_AGE_DAYS)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn update_settings<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        input: &UpdateSettingsRequest,
    ) -> Result<TenantSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // UPSERT: o PUT substitui todos os limites
        let settings = sqlx::query_as::<_, TenantSettings>(
            r#"
            INSERT INTO tenant_settings (
                tenant_id, debt_threshold, min_cash_balance,
                disbursement_amount_threshold, disbursement_age_days
            )
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (tenant_id)
            DO UPDATE SET
                debt_threshold = EXCLUDED.debt_threshold,
                min_cash_balance = EXCLUDED.min_cash_balance,
                disbursement_amount_threshold = EXCLUDED.disbursement_amount_threshold,
                disbursement_age_days = EXCLUDED.disbursement_age_days,
                updated_at = NOW()
            RETURNING *
            "#,
        )
            .bind(tenant_id)
            .bind(input.debt_threshold)
            .bind(input.min_cash_balance)
            .bind(input.disbursement_amount_threshold)
            .bind(input.disbursement_age_days.unwrap_or(DEFAULT_DISBURSEMENT_AGE_DAYS))
            .fetch_one(executor)
            .await?;

        Ok(settings)
    }
}
