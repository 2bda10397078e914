// src/services/tenancy_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{SettingsRepository, TenantRepository},
    models::{
        settings::{TenantSettings, UpdateSettingsRequest},
        tenancy::{Tenant, UpdateTenantPayload},
    },
};

/// Dados da empresa e seus limites de alerta.
#[derive(Clone)]
pub struct TenantService {
    tenant_repo: TenantRepository,
    settings_repo: SettingsRepository,
    pool: PgPool,
}

impl TenantService {
    pub fn new(tenant_repo: TenantRepository, settings_repo: SettingsRepository, pool: PgPool) -> Self {
        Self { tenant_repo, settings_repo, pool }
    }

    pub async fn get_tenant(&self, tenant_id: Uuid) -> Result<Tenant, AppError> {
        self.tenant_repo
            .find_by_id(&self.pool, tenant_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Tenant".into()))
    }

    pub async fn update_tenant(&self, tenant_id: Uuid, payload: &UpdateTenantPayload) -> Result<Tenant, AppError> {
        self.tenant_repo
            .update_tenant(&self.pool, tenant_id, &payload.name, payload.currency.as_deref())
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Tenant".into()))
    }

    pub async fn get_settings(&self, tenant_id: Uuid) -> Result<TenantSettings, AppError> {
        self.settings_repo.get_settings(&self.pool, tenant_id).await
    }

    pub async fn update_settings(
        &self,
        tenant_id: Uuid,
        payload: &UpdateSettingsRequest,
    ) -> Result<TenantSettings, AppError> {
        let settings = self.settings_repo.update_settings(&self.pool, tenant_id, payload).await?;
        tracing::info!(%tenant_id, "Limites de alerta atualizados");
        Ok(settings)
    }
}
