// src/services/intervenant_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::IntervenantRepository,
    models::intervenant::{CreateIntervenantPayload, Intervenant, UpdateIntervenantPayload},
};

#[derive(Clone)]
pub struct IntervenantService {
    repo: IntervenantRepository,
    pool: PgPool,
}

impl IntervenantService {
    pub fn new(repo: IntervenantRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, tenant_id: Uuid, active_only: bool) -> Result<Vec<Intervenant>, AppError> {
        self.repo.list(&self.pool, tenant_id, active_only).await
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Intervenant, AppError> {
        self.repo
            .find_by_id(&self.pool, tenant_id, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Intervenant".into()))
    }

    pub async fn create(&self, tenant_id: Uuid, payload: &CreateIntervenantPayload) -> Result<Intervenant, AppError> {
        self.repo
            .create(
                &self.pool,
                tenant_id,
                payload.name.trim(),
                payload.kind,
                payload.phone.as_deref(),
                payload.email.as_deref(),
                payload.notes.as_deref(),
            )
            .await
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        payload: &UpdateIntervenantPayload,
    ) -> Result<Intervenant, AppError> {
        self.repo
            .update(
                &self.pool,
                tenant_id,
                id,
                payload.name.as_deref().map(str::trim),
                payload.kind,
                payload.phone.as_deref(),
                payload.email.as_deref(),
                payload.notes.as_deref(),
                payload.is_active,
            )
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Intervenant".into()))
    }
}
