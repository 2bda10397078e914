// src/services/advance_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{cache::BalanceCache, error::AppError, money::round_money},
    db::{AdvanceRepository, IntervenantRepository, MouvementRepository},
    models::{
        advance::{Advance, AdvanceStatus, CreateAdvancePayload, ReimburseAdvancePayload, ReimbursementResult},
        mouvement::{MouvementKind, NewMouvement, CATEGORY_ADVANCE, CATEGORY_ADVANCE_REIMBURSEMENT},
    },
    services::{lifecycle::reduce_remaining, mouvement_service::require_intervenant},
};

// Fluxo legado de adiantamentos: quitado apenas por reembolso.
#[derive(Clone)]
pub struct AdvanceService {
    repo: AdvanceRepository,
    mouvement_repo: MouvementRepository,
    intervenant_repo: IntervenantRepository,
    cache: BalanceCache,
    pool: PgPool,
}

impl AdvanceService {
    pub fn new(
        repo: AdvanceRepository,
        mouvement_repo: MouvementRepository,
        intervenant_repo: IntervenantRepository,
        cache: BalanceCache,
        pool: PgPool,
    ) -> Self {
        Self { repo, mouvement_repo, intervenant_repo, cache, pool }
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<Advance>, AppError> {
        self.repo.list(&self.pool, tenant_id).await
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        payload: CreateAdvancePayload,
    ) -> Result<Advance, AppError> {
        let amount = round_money(payload.amount);
        let advanced_on = payload.advanced_on.unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.pool.begin().await?;

        require_intervenant(&self.intervenant_repo, &mut *tx, tenant_id, payload.intervenant_id).await?;

        let advance = self.repo
            .create(
                &mut *tx,
                tenant_id,
                payload.intervenant_id,
                amount,
                payload.description.as_deref(),
                payload.modality,
                advanced_on,
                user_id,
            )
            .await?;

        let exit = NewMouvement {
            intervenant_id: payload.intervenant_id,
            kind: MouvementKind::Exit,
            amount,
            modality: payload.modality,
            category: CATEGORY_ADVANCE.to_string(),
            description: payload.description,
            occurred_on: advanced_on,
            disbursement_id: None,
            advance_id: Some(advance.id),
            document_id: None,
        };
        self.mouvement_repo.insert(&mut *tx, tenant_id, user_id, &exit).await?;

        tx.commit().await?;
        self.cache.invalidate(&tenant_id);
        Ok(advance)
    }

    pub async fn reimburse(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        id: Uuid,
        payload: ReimburseAdvancePayload,
    ) -> Result<ReimbursementResult, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self.repo
            .find_for_update(&mut *tx, tenant_id, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Advance".into()))?;

        let amount = round_money(payload.amount);
        let remaining = reduce_remaining(current.remaining_amount, amount)?;
        let status = AdvanceStatus::from_amounts(remaining, current.amount);

        let entry = NewMouvement {
            intervenant_id: current.intervenant_id,
            kind: MouvementKind::Entry,
            amount,
            modality: payload.modality,
            category: CATEGORY_ADVANCE_REIMBURSEMENT.to_string(),
            description: payload.description,
            occurred_on: payload.reimbursed_on.unwrap_or_else(|| Utc::now().date_naive()),
            disbursement_id: None,
            advance_id: Some(id),
            document_id: None,
        };
        let mouvement = self.mouvement_repo.insert(&mut *tx, tenant_id, user_id, &entry).await?;

        let advance = self.repo.update_remaining(&mut *tx, tenant_id, id, remaining, status).await?;
        tx.commit().await?;
        self.cache.invalidate(&tenant_id);

        Ok(ReimbursementResult { advance, mouvement })
    }
}
