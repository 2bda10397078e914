// src/services/mouvement_service.rs

use chrono::Utc;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{cache::BalanceCache, error::AppError, money::round_money},
    db::{IntervenantRepository, MouvementRepository},
    models::{
        intervenant::Intervenant,
        mouvement::{
            CreateMouvementPayload, Mouvement, MouvementChanges, MouvementFilter, NewMouvement,
            UpdateMouvementPayload,
        },
    },
};

/// Garante que o interveniente existe no tenant (404 caso contrário).
pub async fn require_intervenant<'e, E>(
    repo: &IntervenantRepository,
    executor: E,
    tenant_id: Uuid,
    intervenant_id: Uuid,
) -> Result<Intervenant, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    repo.find_by_id(executor, tenant_id, intervenant_id)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Intervenant".into()))
}

/// Movimentos gerados por um fluxo só mudam através desse fluxo.
fn ensure_unlinked(mouvement: &Mouvement) -> Result<(), AppError> {
    match mouvement.linked_owner() {
        Some(owner) => Err(AppError::LinkedMovement(owner.into())),
        None => Ok(()),
    }
}

#[derive(Clone)]
pub struct MouvementService {
    repo: MouvementRepository,
    intervenant_repo: IntervenantRepository,
    cache: BalanceCache,
    pool: PgPool,
}

impl MouvementService {
    pub fn new(
        repo: MouvementRepository,
        intervenant_repo: IntervenantRepository,
        cache: BalanceCache,
        pool: PgPool,
    ) -> Self {
        Self { repo, intervenant_repo, cache, pool }
    }

    pub async fn list(&self, tenant_id: Uuid, filter: &MouvementFilter) -> Result<Vec<Mouvement>, AppError> {
        self.repo.list(&self.pool, tenant_id, filter).await
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        payload: CreateMouvementPayload,
    ) -> Result<Mouvement, AppError> {
        require_intervenant(&self.intervenant_repo, &self.pool, tenant_id, payload.intervenant_id).await?;

        let new = NewMouvement {
            intervenant_id: payload.intervenant_id,
            kind: payload.kind,
            amount: round_money(payload.amount),
            modality: payload.modality,
            category: payload.category.trim().to_string(),
            description: payload.description,
            occurred_on: payload.occurred_on.unwrap_or_else(|| Utc::now().date_naive()),
            disbursement_id: None,
            advance_id: None,
            document_id: None,
        };

        let mouvement = self.repo.insert(&self.pool, tenant_id, user_id, &new).await?;
        self.cache.invalidate(&tenant_id);
        Ok(mouvement)
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        payload: UpdateMouvementPayload,
    ) -> Result<Mouvement, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self.repo
            .find_by_id(&mut *tx, tenant_id, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Mouvement".into()))?;
        ensure_unlinked(&current)?;

        if let Some(intervenant_id) = payload.intervenant_id {
            require_intervenant(&self.intervenant_repo, &mut *tx, tenant_id, intervenant_id).await?;
        }

        let mut changes = MouvementChanges::from(payload);
        changes.amount = changes.amount.map(round_money);

        let updated = self.repo
            .update(&mut *tx, tenant_id, id, &changes)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Mouvement".into()))?;

        tx.commit().await?;
        self.cache.invalidate(&tenant_id);
        Ok(updated)
    }

    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self.repo
            .find_by_id(&mut *tx, tenant_id, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Mouvement".into()))?;
        ensure_unlinked(&current)?;

        self.repo.delete(&mut *tx, tenant_id, id).await?;
        tx.commit().await?;

        self.cache.invalidate(&tenant_id);
        tracing::info!(%tenant_id, mouvement_id = %id, "Movimento removido");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mouvement::{MouvementKind, PaymentModality};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn mouvement() -> Mouvement {
        Mouvement {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            intervenant_id: Uuid::new_v4(),
            kind: MouvementKind::Exit,
            amount: dec!(1000),
            modality: PaymentModality::Cash,
            category: "DISBURSEMENT".into(),
            description: None,
            occurred_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            disbursement_id: None,
            advance_id: None,
            document_id: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn free_movement_can_be_changed() {
        assert!(ensure_unlinked(&mouvement()).is_ok());
    }

    #[test]
    fn disbursement_movement_is_locked() {
        let mut m = mouvement();
        m.disbursement_id = Some(Uuid::new_v4());
        match ensure_unlinked(&m) {
            Err(AppError::LinkedMovement(owner)) => assert_eq!(owner, "Disbursement"),
            other => panic!("esperava LinkedMovement, veio {:?}", other),
        }
    }

    #[test]
    fn document_movement_is_locked() {
        let mut m = mouvement();
        m.document_id = Some(Uuid::new_v4());
        assert!(matches!(ensure_unlinked(&m), Err(AppError::LinkedMovement(_))));
    }

    #[sqlx::test]
    async fn patch_keeps_or_clears_description(pool: PgPool) {
        let state = crate::config::AppState::for_tests(pool);
        let admin = state.seed_tenant("empresa-a").await;
        let client = state.seed_intervenant(admin.tenant_id, "Cliente A").await;
        let service = &state.mouvement_service;

        let created = service
            .create(
                admin.tenant_id,
                admin.id,
                CreateMouvementPayload {
                    intervenant_id: client.id,
                    kind: MouvementKind::Entry,
                    amount: dec!(80),
                    modality: PaymentModality::Cash,
                    category: "VENTE".into(),
                    description: Some("Venda balcão".into()),
                    occurred_on: None,
                },
            )
            .await
            .unwrap();

        let kept = service
            .update(
                admin.tenant_id,
                created.id,
                UpdateMouvementPayload { category: Some("SERVICE".into()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(kept.category, "SERVICE");
        assert_eq!(kept.description.as_deref(), Some("Venda balcão"));

        let cleared = service
            .update(
                admin.tenant_id,
                created.id,
                UpdateMouvementPayload { description: Some(String::new()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(cleared.description, None);
    }

    #[sqlx::test]
    async fn other_tenant_cannot_touch_mouvement(pool: PgPool) {
        let state = crate::config::AppState::for_tests(pool);
        let owner = state.seed_tenant("empresa-a").await;
        let stranger = state.seed_tenant("empresa-b").await;
        let client = state.seed_intervenant(owner.tenant_id, "Cliente A").await;
        let service = &state.mouvement_service;

        let created = service
            .create(
                owner.tenant_id,
                owner.id,
                CreateMouvementPayload {
                    intervenant_id: client.id,
                    kind: MouvementKind::Exit,
                    amount: dec!(30),
                    modality: PaymentModality::Cash,
                    category: "FRAIS".into(),
                    description: None,
                    occurred_on: None,
                },
            )
            .await
            .unwrap();

        let err = service.delete(stranger.tenant_id, created.id).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));

        let listed = service.list(owner.tenant_id, &MouvementFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
    }
}
