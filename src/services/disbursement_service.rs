// src/services/disbursement_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{cache::BalanceCache, error::AppError, money::round_money},
    db::{DisbursementRepository, IntervenantRepository, MouvementRepository},
    models::{
        disbursement::{
            CreateDisbursementPayload, Disbursement, DisbursementDetail, DisbursementStatus,
            JustificationResult, JustifyDisbursementPayload, ReturnDisbursementPayload, ReturnResult,
        },
        mouvement::{
            Mouvement, MouvementKind, NewMouvement, CATEGORY_DISBURSEMENT, CATEGORY_DISBURSEMENT_RETURN,
        },
    },
    services::{
        lifecycle::{compute_remaining, reduce_remaining},
        mouvement_service::require_intervenant,
    },
};

/// Devoluções são as entradas vinculadas ao desembolso.
fn returned_amounts(mouvements: &[Mouvement]) -> impl Iterator<Item = rust_decimal::Decimal> + '_ {
    mouvements
        .iter()
        .filter(|m| m.kind == MouvementKind::Entry && m.category == CATEGORY_DISBURSEMENT_RETURN)
        .map(|m| m.amount)
}

#[derive(Clone)]
pub struct DisbursementService {
    repo: DisbursementRepository,
    mouvement_repo: MouvementRepository,
    intervenant_repo: IntervenantRepository,
    cache: BalanceCache,
    pool: PgPool,
}

impl DisbursementService {
    pub fn new(
        repo: DisbursementRepository,
        mouvement_repo: MouvementRepository,
        intervenant_repo: IntervenantRepository,
        cache: BalanceCache,
        pool: PgPool,
    ) -> Self {
        Self { repo, mouvement_repo, intervenant_repo, cache, pool }
    }

    pub async fn list(
        &self,
        tenant_id: Uuid,
        status: Option<DisbursementStatus>,
    ) -> Result<Vec<Disbursement>, AppError> {
        self.repo.list(&self.pool, tenant_id, status).await
    }

    /// Cria o desembolso e a saída de caixa correspondente, atomicamente.
    pub async fn create(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        payload: CreateDisbursementPayload,
    ) -> Result<Disbursement, AppError> {
        let amount = round_money(payload.amount);
        let disbursed_on = payload.disbursed_on.unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.pool.begin().await?;

        require_intervenant(&self.intervenant_repo, &mut *tx, tenant_id, payload.intervenant_id).await?;

        let disbursement = self.repo
            .create(
                &mut *tx,
                tenant_id,
                payload.intervenant_id,
                amount,
                payload.purpose.trim(),
                payload.modality,
                disbursed_on,
                user_id,
            )
            .await?;

        let exit = NewMouvement {
            intervenant_id: payload.intervenant_id,
            kind: MouvementKind::Exit,
            amount,
            modality: payload.modality,
            category: CATEGORY_DISBURSEMENT.to_string(),
            description: Some(disbursement.purpose.clone()),
            occurred_on: disbursed_on,
            disbursement_id: Some(disbursement.id),
            advance_id: None,
            document_id: None,
        };
        self.mouvement_repo.insert(&mut *tx, tenant_id, user_id, &exit).await?;

        tx.commit().await?;
        self.cache.invalidate(&tenant_id);

        tracing::info!(%tenant_id, disbursement_id = %disbursement.id, %amount, "Desembolso criado");
        Ok(disbursement)
    }

    pub async fn detail(&self, tenant_id: Uuid, id: Uuid) -> Result<DisbursementDetail, AppError> {
        let disbursement = self.repo
            .find_by_id(&self.pool, tenant_id, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Disbursement".into()))?;

        let justifications = self.repo.list_justifications(&self.pool, tenant_id, id).await?;
        let mouvements = self.mouvement_repo.list_for_disbursement(&self.pool, tenant_id, id).await?;

        let expected = compute_remaining(
            disbursement.initial_amount,
            justifications.iter().map(|j| j.amount),
            returned_amounts(&mouvements),
        );
        if expected != disbursement.remaining_amount {
            tracing::warn!(
                disbursement_id = %id,
                stored = %disbursement.remaining_amount,
                %expected,
                "Restante gravado diverge do histórico"
            );
        }

        Ok(DisbursementDetail { disbursement, justifications, mouvements })
    }

    /// Justificativa: só documenta o uso, não movimenta o caixa.
    pub async fn justify(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        id: Uuid,
        payload: JustifyDisbursementPayload,
    ) -> Result<JustificationResult, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self.repo
            .find_for_update(&mut *tx, tenant_id, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Disbursement".into()))?;

        let amount = round_money(payload.amount);
        let remaining = reduce_remaining(current.remaining_amount, amount)?;
        let status = DisbursementStatus::from_amounts(remaining, current.initial_amount);

        let justification = self.repo
            .insert_justification(
                &mut *tx,
                tenant_id,
                id,
                amount,
                payload.description.trim(),
                payload.reference.as_deref(),
                payload.justified_on.unwrap_or_else(|| Utc::now().date_naive()),
                user_id,
            )
            .await?;

        let disbursement = self.repo.update_remaining(&mut *tx, tenant_id, id, remaining, status).await?;
        tx.commit().await?;

        Ok(JustificationResult { disbursement, justification })
    }

    /// Devolução: entrada de caixa vinculada, reduz o restante como a justificativa.
    pub async fn record_return(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        id: Uuid,
        payload: ReturnDisbursementPayload,
    ) -> Result<ReturnResult, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self.repo
            .find_for_update(&mut *tx, tenant_id, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Disbursement".into()))?;

        let amount = round_money(payload.amount);
        let remaining = reduce_remaining(current.remaining_amount, amount)?;
        let status = DisbursementStatus::from_amounts(remaining, current.initial_amount);

        let entry = NewMouvement {
            intervenant_id: current.intervenant_id,
            kind: MouvementKind::Entry,
            amount,
            modality: payload.modality,
            category: CATEGORY_DISBURSEMENT_RETURN.to_string(),
            description: payload.description,
            occurred_on: payload.returned_on.unwrap_or_else(|| Utc::now().date_naive()),
            disbursement_id: Some(id),
            advance_id: None,
            document_id: None,
        };
        let mouvement = self.mouvement_repo.insert(&mut *tx, tenant_id, user_id, &entry).await?;

        let disbursement = self.repo.update_remaining(&mut *tx, tenant_id, id, remaining, status).await?;
        tx.commit().await?;
        self.cache.invalidate(&tenant_id);

        Ok(ReturnResult { disbursement, mouvement })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mouvement::PaymentModality;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn mouvement(kind: MouvementKind, category: &str, amount: rust_decimal::Decimal) -> Mouvement {
        Mouvement {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            intervenant_id: Uuid::new_v4(),
            kind,
            amount,
            modality: PaymentModality::Cash,
            category: category.into(),
            description: None,
            occurred_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            disbursement_id: Some(Uuid::new_v4()),
            advance_id: None,
            document_id: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn only_return_entries_count_as_returns() {
        let mouvements = vec![
            mouvement(MouvementKind::Exit, CATEGORY_DISBURSEMENT, dec!(1000)),
            mouvement(MouvementKind::Entry, CATEGORY_DISBURSEMENT_RETURN, dec!(150)),
            mouvement(MouvementKind::Entry, CATEGORY_DISBURSEMENT_RETURN, dec!(50)),
        ];

        let returned: Vec<_> = returned_amounts(&mouvements).collect();
        assert_eq!(returned, vec![dec!(150), dec!(50)]);
    }

    #[test]
    fn history_reconstructs_remaining() {
        let mouvements = vec![
            mouvement(MouvementKind::Exit, CATEGORY_DISBURSEMENT, dec!(1000)),
            mouvement(MouvementKind::Entry, CATEGORY_DISBURSEMENT_RETURN, dec!(600)),
        ];

        let remaining = compute_remaining(dec!(1000), vec![dec!(400)], returned_amounts(&mouvements));
        assert_eq!(remaining, dec!(0));
        assert_eq!(
            DisbursementStatus::from_amounts(remaining, dec!(1000)),
            DisbursementStatus::Justified
        );
    }

    // --- Com banco (#[sqlx::test] cria um banco novo por teste e roda as migrações) ---

    fn disbursement_payload(intervenant_id: Uuid, amount: rust_decimal::Decimal) -> CreateDisbursementPayload {
        CreateDisbursementPayload {
            intervenant_id,
            amount,
            purpose: "Compras de material".into(),
            modality: PaymentModality::Cash,
            disbursed_on: None,
        }
    }

    fn return_payload(amount: rust_decimal::Decimal) -> ReturnDisbursementPayload {
        ReturnDisbursementPayload {
            amount,
            modality: PaymentModality::Cash,
            description: None,
            returned_on: None,
        }
    }

    #[sqlx::test]
    async fn other_tenant_gets_not_found(pool: PgPool) {
        let state = crate::config::AppState::for_tests(pool);
        let owner = state.seed_tenant("empresa-a").await;
        let stranger = state.seed_tenant("empresa-b").await;
        let supplier = state.seed_intervenant(owner.tenant_id, "Fornecedor A").await;

        let service = &state.disbursement_service;
        let created = service
            .create(owner.tenant_id, owner.id, disbursement_payload(supplier.id, dec!(1000)))
            .await
            .unwrap();

        let err = service.detail(stranger.tenant_id, created.id).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));

        let err = service
            .record_return(stranger.tenant_id, stranger.id, created.id, return_payload(dec!(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));

        // O interveniente da outra empresa também não existe para ela
        let err = service
            .create(stranger.tenant_id, stranger.id, disbursement_payload(supplier.id, dec!(50)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));

        let err = state.intervenant_service.get(stranger.tenant_id, supplier.id).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));

        let detail = service.detail(owner.tenant_id, created.id).await.unwrap();
        assert_eq!(detail.disbursement.remaining_amount, dec!(1000));
        assert!(detail.justifications.is_empty());
        assert!(service.list(stranger.tenant_id, None).await.unwrap().is_empty());
    }

    #[sqlx::test]
    async fn justify_then_return_settles_the_disbursement(pool: PgPool) {
        let state = crate::config::AppState::for_tests(pool);
        let admin = state.seed_tenant("empresa-a").await;
        let supplier = state.seed_intervenant(admin.tenant_id, "Fornecedor A").await;
        let service = &state.disbursement_service;

        let created = service
            .create(admin.tenant_id, admin.id, disbursement_payload(supplier.id, dec!(1000)))
            .await
            .unwrap();

        let justified = service
            .justify(
                admin.tenant_id,
                admin.id,
                created.id,
                JustifyDisbursementPayload {
                    amount: dec!(400),
                    description: "Notas fiscais".into(),
                    reference: None,
                    justified_on: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(justified.disbursement.remaining_amount, dec!(600));
        assert_eq!(justified.disbursement.status, DisbursementStatus::PartiallyJustified);

        let err = service
            .record_return(admin.tenant_id, admin.id, created.id, return_payload(dec!(600.01)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AmountExceedsRemaining { .. }));

        let returned = service
            .record_return(admin.tenant_id, admin.id, created.id, return_payload(dec!(600)))
            .await
            .unwrap();
        assert_eq!(returned.disbursement.remaining_amount, dec!(0));
        assert_eq!(returned.disbursement.status, DisbursementStatus::Justified);
        assert_eq!(returned.mouvement.kind, MouvementKind::Entry);
    }
}
