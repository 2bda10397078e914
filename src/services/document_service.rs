// src/services/document_service.rs

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        cache::BalanceCache,
        error::AppError,
        money::{add_money, round_money},
    },
    db::{DocumentRepository, IntervenantRepository, MouvementRepository},
    models::{
        document::{
            CreateDocumentPayload, DirectionStats, Document, DocumentDirection, DocumentFilter,
            DocumentStats, DocumentStatus, PayDocumentPayload, PaymentResult,
        },
        mouvement::{MouvementKind, NewMouvement, CATEGORY_DOCUMENT_PAYMENT},
    },
    services::{lifecycle::reduce_remaining, mouvement_service::require_intervenant},
};

// A receber entra no caixa, a pagar sai
fn payment_kind(direction: DocumentDirection) -> MouvementKind {
    match direction {
        DocumentDirection::Receivable => MouvementKind::Entry,
        DocumentDirection::Payable => MouvementKind::Exit,
    }
}

fn accumulate(stats: &mut DirectionStats, document: &Document, today: NaiveDate) {
    stats.count += 1;
    stats.total_amount = add_money(stats.total_amount, document.total_amount);
    stats.paid_amount = add_money(stats.paid_amount, document.paid_amount);
    stats.remaining_amount = add_money(stats.remaining_amount, document.remaining_amount);

    match document.status {
        DocumentStatus::Unpaid => stats.unpaid_count += 1,
        DocumentStatus::PartiallyPaid => stats.partially_paid_count += 1,
        DocumentStatus::Paid => stats.paid_count += 1,
    }

    if document.is_overdue(today) {
        stats.overdue_count += 1;
    }
}

/// Totais por direção (a receber / a pagar).
pub fn document_stats(documents: &[Document], today: NaiveDate) -> DocumentStats {
    let mut stats = DocumentStats::default();
    for document in documents {
        let bucket = match document.direction {
            DocumentDirection::Receivable => &mut stats.receivable,
            DocumentDirection::Payable => &mut stats.payable,
        };
        accumulate(bucket, document, today);
    }
    stats
}

#[derive(Clone)]
pub struct DocumentService {
    repo: DocumentRepository,
    mouvement_repo: MouvementRepository,
    intervenant_repo: IntervenantRepository,
    cache: BalanceCache,
    pool: PgPool,
}

impl DocumentService {
    pub fn new(
        repo: DocumentRepository,
        mouvement_repo: MouvementRepository,
        intervenant_repo: IntervenantRepository,
        cache: BalanceCache,
        pool: PgPool,
    ) -> Self {
        Self { repo, mouvement_repo, intervenant_repo, cache, pool }
    }

    pub async fn list(&self, tenant_id: Uuid, filter: &DocumentFilter) -> Result<Vec<Document>, AppError> {
        self.repo.list(&self.pool, tenant_id, filter).await
    }

    pub async fn create(&self, tenant_id: Uuid, payload: &CreateDocumentPayload) -> Result<Document, AppError> {
        if let Some(intervenant_id) = payload.intervenant_id {
            require_intervenant(&self.intervenant_repo, &self.pool, tenant_id, intervenant_id).await?;
        }

        self.repo
            .create(
                &self.pool,
                tenant_id,
                payload.intervenant_id,
                payload.kind,
                payload.direction,
                payload.reference.trim(),
                round_money(payload.total_amount),
                payload.issued_on.unwrap_or_else(|| Utc::now().date_naive()),
                payload.due_on,
                payload.notes.as_deref(),
            )
            .await
    }

    pub async fn stats(&self, tenant_id: Uuid, today: NaiveDate) -> Result<DocumentStats, AppError> {
        let documents = self.repo.list_all(&self.pool, tenant_id).await?;
        Ok(document_stats(&documents, today))
    }

    /// Pagamento parcial ou total; por padrão gera o movimento de caixa vinculado.
    pub async fn pay(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        id: Uuid,
        payload: PayDocumentPayload,
    ) -> Result<PaymentResult, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self.repo
            .find_for_update(&mut *tx, tenant_id, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Document".into()))?;

        let amount = round_money(payload.amount);
        let remaining = reduce_remaining(current.remaining_amount, amount)?;
        let paid = add_money(current.paid_amount, amount);
        let status = DocumentStatus::from_amounts(remaining, current.total_amount);

        let mouvement = if payload.record_movement {
            let intervenant_id = current.intervenant_id.ok_or(AppError::DocumentWithoutIntervenant)?;
            let new = NewMouvement {
                intervenant_id,
                kind: payment_kind(current.direction),
                amount,
                modality: payload.modality,
                category: CATEGORY_DOCUMENT_PAYMENT.to_string(),
                description: payload.description.or_else(|| Some(current.reference.clone())),
                occurred_on: payload.paid_on.unwrap_or_else(|| Utc::now().date_naive()),
                disbursement_id: None,
                advance_id: None,
                document_id: Some(id),
            };
            Some(self.mouvement_repo.insert(&mut *tx, tenant_id, user_id, &new).await?)
        } else {
            None
        };

        let document = self.repo.apply_payment(&mut *tx, tenant_id, id, paid, remaining, status).await?;
        tx.commit().await?;

        if mouvement.is_some() {
            self.cache.invalidate(&tenant_id);
        }

        Ok(PaymentResult { document, mouvement })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentKind;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn document(direction: DocumentDirection, total: Decimal, paid: Decimal, due_on: Option<NaiveDate>) -> Document {
        let remaining = total - paid;
        Document {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            intervenant_id: Some(Uuid::new_v4()),
            kind: DocumentKind::Invoice,
            direction,
            reference: "FAC-001".into(),
            total_amount: total,
            paid_amount: paid,
            remaining_amount: remaining,
            status: DocumentStatus::from_amounts(remaining, total),
            issued_on: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            due_on,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn payment_direction_drives_movement_kind() {
        assert_eq!(payment_kind(DocumentDirection::Receivable), MouvementKind::Entry);
        assert_eq!(payment_kind(DocumentDirection::Payable), MouvementKind::Exit);
    }

    #[test]
    fn stats_split_by_direction() {
        let past = NaiveDate::from_ymd_opt(2024, 6, 1);
        let docs = vec![
            document(DocumentDirection::Receivable, dec!(1000), dec!(0), past),
            document(DocumentDirection::Receivable, dec!(500.10), dec!(200.05), None),
            document(DocumentDirection::Payable, dec!(300), dec!(300), past),
        ];

        let stats = document_stats(&docs, today());

        assert_eq!(stats.receivable.count, 2);
        assert_eq!(stats.receivable.total_amount, dec!(1500.10));
        assert_eq!(stats.receivable.paid_amount, dec!(200.05));
        assert_eq!(stats.receivable.remaining_amount, dec!(1300.05));
        assert_eq!(stats.receivable.unpaid_count, 1);
        assert_eq!(stats.receivable.partially_paid_count, 1);
        assert_eq!(stats.receivable.overdue_count, 1);

        assert_eq!(stats.payable.count, 1);
        assert_eq!(stats.payable.paid_count, 1);
        // Pago não conta como vencido
        assert_eq!(stats.payable.overdue_count, 0);
    }

    #[test]
    fn empty_tenant_has_zeroed_stats() {
        assert_eq!(document_stats(&[], today()), DocumentStats::default());
    }

    #[test]
    fn partial_payment_keeps_document_open() {
        let remaining = reduce_remaining(dec!(1200), dec!(200)).unwrap();
        assert_eq!(remaining, dec!(1000));
        assert_eq!(DocumentStatus::from_amounts(remaining, dec!(1200)), DocumentStatus::PartiallyPaid);
    }

    #[test]
    fn overpayment_is_rejected() {
        assert!(matches!(
            reduce_remaining(dec!(100), dec!(100.01)),
            Err(AppError::AmountExceedsRemaining { .. })
        ));
    }
}
