// src/db/dashboard_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::mouvement::Mouvement};

const RECENT_MOUVEMENTS: i64 = 10;

/// Números do painel que vêm direto do banco (o saldo de caixa vem do serviço de saldos).
#[derive(Debug, Clone)]
pub struct DashboardFigures {
    pub month_entries: Decimal,
    pub month_exits: Decimal,
    pub open_disbursements_count: i64,
    pub open_disbursements_remaining: Decimal,
    pub open_advances_remaining: Decimal,
    pub receivables_remaining: Decimal,
    pub payables_remaining: Decimal,
    pub active_alerts_count: i64,
    pub recent_mouvements: Vec<Mouvement>,
}

#[derive(Clone, Default)]
pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn get_figures<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        month_start: NaiveDate,
        today: NaiveDate,
    ) -> Result<DashboardFigures, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        // Uma transação só, para todos os cards lerem o mesmo snapshot
        let mut tx = executor.begin().await?;

        // A. Entradas e saídas do mês até hoje (todas as modalidades); datas futuras ficam de fora
        let (month_entries, month_exits): (Decimal, Decimal) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE kind = 'ENTRY'), 0),
                COALESCE(SUM(amount) FILTER (WHERE kind = 'EXIT'), 0)
            FROM mouvements
            WHERE tenant_id = $1 AND occurred_on BETWEEN $2 AND $3
            "#,
        )
            .bind(tenant_id)
            .bind(month_start)
            .bind(today)
            .fetch_one(&mut *tx)
            .await?;

        // B. Desembolsos em aberto
        let (open_disbursements_count, open_disbursements_remaining): (i64, Decimal) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(remaining_amount), 0)
            FROM disbursements
            WHERE tenant_id = $1 AND status <> 'JUSTIFIED'
            "#,
        )
            .bind(tenant_id)
            .fetch_one(&mut *tx)
            .await?;

        // C. Adiantamentos em aberto
        let open_advances_remaining: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(remaining_amount), 0)
            FROM advances
            WHERE tenant_id = $1 AND status <> 'REIMBURSED'
            "#,
        )
            .bind(tenant_id)
            .fetch_one(&mut *tx)
            .await?;

        // D. A receber / a pagar
        let (receivables_remaining, payables_remaining): (Decimal, Decimal) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(remaining_amount) FILTER (WHERE direction = 'RECEIVABLE'), 0),
                COALESCE(SUM(remaining_amount) FILTER (WHERE direction = 'PAYABLE'), 0)
            FROM documents
            WHERE tenant_id = $1 AND status <> 'PAID'
            "#,
        )
            .bind(tenant_id)
            .fetch_one(&mut *tx)
            .await?;

        let active_alerts_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM alerts WHERE tenant_id = $1 AND NOT is_dismissed",
        )
            .bind(tenant_id)
            .fetch_one(&mut *tx)
            .await?;

        let recent_mouvements = sqlx::query_as::<_, Mouvement>(
            r#"
            SELECT * FROM mouvements
            WHERE tenant_id = $1
            ORDER BY occurred_on DESC, created_at DESC
            LIMIT $2
            "#,
        )
            .bind(tenant_id)
            .bind(RECENT_MOUVEMENTS)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(DashboardFigures {
            month_entries,
            month_exits,
            open_disbursements_count,
            open_disbursements_remaining,
            open_advances_remaining,
            receivables_remaining,
            payables_remaining,
            active_alerts_count,
            recent_mouvements,
        })
    }
}
