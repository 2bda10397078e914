// src/services/dashboard_service.rs

use chrono::{Datelike, NaiveDate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::balance::CashDashboard,
    services::balance_service::BalanceService,
};

pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    balance_service: BalanceService,
    pool: PgPool,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, balance_service: BalanceService, pool: PgPool) -> Self {
        Self { repo, balance_service, pool }
    }

    pub async fn get_dashboard(&self, tenant_id: Uuid, today: NaiveDate) -> Result<CashDashboard, AppError> {
        // O saldo usa o mesmo cache do endpoint de saldo
        let cash = self.balance_service.cached_cash_balance(tenant_id).await?;
        let figures = self.repo.get_figures(&self.pool, tenant_id, month_start(today), today).await?;

        Ok(CashDashboard {
            cash_balance: cash.cash.balance,
            month_entries: figures.month_entries,
            month_exits: figures.month_exits,
            open_disbursements_count: figures.open_disbursements_count,
            open_disbursements_remaining: figures.open_disbursements_remaining,
            open_advances_remaining: figures.open_advances_remaining,
            receivables_remaining: figures.receivables_remaining,
            payables_remaining: figures.payables_remaining,
            active_alerts_count: figures.active_alerts_count,
            recent_mouvements: figures.recent_mouvements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_starts_on_day_one() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(month_start(d), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[sqlx::test]
    async fn month_figures_ignore_future_dates(pool: sqlx::PgPool) {
        use crate::models::mouvement::{CreateMouvementPayload, MouvementKind, PaymentModality};
        use rust_decimal_macros::dec;

        let state = crate::config::AppState::for_tests(pool);
        let admin = state.seed_tenant("empresa-a").await;
        let client = state.seed_intervenant(admin.tenant_id, "Cliente A").await;
        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();

        let entries = [
            (NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(), dec!(1)),
            (NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(), dec!(20)),
            (today, dec!(300)),
            (NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(), dec!(4000)),
        ];
        for (occurred_on, amount) in entries {
            state
                .mouvement_service
                .create(
                    admin.tenant_id,
                    admin.id,
                    CreateMouvementPayload {
                        intervenant_id: client.id,
                        kind: MouvementKind::Entry,
                        amount,
                        modality: PaymentModality::Cash,
                        category: "VENTE".into(),
                        description: None,
                        occurred_on: Some(occurred_on),
                    },
                )
                .await
                .unwrap();
        }

        let dashboard = state.dashboard_service.get_dashboard(admin.tenant_id, today).await.unwrap();
        assert_eq!(dashboard.month_entries, dec!(320));
        assert_eq!(dashboard.month_exits, dec!(0));
    }
}
