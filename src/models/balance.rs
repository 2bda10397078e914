// src/models/balance.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::intervenant::IntervenantKind;
use crate::models::mouvement::{Mouvement, MouvementKind, PaymentModality};

/// Linha mínima de movimento usada nas agregações.
#[derive(Debug, Clone, FromRow)]
pub struct MovementLine {
    pub intervenant_id: Uuid,
    pub kind: MouvementKind,
    pub amount: Decimal,
    pub modality: PaymentModality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalancePosition {
    OwesCompany, // O interveniente deve à empresa
    CompanyOwes, // A empresa deve ao interveniente
    Settled,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntervenantBalance {
    pub intervenant_id: Uuid,
    pub name: String,
    pub kind: IntervenantKind,
    pub total_entries: Decimal,
    pub total_exits: Decimal,
    // saídas - entradas
    pub balance: Decimal,
    pub position: BalancePosition,
}

/// Saldo de caixa (modalidade CASH) de um tenant.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashBalance {
    pub balance: Decimal,
    pub total_entries: Decimal,
    pub total_exits: Decimal,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashBalanceResponse {
    #[serde(flatten)]
    pub cash: CashBalance,
    pub from_cache: bool,
}

// Os cards do topo do painel de caixa
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashDashboard {
    pub cash_balance: Decimal,
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
