// src/models/advance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::money::validate_positive_amount;
use crate::models::mouvement::{Mouvement, PaymentModality};
use crate::services::lifecycle::{settlement_stage, SettlementStage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "advance_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdvanceStatus {
    Open,
    PartiallyReimbursed,
    Reimbursed,
}

impl AdvanceStatus {
    pub fn from_amounts(remaining: Decimal, amount: Decimal) -> Self {
        match settlement_stage(remaining, amount) {
            SettlementStage::Settled => AdvanceStatus::Reimbursed,
            SettlementStage::Partial => AdvanceStatus::PartiallyReimbursed,
            SettlementStage::Open => AdvanceStatus::Open,
        }
    }
}

// Fluxo antigo, paralelo aos desembolsos: só é quitado por reembolso em dinheiro.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Advance {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    pub intervenant_id: Uuid,

    #[schema(example = "250.00")]
    pub amount: Decimal,

    #[schema(example = "100.00")]
    pub remaining_amount: Decimal,

    pub status: AdvanceStatus,
    pub description: Option<String>,
    pub modality: PaymentModality,

    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub advanced_on: NaiveDate,

    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReimbursementResult {
    pub advance: Advance,
    pub mouvement: Mouvement,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdvancePayload {
    pub intervenant_id: Uuid,

    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Decimal,

    pub description: Option<String>,

    #[serde(default)]
    pub modality: PaymentModality,

    #[schema(value_type = Option<String>, format = Date)]
    pub advanced_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReimburseAdvancePayload {
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Decimal,

    #[serde(default)]
    pub modality: PaymentModality,

    pub description: Option<String>,

    #[schema(value_type = Option<String>, format = Date)]
    pub reimbursed_on: Option<NaiveDate>,
}
