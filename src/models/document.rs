// src/models/document.rs

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
#[sqlx(type_name = "document_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    Invoice,
    Payslip,
    Receipt,
    Quote,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "document_direction", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentDirection {
    Receivable, // A Receber
    Payable,    // A Pagar
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "document_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
}

impl DocumentStatus {
    pub fn from_amounts(remaining: Decimal, total: Decimal) -> Self {
        match settlement_stage(remaining, total) {
            SettlementStage::Settled => DocumentStatus::Paid,
            SettlementStage::Partial => DocumentStatus::PartiallyPaid,
            SettlementStage::Open => DocumentStatus::Unpaid,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    pub intervenant_id: Option<Uuid>,
    pub kind: DocumentKind,
    pub direction: DocumentDirection,

    #[schema(example = "FAC-2024-017")]
    pub reference: String,

    #[schema(example = "1200.00")]
    pub total_amount: Decimal,
    #[schema(example = "200.00")]
    pub paid_amount: Decimal,
    #[schema(example = "1000.00")]
    pub remaining_amount: Decimal,

    pub status: DocumentStatus,

    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub issued_on: NaiveDate,
    #[schema(value_type = Option<String>, format = Date, example = "2024-03-31")]
    pub due_on: Option<NaiveDate>,

    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != DocumentStatus::Paid && self.due_on.is_some_and(|due| due < today)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilter {
    pub direction: Option<DocumentDirection>,
    pub status: Option<DocumentStatus>,
    pub intervenant_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub document: Document,
    pub mouvement: Option<Mouvement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectionStats {
    pub count: i64,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
    pub unpaid_count: i64,
    pub partially_paid_count: i64,
    pub paid_count: i64,
    pub overdue_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub receivable: DirectionStats,
    pub payable: DirectionStats,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentPayload {
    pub intervenant_id: Option<Uuid>,
    pub kind: DocumentKind,
    pub direction: DocumentDirection,

    #[validate(length(min = 1, message = "validation.required"))]
    pub reference: String,

    #[validate(custom(function = "validate_positive_amount"))]
    pub total_amount: Decimal,

    #[schema(value_type = Option<String>, format = Date)]
    pub issued_on: Option<NaiveDate>,

    #[schema(value_type = Option<String>, format = Date)]
    pub due_on: Option<NaiveDate>,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayDocumentPayload {
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Decimal,

    #[serde(default)]
    pub modality: PaymentModality,

    #[schema(value_type = Option<String>, format = Date)]
    pub paid_on: Option<NaiveDate>,

    pub description: Option<String>,

    // false: só registra o pagamento, sem movimento de caixa
    #[serde(default = "default_record_movement")]
    pub record_movement: bool,
}

fn default_record_movement() -> bool {
    true
}
