// src/models/disbursement.rs

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
#[sqlx(type_name = "disbursement_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisbursementStatus {
    Open,
    PartiallyJustified,
    Justified,
}

impl DisbursementStatus {
    /// Função pura do restante contra o valor inicial.
    pub fn from_amounts(remaining: Decimal, initial: Decimal) -> Self {
        match settlement_stage(remaining, initial) {
            SettlementStage::Settled => DisbursementStatus::Justified,
            SettlementStage::Partial => DisbursementStatus::PartiallyJustified,
            SettlementStage::Open => DisbursementStatus::Open,
        }
    }
}

/// Dinheiro que saiu do caixa e aguarda justificativa ou devolução.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Disbursement {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    pub intervenant_id: Uuid,

    #[schema(example = "1000.00")]
    pub initial_amount: Decimal,

    #[schema(example = "600.00")]
    pub remaining_amount: Decimal,

    pub status: DisbursementStatus,

    #[schema(example = "Achat de carburant")]
    pub purpose: String,

    pub modality: PaymentModality,

    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub disbursed_on: NaiveDate,

    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Documenta o uso do dinheiro; não movimenta o caixa.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Justification {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    pub disbursement_id: Uuid,

    #[schema(example = "400.00")]
    pub amount: Decimal,

    #[schema(example = "Facture station Total")]
    pub description: String,

    #[schema(example = "FAC-2024-001")]
    pub reference: Option<String>,

    #[schema(value_type = String, format = Date, example = "2024-03-02")]
    pub justified_on: NaiveDate,

    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisbursementDetail {
    #[serde(flatten)]
    pub disbursement: Disbursement,
    pub justifications: Vec<Justification>,
    pub mouvements: Vec<Mouvement>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JustificationResult {
    pub disbursement: Disbursement,
    pub justification: Justification,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnResult {
    pub disbursement: Disbursement,
    pub mouvement: Mouvement,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDisbursementPayload {
    pub intervenant_id: Uuid,

    #[validate(custom(function = "validate_positive_amount"))]
    #[schema(example = "1000.00")]
    pub amount: Decimal,

    #[validate(length(min = 1, message = "validation.required"))]
    pub purpose: String,

    #[serde(default)]
    pub modality: PaymentModality,

    #[schema(value_type = Option<String>, format = Date)]
    pub disbursed_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JustifyDisbursementPayload {
    #[validate(custom(function = "validate_positive_amount"))]
    #[schema(example = "400.00")]
    pub amount: Decimal,

    #[validate(length(min = 1, message = "validation.required"))]
    pub description: String,

    pub reference: Option<String>,

    #[schema(value_type = Option<String>, format = Date)]
    pub justified_on: Option<NaiveDate>,
}

// Devolução em dinheiro do que não foi gasto
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnDisbursementPayload {
    #[validate(custom(function = "validate_positive_amount"))]
    #[schema(example = "600.00")]
    pub amount: Decimal,

    #[serde(default)]
    pub modality: PaymentModality,

    pub description: Option<String>,

    #[schema(value_type = Option<String>, format = Date)]
    pub returned_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisbursementFilter {
    pub status: Option<DisbursementStatus>,
}
