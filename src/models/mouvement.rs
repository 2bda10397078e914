// src/models/mouvement.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::money::validate_positive_amount;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "mouvement_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MouvementKind {
    Entry, // Entrada
    Exit,  // Saída
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_modality", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentModality {
    #[default]
    Cash,
    BankTransfer,
    Check,
    Card,
    MobileMoney,
}

// Categorias geradas automaticamente pelos fluxos de adiantamento e desembolso
pub const CATEGORY_DISBURSEMENT: &str = "DISBURSEMENT";
pub const CATEGORY_DISBURSEMENT_RETURN: &str = "DISBURSEMENT_RETURN";
pub const CATEGORY_ADVANCE: &str = "ADVANCE";
pub const CATEGORY_ADVANCE_REIMBURSEMENT: &str = "ADVANCE_REIMBURSEMENT";
pub const CATEGORY_DOCUMENT_PAYMENT: &str = "DOCUMENT_PAYMENT";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Mouvement {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    pub intervenant_id: Uuid,
    pub kind: MouvementKind,

    #[schema(example = "150.00")]
    pub amount: Decimal,

    pub modality: PaymentModality,

    #[schema(example = "FUEL")]
    pub category: String,

    pub description: Option<String>,

    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub occurred_on: NaiveDate,

    // Vínculos opcionais
    pub disbursement_id: Option<Uuid>,
    pub advance_id: Option<Uuid>,
    pub document_id: Option<Uuid>,

    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mouvement {
    /// Nome do registro que "possui" o movimento, se houver.
    pub fn linked_owner(&self) -> Option<&'static str> {
        if self.disbursement_id.is_some() {
            Some("Disbursement")
        } else if self.advance_id.is_some() {
            Some("Advance")
        } else if self.document_id.is_some() {
            Some("Document")
        } else {
            None
        }
    }
}

/// Dados para inserir um movimento (usado pelos vários fluxos).
#[derive(Debug, Clone)]
pub struct NewMouvement {
    pub intervenant_id: Uuid,
    pub kind: MouvementKind,
    pub amount: Decimal,
    pub modality: PaymentModality,
    pub category: String,
    pub description: Option<String>,
    pub occurred_on: NaiveDate,
    pub disbursement_id: Option<Uuid>,
    pub advance_id: Option<Uuid>,
    pub document_id: Option<Uuid>,
}

/// Alterações permitidas em um movimento avulso.
#[derive(Debug, Clone, Default)]
pub struct MouvementChanges {
    pub intervenant_id: Option<Uuid>,
    pub kind: Option<MouvementKind>,
    pub amount: Option<Decimal>,
    pub modality: Option<PaymentModality>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub occurred_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouvementFilter {
    pub intervenant_id: Option<Uuid>,
    pub kind: Option<MouvementKind>,
    pub modality: Option<PaymentModality>,
    pub disbursement_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMouvementPayload {
    pub intervenant_id: Uuid,
    pub kind: MouvementKind,

    #[validate(custom(function = "validate_positive_amount"))]
    #[schema(example = "15000.00")]
    pub amount: Decimal,

    #[serde(default)]
    pub modality: PaymentModality,

    #[validate(length(min = 1, message = "validation.required"))]
    #[schema(example = "VENTE")]
    pub category: String,

    pub description: Option<String>,

    // Sem data: hoje
    #[schema(value_type = Option<String>, format = Date)]
    pub occurred_on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMouvementPayload {
    pub intervenant_id: Option<Uuid>,
    pub kind: Option<MouvementKind>,

    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Option<Decimal>,

    pub modality: Option<PaymentModality>,

    #[validate(length(min = 1, message = "validation.required"))]
    pub category: Option<String>,

    /// Ausente mantém a descrição; `""` apaga.
    pub description: Option<String>,

    #[schema(value_type = Option<String>, format = Date)]
    pub occurred_on: Option<NaiveDate>,
}

impl From<UpdateMouvementPayload> for MouvementChanges {
    fn from(payload: UpdateMouvementPayload) -> Self {
        Self {
            intervenant_id: payload.intervenant_id,
            kind: payload.kind,
            amount: payload.amount,
            modality: payload.modality,
            category: payload.category,
            description: payload.description,
            occurred_on: payload.occurred_on,
        }
    }
}
