// src/models/intervenant.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "intervenant_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntervenantKind {
    Client,
    Supplier,
    Partner,
    CashBank, // Caixa ou conta bancária
}

/// Contraparte de um movimento de caixa.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Intervenant {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "Fournisseur Diallo")]
    pub name: String,

    pub kind: IntervenantKind,

    #[schema(example = "+221 77 000 00 00")]
    pub phone: Option<String>,

    pub email: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntervenantPayload {
    #[validate(length(min = 1, message = "validation.required"))]
    pub name: String,

    pub kind: IntervenantKind,
    pub phone: Option<String>,

    #[validate(email(message = "validation.email"))]
    pub email: Option<String>,

    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIntervenantPayload {
    #[validate(length(min = 1, message = "validation.required"))]
    pub name: Option<String>,

    pub kind: Option<IntervenantKind>,
    pub phone: Option<String>,

    #[validate(email(message = "validation.email"))]
    pub email: Option<String>,

    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervenantFilter {
    #[serde(default)]
    pub active_only: bool,
}
