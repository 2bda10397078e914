// src/models/alert.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "alert_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    LowCash,
    ReceivableDebt,
    PayableDebt,
    DisbursementOverdue,
    DisbursementOutstanding,
    DocumentOverdue,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "alert_severity", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    pub kind: AlertKind,
    pub severity: AlertSeverity,

    #[schema(example = "Caisse sous le minimum")]
    pub title: String,

    pub message: String,

    // Registro que originou o alerta (interveniente, desembolso, documento...)
    pub entity_id: Option<Uuid>,

    pub amount: Option<Decimal>,
    pub is_dismissed: bool,
    pub dismissed_at: Option<DateTime<Utc>>,
    pub dismissed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Alerta calculado, ainda não persistido.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDraft {
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub entity_id: Option<Uuid>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertPayload {
    #[validate(length(min = 1, message = "validation.required"))]
    pub title: String,

    #[validate(length(min = 1, message = "validation.required"))]
    pub message: String,

    #[serde(default = "default_severity")]
    pub severity: AlertSeverity,

    pub entity_id: Option<Uuid>,
}

fn default_severity() -> AlertSeverity {
    AlertSeverity::Info
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertFilter {
    #[serde(default)]
    pub include_dismissed: bool,
}
