// src/models/settings.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::money::validate_non_negative_amount;

pub const DEFAULT_DISBURSEMENT_AGE_DAYS: i32 = 30;

/// Limites configuráveis por tenant. Um limite ausente desliga a regra de alerta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantSettings {
    #[schema(ignore)] // O contexto (token) já define o tenant
    pub tenant_id: Uuid,

    #[schema(example = "500000.00")]
    pub debt_threshold: Option<Decimal>,

    #[schema(example = "50000.00")]
    pub min_cash_balance: Option<Decimal>,

    #[schema(example = "200000.00")]
    pub disbursement_amount_threshold: Option<Decimal>,

    #[schema(example = 30)]
    pub disbursement_age_days: i32,

    pub updated_at: Option<DateTime<Utc>>,
}

impl TenantSettings {
    pub fn defaults(tenant_id: Uuid) -> Self {
        Self {
            tenant_id,
            debt_threshold: None,
            min_cash_balance: None,
            disbursement_amount_threshold: None,
            disbursement_age_days: DEFAULT_DISBURSEMENT_AGE_DAYS,
            updated_at: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(custom(function = "validate_non_negative_amount"))]
    pub debt_threshold: Option<Decimal>,

    pub min_cash_balance: Option<Decimal>,

    #[validate(custom(function = "validate_non_negative_amount"))]
    pub disbursement_amount_threshold: Option<Decimal>,

    #[validate(range(min = 1, max = 3650, message = "validation.range"))]
    pub disbursement_age_days: Option<i32>,
}
