// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Tenant (A "Empresa")
// ---
// Fronteira de isolamento: todas as outras tabelas apontam para cá.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,

    #[schema(example = "Minha Empresa")]
    pub name: String,

    #[schema(example = "minha-empresa")]
    pub slug: String,

    #[schema(example = "XOF")]
    pub currency: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantPayload {
    #[validate(length(min = 1, message = "validation.required"))]
    #[schema(example = "Minha Empresa SARL")]
    pub name: String,

    #[validate(length(equal = 3, message = "validation.range"))]
    #[schema(example = "EUR")]
    pub currency: Option<String>,
}
