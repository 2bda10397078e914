// src/handlers/tenancy.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{extract::AppJson, i18n::Locale, rbac::AdminOnly, tenancy::TenantContext},
    models::tenancy::{Tenant, UpdateTenantPayload},
};

// GET /api/tenant
#[utoipa::path(
    get,
    path = "/api/tenant",
    tag = "Tenancy",
    responses(
        (status = 200, description = "Dados da empresa", body = Tenant),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let tenant = app_state
        .tenant_service
        .get_tenant(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tenant)))
}

// PUT /api/tenant
#[utoipa::path(
    put,
    path = "/api/tenant",
    tag = "Tenancy",
    request_body = UpdateTenantPayload,
    responses(
        (status = 200, description = "Empresa atualizada", body = Tenant),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: AdminOnly,
    AppJson(payload): AppJson<UpdateTenantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state
        .tenant_service
        .update_tenant(tenant.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}
