// src/handlers/advances.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        extract::{AppJson, AppPath},
        i18n::Locale,
        tenancy::TenantContext,
    },
    models::advance::{Advance, CreateAdvancePayload, ReimburseAdvancePayload, ReimbursementResult},
};

// GET /api/advances
#[utoipa::path(
    get,
    path = "/api/advances",
    tag = "Advances",
    responses(
        (status = 200, description = "Adiantamentos", body = Vec<Advance>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_advances(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let advances = app_state
        .advance_service
        .list(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(advances)))
}

// POST /api/advances
#[utoipa::path(
    post,
    path = "/api/advances",
    tag = "Advances",
    request_body = CreateAdvancePayload,
    responses(
        (status = 201, description = "Adiantamento criado com a saída de caixa", body = Advance),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Interveniente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_advance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    AppJson(payload): AppJson<CreateAdvancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let advance = app_state
        .advance_service
        .create(tenant.0, user.0.id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(advance)))
}

// POST /api/advances/{id}/reimburse
#[utoipa::path(
    post,
    path = "/api/advances/{id}/reimburse",
    tag = "Advances",
    request_body = ReimburseAdvancePayload,
    params(("id" = Uuid, Path, description = "ID do adiantamento")),
    responses(
        (status = 201, description = "Reembolso registrado", body = ReimbursementResult),
        (status = 400, description = "Valor acima do restante"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn reimburse_advance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<ReimburseAdvancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let result = app_state
        .advance_service
        .reimburse(tenant.0, user.0.id, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(result)))
}
