// src/handlers/intervenants.rs

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
        extract::{AppJson, AppPath, AppQuery},
        i18n::Locale,
        rbac::AdminOnly,
        tenancy::TenantContext,
    },
    models::intervenant::{
        CreateIntervenantPayload, Intervenant, IntervenantFilter, UpdateIntervenantPayload,
    },
};

// GET /api/intervenants
#[utoipa::path(
    get,
    path = "/api/intervenants",
    tag = "Intervenants",
    params(("activeOnly" = Option<bool>, Query, description = "Somente ativos")),
    responses(
        (status = 200, description = "Intervenientes da empresa", body = Vec<Intervenant>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_intervenants(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AppQuery(filter): AppQuery<IntervenantFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let intervenants = app_state
        .intervenant_service
        .list(tenant.0, filter.active_only)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(intervenants)))
}

// POST /api/intervenants
#[utoipa::path(
    post,
    path = "/api/intervenants",
    tag = "Intervenants",
    request_body = CreateIntervenantPayload,
    responses(
        (status = 201, description = "Interveniente criado", body = Intervenant),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_intervenant(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AppJson(payload): AppJson<CreateIntervenantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let intervenant = app_state
        .intervenant_service
        .create(tenant.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(intervenant)))
}

// GET /api/intervenants/{id}
#[utoipa::path(
    get,
    path = "/api/intervenants/{id}",
    tag = "Intervenants",
    params(("id" = Uuid, Path, description = "ID do interveniente")),
    responses(
        (status = 200, description = "Interveniente", body = Intervenant),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_intervenant(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let intervenant = app_state
        .intervenant_service
        .get(tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(intervenant)))
}

// PATCH /api/intervenants/{id}
#[utoipa::path(
    patch,
    path = "/api/intervenants/{id}",
    tag = "Intervenants",
    request_body = UpdateIntervenantPayload,
    params(("id" = Uuid, Path, description = "ID do interveniente")),
    responses(
        (status = 200, description = "Interveniente atualizado", body = Intervenant),
        (status = 403, description = "Apenas administradores"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_intervenant(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: AdminOnly,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateIntervenantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let intervenant = app_state
        .intervenant_service
        .update(tenant.0, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(intervenant)))
}
