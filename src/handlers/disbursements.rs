// src/handlers/disbursements.rs

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
        extract::{AppJson, AppPath, AppQuery},
        i18n::Locale,
        tenancy::TenantContext,
    },
    models::disbursement::{
        CreateDisbursementPayload, Disbursement, DisbursementDetail, DisbursementFilter,
        DisbursementStatus, JustificationResult, JustifyDisbursementPayload,
        ReturnDisbursementPayload, ReturnResult,
    },
};

// GET /api/disbursements
#[utoipa::path(
    get,
    path = "/api/disbursements",
    tag = "Disbursements",
    params(("status" = Option<DisbursementStatus>, Query, description = "Filtra por status")),
    responses(
        (status = 200, description = "Desembolsos", body = Vec<Disbursement>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_disbursements(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AppQuery(filter): AppQuery<DisbursementFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let disbursements = app_state
        .disbursement_service
        .list(tenant.0, filter.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(disbursements)))
}

// POST /api/disbursements
#[utoipa::path(
    post,
    path = "/api/disbursements",
    tag = "Disbursements",
    request_body = CreateDisbursementPayload,
    responses(
        (status = 201, description = "Desembolso criado com a saída de caixa", body = Disbursement),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Interveniente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_disbursement(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    AppJson(payload): AppJson<CreateDisbursementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let disbursement = app_state
        .disbursement_service
        .create(tenant.0, user.0.id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(disbursement)))
}

// GET /api/disbursements/{id}
#[utoipa::path(
    get,
    path = "/api/disbursements/{id}",
    tag = "Disbursements",
    params(("id" = Uuid, Path, description = "ID do desembolso")),
    responses(
        (status = 200, description = "Desembolso com justificativas e movimentos", body = DisbursementDetail),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_disbursement(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .disbursement_service
        .detail(tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/disbursements/{id}/justify
#[utoipa::path(
    post,
    path = "/api/disbursements/{id}/justify",
    tag = "Disbursements",
    request_body = JustifyDisbursementPayload,
    params(("id" = Uuid, Path, description = "ID do desembolso")),
    responses(
        (status = 201, description = "Justificativa registrada", body = JustificationResult),
        (status = 400, description = "Valor acima do restante"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn justify_disbursement(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<JustifyDisbursementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let result = app_state
        .disbursement_service
        .justify(tenant.0, user.0.id, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(result)))
}

// POST /api/disbursements/{id}/return
#[utoipa::path(
    post,
    path = "/api/disbursements/{id}/return",
    tag = "Disbursements",
    request_body = ReturnDisbursementPayload,
    params(("id" = Uuid, Path, description = "ID do desembolso")),
    responses(
        (status = 201, description = "Devolução registrada com a entrada de caixa", body = ReturnResult),
        (status = 400, description = "Valor acima do restante"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn return_disbursement(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<ReturnDisbursementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let result = app_state
        .disbursement_service
        .record_return(tenant.0, user.0.id, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(result)))
}
