// src/handlers/mouvements.rs

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
        rbac::AdminOnly,
        tenancy::TenantContext,
    },
    models::mouvement::{
        CreateMouvementPayload, Mouvement, MouvementFilter, MouvementKind, PaymentModality,
        UpdateMouvementPayload,
    },
};

// GET /api/mouvements
#[utoipa::path(
    get,
    path = "/api/mouvements",
    tag = "Mouvements",
    params(
        ("intervenantId" = Option<Uuid>, Query, description = "Filtra por interveniente"),
        ("kind" = Option<MouvementKind>, Query, description = "ENTRY ou EXIT"),
        ("modality" = Option<PaymentModality>, Query, description = "Modalidade de pagamento"),
        ("disbursementId" = Option<Uuid>, Query, description = "Movimentos de um desembolso"),
        ("from" = Option<String>, Query, description = "Data inicial (YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Data final (YYYY-MM-DD)"),
        ("limit" = Option<i64>, Query, description = "Máximo de linhas (padrão 200)")
    ),
    responses(
        (status = 200, description = "Movimentos de caixa", body = Vec<Mouvement>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_mouvements(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AppQuery(filter): AppQuery<MouvementFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let mouvements = app_state
        .mouvement_service
        .list(tenant.0, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(mouvements)))
}

// POST /api/mouvements
#[utoipa::path(
    post,
    path = "/api/mouvements",
    tag = "Mouvements",
    request_body = CreateMouvementPayload,
    responses(
        (status = 201, description = "Movimento registrado", body = Mouvement),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Interveniente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_mouvement(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    AppJson(payload): AppJson<CreateMouvementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mouvement = app_state
        .mouvement_service
        .create(tenant.0, user.0.id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(mouvement)))
}

// PATCH /api/mouvements/{id}
#[utoipa::path(
    patch,
    path = "/api/mouvements/{id}",
    tag = "Mouvements",
    request_body = UpdateMouvementPayload,
    params(("id" = Uuid, Path, description = "ID do movimento")),
    responses(
        (status = 200, description = "Movimento atualizado", body = Mouvement),
        (status = 403, description = "Apenas administradores"),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Movimento vinculado a um fluxo")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_mouvement(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: AdminOnly,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateMouvementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mouvement = app_state
        .mouvement_service
        .update(tenant.0, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(mouvement)))
}

// DELETE /api/mouvements/{id}
#[utoipa::path(
    delete,
    path = "/api/mouvements/{id}",
    tag = "Mouvements",
    params(("id" = Uuid, Path, description = "ID do movimento")),
    responses(
        (status = 204, description = "Movimento removido"),
        (status = 403, description = "Apenas administradores"),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Movimento vinculado a um fluxo")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_mouvement(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: AdminOnly,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .mouvement_service
        .delete(tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
