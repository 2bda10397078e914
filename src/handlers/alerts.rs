// src/handlers/alerts.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
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
    models::alert::{Alert, AlertFilter, CreateAlertPayload},
};

// GET /api/alerts
#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "Alerts",
    params(("includeDismissed" = Option<bool>, Query, description = "Inclui alertas dispensados")),
    responses(
        (status = 200, description = "Alertas da empresa", body = Vec<Alert>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_alerts(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AppQuery(filter): AppQuery<AlertFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let alerts = app_state
        .alert_service
        .list(tenant.0, filter.include_dismissed)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(alerts)))
}

// POST /api/alerts
#[utoipa::path(
    post,
    path = "/api/alerts",
    tag = "Alerts",
    request_body = CreateAlertPayload,
    responses(
        (status = 201, description = "Alerta manual criado", body = Alert),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_alert(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: AdminOnly,
    AppJson(payload): AppJson<CreateAlertPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let alert = app_state
        .alert_service
        .create_manual(tenant.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(alert)))
}

// POST /api/alerts/{id}/dismiss
#[utoipa::path(
    post,
    path = "/api/alerts/{id}/dismiss",
    tag = "Alerts",
    params(("id" = Uuid, Path, description = "ID do alerta")),
    responses(
        (status = 200, description = "Alerta dispensado", body = Alert),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn dismiss_alert(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let alert = app_state
        .alert_service
        .dismiss(tenant.0, id, user.0.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(alert)))
}

// POST /api/alerts/check
#[utoipa::path(
    post,
    path = "/api/alerts/check",
    tag = "Alerts",
    responses(
        (status = 200, description = "Alertas gerados nesta verificação", body = Vec<Alert>)
    ),
    security(("api_jwt" = []))
)]
pub async fn check_alerts(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let created = app_state
        .alert_service
        .check(tenant.0, Utc::now().date_naive())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(created)))
}
