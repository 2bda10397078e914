// src/handlers/dashboard.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{extract::AppPath, i18n::Locale, tenancy::TenantContext},
    models::balance::{CashBalanceResponse, CashDashboard, IntervenantBalance},
};

// GET /api/balances
#[utoipa::path(
    get,
    path = "/api/balances",
    tag = "Balances",
    responses(
        (status = 200, description = "Saldo de cada interveniente", body = Vec<IntervenantBalance>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_balances(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let balances = app_state
        .balance_service
        .list_balances(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(balances)))
}

// GET /api/balances/{intervenant_id}
#[utoipa::path(
    get,
    path = "/api/balances/{intervenant_id}",
    tag = "Balances",
    params(("intervenant_id" = Uuid, Path, description = "ID do interveniente")),
    responses(
        (status = 200, description = "Saldo do interveniente", body = IntervenantBalance),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_balance(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AppPath(intervenant_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let balance = app_state
        .balance_service
        .get_balance(tenant.0, intervenant_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(balance)))
}

// GET /api/cash/balance
#[utoipa::path(
    get,
    path = "/api/cash/balance",
    tag = "Cash",
    responses(
        (status = 200, description = "Saldo de caixa (cache de 5 minutos)", body = CashBalanceResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_cash_balance(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let cash = app_state
        .balance_service
        .cached_cash_balance(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(cash)))
}

// GET /api/cash/dashboard
#[utoipa::path(
    get,
    path = "/api/cash/dashboard",
    tag = "Cash",
    responses(
        (status = 200, description = "Visão consolidada do caixa", body = CashDashboard),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let dashboard = app_state
        .dashboard_service
        .get_dashboard(tenant.0, Utc::now().date_naive())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(dashboard)))
}
