// src/handlers/documents.rs

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
        tenancy::TenantContext,
    },
    models::document::{
        CreateDocumentPayload, Document, DocumentDirection, DocumentFilter, DocumentStats,
        DocumentStatus, PayDocumentPayload, PaymentResult,
    },
};

// GET /api/documents
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "Documents",
    params(
        ("direction" = Option<DocumentDirection>, Query, description = "RECEIVABLE ou PAYABLE"),
        ("status" = Option<DocumentStatus>, Query, description = "Filtra por status"),
        ("intervenantId" = Option<Uuid>, Query, description = "Filtra por interveniente")
    ),
    responses(
        (status = 200, description = "Documentos", body = Vec<Document>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_documents(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AppQuery(filter): AppQuery<DocumentFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let documents = app_state
        .document_service
        .list(tenant.0, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(documents)))
}

// POST /api/documents
#[utoipa::path(
    post,
    path = "/api/documents",
    tag = "Documents",
    request_body = CreateDocumentPayload,
    responses(
        (status = 201, description = "Documento registrado", body = Document),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Interveniente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_document(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AppJson(payload): AppJson<CreateDocumentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let document = app_state
        .document_service
        .create(tenant.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(document)))
}

// GET /api/documents/stats
#[utoipa::path(
    get,
    path = "/api/documents/stats",
    tag = "Documents",
    responses(
        (status = 200, description = "Totais a receber e a pagar", body = DocumentStats)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_document_stats(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let stats = app_state
        .document_service
        .stats(tenant.0, Utc::now().date_naive())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(stats)))
}

// POST /api/documents/{id}/pay
#[utoipa::path(
    post,
    path = "/api/documents/{id}/pay",
    tag = "Documents",
    request_body = PayDocumentPayload,
    params(("id" = Uuid, Path, description = "ID do documento")),
    responses(
        (status = 200, description = "Pagamento aplicado", body = PaymentResult),
        (status = 400, description = "Valor acima do restante"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn pay_document(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<PayDocumentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let result = app_state
        .document_service
        .pay(tenant.0, user.0.id, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(result)))
}
