// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Corpo, caminho ou query que o axum não conseguiu extrair
    #[error("Requisição malformada: {reason}")]
    MalformedRequest { status: StatusCode, reason: String },

    #[error("Valor {amount} excede o saldo restante {remaining}")]
    AmountExceedsRemaining { amount: Decimal, remaining: Decimal },

    #[error("Documento sem interveniente não pode gerar movimento")]
    DocumentWithoutIntervenant,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário inativo")]
    InactiveUser,

    #[error("Permissão insuficiente: requer {0}")]
    Forbidden(String),

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Slug de tenant já existe")]
    SlugAlreadyExists,

    #[error("O último administrador ativo não pode ser removido")]
    LastActiveAdmin,

    #[error("Movimento vinculado a {0} não pode ser alterado diretamente")]
    LinkedMovement(String),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// O erro que sai pela API: `{error, message, statusCode, details?}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.error,
            "message": self.message,
            "statusCode": self.status.as_u16(),
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedRequest { status, .. } => *status,
            AppError::ValidationError(_)
            | AppError::AmountExceedsRemaining { .. }
            | AppError::DocumentWithoutIntervenant => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::InactiveUser => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists
            | AppError::SlugAlreadyExists
            | AppError::LastActiveAdmin
            | AppError::LinkedMovement(_)
            | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Código estável exposto no campo `error`.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::MalformedRequest { .. } => "BAD_REQUEST",
            AppError::AmountExceedsRemaining { .. } => "AMOUNT_EXCEEDS_REMAINING",
            AppError::DocumentWithoutIntervenant => "DOCUMENT_WITHOUT_INTERVENANT",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::InactiveUser => "INACTIVE_USER",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::ResourceNotFound(_) => "NOT_FOUND",
            AppError::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            AppError::SlugAlreadyExists => "SLUG_ALREADY_EXISTS",
            AppError::LastActiveAdmin => "LAST_ACTIVE_ADMIN",
            AppError::LinkedMovement(_) => "LINKED_MOVEMENT",
            AppError::UniqueConstraintViolation(_) => "CONFLICT",
            _ => "INTERNAL_SERVER_ERROR",
        }
    }

    fn message_key(&self) -> (&'static str, Vec<(&'static str, String)>) {
        match self {
            AppError::ValidationError(_) => ("errors.validation", vec![]),
            AppError::MalformedRequest { .. } => ("errors.bad_request", vec![]),
            AppError::AmountExceedsRemaining { amount, remaining } => (
                "errors.amount_exceeds_remaining",
                vec![("amount", amount.to_string()), ("remaining", remaining.to_string())],
            ),
            AppError::DocumentWithoutIntervenant => ("errors.document_without_intervenant", vec![]),
            AppError::InvalidCredentials => ("errors.invalid_credentials", vec![]),
            AppError::InvalidToken => ("errors.invalid_token", vec![]),
            AppError::InactiveUser => ("errors.inactive_user", vec![]),
            AppError::Forbidden(role) => ("errors.forbidden", vec![("role", role.clone())]),
            AppError::ResourceNotFound(resource) => {
                ("errors.not_found", vec![("resource", resource.clone())])
            }
            AppError::EmailAlreadyExists => ("errors.email_already_exists", vec![]),
            AppError::SlugAlreadyExists => ("errors.slug_already_exists", vec![]),
            AppError::LastActiveAdmin => ("errors.last_active_admin", vec![]),
            AppError::LinkedMovement(owner) => {
                ("errors.linked_movement", vec![("owner", owner.clone())])
            }
            AppError::UniqueConstraintViolation(what) => {
                ("errors.unique_violation", vec![("field", what.clone())])
            }
            _ => ("errors.internal", vec![]),
        }
    }

    /// Converte o erro interno na resposta traduzida para o idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();

        // O tracing registra a mensagem detalhada; o cliente só vê a genérica.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let (key, args) = self.message_key();
        let args: Vec<(&str, &str)> = args.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let message = store.translate(&locale.0, key, &args);

        let details = match &self {
            AppError::ValidationError(errors) => {
                let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            let key = e
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("validation.{}", e.code));
                            store.translate(&locale.0, &key, &[])
                        })
                        .collect();
                    fields.insert(field.to_string(), messages);
                }
                Some(json!(fields))
            }
            AppError::MalformedRequest { reason, .. } => Some(json!({ "reason": reason })),
            _ => None,
        };

        ApiError {
            status,
            error: self.code().to_string(),
            message,
            details,
        }
    }
}

/// Mapeia violações de unicidade para o erro de conflito adequado.
pub fn map_unique_violation(e: sqlx::Error, on_unique: impl FnOnce(&str) -> AppError) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return on_unique(db_err.constraint().unwrap_or_default());
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use rust_decimal_macros::dec;

    fn en() -> Locale {
        Locale("en".to_string())
    }

    async fn body_json(api_error: ApiError) -> (StatusCode, Value) {
        let response = api_error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_renders_envelope() {
        let store = I18nStore::load().unwrap();
        let err = AppError::ResourceNotFound("Disbursement".into()).to_api_error(&en(), &store);
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["statusCode"], 404);
        assert!(body["message"].as_str().unwrap().contains("Disbursement"));
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn amount_exceeding_remaining_is_a_bad_request() {
        let store = I18nStore::load().unwrap();
        let err = AppError::AmountExceedsRemaining {
            amount: dec!(700),
            remaining: dec!(600),
        }
        .to_api_error(&en(), &store);
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("600"));
    }

    #[tokio::test]
    async fn validation_error_lists_field_details() {
        use validator::Validate;

        #[derive(Validate)]
        struct Payload {
            #[validate(length(min = 1, message = "validation.required"))]
            name: String,
        }

        let store = I18nStore::load().unwrap();
        let errors = Payload { name: String::new() }.validate().unwrap_err();
        let (status, body) = body_json(AppError::ValidationError(errors).to_api_error(&en(), &store)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["name"][0], "This field is required.");
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let store = I18nStore::load().unwrap();
        let err = AppError::InternalServerError(anyhow::anyhow!("segredo do banco"))
            .to_api_error(&en(), &store);
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["message"].as_str().unwrap().contains("segredo"));
    }

    #[tokio::test]
    async fn malformed_request_keeps_status_and_reason() {
        let store = I18nStore::load().unwrap();
        let err = AppError::MalformedRequest {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            reason: "missing field `amount`".into(),
        }
        .to_api_error(&Locale("pt".to_string()), &store);
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "BAD_REQUEST");
        assert_eq!(body["statusCode"], 422);
        assert_eq!(body["message"], "A requisição não pôde ser lida.");
        assert_eq!(body["details"]["reason"], "missing field `amount`");
    }

    #[test]
    fn conflict_variants_map_to_409() {
        assert_eq!(AppError::EmailAlreadyExists.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::LastActiveAdmin.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::LinkedMovement("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::Forbidden("ADMIN".into()).status(), StatusCode::FORBIDDEN);
    }
}
