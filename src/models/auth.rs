// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::User => "USER",
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "caixa@empresa.com")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    #[schema(example = "Maria Souza")]
    pub full_name: String,

    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "validation.required"))]
    #[schema(example = "minha-empresa")]
    pub tenant_slug: String,

    #[validate(email(message = "validation.email"))]
    #[schema(example = "caixa@empresa.com")]
    pub email: String,

    #[validate(length(min = 1, message = "validation.required"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(email(message = "validation.email"))]
    pub email: String,

    #[validate(length(min = 8, message = "validation.password"))]
    pub password: String,

    #[validate(length(min = 1, message = "validation.required"))]
    pub full_name: String,

    #[serde(default = "default_role")]
    pub role: UserRole,
}

fn default_role() -> UserRole {
    UserRole::User
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, message = "validation.required"))]
    pub full_name: Option<String>,

    pub role: Option<UserRole>,
    pub is_active: Option<bool>,

    #[validate(length(min = 8, message = "validation.password"))]
    pub password: Option<String>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: Uuid,       // ID do usuário
    pub tenant_id: Uuid, // Tenant ao qual o token dá acesso
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

// Cadastro inicial: cria a empresa e o primeiro administrador
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTenantPayload {
    #[validate(length(min = 1, message = "validation.required"))]
    #[schema(example = "Minha Empresa")]
    pub tenant_name: String,

    #[validate(length(min = 3, max = 63, message = "validation.range"))]
    #[schema(example = "minha-empresa")]
    pub tenant_slug: String,

    #[validate(length(min = 1, message = "validation.required"))]
    pub full_name: String,

    #[validate(email(message = "validation.email"))]
    pub email: String,

    #[validate(length(min = 8, message = "validation.password"))]
    pub password: String,
}
