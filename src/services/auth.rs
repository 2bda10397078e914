// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{SettingsRepository, TenantRepository, UserRepository},
    models::auth::{AuthResponse, Claims, RegisterTenantPayload, User, UserRole},
};

/// Gera o hash fora do runtime assíncrono (bcrypt é CPU-bound).
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}

pub fn encode_token(user: &User, secret: &str, ttl_hours: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(ttl_hours);

    let claims = Claims {
        sub: user.id,
        tenant_id: user.tenant_id,
        role: user.role,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    tenant_repo: TenantRepository,
    settings_repo: SettingsRepository,
    jwt_secret: String,
    jwt_ttl_hours: i64,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        tenant_repo: TenantRepository,
        settings_repo: SettingsRepository,
        jwt_secret: String,
        jwt_ttl_hours: i64,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, tenant_repo, settings_repo, jwt_secret, jwt_ttl_hours, pool }
    }

    /// Cria a empresa, o primeiro administrador e as configurações padrão, atomicamente.
    pub async fn register_tenant(&self, payload: &RegisterTenantPayload) -> Result<AuthResponse, AppError> {
        // O hash fica fora da transação, não toca no banco
        let password_hash = hash_password(&payload.password).await?;

        let mut tx = self.pool.begin().await?;

        let tenant = self.tenant_repo
            .create_tenant(&mut *tx, &payload.tenant_name, &payload.tenant_slug)
            .await?;

        let admin = self.user_repo
            .create_user(
                &mut *tx,
                tenant.id,
                &payload.email,
                &password_hash,
                &payload.full_name,
                UserRole::Admin,
            )
            .await?;

        self.settings_repo.create_default(&mut *tx, tenant.id).await?;

        // Qualquer erro acima desfaz tudo no drop do tx
        tx.commit().await?;

        tracing::info!(tenant_id = %tenant.id, slug = %tenant.slug, "Nova empresa registrada");

        let token = encode_token(&admin, &self.jwt_secret, self.jwt_ttl_hours)?;
        Ok(AuthResponse { token, user: admin })
    }

    pub async fn login(&self, tenant_slug: &str, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self.user_repo
            .find_by_tenant_slug_and_email(&tenant_slug.to_lowercase(), email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::InactiveUser);
        }

        let token = encode_token(&user, &self.jwt_secret, self.jwt_ttl_hours)?;
        Ok(AuthResponse { token, user })
    }

    /// Valida o token e recarrega o usuário; o tenant vem só das claims.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(token, &self.jwt_secret)?;

        let user = self.user_repo
            .find_by_id(claims.tenant_id, claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::InactiveUser);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            email: "caixa@empresa.com".into(),
            password_hash: String::new(),
            full_name: "Maria Souza".into(),
            role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_carries_user_tenant_and_role() {
        let u = user(UserRole::Admin);
        let token = encode_token(&u, "segredo", 24).unwrap();
        let claims = decode_token(&token, "segredo").unwrap();

        assert_eq!(claims.sub, u.id);
        assert_eq!(claims.tenant_id, u.tenant_id);
        assert_eq!(claims.role, UserRole::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = encode_token(&user(UserRole::User), "segredo", 24).unwrap();
        assert!(matches!(decode_token(&token, "outro"), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = encode_token(&user(UserRole::User), "segredo", -2).unwrap();
        assert!(matches!(decode_token(&token, "segredo"), Err(AppError::InvalidToken)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(decode_token("nao-e-um-jwt", "segredo"), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn password_hash_round_trip() {
        let hashed = hash_password("senha-forte").await.unwrap();
        assert!(verify_password("senha-forte", &hashed).await.unwrap());
        assert!(!verify_password("senha-errada", &hashed).await.unwrap());
    }
}
