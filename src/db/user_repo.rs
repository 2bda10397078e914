// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::auth::{User, UserRole},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Login: o e-mail só é único dentro do tenant
    pub async fn find_by_tenant_slug_and_email(
        &self,
        tenant_slug: &str,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.*
            FROM users u
            JOIN tenants t ON t.id = u.tenant_id
            WHERE t.slug = $1 AND LOWER(u.email) = LOWER($2)
            "#,
        )
            .bind(tenant_slug)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Usado pelo middleware para revalidar o usuário do token
    pub async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<User>, AppError> {
        self.find_in_tenant(&self.pool, tenant_id, id).await
    }

    pub async fn find_in_tenant<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 AND tenant_id = $2",
        )
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;
        Ok(maybe_user)
    }

    pub async fn list<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<Vec<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE tenant_id = $1 ORDER BY full_name ASC",
        )
            .bind(tenant_id)
            .fetch_all(executor)
            .await?;
        Ok(users)
    }

    // Cria um novo usuário, com tratamento específico para e-mails duplicados
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        email: &str,
        password_hash: &str,
        full_name: &str,
        role: UserRole,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (tenant_id, email, password_hash, full_name, role)
            VALUES ($1, LOWER($2), $3, $4, $5)
            RETURNING *
            "#,
        )
            .bind(tenant_id)
            .bind(email)
            .bind(password_hash)
            .bind(full_name)
            .bind(role)
            .fetch_one(executor)
            .await
            .map_err(|e| map_unique_violation(e, |_| AppError::EmailAlreadyExists))
    }

    pub async fn update_user<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        full_name: Option<&str>,
        role: Option<UserRole>,
        is_active: Option<bool>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET full_name = COALESCE($3, full_name),
                role = COALESCE($4, role),
                is_active = COALESCE($5, is_active),
                password_hash = COALESCE($6, password_hash),
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(tenant_id)
            .bind(full_name)
            .bind(role)
            .bind(is_active)
            .bind(password_hash)
            .fetch_optional(executor)
            .await?;
        Ok(user)
    }

    /// Administradores ativos do tenant, sem contar `excluding`.
    pub async fn count_active_admins<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        excluding: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM users
            WHERE tenant_id = $1 AND role = 'ADMIN' AND is_active AND id <> $2
            "#,
        )
            .bind(tenant_id)
            .bind(excluding)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }
}
