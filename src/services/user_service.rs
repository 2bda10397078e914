// src/services/user_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{CreateUserPayload, UpdateUserPayload, User, UserRole},
    services::auth::hash_password,
};

/// O tenant ficaria sem administrador ativo depois da alteração?
pub fn removes_last_admin(current: &User, payload: &UpdateUserPayload, other_active_admins: i64) -> bool {
    let was_active_admin = current.is_admin() && current.is_active;
    let stays_admin = payload.role.unwrap_or(current.role) == UserRole::Admin;
    let stays_active = payload.is_active.unwrap_or(current.is_active);

    was_active_admin && !(stays_admin && stays_active) && other_active_admins == 0
}

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    pool: PgPool,
}

impl UserService {
    pub fn new(repo: UserRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<User>, AppError> {
        self.repo.list(&self.pool, tenant_id).await
    }

    pub async fn create(&self, tenant_id: Uuid, payload: &CreateUserPayload) -> Result<User, AppError> {
        let password_hash = hash_password(&payload.password).await?;
        let user = self.repo
            .create_user(
                &self.pool,
                tenant_id,
                &payload.email,
                &password_hash,
                &payload.full_name,
                payload.role,
            )
            .await?;

        tracing::info!(%tenant_id, user_id = %user.id, role = user.role.as_str(), "Usuário criado");
        Ok(user)
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        payload: &UpdateUserPayload,
    ) -> Result<User, AppError> {
        let password_hash = match &payload.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        let current = self.repo
            .find_in_tenant(&mut *tx, tenant_id, user_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("User".into()))?;

        let other_admins = self.repo.count_active_admins(&mut *tx, tenant_id, user_id).await?;
        if removes_last_admin(&current, payload, other_admins) {
            return Err(AppError::LastActiveAdmin);
        }

        let updated = self.repo
            .update_user(
                &mut *tx,
                tenant_id,
                user_id,
                payload.full_name.as_deref(),
                payload.role,
                payload.is_active,
                password_hash.as_deref(),
            )
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("User".into()))?;

        tx.commit().await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn admin() -> User {
        User {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            email: "admin@empresa.com".into(),
            password_hash: String::new(),
            full_name: "Admin".into(),
            role: UserRole::Admin,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn demoting_the_only_admin_is_blocked() {
        let payload = UpdateUserPayload { role: Some(UserRole::User), ..Default::default() };
        assert!(removes_last_admin(&admin(), &payload, 0));
    }

    #[test]
    fn deactivating_the_only_admin_is_blocked() {
        let payload = UpdateUserPayload { is_active: Some(false), ..Default::default() };
        assert!(removes_last_admin(&admin(), &payload, 0));
    }

    #[test]
    fn another_active_admin_allows_the_change() {
        let payload = UpdateUserPayload { is_active: Some(false), ..Default::default() };
        assert!(!removes_last_admin(&admin(), &payload, 1));
    }

    #[test]
    fn renaming_the_only_admin_is_fine() {
        let payload = UpdateUserPayload { full_name: Some("Novo nome".into()), ..Default::default() };
        assert!(!removes_last_admin(&admin(), &payload, 0));
    }

    #[test]
    fn plain_users_are_never_the_last_admin() {
        let mut user = admin();
        user.role = UserRole::User;
        let payload = UpdateUserPayload { is_active: Some(false), ..Default::default() };
        assert!(!removes_last_admin(&user, &payload, 0));
    }
}
