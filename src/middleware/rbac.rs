// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::UserRole,
};

/// 1. O papel exigido por uma rota
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> UserRole;
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store))?;

        let required = T::role();
        if !has_role(user.0.role, required) {
            return Err(AppError::Forbidden(required.as_str().to_string())
                .to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequireRole(PhantomData))
    }
}

/// ADMIN cobre tudo o que USER pode.
pub fn has_role(actual: UserRole, required: UserRole) -> bool {
    actual == UserRole::Admin || actual == required
}

// ---
// PAPÉIS
// ---

pub struct Admin;
impl RoleDef for Admin {
    fn role() -> UserRole { UserRole::Admin }
}

pub type AdminOnly = RequireRole<Admin>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_passes_every_check() {
        assert!(has_role(UserRole::Admin, UserRole::Admin));
        assert!(has_role(UserRole::Admin, UserRole::User));
    }

    #[test]
    fn user_cannot_act_as_admin() {
        assert!(!has_role(UserRole::User, UserRole::Admin));
        assert!(has_role(UserRole::User, UserRole::User));
    }
}
