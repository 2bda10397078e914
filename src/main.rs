//src/main.rs

use axum::{
    extract::State,
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::common::error::{ApiError, AppError};
use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::{auth::auth_guard, i18n::Locale};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new().await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let bind_addr = app_state.config.bind_addr;
    let router = app(app_state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Falha ao escutar o sinal de encerramento: {}", e);
    }
    tracing::info!("Encerrando o servidor...");
}

/// Monta o router completo. Tudo fora de `/api/health` e `/api/auth/{register,login}` exige token.
fn app(app_state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::get_me))
        // Usuários e empresa
        .route("/api/users"
               ,get(handlers::users::list_users)
               .post(handlers::users::create_user)
        )
        .route("/api/users/{id}", patch(handlers::users::update_user))
        .route("/api/tenant"
               ,get(handlers::tenancy::get_tenant)
               .put(handlers::tenancy::update_tenant)
        )
        .route("/api/settings"
               ,get(handlers::settings::get_settings)
               .put(handlers::settings::update_settings)
        )
        // Intervenientes
        .route("/api/intervenants"
               ,get(handlers::intervenants::list_intervenants)
               .post(handlers::intervenants::create_intervenant)
        )
        .route("/api/intervenants/{id}"
               ,get(handlers::intervenants::get_intervenant)
               .patch(handlers::intervenants::update_intervenant)
        )
        // Movimentos de caixa
        .route("/api/mouvements"
               ,get(handlers::mouvements::list_mouvements)
               .post(handlers::mouvements::create_mouvement)
        )
        .route("/api/mouvements/{id}"
               ,patch(handlers::mouvements::update_mouvement)
               .delete(handlers::mouvements::delete_mouvement)
        )
        // Desembolsos
        .route("/api/disbursements"
               ,get(handlers::disbursements::list_disbursements)
               .post(handlers::disbursements::create_disbursement)
        )
        .route("/api/disbursements/{id}", get(handlers::disbursements::get_disbursement))
        .route("/api/disbursements/{id}/justify", post(handlers::disbursements::justify_disbursement))
        .route("/api/disbursements/{id}/return", post(handlers::disbursements::return_disbursement))
        // Adiantamentos
        .route("/api/advances"
               ,get(handlers::advances::list_advances)
               .post(handlers::advances::create_advance)
        )
        .route("/api/advances/{id}/reimburse", post(handlers::advances::reimburse_advance))
        // Saldos e caixa
        .route("/api/balances", get(handlers::dashboard::list_balances))
        .route("/api/balances/{intervenant_id}", get(handlers::dashboard::get_balance))
        .route("/api/cash/balance", get(handlers::dashboard::get_cash_balance))
        .route("/api/cash/dashboard", get(handlers::dashboard::get_dashboard))
        // Documentos
        .route("/api/documents"
               ,get(handlers::documents::list_documents)
               .post(handlers::documents::create_document)
        )
        .route("/api/documents/stats", get(handlers::documents::get_document_stats))
        .route("/api/documents/{id}/pay", post(handlers::documents::pay_document))
        // Alertas
        .route("/api/alerts"
               ,get(handlers::alerts::list_alerts)
               .post(handlers::alerts::create_alert)
        )
        .route("/api/alerts/check", post(handlers::alerts::check_alerts))
        .route("/api/alerts/{id}/dismiss", post(handlers::alerts::dismiss_alert))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(route_not_found)
        .with_state(app_state)
}

async fn route_not_found(State(app_state): State<AppState>, locale: Locale) -> ApiError {
    AppError::ResourceNotFound("Route".to_string()).to_api_error(&locale, &app_state.i18n_store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(AppState::without_database())
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = test_app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn protected_route_without_token_returns_envelope() {
        let response = test_app()
            .oneshot(Request::get("/api/cash/balance").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "INVALID_TOKEN");
        assert_eq!(body["statusCode"], 401);
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let request = Request::post("/api/mouvements")
            .header(header::AUTHORIZATION, "Bearer nao-e-um-jwt")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = test_app()
            .oneshot(Request::get("/api/nao-existe").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["statusCode"], 404);
    }

    #[tokio::test]
    async fn malformed_json_body_returns_envelope() {
        let request = Request::post("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT_LANGUAGE, "fr")
            .body(Body::from("{bad"))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "BAD_REQUEST");
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["message"], "La requête n'a pas pu être lue.");
        assert!(body["details"]["reason"].as_str().is_some_and(|r| !r.is_empty()));
    }

    #[tokio::test]
    async fn missing_field_returns_envelope() {
        let request = Request::post("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email":"a@b.com"}"#))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "BAD_REQUEST");
        assert_eq!(body["statusCode"], 422);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = test_app()
            .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["paths"]["/api/disbursements"].is_object());
    }
}
