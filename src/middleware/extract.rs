// src/middleware/extract.rs

use axum::{
    extract::{FromRef, FromRequest, FromRequestParts, Path, Query, Request},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

// Versões de Json/Path/Query cujas rejeições saem no envelope de erro da API

pub struct AppJson<T>(pub T);

pub struct AppPath<T>(pub T);

pub struct AppQuery<T>(pub T);

fn malformed<S>(status: StatusCode, reason: String, locale: &Locale, state: &S) -> ApiError
where
    AppState: FromRef<S>,
{
    let app_state = AppState::from_ref(state);
    AppError::MalformedRequest { status, reason }.to_api_error(locale, &app_state.i18n_store)
}

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(req.headers());
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(malformed(
                rejection.status(),
                rejection.body_text(),
                &locale,
                state,
            )),
        }
    }
}

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(AppPath(value)),
            Err(rejection) => {
                let locale = Locale::from_headers(&parts.headers);
                Err(malformed(rejection.status(), rejection.body_text(), &locale, state))
            }
        }
    }
}

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(AppQuery(value)),
            Err(rejection) => {
                let locale = Locale::from_headers(&parts.headers);
                Err(malformed(rejection.status(), rejection.body_text(), &locale, state))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mouvement::MouvementFilter;
    use axum::{
        body::{to_bytes, Body},
        routing::get,
        Router,
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    fn router() -> Router {
        Router::new()
            .route(
                "/itens/{id}",
                get(|AppPath(id): AppPath<Uuid>| async move { id.to_string() }),
            )
            .route(
                "/movimentos",
                get(|AppQuery(filter): AppQuery<MouvementFilter>| async move {
                    format!("{:?}", filter.kind)
                }),
            )
            .with_state(AppState::without_database())
    }

    async fn send(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router()
            .oneshot(axum::http::Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn invalid_uuid_in_path_uses_envelope() {
        let (status, body) = send("/itens/nao-e-uuid").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BAD_REQUEST");
        assert_eq!(body["statusCode"], 400);
    }

    #[tokio::test]
    async fn unknown_enum_in_query_uses_envelope() {
        let (status, body) = send("/movimentos?kind=TRANSFER").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BAD_REQUEST");
        assert!(body["details"]["reason"].as_str().is_some_and(|r| r.contains("TRANSFER")));
    }

    #[tokio::test]
    async fn valid_values_pass_through() {
        let id = Uuid::new_v4();
        let response = router()
            .oneshot(
                axum::http::Request::get(format!("/itens/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], id.to_string().as_bytes());
    }
}
