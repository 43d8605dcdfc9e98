//! API routes for operator-api

pub mod courses;
pub mod extract;
pub mod health;
pub mod ingredients;
pub mod me;
pub mod orders;
pub mod uploads;
pub mod users;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Router, middleware};
use http::{HeaderName, StatusCode};
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::operator_auth::operator_auth_middleware;
use crate::error::ServiceError;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, ServiceError>;

/// Request body limit; a course save carries several images
const MAX_BODY_SIZE: usize = 64 * 1024 * 1024;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_CONCURRENT_REQUESTS: usize = 256;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Operator back office (JWT authenticated)
    let operator = Router::new()
        .route("/orders", post(orders::list_orders))
        .route(
            "/courses",
            get(courses::list_courses).post(courses::save_course),
        )
        .route("/courses/remove", post(courses::remove_course))
        .route(
            "/ingredients",
            get(ingredients::list_ingredients).post(ingredients::save_ingredient),
        )
        .route("/ingredients/delete", post(ingredients::delete_ingredient))
        .route("/users", get(users::list_users))
        .route("/users/{id}/roles", post(users::set_user_roles));

    let authenticated = Router::new()
        .nest("/api/operator", operator)
        .route("/api/me", get(me::current_user))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            operator_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/uploads/{filename}", get(uploads::serve_upload))
        .merge(authenticated)
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            MakeRequestUuid,
        ))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use crate::services::testing::state;
    use axum::body::Body;
    use http::{Request, StatusCode};

    #[tokio::test]
    async fn test_health_is_public() {
        let (state, _) = state().await;
        let response = send(&state, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (state, _) = state().await;
        let request = Request::get("/api/operator/courses")
            .body(Body::empty())
            .unwrap();
        let response = send(&state, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = json_body(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["reason"], "unauthorized");
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let (state, _) = state().await;
        let response = send(&state, get("/api/operator/courses", "Bearer not-a-jwt")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_missing_ability_is_forbidden() {
        let (state, _) = state().await;
        let auth = bearer(&state, &["driver"]);
        let response = send(&state, get("/api/operator/courses", &auth)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(response).await["reason"], "forbidden");
    }
}
