//! Administrative HTTP surface.
//!
//! - `GET /admin/status` version and active algorithm
//! - `GET /admin/stats` statistics snapshot
//! - `GET /admin/flows` current client → backend assignments
//! - `PUT /admin/algorithm` switch algorithm (`{"algorithm": "least-load"}`)
//!
//! Every route requires `Authorization: Bearer <api_key>`.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::controller::Controller;
use self::auth::admin_auth_middleware;
use self::handlers::*;

#[derive(Clone)]
pub struct AdminState {
    pub controller: Arc<Controller>,
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(controller: Arc<Controller>, api_key: &str) -> Self {
        Self {
            controller,
            api_key: Arc::from(api_key),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/stats", get(get_stats))
        .route("/admin/flows", get(get_flows))
        .route("/admin/algorithm", put(put_algorithm))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the admin router until shutdown.
pub async fn serve(
    listener: TcpListener,
    state: AdminState,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(address = %addr, "Admin API listening");
    }
    axum::serve(listener, setup_admin_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BalancerConfig;
    use crate::load_balancer::Algorithm;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> (Router, Arc<Controller>) {
        let controller = Arc::new(Controller::from_config(&BalancerConfig::default()).unwrap());
        let router = setup_admin_router(AdminState::new(controller.clone(), "secret"));
        (router, controller)
    }

    fn authed(method: &str, uri: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", "Bearer secret")
            .header("Content-Type", "application/json")
            .body(body)
            .unwrap()
    }

    #[tokio::test]
    async fn test_requires_token() {
        let (router, _) = app();
        let req = Request::builder().uri("/admin/stats").body(Body::empty()).unwrap();
        let res = router.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_stats() {
        let (router, _) = app();
        let res = router.oneshot(authed("GET", "/admin/stats", Body::empty())).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["total_requests"], 0);
        assert_eq!(json["algorithm"], "round-robin");
        assert_eq!(json["services"][0]["backends"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_set_algorithm() {
        let (router, controller) = app();
        let res = router
            .oneshot(authed("PUT", "/admin/algorithm", Body::from(r#"{"algorithm":"least-load"}"#)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(controller.algorithm(), Algorithm::LeastLoad);
    }

    #[tokio::test]
    async fn test_reject_unknown_algorithm() {
        let (router, controller) = app();
        let res = router
            .oneshot(authed("PUT", "/admin/algorithm", Body::from(r#"{"algorithm":"bogus"}"#)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let err: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert!(err.error.contains("bogus"));
        assert_eq!(controller.algorithm(), Algorithm::RoundRobin);
    }
}
