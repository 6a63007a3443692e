//! Admin HTTP API.
//!
//! Lets operators and the request layer drive the directories remotely:
//! inspect state, resolve the name to use, report failures, push alias lists
//! and force a sweep. Every route requires the configured bearer token.

pub mod auth;
pub mod handlers;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
    middleware,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::directory::DirectoryRegistry;
use crate::lifecycle::Shutdown;
use self::handlers::*;
use self::auth::admin_auth_middleware;

/// State shared by admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub registry: Arc<DirectoryRegistry>,
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(registry: Arc<DirectoryRegistry>, api_key: &str) -> Self {
        Self {
            registry,
            api_key: Arc::from(api_key),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/domains", get(list_domains))
        .route("/admin/domains/{primary}", get(get_domain))
        .route("/admin/domains/{primary}/resolve", get(resolve_domain))
        .route("/admin/domains/{primary}/offline", post(mark_offline))
        .route("/admin/domains/{primary}/aliases", put(update_aliases))
        .route("/admin/sweep", post(trigger_sweep))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the admin API until shutdown is triggered.
pub async fn serve(listener: TcpListener, state: AdminState, shutdown: Shutdown) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Admin API listening");

    axum::serve(listener, setup_admin_router(state))
        .with_graceful_shutdown(shutdown.wait())
        .await
}
