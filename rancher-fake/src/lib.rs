//! Fake Rancher API server
//!
//! Serves the subset of the Norman (`/v3/clusters`) and Steve (`/v1/{type}`)
//! APIs the validation suites use, from an in-memory store, so the suites
//! can run without a Rancher installation.

pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    middleware,
    routing::get,
    Router,
};
use rancher_common::Cluster;
use state::{FakeState, RecordedRequest};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub use error::{FakeError, FakeResult};

pub const DEFAULT_TOKEN: &str = "token-fake:0123456789abcdef";
pub const DEFAULT_CLUSTER_ID: &str = "local";
pub const DEFAULT_CLUSTER_NAME: &str = "local";

#[derive(Debug, Clone)]
pub struct FakeOptions {
    pub token: String,
    pub clusters: Vec<Cluster>,
}

impl Default for FakeOptions {
    fn default() -> Self {
        Self {
            token: DEFAULT_TOKEN.to_string(),
            clusters: vec![Cluster::new(DEFAULT_CLUSTER_ID, DEFAULT_CLUSTER_NAME)],
        }
    }
}

/// Build the fake API router
pub fn router(state: Arc<FakeState>) -> Router {
    Router::new()
        .route("/v3/clusters", get(handlers::list_clusters))
        .route("/v3/clusters/:id", get(handlers::get_cluster))
        .route(
            "/v1/:type",
            get(handlers::list_objects).post(handlers::create_object),
        )
        .route("/v1/:type/:namespace", get(handlers::list_namespaced_objects))
        .route(
            "/v1/:type/:namespace/:name",
            get(handlers::get_object)
                .put(handlers::update_object)
                .delete(handlers::delete_object),
        )
        .layer(middleware::from_fn_with_state(state.clone(), handlers::require_token))
        .with_state(state)
}

/// A running fake server. The server stops when this is dropped.
pub struct FakeRancher {
    base_url: String,
    state: Arc<FakeState>,
    handle: JoinHandle<()>,
}

impl FakeRancher {
    /// Start on an ephemeral localhost port
    pub async fn start(options: FakeOptions) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let state = Arc::new(FakeState::new(options.token, options.clusters, base_url.clone()));
        let app = router(state.clone());

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Fake Rancher server error: {}", e);
            }
        });

        tracing::info!("Fake Rancher listening on {}", base_url);

        Ok(Self {
            base_url,
            state,
            handle,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.state.token
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.state.clusters
    }

    /// Every request received so far
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().await.clone()
    }

    /// Number of stored objects of `type_`
    pub async fn object_count(&self, type_: &str) -> usize {
        self.state.objects.read().await.len(type_)
    }
}

impl Drop for FakeRancher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
