//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the form echo and static mount handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Stop accepting on the shutdown broadcast and drain in-flight requests

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::PathRejection, Path, Request as AxumRequest, State},
    http::{header, HeaderMap, Method},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::assets::directory::StaticDirectory;
use crate::assets::response::build_static_response;
use crate::config::BoundaryConfig;
use crate::error::BoundaryError;
use crate::http::request::Request;
use crate::http::response::FormSummary;
use crate::http::transport;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub body_limit: Option<usize>,
}

/// HTTP server exposing the boundary layer.
pub struct HttpServer {
    router: Router,
    config: BoundaryConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and
    /// already-materialized static mounts.
    pub fn new(config: BoundaryConfig, mounts: Vec<StaticDirectory>) -> Self {
        let state = AppState {
            body_limit: config.limits.max_request_body_bytes,
        };
        let router = Self::build_router(&config, state, mounts);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &BoundaryConfig, state: AppState, mounts: Vec<StaticDirectory>) -> Router {
        let mut router = Router::new().route("/forms", post(form_echo_handler));

        for mount in mounts {
            let route = if mount.url_path() == "/" {
                "/{*path}".to_string()
            } else {
                format!("{}/{{*path}}", mount.url_path())
            };
            tracing::info!(url_path = %mount.url_path(), "Static mount registered");

            let mount = Arc::new(mount);
            router = router.route(
                &route,
                get(
                    move |method: Method,
                          headers: HeaderMap,
                          path: Result<Path<String>, PathRejection>| {
                        static_handler(mount.clone(), method, headers, path)
                    },
                ),
            );
        }

        router
            .fallback(|| async { BoundaryError::NotFound })
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The configured router, for serving or driving in-process.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown broadcast fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mounts = self.config.static_mounts.len(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }
}

/// Decode the request form and describe it as JSON.
async fn form_echo_handler(State(state): State<AppState>, request: AxumRequest) -> Response {
    let (parts, body) = request.into_parts();
    let mut request = Request::from_parts(&parts, transport::from_body(body))
        .with_body_limit(state.body_limit);

    tracing::debug!(
        method = %request.method(),
        content_type = %request.content_type(),
        "Decoding form"
    );

    match request.form().await {
        Ok(form) => Json(FormSummary::from(form)).into_response(),
        Err(error) => error.into_response(),
    }
}

async fn static_handler(
    mount: Arc<StaticDirectory>,
    method: Method,
    headers: HeaderMap,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    // Undecodable paths are indistinguishable from missing files.
    let Ok(Path(path)) = path else {
        tracing::debug!(url_path = %mount.url_path(), "Static path failed to decode");
        return BoundaryError::NotFound.into_response();
    };
    let if_none_match = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());

    match build_static_response(&mount, &path, if_none_match) {
        Ok(response) => response.for_method(&method).into_response(),
        Err(error) => error.into_response(),
    }
}
