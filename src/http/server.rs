//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the balance handler
//! - Wire up middleware (tracing, request ID, timeout, CORS)
//! - Bind server to listener and shut down gracefully

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    BoxError, Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::BalanceConfig;
use crate::http::response::{BalanceBody, ErrorBody};
use crate::lifecycle::shutdown::wait_for;
use crate::observability::metrics;
use crate::provider::types::FetchError;
use crate::service::BalanceService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: BalanceService,
}

/// HTTP server exposing the balance endpoint.
pub struct HttpServer {
    router: Router,
    config: BalanceConfig,
}

impl HttpServer {
    /// Create a new HTTP server around a ready balance service.
    pub fn new(config: BalanceConfig, service: BalanceService) -> Self {
        let state = AppState { service };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &BalanceConfig, state: AppState) -> Router {
        let request_timeout = Duration::from_secs(config.timeouts.request_secs);

        Router::new()
            .route("/balance", get(balance_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(handle_layer_error))
                    .layer(TimeoutLayer::new(request_timeout)),
            )
            .layer(CorsLayer::permissive())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The configured router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                wait_for(shutdown).await;
                tracing::info!("Shutdown requested");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }
}

/// Span for one inbound request, tagged with its request ID.
fn request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// Render middleware failures with the same error payload as the handler.
async fn handle_layer_error(err: BoxError) -> Response {
    if err.is::<Elapsed>() {
        tracing::warn!("Inbound request deadline elapsed");
        FetchError::Timeout.into_response()
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody { error: "Internal" }),
        )
            .into_response()
    }
}

/// `GET /balance`: current balance or a typed error.
async fn balance_handler(State(state): State<AppState>) -> Response {
    let start_time = Instant::now();

    match state.service.get_balance().await {
        Ok(reading) => {
            tracing::debug!(source = ?reading.source(), "Balance served");
            metrics::record_request(200, start_time);
            Json(BalanceBody::from(&reading)).into_response()
        }
        Err(err) => {
            let response = err.into_response();
            metrics::record_request(response.status().as_u16(), start_time);
            response
        }
    }
}
