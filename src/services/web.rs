//! Axum-based HTTP server for the console.
//!
//! Provides JSON endpoints for a browser renderer:
//! - GET `/api/state` - Full dashboard snapshot
//! - GET `/api/gauges` - Every registered gauge
//! - GET `/api/gauges/:id` - One gauge with its scale marks
//! - POST `/api/command` - Apply a [`DashboardCommand`](crate::DashboardCommand)

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use crate::commands::CommandSource;
use crate::config::WebConfig;
use crate::dashboard::{Dashboard, DashboardSnapshot, GaugeReading};
use crate::traits::Clock;

use super::api::{parse_command_body, ApiResponse, CommandResponse, GaugeResponse, SCALE_MARK_COUNT};

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/state - Returns the current snapshot
async fn get_state<C: Clock + 'static>(
    State(dashboard): State<Arc<Dashboard<C>>>,
) -> Json<ApiResponse<DashboardSnapshot>> {
    Json(ApiResponse::ok(dashboard.snapshot()))
}

/// GET /api/gauges - Returns every registered gauge
async fn list_gauges<C: Clock + 'static>(
    State(dashboard): State<Arc<Dashboard<C>>>,
) -> Json<ApiResponse<Vec<GaugeReading>>> {
    Json(ApiResponse::ok(dashboard.snapshot().gauges))
}

/// GET /api/gauges/:id - Returns one gauge and its scale
async fn get_gauge<C: Clock + 'static>(
    State(dashboard): State<Arc<Dashboard<C>>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let spec = dashboard.gauges().iter().find(|g| g.id.as_str() == id);
    match (spec, dashboard.gauge(&id)) {
        (Some(spec), Some(gauge)) => (
            StatusCode::OK,
            Json(ApiResponse::ok(GaugeResponse {
                gauge,
                scale_marks: spec.scale_marks(SCALE_MARK_COUNT),
            })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(format!("Unknown gauge: {id}"))),
        ),
    }
}

/// POST /api/command - Apply a command
///
/// Accepts JSON like `{"command": "go_to", "index": 2}` or the text form `go_to 2`.
async fn post_command<C: Clock + 'static>(
    State(dashboard): State<Arc<Dashboard<C>>>,
    body: Bytes,
) -> impl IntoResponse {
    let cmd = match parse_command_body(&body) {
        Ok(cmd) => cmd,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<CommandResponse>::err(e.to_string())),
            )
        }
    };

    let outcome = dashboard.apply_command_from(cmd, CommandSource::WebApi);
    (
        StatusCode::OK,
        Json(ApiResponse::ok(CommandResponse::new(&cmd, outcome))),
    )
}

/// Fallback handler for 404
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err("Not found")),
    )
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to
    pub addr: SocketAddr,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self::from_config(&WebConfig::default())
    }
}

impl WebServerConfig {
    /// Create a new config with the given address
    pub fn new(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            cors_permissive: true,
        }
    }

    /// Set whether CORS should be permissive
    pub fn cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Create from shared WebConfig. Binds to localhost only.
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: ([127, 0, 0, 1], config.port).into(),
            cors_permissive: config.cors_permissive,
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router<C: Clock + 'static>(
    dashboard: Arc<Dashboard<C>>,
    config: &WebServerConfig,
) -> Router {
    let mut router = Router::new()
        .route("/api/state", get(get_state::<C>))
        .route("/api/gauges", get(list_gauges::<C>))
        .route("/api/gauges/:id", get(get_gauge::<C>))
        .route("/api/command", post(post_command::<C>))
        .fallback(not_found)
        .with_state(dashboard);

    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Serve the API until `shutdown` is cancelled.
pub async fn run_server<C: Clock + 'static>(
    dashboard: Arc<Dashboard<C>>,
    config: WebServerConfig,
    shutdown: CancellationToken,
) -> Result<(), std::io::Error> {
    let router = build_router(dashboard, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "web server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
}
