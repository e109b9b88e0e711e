//! HTTP surface: health probe and translation lookup.
//!
//! Every request passes through [`log_completion`], which records the
//! request id, elapsed time, and final status once the handler has produced
//! its response.

use axum::{
    extract::{Query, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use glossa_core::config::ServerConfig;
use glossa_core::error::GatewayError;
use glossa_core::traits::TranslationStore;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::request::parse_lookup;
use crate::resolver::{render_xml, Resolver};

/// Header carrying the caller's correlation id.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    resolver: Resolver,
}

impl ApiState {
    pub fn new(store: Arc<dyn TranslationStore>) -> Self {
        Self {
            resolver: Resolver::new(store),
        }
    }
}

/// `GET /status` — liveness probe, independent of the store.
async fn status() -> &'static str {
    "OK"
}

/// `GET /translationList` — resolve `t` keys for `site` and `lang`.
async fn translation_list(
    State(state): State<ApiState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    match lookup(&state, &params).await {
        Ok(body) => ([(CONTENT_TYPE, "text/xml")], body).into_response(),
        Err(e) => error_response(e),
    }
}

async fn lookup(state: &ApiState, params: &[(String, String)]) -> Result<String, GatewayError> {
    let request = parse_lookup(params)?;
    let resolved = state.resolver.resolve(&request).await?;
    Ok(render_xml(&resolved))
}

/// Map a gateway error to its status code and plain-text body.
fn error_response(e: GatewayError) -> Response {
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        error!("failed to get data from store: {e}");
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, e.to_string()).into_response()
}

/// Emit exactly one completion record per request, on every outcome.
async fn log_completion(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let total_ms = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0);
    info!(
        request_id = %request_id,
        total_ms = %total_ms,
        code = response.status().as_u16(),
        "finished handler {path}"
    );
    response
}

/// Build the axum router with shared state.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/translationList", get(translation_list))
        .layer(middleware::from_fn(log_completion))
        .with_state(state)
}

/// Bind the listener and serve until `shutdown` resolves.
pub async fn serve(
    config: &ServerConfig,
    store: Arc<dyn TranslationStore>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = build_router(ApiState::new(store));
    let addr = format!("{}:{}", config.host, config.port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
