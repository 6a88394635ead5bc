//! HTTP front end for the gate.
//!
//! Exposes one decision endpoint and a health check:
//!
//! - `POST /check` with `{"target_word", "user_input", "total_score"}`,
//!   answered with `{"matched", "score"}`
//! - `GET /health` answered with `OK`
//!
//! `/check` always answers `200`. A body that cannot be read as a request
//! gets the same non-match answer as an unknown word, so clients only ever
//! branch on `matched`.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::gate::{Decision, DecisionEngine};
use crate::vector::VectorStore;

/// Body of `POST /check`. Missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckRequest {
    pub target_word: String,
    pub user_input: String,
    pub total_score: f64,
}

/// Answer of `POST /check`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct CheckResponse {
    pub matched: bool,
    pub score: f64,
}

impl From<Decision> for CheckResponse {
    fn from(decision: Decision) -> Self {
        Self {
            matched: decision.accepted,
            score: decision.score,
        }
    }
}

/// Build the application router around a shared engine.
///
/// `cors_origins` containing `"*"` allows any origin; otherwise only the
/// listed origins are allowed.
pub fn router<S>(engine: DecisionEngine<S>, cors_origins: &[String]) -> Router
where
    S: VectorStore + ?Sized + 'static,
{
    Router::new()
        .route("/check", post(check::<S>))
        .route("/health", get(health_check))
        .layer(ServiceBuilder::new().layer(cors_layer(cors_origins)))
        .with_state(engine)
}

/// Bind `bind` and serve until Ctrl+C.
pub async fn serve_http<S>(
    engine: DecisionEngine<S>,
    bind: &str,
    cors_origins: &[String],
) -> anyhow::Result<()>
where
    S: VectorStore + ?Sized + 'static,
{
    let vocabulary = engine.store().len();
    let app = router(engine, cors_origins);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(
        "ThinkLink gate listening on http://{} ({vocabulary} words)",
        listener.local_addr()?
    );
    info!("Decision endpoint: POST /check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn check<S>(State(engine): State<DecisionEngine<S>>, body: Bytes) -> Json<CheckResponse>
where
    S: VectorStore + ?Sized + 'static,
{
    let request = match serde_json::from_slice::<CheckRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Malformed /check body, answering non-match: {e}");
            return Json(Decision::rejected().into());
        }
    };

    let decision = engine.decide(
        &request.target_word,
        &request.user_input,
        request.total_score,
    );
    debug!(
        target_word = %request.target_word,
        candidate = %request.user_input,
        accepted = decision.accepted,
        "POST /check"
    );

    Json(decision.into())
}

async fn health_check() -> &'static str {
    "OK"
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|origin| origin.trim() == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{origin}': {e}");
                None
            }
        })
        .collect();

    layer.allow_origin(allowed)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl+c: {e}");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
