//! Org Audit Service
//!
//! HTTP service that runs the audit engine on uploaded employee tables and attaches
//! summarizer recommendations. Bind to 127.0.0.1 by default (internal only).

mod config;
mod error;
mod handlers;
mod state;
mod summarizer;
mod types;

use std::sync::Arc;

use axum::{routing::get, routing::post, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{ServiceConfig, SummarizerConfig};
pub use error::{ApiError, ConfigError};
pub use handlers::{audit, health};
pub use state::AppState;
pub use summarizer::HttpSummarizer;
pub use types::{AuditResponse, SummaryStatus};

pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/audit", post(audit))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}
