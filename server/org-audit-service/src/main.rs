//! Binary entrypoint for the audit service.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use org_audit_engine::Auditor;
use org_audit_service::{AppState, HttpSummarizer, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let config = ServiceConfig::from_env()?;

  let summarizer = if config.summarizer.enabled {
    Some(HttpSummarizer::new(config.summarizer.clone())?)
  } else {
    warn!("no summarizer configured; recommendations will be placeholders");
    None
  };

  let state = Arc::new(AppState {
    auditor: Auditor::new(config.audit.clone()),
    summarizer,
    request_timeout: config.request_timeout,
  });

  let app = org_audit_service::router(state);

  let addr = SocketAddr::new(config.bind_addr, config.port);
  info!("org-audit-service listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
