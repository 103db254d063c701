//! REST server startup

use anyhow::{Context, Result};
use axum::serve;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::server::routing::create_router;
use crate::server::state::AppState;

/// Start the REST server and serve until it stops
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
  info!(storage = state.store.backend_name(), "starting explorer REST server on {addr}");

  let app = create_router(state).layer(
    ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()),
  );

  let listener = TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;
  info!("server listening on {addr}");

  serve(listener, app).await.context("server error")?;
  info!("server shut down");
  Ok(())
}
