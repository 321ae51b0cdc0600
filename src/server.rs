// src/server.rs

//! HTTP surface of the scanner.
//!
//! - `GET /api/domain?domain=<name>` runs a full scan and returns the report
//! - `GET /health` answers `ok`

use std::net::SocketAddr;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::ScanConfig;
use crate::core::context::ScanContext;
use crate::core::domain::ScanRequest;
use crate::core::models::ScanReport;
use crate::core::report::run_full_scan;
use crate::error::ScanError;

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    ctx: ScanContext,
}

impl AppState {
    /// Builds the state with real DNS resolvers and a fresh HTTP client.
    pub fn new(config: ScanConfig) -> Result<Self> {
        Ok(Self::from_context(ScanContext::new(config)?))
    }

    pub fn from_context(ctx: ScanContext) -> Self {
        Self { ctx }
    }
}

#[derive(Debug, Deserialize)]
pub struct DomainQuery {
    domain: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/domain", get(scan_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("Failed to bind scan server to {addr}"))?;
    serve_listener(listener, state).await
}

/// Serves on an already-bound listener.
pub async fn serve_listener(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr().wrap_err("Listener has no local address")?;
    info!("Scan server listening on http://{addr}/");
    info!("  - Scan: http://{addr}/api/domain?domain=example.com");

    axum::serve(listener, router(state))
        .await
        .wrap_err("Scan server error")
}

async fn scan_handler(
    State(state): State<AppState>,
    Query(query): Query<DomainQuery>,
) -> Result<Json<ScanReport>, ScanError> {
    let request = ScanRequest::parse(query.domain.as_deref().unwrap_or_default())?;
    info!(target = %request.host(), "Scan requested.");

    // A panic inside the scan surfaces as a JoinError instead of tearing down the connection.
    let report = tokio::spawn(run_full_scan(state.ctx.clone(), request))
        .await
        .map_err(|e| {
            error!(error = %e, "Scan task failed.");
            ScanError::Orchestration(e.to_string())
        })?;

    Ok(Json(report))
}

async fn health_handler() -> &'static str {
    "ok"
}
