//! HTTP surface.
//!
//! - `GET /api/memes?after=<cursor>`: next feed page, always 200
//! - `POST /api/memes/generate`: caption a template
//! - `GET /api/memes/analyze-positions/{template_id}`: text box layout

pub mod delivery;

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::app::{AppContext, Result};
use crate::caption::GenerateRequest;
use crate::templates::suggest_positions;

#[derive(Debug, Deserialize)]
struct FeedQuery {
    after: Option<String>,
}

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/memes", get(feed))
        .route("/api/memes/generate", post(generate))
        .route(
            "/api/memes/analyze-positions/{template_id}",
            get(analyze_positions),
        )
        .with_state(ctx)
}

/// Serve until SIGINT or SIGTERM.
pub async fn serve(ctx: Arc<AppContext>, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Never rejects: an unparseable query string is served as an initial load.
async fn feed(
    State(ctx): State<Arc<AppContext>>,
    query: std::result::Result<Query<FeedQuery>, QueryRejection>,
) -> Response {
    let after = match query {
        Ok(Query(query)) => query.after,
        Err(e) => {
            warn!("Ignoring malformed feed query: {}", e);
            None
        }
    };

    let server = &ctx.config.server;
    let delivery = delivery::deliver(
        ctx.aggregator.clone(),
        after,
        server.request_timeout(),
        &server.cache_directive(),
    )
    .await;

    (
        [(header::CACHE_CONTROL, delivery.cache_control)],
        Json(delivery.page),
    )
        .into_response()
}

async fn generate(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    match ctx.captioner.caption(&request).await {
        Ok(caption) => Json(caption).into_response(),
        Err(e) => (
            e.status(),
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn analyze_positions(
    State(ctx): State<Arc<AppContext>>,
    Path(template_id): Path<String>,
) -> Response {
    Json(suggest_positions(&ctx.captioner, &template_id).await).into_response()
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = tokio::signal::ctrl_c() => {},
                }
            }
            Err(e) => {
                warn!("Failed to set up SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("Shutdown signal received");
}
