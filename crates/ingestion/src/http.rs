//! HTTP surface of an ingestion service

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use contracts::{DocumentStore, PageRequest};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::alert::AlertStrategy;
use crate::error::Result;
use crate::service::IngestionService;

/// Router serving `GET /` and `POST /` for one sensor type
pub fn router<S, A>(service: Arc<IngestionService<S, A>>) -> Router
where
    S: DocumentStore + Send + Sync + 'static,
    A: AlertStrategy + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(list_readings::<S, A>)
                .post(ingest_reading::<S, A>)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Bind-and-serve until `shutdown` resolves
pub async fn serve<S, A>(
    listener: TcpListener,
    service: Arc<IngestionService<S, A>>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()>
where
    S: DocumentStore + Send + Sync + 'static,
    A: AlertStrategy + Send + Sync + 'static,
{
    let sensor = service.profile().name.clone();
    info!(sensor = %sensor, addr = ?listener.local_addr().ok(), "Ingestion service listening");
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Missing, non-numeric or zero values fall back to defaults.
fn page_from_query(params: &HashMap<String, String>) -> PageRequest {
    let field = |name: &str| {
        params
            .get(name)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0)
    };
    PageRequest::new(field("page"), field("limit"))
}

async fn list_readings<S, A>(
    State(service): State<Arc<IngestionService<S, A>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response>
where
    S: DocumentStore + Send + Sync + 'static,
    A: AlertStrategy + Send + Sync + 'static,
{
    let body = service.list_wire(page_from_query(&params)).await?;
    Ok(Json(body).into_response())
}

async fn ingest_reading<S, A>(
    State(service): State<Arc<IngestionService<S, A>>>,
    body: Bytes,
) -> Result<Response>
where
    S: DocumentStore + Send + Sync + 'static,
    A: AlertStrategy + Send + Sync + 'static,
{
    let alerting = service.ingest(&body).await?;
    let text = if alerting { "true" } else { "false" };
    Ok((StatusCode::CREATED, text).into_response())
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}
