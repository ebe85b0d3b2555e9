use std::sync::Arc;

use axum::{
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::services::record_service::RecordService;

pub mod records;

/// Shared handler state: the record service, behind an explicit handle.
#[derive(Clone)]
pub struct ServerState {
    pub records: Arc<RecordService>,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let record_routes = Router::new()
        .route(
            "/health-records",
            get(records::list_records).post(records::create_record),
        )
        .route(
            "/health-records/:id",
            get(records::get_record)
                .put(records::update_record)
                .delete(records::delete_record),
        );

    Router::new()
        .route("/health", get(health))
        .merge(record_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
