use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};
use tracing::info;

use models::HealthRecord;

use crate::errors::ApiError;
use crate::routes::ServerState;

// Bodies are duck-typed field maps, not a fixed schema: any subset of the
// record's fields is accepted, unknown fields included.

#[utoipa::path(
    post, path = "/health-records", tag = "records",
    request_body = crate::openapi::HealthRecordBodyDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create_record(
    State(state): State<ServerState>,
    Json(body): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<HealthRecord>), ApiError> {
    let record = state.records.create(body).await?;
    info!(id = %record.id, "created health record");
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get, path = "/health-records", tag = "records",
    responses((status = 200, description = "OK"))
)]
pub async fn list_records(State(state): State<ServerState>) -> Json<Vec<HealthRecord>> {
    let records = state.records.get_all().await;
    info!(count = records.len(), "listed health records");
    Json(records)
}

#[utoipa::path(
    get, path = "/health-records/{id}", tag = "records",
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_record(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<HealthRecord>, ApiError> {
    let record = state.records.get_one(&id).await?;
    Ok(Json(record))
}

#[utoipa::path(
    put, path = "/health-records/{id}", tag = "records",
    params(("id" = String, Path, description = "Record id")),
    request_body = crate::openapi::HealthRecordBodyDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Record Not Found")
    )
)]
pub async fn update_record(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<HealthRecord>, ApiError> {
    let record = state.records.update(&id, body).await?;
    info!(id = %id, "updated health record");
    Ok(Json(record))
}

#[utoipa::path(
    delete, path = "/health-records/{id}", tag = "records",
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Record Not Found")
    )
)]
pub async fn delete_record(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<HealthRecord>, ApiError> {
    let record = state.records.delete(&id).await?;
    info!(id = %id, "deleted health record");
    Ok(Json(record))
}
