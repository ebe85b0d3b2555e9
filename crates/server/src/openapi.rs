use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Free-form record body: any subset of the record's fields may appear, and
/// unknown fields are stored as-is.
#[derive(ToSchema)]
pub struct HealthRecordBodyDoc {
    pub patient_name: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::records::create_record,
        crate::routes::records::list_records,
        crate::routes::records::get_record,
        crate::routes::records::update_record,
        crate::routes::records::delete_record,
    ),
    components(
        schemas(
            HealthResponse,
            HealthRecordBodyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "records")
    )
)]
pub struct ApiDoc;
