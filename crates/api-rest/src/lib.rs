//! # API REST
//!
//! REST API implementation for Clinica.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, error-to-status
//!   mapping)
//!
//! All domain logic lives in `clinica-core`; handlers here only translate
//! between HTTP and the core services.

#![warn(rust_2018_idioms)]

use std::sync::Arc;

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use clinica_core::{
    ClinicError, CreatePrescriptionReq, MedicationCatalog, MedicationEntry, MedicationReference,
    Prescription, PrescriptionService, UpdatePrescriptionReq,
};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PrescriptionService>,
    pub catalog: Arc<MedicationCatalog>,
}

/// Machine-readable error payload returned on every failure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

/// Confirmation payload for operations that do not return a document.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

/// Health check payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Fragment to match against medication names, case-insensitively.
    pub search: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        create_prescription,
        list_prescriptions,
        get_prescription,
        update_prescription,
        delete_prescription,
        list_medications,
        search_medications,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        MessageRes,
        Prescription,
        MedicationEntry,
        MedicationReference,
        CreatePrescriptionReq,
        UpdatePrescriptionReq,
    ))
)]
struct ApiDoc;

/// Builds the REST router with every endpoint, Swagger UI, and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/prescricoes", post(create_prescription))
        .route("/prescricoes", get(list_prescriptions))
        .route("/prescricoes/:id", get(get_prescription))
        .route("/prescricoes/:id", patch(update_prescription))
        .route("/prescricoes/:id", delete(delete_prescription))
        .route("/medicamentos", get(list_medications))
        .route("/medicamentos/busca", get(search_medications))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type ErrReply = (StatusCode, Json<ErrorRes>);

/// Maps a core error to its HTTP status and error payload.
///
/// Validation and malformed-id failures are the caller's fault (400), missing
/// records and medications are 404, and store or reference-dataset failures
/// surface as 500 after being logged.
fn error_reply(err: ClinicError) -> ErrReply {
    let status = match &err {
        ClinicError::InvalidInput(_) | ClinicError::InvalidId(_) => StatusCode::BAD_REQUEST,
        ClinicError::PrescriptionNotFound(_)
        | ClinicError::MedicationNotFound(_)
        | ClinicError::NoSearchMatches(_) => StatusCode::NOT_FOUND,
        ClinicError::ReferenceRead(_)
        | ClinicError::ReferenceUnavailable(_)
        | ClinicError::StoreDirCreation(_)
        | ClinicError::FileWrite(_)
        | ClinicError::FileRead(_)
        | ClinicError::FileDelete(_)
        | ClinicError::Serialization(_)
        | ClinicError::Deserialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("request failed: {}", err);
    }

    (
        status,
        Json(ErrorRes {
            error: err.to_string(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Clinica REST API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/prescricoes",
    request_body = CreatePrescriptionReq,
    responses(
        (status = 201, description = "Prescription created", body = Prescription),
        (status = 400, description = "Missing required fields", body = ErrorRes),
        (status = 404, description = "Unknown medication name", body = ErrorRes)
    )
)]
/// Creates a prescription, enriching each medication entry through the
/// reference catalog before anything is persisted.
#[axum::debug_handler]
async fn create_prescription(
    State(state): State<AppState>,
    Json(req): Json<CreatePrescriptionReq>,
) -> Result<(StatusCode, Json<Prescription>), ErrReply> {
    let created = state.service.create(req).map_err(error_reply)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/prescricoes",
    responses(
        (status = 200, description = "All prescriptions", body = [Prescription])
    )
)]
#[axum::debug_handler]
async fn list_prescriptions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Prescription>>, ErrReply> {
    let prescriptions = state.service.list().map_err(error_reply)?;
    Ok(Json(prescriptions))
}

#[utoipa::path(
    get,
    path = "/prescricoes/{id}",
    responses(
        (status = 200, description = "The matching prescription", body = Prescription),
        (status = 400, description = "Malformed id", body = ErrorRes),
        (status = 404, description = "No matching prescription", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn get_prescription(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<Prescription>, ErrReply> {
    let prescription = state.service.get(&id).map_err(error_reply)?;
    Ok(Json(prescription))
}

#[utoipa::path(
    patch,
    path = "/prescricoes/{id}",
    request_body = UpdatePrescriptionReq,
    responses(
        (status = 200, description = "Prescription updated", body = MessageRes),
        (status = 400, description = "No recognized field in payload", body = ErrorRes),
        (status = 404, description = "No matching prescription or medication", body = ErrorRes)
    )
)]
/// Applies a sparse update. A supplied `medicamentos` list is re-enriched
/// exactly as on create; any failure leaves the stored document untouched.
#[axum::debug_handler]
async fn update_prescription(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<UpdatePrescriptionReq>,
) -> Result<Json<MessageRes>, ErrReply> {
    state.service.update(&id, req).map_err(error_reply)?;
    Ok(Json(MessageRes {
        message: "Prescrição atualizada com sucesso".into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/prescricoes/{id}",
    responses(
        (status = 200, description = "Prescription deleted", body = MessageRes),
        (status = 400, description = "Malformed id", body = ErrorRes),
        (status = 404, description = "No matching prescription", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn delete_prescription(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<MessageRes>, ErrReply> {
    state.service.delete(&id).map_err(error_reply)?;
    Ok(Json(MessageRes {
        message: "Prescrição deletada com sucesso".into(),
    }))
}

#[utoipa::path(
    get,
    path = "/medicamentos",
    responses(
        (status = 200, description = "Full medication reference list", body = [MedicationReference]),
        (status = 500, description = "Reference dataset unavailable", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn list_medications(State(state): State<AppState>) -> Json<Vec<MedicationReference>> {
    Json(state.catalog.list_all().to_vec())
}

#[utoipa::path(
    get,
    path = "/medicamentos/busca",
    params(SearchParams),
    responses(
        (status = 200, description = "Medications matching the fragment", body = [MedicationReference]),
        (status = 400, description = "Missing search parameter", body = ErrorRes),
        (status = 404, description = "No medication matches", body = ErrorRes),
        (status = 500, description = "Reference dataset unavailable", body = ErrorRes)
    )
)]
/// Substring search over medication names, case-insensitive, preserving
/// table order.
#[axum::debug_handler]
async fn search_medications(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<MedicationReference>>, ErrReply> {
    let fragment = params.search.unwrap_or_default();
    let matches = state.catalog.search(&fragment).map_err(error_reply)?;
    Ok(Json(matches))
}
