//! # API REST
//!
//! REST API implementation for the Health Gateway.
//!
//! Handles:
//! - HTTP endpoints with axum, one controller module per resource
//! - Bearer token authentication and per-patient access checks
//! - OpenAPI/Swagger documentation
//!
//! Controllers stay thin: they authenticate, parse path/query/body values, call a
//! `gateway-core` service and return its `RequestResult` envelope unchanged.

#![warn(rust_2018_idioms)]

pub mod auth;
pub mod controllers;
pub mod error;
pub mod state;

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;
pub use state::AppState;

use controllers::{
    comment, dependent, health, immunization, note, patient, user_profile, vaccine_status,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        patient::get_patient,
        immunization::get_immunizations,
        immunization::get_immunization,
        vaccine_status::get_public_vaccine_status,
        vaccine_status::get_authenticated_vaccine_status,
        vaccine_status::get_vaccine_proof,
        user_profile::get_user_profile,
        user_profile::create_user_profile,
        user_profile::close_user_profile,
        user_profile::recover_user_profile,
        user_profile::get_preferences,
        user_profile::update_preferences,
        comment::get_comments,
        comment::get_all_comments,
        comment::add_comment,
        comment::update_comment,
        comment::delete_comment,
        note::get_notes,
        note::add_note,
        note::update_note,
        note::delete_note,
        dependent::get_dependents,
        dependent::add_dependent,
        dependent::remove_dependent,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::dto::ProblemDetails,
        api_shared::dto::RequestResultDoc,
        api_shared::dto::RequestResultErrorDoc,
        api_shared::dto::CreateUserProfileRequest,
        api_shared::dto::PreferencesRequest,
        api_shared::dto::CommentRequest,
        api_shared::dto::CommentUpdateRequest,
        api_shared::dto::DeleteEntryRequest,
        api_shared::dto::NoteRequest,
        api_shared::dto::AddDependentBody,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with every controller, Swagger UI, CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/Patient/:hdid", get(patient::get_patient))
        .route("/Immunization", get(immunization::get_immunizations))
        .route("/Immunization/:id", get(immunization::get_immunization))
        .route(
            "/PublicVaccineStatus",
            get(vaccine_status::get_public_vaccine_status),
        )
        .route(
            "/AuthenticatedVaccineStatus",
            get(vaccine_status::get_authenticated_vaccine_status),
        )
        .route(
            "/AuthenticatedVaccineStatus/pdf",
            get(vaccine_status::get_vaccine_proof),
        )
        .route(
            "/UserProfile/:hdid",
            get(user_profile::get_user_profile)
                .post(user_profile::create_user_profile)
                .delete(user_profile::close_user_profile),
        )
        .route(
            "/UserProfile/:hdid/recover",
            get(user_profile::recover_user_profile),
        )
        .route(
            "/UserProfile/:hdid/preference",
            get(user_profile::get_preferences).put(user_profile::update_preferences),
        )
        .route(
            "/UserProfile/:hdid/Comment",
            get(comment::get_comments)
                .post(comment::add_comment)
                .put(comment::update_comment)
                .delete(comment::delete_comment),
        )
        .route("/UserProfile/:hdid/Comment/all", get(comment::get_all_comments))
        .route(
            "/Note/:hdid",
            get(note::get_notes)
                .post(note::add_note)
                .put(note::update_note)
                .delete(note::delete_note),
        )
        .route(
            "/UserProfile/:hdid/Dependent",
            get(dependent::get_dependents).post(dependent::add_dependent),
        )
        .route(
            "/UserProfile/:hdid/Dependent/:dependent_hdid",
            delete(dependent::remove_dependent),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
