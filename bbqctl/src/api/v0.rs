//! API v0 endpoints.
//!
//! Version 0 signals an unstable API -- breaking changes are expected.

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::{router::OpenApiRouter, routes};

use super::server::SharedState;
use crate::api_client::types::{ControllerState, SettingsPatchRequest, SettingsState};
use crate::tracing::prelude::*;

/// Build the v0 API routes with OpenAPI metadata.
pub fn routes() -> OpenApiRouter<SharedState> {
    OpenApiRouter::new()
        .routes(routes!(health))
        .routes(routes!(get_state))
        .routes(routes!(get_settings, patch_settings))
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = OK, description = "Server is running", body = String),
    ),
)]
async fn health() -> &'static str {
    "OK"
}

/// Return the latest controller report.
#[utoipa::path(
    get,
    path = "/state",
    tag = "controller",
    responses(
        (status = OK, description = "Latest controller state", body = ControllerState),
    ),
)]
async fn get_state(State(state): State<SharedState>) -> Json<ControllerState> {
    Json(state.controller_state())
}

/// Return the current settings.
#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    responses(
        (status = OK, description = "Current settings", body = SettingsState),
    ),
)]
async fn get_settings(State(state): State<SharedState>) -> Json<SettingsState> {
    Json(state.settings.snapshot().into())
}

/// Apply a partial settings update.
///
/// Either every field in the request is applied or none is.
#[utoipa::path(
    patch,
    path = "/settings",
    tag = "settings",
    request_body = SettingsPatchRequest,
    responses(
        (status = OK, description = "Updated settings", body = SettingsState),
        (status = BAD_REQUEST, description = "Duty percentage out of range"),
    ),
)]
async fn patch_settings(
    State(state): State<SharedState>,
    Json(req): Json<SettingsPatchRequest>,
) -> Result<Json<SettingsState>, (StatusCode, String)> {
    if let Err(e) = req.validate() {
        debug!(error = %e, "Rejected settings update");
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }

    let updated = state.settings.update(|settings| {
        req.apply(settings);
        *settings
    });
    info!(?req, "Settings updated");

    Ok(Json(updated.into()))
}
