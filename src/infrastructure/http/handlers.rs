//! Route handlers for the content service

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error};

use crate::domain::errors::ConfigError;
use crate::domain::models::{AppSettings, ProviderEntry};
use crate::services::ConfigAccessors;

/// Application state shared by every route
#[derive(Clone)]
pub struct ContentAppState {
    pub accessors: Arc<ConfigAccessors>,
    pub settings: Arc<AppSettings>,
}

/// A configuration failure rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError(pub ConfigError);

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        if self.0.is_unknown_key() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Configuration error while serving request");
        } else {
            debug!(error = %self.0, "Requested configuration key does not exist");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ProviderResponse {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<ProviderEntry>,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub group: String,
    pub template: String,
    pub body: String,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn service_info(State(state): State<ContentAppState>) -> Json<Value> {
    Json(json!({
        "app_name": state.settings.app_name,
        "debug": state.settings.debug,
    }))
}

pub async fn default_provider(
    State(state): State<ContentAppState>,
) -> Result<Json<ProviderResponse>, ApiError> {
    let provider = state.accessors.default_provider()?;
    Ok(Json(ProviderResponse {
        provider,
        settings: None,
    }))
}

pub async fn provider_settings(
    State(state): State<ContentAppState>,
    Path(provider): Path<String>,
) -> Result<Json<ProviderResponse>, ApiError> {
    let settings = state.accessors.provider_settings(Some(&provider))?;
    Ok(Json(ProviderResponse {
        provider,
        settings: Some(settings),
    }))
}

pub async fn prompt_template(
    State(state): State<ContentAppState>,
    Path((group, template)): Path<(String, String)>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let body = state.accessors.prompt_template(&group, &template)?;
    Ok(Json(TemplateResponse {
        group,
        template,
        body,
    }))
}
