//! HTTP client for the controller API.

pub mod types;

use crate::error::Result;
use types::{ControllerState, SettingsPatchRequest, SettingsState};

/// Where the daemon listens unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7780";

/// Thin wrapper over `reqwest` for the v0 endpoints.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v0{}", self.base_url, path)
    }

    pub async fn get_state(&self) -> Result<ControllerState> {
        let state = self
            .http
            .get(self.url("/state"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(state)
    }

    pub async fn get_settings(&self) -> Result<SettingsState> {
        let settings = self
            .http
            .get(self.url("/settings"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(settings)
    }

    pub async fn patch_settings(&self, patch: &SettingsPatchRequest) -> Result<SettingsState> {
        let settings = self
            .http
            .patch(self.url("/settings"))
            .json(patch)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(settings)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
