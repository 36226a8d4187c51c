//! Partnerships REST API integration.

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::domain::{Configuration, Paginated, Partner, Partnership};
use crate::error::AppError;
use crate::query::SearchParams;

const CONFIGURATION_PATH: &str = "configuration";
const PARTNERS_PATH: &str = "partners";
const PARTNERSHIPS_PATH: &str = "partnerships";

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, settings: &Settings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AppError::remote(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        Self::new(settings.require_api_url()?, settings)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Reference data for the search form.
    pub fn fetch_configuration(&self) -> Result<Configuration, AppError> {
        self.get_json(CONFIGURATION_PATH, &[])
    }

    pub fn search_partners(&self, params: &SearchParams) -> Result<Paginated<Partner>, AppError> {
        self.get_json(PARTNERS_PATH, &params.to_pairs())
    }

    pub fn search_partnerships(&self, params: &SearchParams) -> Result<Paginated<Partnership>, AppError> {
        self.get_json(PARTNERSHIPS_PATH, &params.to_pairs())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> Result<T, AppError> {
        let url = self.endpoint(path);
        debug!(%url, params = query.len(), "GET");

        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| AppError::remote(format!("Request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%url, %status, "API request rejected");
            return Err(AppError::remote(format!("Request to {url} failed with status {status}.")));
        }

        resp.json()
            .map_err(|e| AppError::remote(format!("Failed to parse response from {url}: {e}")))
    }
}
